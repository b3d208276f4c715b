//! Application layer: the HID state machine, its timers, and datagram routing.

pub mod deferred;
pub mod dispatcher;
pub mod legacy_line;
pub mod pacer;
pub mod synthesizer;

pub use deferred::{ControlAction, DeferredAction, DeferredQueue};
pub use dispatcher::{DispatchOutcome, DispatchStats, Dispatcher};
pub use legacy_line::{run_legacy_line, LineOutcome};
pub use pacer::Pacer;
pub use synthesizer::{HidReportSink, ReportSynthesizer, SinkError};
