//! Domain layer: HID state, report layouts, stick filters, and synthesizer
//! settings.  Pure types with no I/O.

pub mod config;
pub mod filters;
pub mod hid_state;
pub mod reports;

pub use config::SynthesizerConfig;
pub use hid_state::{GamepadState, HidState, KeyboardState, MouseState};
pub use reports::{GamepadReport, KeyboardReport, MouseReport};
