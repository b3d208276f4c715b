//! HID report sinks.  The implementation is selected at startup from the
//! `[output]` configuration.

pub mod gadget;
pub mod log_sink;
pub mod mock;

use std::sync::Arc;

use crate::application::synthesizer::{HidReportSink, SinkError};
use crate::infrastructure::storage::config::{OutputConfig, OutputKind};

/// Builds the sink named by `config.kind`.
///
/// # Errors
///
/// Returns [`SinkError`] if the gadget endpoint devices cannot be opened.
pub fn build_sink(config: &OutputConfig) -> Result<Arc<dyn HidReportSink>, SinkError> {
    match config.kind {
        OutputKind::Gadget => Ok(Arc::new(gadget::GadgetSink::open(config)?)),
        OutputKind::Log => Ok(Arc::new(log_sink::LogSink)),
    }
}
