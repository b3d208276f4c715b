//! Dry-run sink: logs every report instead of writing it to a device.
//!
//! Selected with `[output] kind = "log"` or `--dry-run`, for running the
//! bridge on a machine without USB gadget support.  Keyboard reports are
//! also spelled out as key names (`ctrl+c`) so a dry run is readable.

use cbv0_core::semantics::{key_name, modifier_name};
use tracing::info;

use crate::application::synthesizer::{HidReportSink, SinkError};
use crate::domain::reports::{GamepadReport, KeyboardReport, MouseReport};

#[derive(Debug, Default)]
pub struct LogSink;

/// Held modifiers then held keys, joined with `+`.  Empty when nothing is
/// held; an unlisted usage ID is shown in hex.
fn describe_keys(report: &KeyboardReport) -> String {
    let modifiers = (0..8)
        .map(|shift| 1u8 << shift)
        .filter(|bit| report.modifiers & bit != 0)
        .map(|bit| modifier_name(bit).map_or_else(|| format!("mod{bit:#04x}"), str::to_string));
    let keys = report
        .keys
        .iter()
        .filter(|&&usage| usage != 0)
        .map(|&usage| key_name(usage).map_or_else(|| format!("{usage:#04x}"), str::to_string));
    modifiers.chain(keys).collect::<Vec<_>>().join("+")
}

impl HidReportSink for LogSink {
    fn send_keyboard(&self, report: &KeyboardReport) -> Result<(), SinkError> {
        info!(bytes = ?report.as_bytes(), keys = %describe_keys(report), "keyboard");
        Ok(())
    }

    fn send_mouse(&self, report: &MouseReport) -> Result<(), SinkError> {
        info!(bytes = ?report.as_bytes(), "mouse");
        Ok(())
    }

    fn send_gamepad(&self, report: &GamepadReport) -> Result<(), SinkError> {
        info!(bytes = ?report.as_bytes(), "gamepad");
        Ok(())
    }
}
