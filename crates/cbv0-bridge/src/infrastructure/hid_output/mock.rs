//! Recording HID sink for tests.
//!
//! # Why a recording sink?
//!
//! The gadget sink writes to `/dev/hidgN` character devices that only exist
//! on a board configured as a USB device.  `RecordingSink` keeps every report
//! in memory instead, so tests can assert exactly what the host would have
//! received and in what order.
//!
//! ```ignore
//! let sink = Arc::new(RecordingSink::new());
//! let mut synth = ReportSynthesizer::new(SynthesizerConfig::default(), sink.clone());
//!
//! synth.apply(&Command::KeyEvent { op: ActionOp::Hold, key: "a".into() }, now);
//!
//! assert_eq!(sink.keyboard_reports()[0].keys[0], 0x04);
//! ```
//!
//! Set `should_fail` to make every write return [`SinkError::Unavailable`].

use std::sync::Mutex;

use crate::application::synthesizer::{HidReportSink, SinkError};
use crate::domain::reports::{GamepadReport, KeyboardReport, MouseReport};

/// One written report, in write order across all three endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentReport {
    Keyboard(KeyboardReport),
    Mouse(MouseReport),
    Gamepad(GamepadReport),
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<SentReport>>,
    /// When `true`, every write fails and nothing is recorded.
    pub should_fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Every report written so far.
    pub fn all(&self) -> Vec<SentReport> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.all().is_empty()
    }

    pub fn keyboard_reports(&self) -> Vec<KeyboardReport> {
        self.all()
            .into_iter()
            .filter_map(|r| match r {
                SentReport::Keyboard(k) => Some(k),
                _ => None,
            })
            .collect()
    }

    pub fn mouse_reports(&self) -> Vec<MouseReport> {
        self.all()
            .into_iter()
            .filter_map(|r| match r {
                SentReport::Mouse(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn gamepad_reports(&self) -> Vec<GamepadReport> {
        self.all()
            .into_iter()
            .filter_map(|r| match r {
                SentReport::Gamepad(g) => Some(g),
                _ => None,
            })
            .collect()
    }

    fn record(&self, report: SentReport) -> Result<(), SinkError> {
        if self.should_fail {
            return Err(SinkError::Unavailable("mock failure".to_string()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(report);
        }
        Ok(())
    }
}

impl HidReportSink for RecordingSink {
    fn send_keyboard(&self, report: &KeyboardReport) -> Result<(), SinkError> {
        self.record(SentReport::Keyboard(*report))
    }

    fn send_mouse(&self, report: &MouseReport) -> Result<(), SinkError> {
        self.record(SentReport::Mouse(*report))
    }

    fn send_gamepad(&self, report: &GamepadReport) -> Result<(), SinkError> {
        self.record(SentReport::Gamepad(*report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_write_order() {
        // Arrange
        let sink = RecordingSink::new();

        // Act
        sink.send_mouse(&MouseReport::default()).unwrap();
        sink.send_keyboard(&KeyboardReport::default()).unwrap();

        // Assert
        assert_eq!(
            sink.all(),
            vec![
                SentReport::Mouse(MouseReport::default()),
                SentReport::Keyboard(KeyboardReport::default()),
            ]
        );
    }

    #[test]
    fn test_failing_sink_records_nothing() {
        let sink = RecordingSink::failing();
        assert!(sink.send_gamepad(&GamepadReport::neutral()).is_err());
        assert!(sink.is_empty());
    }
}
