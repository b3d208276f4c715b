//! Linux USB gadget HID output.
//!
//! With the bridge board configured as a composite USB HID device (configfs
//! `functions/hid.*`), the kernel exposes one character device per report
//! endpoint.  Writing a report's bytes to the device sends it to the host on
//! the next interrupt-IN poll.
//!
//! | Endpoint | Default device | Report size |
//! |----------|----------------|-------------|
//! | Keyboard | `/dev/hidg0`   | 8 bytes     |
//! | Mouse    | `/dev/hidg1`   | 3 bytes     |
//! | Gamepad  | `/dev/hidg2`   | 7 bytes     |
//!
//! A write fails with `ESHUTDOWN` while the host has not enumerated the
//! gadget; that surfaces as a [`SinkError::Io`] and the report is dropped.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::application::synthesizer::{HidReportSink, SinkError};
use crate::domain::reports::{GamepadReport, KeyboardReport, MouseReport};
use crate::infrastructure::storage::config::OutputConfig;

/// Writes reports to the three gadget endpoint devices.
#[derive(Debug)]
pub struct GadgetSink {
    keyboard: File,
    mouse: File,
    gamepad: File,
}

impl GadgetSink {
    /// Opens the three endpoint devices for writing.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Io`] naming the first device that cannot be
    /// opened.
    pub fn open(config: &OutputConfig) -> Result<Self, SinkError> {
        let sink = Self {
            keyboard: open_endpoint(&config.keyboard_device, "keyboard")?,
            mouse: open_endpoint(&config.mouse_device, "mouse")?,
            gamepad: open_endpoint(&config.gamepad_device, "gamepad")?,
        };
        info!(
            keyboard = %config.keyboard_device.display(),
            mouse = %config.mouse_device.display(),
            gamepad = %config.gamepad_device.display(),
            "HID gadget endpoints open"
        );
        Ok(sink)
    }
}

fn open_endpoint(path: &Path, endpoint: &'static str) -> Result<File, SinkError> {
    OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|source| SinkError::Io { endpoint, source })
}

// `Write` is implemented for `&File`, so reports can be written through a
// shared reference.
fn write_report(mut file: &File, bytes: &[u8], endpoint: &'static str) -> Result<(), SinkError> {
    file.write_all(bytes)
        .map_err(|source| SinkError::Io { endpoint, source })
}

impl HidReportSink for GadgetSink {
    fn send_keyboard(&self, report: &KeyboardReport) -> Result<(), SinkError> {
        write_report(&self.keyboard, &report.as_bytes(), "keyboard")
    }

    fn send_mouse(&self, report: &MouseReport) -> Result<(), SinkError> {
        write_report(&self.mouse, &report.as_bytes(), "mouse")
    }

    fn send_gamepad(&self, report: &GamepadReport) -> Result<(), SinkError> {
        write_report(&self.gamepad, &report.as_bytes(), "gamepad")
    }
}
