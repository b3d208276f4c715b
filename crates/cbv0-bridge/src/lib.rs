//! cbv0-bridge library crate.
//!
//! The network-attached half of the touch HID bridge: it receives CBv0 frames
//! (and legacy text lines) over UDP and turns them into paced USB HID
//! keyboard, mouse, and gamepad reports.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Touch client (UDP datagrams)
//!         ↓
//! [cbv0-bridge]
//!   ├── domain/           HID state, report layouts, stick filters, settings
//!   ├── application/      Dispatcher, ReportSynthesizer, deferred queue, pacer
//!   └── infrastructure/
//!         ├── network/    UDP receive loop (tokio)
//!         ├── hid_output/ /dev/hidgN gadget sink, log sink, recording sink
//!         └── storage/    TOML configuration file
//!         ↓
//! Host computer (USB HID)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `cbv0-core`, and reaches the
//!   output device only through the [`application::HidReportSink`] trait.
//! - `infrastructure` depends on all other layers plus `tokio`.

/// Domain layer: pure state and report types (no I/O).
pub mod domain;

/// Application layer: routing, state machine, timers.
pub mod application;

/// Infrastructure layer: UDP socket, HID output devices, configuration file.
pub mod infrastructure;
