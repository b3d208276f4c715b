//! Infrastructure layer for the bridge.
//!
//! Contains the OS-facing adapters: HID output sinks, the UDP socket, and
//! configuration file storage.
//!
//! **Dependency rule**: this layer may depend on `application`, `domain` and
//! `cbv0_core`, but MUST NOT be imported by the `application` or `domain`
//! layers (tests excepted).

pub mod hid_output;
pub mod network;
pub mod storage;
