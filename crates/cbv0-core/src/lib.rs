//! # cbv0-core
//!
//! Shared library for the touch HID bridge containing the CBv0 frame codec,
//! the command vocabulary, and the legacy ASCII command grammar.
//!
//! This crate is used by both the client encoder and the bridge device.
//! It has zero dependencies on sockets, output devices, or async runtimes.
//!
//! # Architecture overview (for beginners)
//!
//! A touchscreen client emulates a USB keyboard, mouse, and gamepad on a host
//! computer.  It does not talk to the host directly: it sends small UDP
//! datagrams to a network-attached *bridge* that speaks USB HID to the host.
//!
//! This crate (`cbv0-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – How bytes travel over the network.  Each input event is
//!   encoded into one compact binary frame (5-byte header + payload + CRC-8)
//!   and decoded back into a typed [`Command`] on the bridge.
//!
//! - **`semantics`** – The human-readable vocabulary (key names, gamepad
//!   button names, stick sides) and its mapping onto the numeric ids carried
//!   on the wire.  Both the encode and decode paths use the same tables.
//!
//! - **`legacy`** – The pre-binary ASCII command grammar
//!   (`"MOUSE_LEFT_DOWN,WAIT_50,MOUSE_LEFT_UP"`) and the heuristic payload
//!   classifier the bridge falls back to when a frame's type byte is unknown.

pub mod legacy;
pub mod protocol;
pub mod semantics;

// Re-export the most-used types at the crate root so callers can write
// `cbv0_core::Command` instead of `cbv0_core::protocol::messages::Command`.
pub use legacy::grammar::{parse_token, tokenize_line, LegacyToken};
pub use legacy::heuristic::{classify_payload, PayloadClass};
pub use protocol::codec::{decode_frame, FrameEncoder};
pub use protocol::frame::{Frame, FrameError};
pub use protocol::messages::{ActionOp, Command, MessageType, PayloadError, Side};
pub use semantics::keys::HidKeyCode;
