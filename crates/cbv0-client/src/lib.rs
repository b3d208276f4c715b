//! # cbv0-client
//!
//! Client-side half of the touch HID bridge.  Turns legacy command lines
//! (`"MOUSE_LEFT_DOWN,WAIT_50,MOUSE_LEFT_UP"`) into CBv0 frames and sends them
//! to a bridge over UDP.
//!
//! # Layout (for beginners)
//!
//! - **`application`** – the typed-or-raw encoding rule ([`ClientEncoder`]).
//! - **`infrastructure`** – the UDP socket ([`FrameSender`]).
//!
//! The `cbv0-send` binary wires the two together for scripting and testing a
//! bridge from a shell.
//!
//! [`ClientEncoder`]: application::ClientEncoder
//! [`FrameSender`]: infrastructure::udp_sender::FrameSender

pub mod application;
pub mod infrastructure;
