//! Frame-level codec: turns typed [`Command`]s into complete CBv0 datagrams
//! and back.
//!
//! Wire format:
//! ```text
//! [magic:1][version:1][seq:2][type:1][payload:N][crc8:1]
//! ```
//! One UDP datagram carries exactly one frame.  There is no stream framing.

use thiserror::Error;

use crate::protocol::frame::{Frame, FrameError};
use crate::protocol::messages::{decode_payload, encode_payload, Command, MessageType, PayloadError};
use crate::protocol::sequence::SequenceCounter;

/// Errors from decoding a datagram all the way to a [`Command`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The frame itself is invalid (length, header, checksum).
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The frame is valid but its type byte is not a known [`MessageType`].
    #[error("unknown message type: 0x{0:02X}")]
    UnknownType(u8),

    /// The frame is valid but its payload does not fit its type.
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Builds outbound frames and stamps each with the next sequence number.
///
/// # Examples
///
/// ```rust
/// use cbv0_core::protocol::{decode_command, FrameEncoder};
/// use cbv0_core::{Command, Side};
///
/// let encoder = FrameEncoder::new();
/// let cmd = Command::GamepadTrigger { side: Side::Left, value: 255 };
/// let bytes = encoder.encode(&cmd).unwrap();
/// assert_eq!(decode_command(&bytes).unwrap(), (0, cmd));
/// ```
#[derive(Debug, Default)]
pub struct FrameEncoder {
    seq: SequenceCounter,
}

impl FrameEncoder {
    /// Creates an encoder whose first frame carries sequence 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder whose first frame carries `first`.
    pub fn starting_at(first: u16) -> Self {
        Self {
            seq: SequenceCounter::starting_at(first),
        }
    }

    /// Encodes `cmd` into a complete frame.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if the command cannot be serialized (only
    /// possible for key names). No sequence number is consumed on failure.
    pub fn encode(&self, cmd: &Command) -> Result<Vec<u8>, PayloadError> {
        let payload = encode_payload(cmd)?;
        Ok(self.encode_raw(cmd.message_type() as u8, payload))
    }

    /// Wraps an arbitrary type byte and payload in a frame.
    ///
    /// Used for legacy text lines (type [`LEGACY_TEXT_KIND`]) and for tests
    /// that need frames the typed API cannot produce.
    ///
    /// [`LEGACY_TEXT_KIND`]: crate::protocol::messages::LEGACY_TEXT_KIND
    pub fn encode_raw(&self, kind: u8, payload: Vec<u8>) -> Vec<u8> {
        Frame {
            sequence: self.seq.next(),
            kind,
            payload,
        }
        .to_bytes()
    }

    /// The sequence number the next frame will carry.
    pub fn next_sequence(&self) -> u16 {
        self.seq.current()
    }
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Validates a datagram as a CBv0 frame without interpreting its payload.
///
/// # Errors
///
/// See [`Frame::parse`].
pub fn decode_frame(bytes: &[u8]) -> Result<Frame, FrameError> {
    Frame::parse(bytes)
}

/// Decodes a datagram into its sequence number and typed command.
///
/// # Errors
///
/// Returns [`ProtocolError::Frame`] for an invalid frame,
/// [`ProtocolError::UnknownType`] for an unrecognized type byte, and
/// [`ProtocolError::Payload`] for a malformed payload.
pub fn decode_command(bytes: &[u8]) -> Result<(u16, Command), ProtocolError> {
    let frame = decode_frame(bytes)?;
    let kind =
        MessageType::try_from(frame.kind).map_err(|_| ProtocolError::UnknownType(frame.kind))?;
    let cmd = decode_payload(kind, &frame.payload)?;
    Ok((frame.sequence, cmd))
}
