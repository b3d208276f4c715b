//! The CBv0 frame: fixed header, opaque payload, trailing checksum.
//!
//! Wire format (multi-byte integers little-endian):
//! ```text
//! [magic:1][version:1][seq:2][type:1][payload:N][crc8:1]
//! ```
//! The checksum covers every byte before it.  This layer validates length,
//! header constants, and checksum only; interpreting `type` and `payload` is
//! the job of [`crate::protocol::messages`].

use thiserror::Error;

use crate::protocol::crc::crc8;

/// First byte of every frame.
pub const MAGIC: u8 = 0xCB;

/// Protocol version byte (CBv0).
pub const VERSION: u8 = 0x00;

/// Header bytes before the payload: magic + version + seq(2) + type.
pub const HEADER_SIZE: usize = 5;

/// Smallest frame that can pass validation: a header plus the checksum byte.
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + 1;

/// Errors produced while validating a received frame.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer than [`MIN_FRAME_SIZE`] bytes were received.
    #[error("frame too short: {len} bytes, need at least {MIN_FRAME_SIZE}")]
    TooShort { len: usize },

    /// The magic or version byte does not match CBv0.
    #[error("bad header: magic 0x{magic:02X}, version 0x{version:02X}")]
    BadHeader { magic: u8, version: u8 },

    /// The trailing checksum disagrees with the recomputed CRC-8.
    #[error("checksum mismatch: frame carries 0x{received:02X}, computed 0x{computed:02X}")]
    ChecksumMismatch { received: u8, computed: u8 },
}

/// One validated frame.
///
/// `kind` is kept as the raw type byte: an unrecognized type is not an error
/// at this layer, it is what sends the bridge down the heuristic path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Sender-local sequence number (wraps; informational only).
    pub sequence: u16,
    /// Raw type byte.
    pub kind: u8,
    /// Type-specific payload, checksum excluded.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Serializes the frame and appends its checksum.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(MIN_FRAME_SIZE + self.payload.len());
        buf.push(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&self.sequence.to_le_bytes());
        buf.push(self.kind);
        buf.extend_from_slice(&self.payload);
        buf.push(crc8(&buf));
        buf
    }

    /// Validates `bytes` and splits them into header fields and payload.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] when the frame is too short, carries the wrong
    /// magic/version, or fails the checksum.  Nothing else is validated.
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < MIN_FRAME_SIZE {
            return Err(FrameError::TooShort { len: bytes.len() });
        }

        let (magic, version) = (bytes[0], bytes[1]);
        if magic != MAGIC || version != VERSION {
            return Err(FrameError::BadHeader { magic, version });
        }

        let (body, trailer) = bytes.split_at(bytes.len() - 1);
        let received = trailer[0];
        let computed = crc8(body);
        if received != computed {
            return Err(FrameError::ChecksumMismatch { received, computed });
        }

        Ok(Self {
            sequence: u16::from_le_bytes([body[2], body[3]]),
            kind: body[4],
            payload: body[HEADER_SIZE..].to_vec(),
        })
    }
}
