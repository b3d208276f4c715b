//! Typed CBv0 commands and their payload layouts.
//!
//! Payload shapes (little-endian):
//!
//! | Type | Code | Payload |
//! |------|------|---------|
//! | KEY | 1 | `[op:u8][keyLen:u8][keyBytes:ASCII×keyLen]` |
//! | MOUSE_DELTA | 2 | `[dx:i16][dy:i16]` (2-byte variant: `[op:u8][side:u8]` trigger action) |
//! | MOUSE_BTN | 3 | `[op:u8][buttonId:u8]` |
//! | GP_BUTTON | 4 | `[op:u8][buttonId:u8]` |
//! | GP_STICK | 5 | `[side:u8][x:i16][y:i16]` |
//! | GP_TRIGGER | 6 | `[side:u8][value:u8]` |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Type byte used by clients to carry an untranslatable legacy text line.
///
/// It is deliberately *not* a [`MessageType`], so the bridge reaches the
/// payload through its printable-ASCII fallback.
pub const LEGACY_TEXT_KIND: u8 = 0x00;

/// Longest key name a KEY payload can carry (the length prefix is one byte).
pub const MAX_KEY_NAME_LEN: usize = u8::MAX as usize;

// ── Message type codes ────────────────────────────────────────────────────────

/// Recognized frame type bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    Key = 1,
    MouseDelta = 2,
    MouseButton = 3,
    GamepadButton = 4,
    GamepadStick = 5,
    GamepadTrigger = 6,
}

impl TryFrom<u8> for MessageType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            1 => Ok(MessageType::Key),
            2 => Ok(MessageType::MouseDelta),
            3 => Ok(MessageType::MouseButton),
            4 => Ok(MessageType::GamepadButton),
            5 => Ok(MessageType::GamepadStick),
            6 => Ok(MessageType::GamepadTrigger),
            _ => Err(()),
        }
    }
}

// ── Shared field enums ────────────────────────────────────────────────────────

/// What to do with a key or button.  Shared by KEY, MOUSE_BTN and GP_BUTTON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ActionOp {
    /// Press and keep pressed until an explicit release.
    Hold = 0,
    /// Release.
    Release = 1,
    /// Press, then release automatically after a short interval.
    Press = 2,
}

impl TryFrom<u8> for ActionOp {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0 => Ok(ActionOp::Hold),
            1 => Ok(ActionOp::Release),
            2 => Ok(ActionOp::Press),
            _ => Err(()),
        }
    }
}

/// Left or right stick / trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    Left = 0,
    Right = 1,
}

impl TryFrom<u8> for Side {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0 => Ok(Side::Left),
            1 => Ok(Side::Right),
            _ => Err(()),
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// One logical input event, before serialization or after decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Keyboard key identified by its vocabulary name (see [`crate::semantics::keys`]).
    KeyEvent { op: ActionOp, key: String },
    /// Relative pointer movement in counts.
    MouseDelta { dx: i16, dy: i16 },
    /// Mouse button by bit index (0 left, 1 right, 2 middle).
    MouseButton { op: ActionOp, button: u8 },
    /// Gamepad button by logical id 0–15 (12–15 are the D-pad).
    GamepadButton { op: ActionOp, button: u8 },
    /// Full-scale signed stick position.
    GamepadStick { side: Side, x: i16, y: i16 },
    /// Analog trigger position, 0 released to 255 fully pulled.
    GamepadTrigger { side: Side, value: u8 },
    /// Digital trigger action carried by the 2-byte MOUSE_DELTA variant.
    TriggerAction { op: ActionOp, side: Side },
}

impl Command {
    /// The frame type byte this command is carried under.
    pub fn message_type(&self) -> MessageType {
        match self {
            Command::KeyEvent { .. } => MessageType::Key,
            Command::MouseDelta { .. } | Command::TriggerAction { .. } => MessageType::MouseDelta,
            Command::MouseButton { .. } => MessageType::MouseButton,
            Command::GamepadButton { .. } => MessageType::GamepadButton,
            Command::GamepadStick { .. } => MessageType::GamepadStick,
            Command::GamepadTrigger { .. } => MessageType::GamepadTrigger,
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// A payload that does not fit its type's shape, or a command that cannot be
/// serialized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// The payload length is not one of the accepted sizes for its type.
    #[error("{kind:?} payload has {actual} bytes, expected {expected}")]
    WrongLength {
        kind: MessageType,
        expected: &'static str,
        actual: usize,
    },

    #[error("unknown op byte: {0}")]
    UnknownOp(u8),

    #[error("unknown side byte: {0}")]
    UnknownSide(u8),

    /// The KEY length prefix disagrees with the bytes that follow it.
    #[error("key name length {declared} does not match {available} remaining bytes")]
    KeyNameLength { declared: usize, available: usize },

    #[error("key name is not ASCII")]
    NonAsciiKeyName,

    #[error("key name is empty")]
    EmptyKeyName,

    /// Encode side: the name does not fit behind a one-byte length prefix.
    #[error("key name of {0} bytes exceeds {MAX_KEY_NAME_LEN}")]
    KeyNameTooLong(usize),
}

// ── Payload encoding ──────────────────────────────────────────────────────────

/// Serializes the type-specific payload of `cmd`.
///
/// # Errors
///
/// Fails only for key names that are empty, non-ASCII, or longer than
/// [`MAX_KEY_NAME_LEN`].
pub fn encode_payload(cmd: &Command) -> Result<Vec<u8>, PayloadError> {
    let mut buf = Vec::with_capacity(8);
    match cmd {
        Command::KeyEvent { op, key } => {
            validate_key_name(key)?;
            buf.push(*op as u8);
            buf.push(key.len() as u8);
            buf.extend_from_slice(key.as_bytes());
        }
        Command::MouseDelta { dx, dy } => {
            buf.extend_from_slice(&dx.to_le_bytes());
            buf.extend_from_slice(&dy.to_le_bytes());
        }
        Command::MouseButton { op, button } | Command::GamepadButton { op, button } => {
            buf.push(*op as u8);
            buf.push(*button);
        }
        Command::GamepadStick { side, x, y } => {
            buf.push(*side as u8);
            buf.extend_from_slice(&x.to_le_bytes());
            buf.extend_from_slice(&y.to_le_bytes());
        }
        Command::GamepadTrigger { side, value } => {
            buf.push(*side as u8);
            buf.push(*value);
        }
        Command::TriggerAction { op, side } => {
            buf.push(*op as u8);
            buf.push(*side as u8);
        }
    }
    Ok(buf)
}

fn validate_key_name(key: &str) -> Result<(), PayloadError> {
    if key.is_empty() {
        return Err(PayloadError::EmptyKeyName);
    }
    if !key.is_ascii() {
        return Err(PayloadError::NonAsciiKeyName);
    }
    if key.len() > MAX_KEY_NAME_LEN {
        return Err(PayloadError::KeyNameTooLong(key.len()));
    }
    Ok(())
}

// ── Payload decoding ──────────────────────────────────────────────────────────

/// Parses the payload of a frame whose type byte is `kind`.
///
/// # Errors
///
/// Returns [`PayloadError`] when the payload does not have the shape `kind`
/// requires, or a field carries an out-of-range enum value.
pub fn decode_payload(kind: MessageType, p: &[u8]) -> Result<Command, PayloadError> {
    match kind {
        MessageType::Key => decode_key(p),
        MessageType::MouseDelta => match p.len() {
            4 => Ok(Command::MouseDelta {
                dx: i16::from_le_bytes([p[0], p[1]]),
                dy: i16::from_le_bytes([p[2], p[3]]),
            }),
            // Older clients reuse MOUSE_DELTA with a 2-byte body for triggers.
            2 => Ok(Command::TriggerAction {
                op: read_op(p[0])?,
                side: read_side(p[1])?,
            }),
            actual => Err(wrong_length(kind, "4 (or 2)", actual)),
        },
        MessageType::MouseButton => {
            require_exact(kind, p, 2)?;
            Ok(Command::MouseButton {
                op: read_op(p[0])?,
                button: p[1],
            })
        }
        MessageType::GamepadButton => {
            require_exact(kind, p, 2)?;
            Ok(Command::GamepadButton {
                op: read_op(p[0])?,
                button: p[1],
            })
        }
        MessageType::GamepadStick => {
            require_exact(kind, p, 5)?;
            Ok(Command::GamepadStick {
                side: read_side(p[0])?,
                x: i16::from_le_bytes([p[1], p[2]]),
                y: i16::from_le_bytes([p[3], p[4]]),
            })
        }
        MessageType::GamepadTrigger => {
            require_exact(kind, p, 2)?;
            Ok(Command::GamepadTrigger {
                side: read_side(p[0])?,
                value: p[1],
            })
        }
    }
}

fn decode_key(p: &[u8]) -> Result<Command, PayloadError> {
    if p.len() < 3 {
        return Err(wrong_length(MessageType::Key, "at least 3", p.len()));
    }
    let op = read_op(p[0])?;
    let declared = p[1] as usize;
    let name = &p[2..];
    if declared != name.len() {
        return Err(PayloadError::KeyNameLength {
            declared,
            available: name.len(),
        });
    }
    if !name.is_ascii() {
        return Err(PayloadError::NonAsciiKeyName);
    }
    // ASCII is always valid UTF-8.
    let key = String::from_utf8_lossy(name).into_owned();
    Ok(Command::KeyEvent { op, key })
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn require_exact(kind: MessageType, p: &[u8], len: usize) -> Result<(), PayloadError> {
    if p.len() == len {
        Ok(())
    } else {
        Err(PayloadError::WrongLength {
            kind,
            expected: match len {
                2 => "2",
                5 => "5",
                _ => "fixed size",
            },
            actual: p.len(),
        })
    }
}

fn wrong_length(kind: MessageType, expected: &'static str, actual: usize) -> PayloadError {
    PayloadError::WrongLength {
        kind,
        expected,
        actual,
    }
}

fn read_op(byte: u8) -> Result<ActionOp, PayloadError> {
    ActionOp::try_from(byte).map_err(|_| PayloadError::UnknownOp(byte))
}

fn read_side(byte: u8) -> Result<Side, PayloadError> {
    Side::try_from(byte).map_err(|_| PayloadError::UnknownSide(byte))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
