//! Mouse button vocabulary.  Wire ids are bit indices into the report's
//! button byte.

use serde::{Deserialize, Serialize};

/// Bits a mouse button mask may carry (left, right, middle).
pub const MOUSE_BUTTON_MASK: u8 = 0b111;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MouseButton {
    Left = 0,
    Right = 1,
    Middle = 2,
}

impl MouseButton {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Right),
            2 => Some(MouseButton::Middle),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Bit in the report's button byte.
    pub fn bit(self) -> u8 {
        1 << self.id()
    }

    /// Case-insensitive `LEFT` / `RIGHT` / `MIDDLE`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "LEFT" => Some(MouseButton::Left),
            "RIGHT" => Some(MouseButton::Right),
            "MIDDLE" => Some(MouseButton::Middle),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MouseButton::Left => "LEFT",
            MouseButton::Right => "RIGHT",
            MouseButton::Middle => "MIDDLE",
        }
    }
}
