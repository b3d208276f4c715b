//! Byte-pattern classifier for payloads whose type byte is not recognized.
//!
//! The order of the checks is fixed, first match wins:
//!
//! 1. every byte is printable ASCII (tab, CR, LF, 0x20–0x7E) → legacy text line
//! 2. exactly 4 bytes → little-endian `(dx: i16, dy: i16)` mouse delta
//! 3. exactly 1 byte → mouse button mask (bit0 left, bit1 right, bit2 middle)
//! 4. anything else → unclassified
//!
//! The chain is ambiguous: a 4-byte payload that happens to be printable is
//! read as text, and a 4-byte KEY-shaped payload under an unknown type is read
//! as a mouse delta.  That priority is kept exactly as listed.

use crate::semantics::mouse::MOUSE_BUTTON_MASK;

/// What an unrecognized payload looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadClass<'a> {
    /// A legacy command line.
    Text(&'a str),
    MouseDelta { dx: i16, dy: i16 },
    /// Full replacement mask, already limited to the three defined bits.
    MouseButtons(u8),
    Unclassified,
}

/// `true` for the bytes a legacy text line may contain.
pub fn is_printable(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\r' | b'\n' | 0x20..=0x7E)
}

/// `true` if `bytes` is non-empty and entirely printable.
pub fn is_printable_text(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().copied().all(is_printable)
}

/// Classifies a payload by the fallback chain above.
pub fn classify_payload(payload: &[u8]) -> PayloadClass<'_> {
    if is_printable_text(payload) {
        // Printable ASCII is valid UTF-8.
        if let Ok(text) = std::str::from_utf8(payload) {
            return PayloadClass::Text(text);
        }
    }
    match *payload {
        [a, b, c, d] => PayloadClass::MouseDelta {
            dx: i16::from_le_bytes([a, b]),
            dy: i16::from_le_bytes([c, d]),
        },
        [mask] => PayloadClass::MouseButtons(mask & MOUSE_BUTTON_MASK),
        _ => PayloadClass::Unclassified,
    }
}
