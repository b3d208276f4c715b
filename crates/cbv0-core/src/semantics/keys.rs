//! Keyboard vocabulary: key names ↔ USB HID usage IDs and modifier bits.
//!
//! # How a key name becomes report bytes (for beginners)
//!
//! Clients name keys the way a person would (`"a"`, `"Page_Up"`, `"ctrl"`).
//! [`resolve_key`] normalizes the name (lower case, `_` read as a space) and
//! looks it up in two tables: ordinary keys and modifier keys.  Both tables
//! map to a [`HidKeyCode`], the number the USB HID keyboard page gives that
//! key.
//!
//! The 8-byte boot keyboard report has two places a key can go.  Ordinary
//! keys take one of six keycode slots.  The eight modifier keys never appear
//! in a slot; each owns one bit of the first byte.  So the resolved code is
//! routed through [`HidKeyCode::modifier_bit`]: a modifier becomes a
//! [`KeyBinding`] with that bit and no keycode, anything else a binding with
//! the keycode and no bits.
//!
//! ```text
//! "a"     → KeyA (0x04)        → slot keycode 0x04
//! "shift" → ShiftLeft (0xE1)   → byte-0 bit 0x02
//! ```
//!
//! # Unknown names
//!
//! A name that is not in the vocabulary resolves to [`KeyBinding::NONE`].
//! Pressing or releasing it changes nothing, so an unknown key is silently
//! absorbed instead of being an error.
//!
//! # Back to names
//!
//! [`key_name`] and [`modifier_name`] invert the tables so a report can be
//! shown as `ctrl+c` in logs.

use serde::{Deserialize, Serialize};

// ── Modifier bits (boot keyboard report byte 0) ──────────────────────────────

pub const MOD_LEFT_CTRL: u8 = 0x01;
pub const MOD_LEFT_SHIFT: u8 = 0x02;
pub const MOD_LEFT_ALT: u8 = 0x04;
pub const MOD_LEFT_GUI: u8 = 0x08;
pub const MOD_RIGHT_CTRL: u8 = 0x10;
pub const MOD_RIGHT_SHIFT: u8 = 0x20;
pub const MOD_RIGHT_ALT: u8 = 0x40;
pub const MOD_RIGHT_GUI: u8 = 0x80;

/// USB HID Usage ID for keyboard keys (page 0x07).
///
/// Modifier codes (`0xE0..=0xE7`) are never placed in a report slot; they
/// are sent as bits (see [`HidKeyCode::modifier_bit`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HidKeyCode {
    // Letters (HID 0x04–0x1D)
    KeyA = 0x04,
    KeyB = 0x05,
    KeyC = 0x06,
    KeyD = 0x07,
    KeyE = 0x08,
    KeyF = 0x09,
    KeyG = 0x0A,
    KeyH = 0x0B,
    KeyI = 0x0C,
    KeyJ = 0x0D,
    KeyK = 0x0E,
    KeyL = 0x0F,
    KeyM = 0x10,
    KeyN = 0x11,
    KeyO = 0x12,
    KeyP = 0x13,
    KeyQ = 0x14,
    KeyR = 0x15,
    KeyS = 0x16,
    KeyT = 0x17,
    KeyU = 0x18,
    KeyV = 0x19,
    KeyW = 0x1A,
    KeyX = 0x1B,
    KeyY = 0x1C,
    KeyZ = 0x1D,

    // Digits (HID 0x1E–0x27)
    Digit1 = 0x1E,
    Digit2 = 0x1F,
    Digit3 = 0x20,
    Digit4 = 0x21,
    Digit5 = 0x22,
    Digit6 = 0x23,
    Digit7 = 0x24,
    Digit8 = 0x25,
    Digit9 = 0x26,
    Digit0 = 0x27,

    // Control keys and punctuation (HID 0x28–0x38)
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    BracketLeft = 0x2F,
    BracketRight = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Backquote = 0x35,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,

    CapsLock = 0x39,

    // Function keys (HID 0x3A–0x45)
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Navigation cluster (HID 0x46–0x52)
    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    ArrowRight = 0x4F,
    ArrowLeft = 0x50,
    ArrowDown = 0x51,
    ArrowUp = 0x52,

    ContextMenu = 0x65,

    // Modifier keys (HID 0xE0–0xE7)
    ControlLeft = 0xE0,
    ShiftLeft = 0xE1,
    AltLeft = 0xE2,
    MetaLeft = 0xE3,
    ControlRight = 0xE4,
    ShiftRight = 0xE5,
    AltRight = 0xE6,
    MetaRight = 0xE7,

    /// No keycode: the neutral value of an empty report slot.
    Unknown = 0x00,
}

impl HidKeyCode {
    /// Returns the raw usage ID as it appears in a report slot.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The report-byte-0 bit a modifier key is sent as, `None` for other keys.
    pub fn modifier_bit(self) -> Option<u8> {
        let raw = self.as_u8();
        (0xE0..=0xE7).contains(&raw).then(|| 1 << (raw - 0xE0))
    }
}

// ── Bindings ──────────────────────────────────────────────────────────────────

/// What pressing a named key does to the keyboard report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    /// Slot keycode, [`HidKeyCode::Unknown`] when the key is a pure modifier.
    pub code: HidKeyCode,
    /// Bits ORed into report byte 0.
    pub modifiers: u8,
}

impl KeyBinding {
    /// The binding of an unknown name.  Applying it changes nothing.
    pub const NONE: KeyBinding = KeyBinding {
        code: HidKeyCode::Unknown,
        modifiers: 0,
    };

    fn key(code: HidKeyCode) -> Self {
        Self { code, modifiers: 0 }
    }

    fn modifier(bits: u8) -> Self {
        Self {
            code: HidKeyCode::Unknown,
            modifiers: bits,
        }
    }

    /// `true` if applying this binding cannot change keyboard state.
    pub fn is_noop(&self) -> bool {
        self.code == HidKeyCode::Unknown && self.modifiers == 0
    }
}

// ── Name tables ───────────────────────────────────────────────────────────────

/// Canonical key names.  The first name listed for a code is the one
/// [`key_name`] returns.
const KEY_NAMES: &[(&str, HidKeyCode)] = &[
    ("a", HidKeyCode::KeyA),
    ("b", HidKeyCode::KeyB),
    ("c", HidKeyCode::KeyC),
    ("d", HidKeyCode::KeyD),
    ("e", HidKeyCode::KeyE),
    ("f", HidKeyCode::KeyF),
    ("g", HidKeyCode::KeyG),
    ("h", HidKeyCode::KeyH),
    ("i", HidKeyCode::KeyI),
    ("j", HidKeyCode::KeyJ),
    ("k", HidKeyCode::KeyK),
    ("l", HidKeyCode::KeyL),
    ("m", HidKeyCode::KeyM),
    ("n", HidKeyCode::KeyN),
    ("o", HidKeyCode::KeyO),
    ("p", HidKeyCode::KeyP),
    ("q", HidKeyCode::KeyQ),
    ("r", HidKeyCode::KeyR),
    ("s", HidKeyCode::KeyS),
    ("t", HidKeyCode::KeyT),
    ("u", HidKeyCode::KeyU),
    ("v", HidKeyCode::KeyV),
    ("w", HidKeyCode::KeyW),
    ("x", HidKeyCode::KeyX),
    ("y", HidKeyCode::KeyY),
    ("z", HidKeyCode::KeyZ),
    ("1", HidKeyCode::Digit1),
    ("2", HidKeyCode::Digit2),
    ("3", HidKeyCode::Digit3),
    ("4", HidKeyCode::Digit4),
    ("5", HidKeyCode::Digit5),
    ("6", HidKeyCode::Digit6),
    ("7", HidKeyCode::Digit7),
    ("8", HidKeyCode::Digit8),
    ("9", HidKeyCode::Digit9),
    ("0", HidKeyCode::Digit0),
    ("enter", HidKeyCode::Enter),
    ("return", HidKeyCode::Enter),
    ("esc", HidKeyCode::Escape),
    ("escape", HidKeyCode::Escape),
    ("backspace", HidKeyCode::Backspace),
    ("tab", HidKeyCode::Tab),
    ("space", HidKeyCode::Space),
    ("minus", HidKeyCode::Minus),
    ("-", HidKeyCode::Minus),
    ("equal", HidKeyCode::Equal),
    ("=", HidKeyCode::Equal),
    ("[", HidKeyCode::BracketLeft),
    ("]", HidKeyCode::BracketRight),
    ("\\", HidKeyCode::Backslash),
    (";", HidKeyCode::Semicolon),
    ("'", HidKeyCode::Quote),
    ("`", HidKeyCode::Backquote),
    ("comma", HidKeyCode::Comma),
    (".", HidKeyCode::Period),
    ("/", HidKeyCode::Slash),
    ("caps lock", HidKeyCode::CapsLock),
    ("capslock", HidKeyCode::CapsLock),
    ("f1", HidKeyCode::F1),
    ("f2", HidKeyCode::F2),
    ("f3", HidKeyCode::F3),
    ("f4", HidKeyCode::F4),
    ("f5", HidKeyCode::F5),
    ("f6", HidKeyCode::F6),
    ("f7", HidKeyCode::F7),
    ("f8", HidKeyCode::F8),
    ("f9", HidKeyCode::F9),
    ("f10", HidKeyCode::F10),
    ("f11", HidKeyCode::F11),
    ("f12", HidKeyCode::F12),
    ("print screen", HidKeyCode::PrintScreen),
    ("scroll lock", HidKeyCode::ScrollLock),
    ("pause", HidKeyCode::Pause),
    ("insert", HidKeyCode::Insert),
    ("home", HidKeyCode::Home),
    ("page up", HidKeyCode::PageUp),
    ("pageup", HidKeyCode::PageUp),
    ("delete", HidKeyCode::Delete),
    ("del", HidKeyCode::Delete),
    ("end", HidKeyCode::End),
    ("page down", HidKeyCode::PageDown),
    ("pagedown", HidKeyCode::PageDown),
    ("right", HidKeyCode::ArrowRight),
    ("left", HidKeyCode::ArrowLeft),
    ("down", HidKeyCode::ArrowDown),
    ("up", HidKeyCode::ArrowUp),
    ("menu", HidKeyCode::ContextMenu),
];

/// Modifier key names.  The first name listed for a code is the one
/// [`modifier_name`] returns.
const MODIFIER_NAMES: &[(&str, HidKeyCode)] = &[
    ("ctrl", HidKeyCode::ControlLeft),
    ("control", HidKeyCode::ControlLeft),
    ("left ctrl", HidKeyCode::ControlLeft),
    ("shift", HidKeyCode::ShiftLeft),
    ("left shift", HidKeyCode::ShiftLeft),
    ("alt", HidKeyCode::AltLeft),
    ("left alt", HidKeyCode::AltLeft),
    ("win", HidKeyCode::MetaLeft),
    ("windows", HidKeyCode::MetaLeft),
    ("meta", HidKeyCode::MetaLeft),
    ("cmd", HidKeyCode::MetaLeft),
    ("right ctrl", HidKeyCode::ControlRight),
    ("right shift", HidKeyCode::ShiftRight),
    ("right alt", HidKeyCode::AltRight),
    ("alt gr", HidKeyCode::AltRight),
    ("right win", HidKeyCode::MetaRight),
];

/// Lower-cases `name` and treats `_` as a space, so `PAGE_UP`, `Page Up` and
/// `page up` are the same key.
fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', " ")
}

/// Resolves a key name to its report effect.
///
/// Matching is case-insensitive.  Unknown names resolve to
/// [`KeyBinding::NONE`].
///
/// # Examples
///
/// ```rust
/// use cbv0_core::semantics::keys::{resolve_key, HidKeyCode, MOD_LEFT_SHIFT};
///
/// assert_eq!(resolve_key("A").code, HidKeyCode::KeyA);
/// assert_eq!(resolve_key("Shift").modifiers, MOD_LEFT_SHIFT);
/// assert!(resolve_key("no-such-key").is_noop());
/// ```
pub fn resolve_key(name: &str) -> KeyBinding {
    let name = normalize(name);
    let found = KEY_NAMES
        .iter()
        .chain(MODIFIER_NAMES)
        .find(|(n, _)| *n == name)
        .map(|&(_, code)| code);
    match found {
        Some(code) => match code.modifier_bit() {
            Some(bit) => KeyBinding::modifier(bit),
            None => KeyBinding::key(code),
        },
        None => KeyBinding::NONE,
    }
}

/// Canonical name of a report slot's usage ID, the inverse of
/// [`resolve_key`].  `None` for an empty slot or an unlisted code.
pub fn key_name(usage: u8) -> Option<&'static str> {
    KEY_NAMES
        .iter()
        .find(|(_, code)| code.as_u8() == usage)
        .map(|(name, _)| *name)
}

/// Canonical name of a single report-byte-0 modifier bit.
pub fn modifier_name(bit: u8) -> Option<&'static str> {
    MODIFIER_NAMES
        .iter()
        .find(|(_, code)| code.modifier_bit() == Some(bit))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_resolve_to_consecutive_usage_ids() {
        for (i, letter) in ('a'..='z').enumerate() {
            // Arrange / Act
            let binding = resolve_key(&letter.to_string());

            // Assert
            assert_eq!(binding.code.as_u8(), 0x04 + i as u8, "letter {letter}");
            assert_eq!(binding.modifiers, 0);
        }
    }

    #[test]
    fn test_digits_resolve_with_zero_last() {
        assert_eq!(resolve_key("1").code, HidKeyCode::Digit1);
        assert_eq!(resolve_key("9").code.as_u8(), 0x26);
        assert_eq!(resolve_key("0").code.as_u8(), 0x27);
    }

    #[test]
    fn test_resolution_is_case_and_separator_insensitive() {
        assert_eq!(resolve_key("ENTER").code, HidKeyCode::Enter);
        assert_eq!(resolve_key("Page_Up").code, HidKeyCode::PageUp);
        assert_eq!(resolve_key(" page down ").code, HidKeyCode::PageDown);
    }

    #[test]
    fn test_modifiers_map_to_bits_without_keycode() {
        let cases = [
            ("ctrl", MOD_LEFT_CTRL),
            ("shift", MOD_LEFT_SHIFT),
            ("alt", MOD_LEFT_ALT),
            ("win", MOD_LEFT_GUI),
            ("right_shift", MOD_RIGHT_SHIFT),
            ("RIGHT WIN", MOD_RIGHT_GUI),
        ];
        for (name, bit) in cases {
            let binding = resolve_key(name);
            assert_eq!(binding.code, HidKeyCode::Unknown, "{name}");
            assert_eq!(binding.modifiers, bit, "{name}");
        }
    }

    #[test]
    fn test_unknown_name_is_a_noop_binding() {
        let binding = resolve_key("hyperdrive");
        assert_eq!(binding, KeyBinding::NONE);
        assert!(binding.is_noop());
    }

    #[test]
    fn test_key_name_inverts_resolve_key_for_every_table_code() {
        for &(_, code) in KEY_NAMES {
            let name = key_name(code.as_u8()).expect("every table code has a name");
            assert_eq!(resolve_key(name).code, code);
        }
    }

    #[test]
    fn test_modifier_name_inverts_every_bit() {
        for shift in 0..8 {
            let bit = 1u8 << shift;
            let name = modifier_name(bit).expect("every bit has a name");
            assert_eq!(resolve_key(name).modifiers, bit);
        }
    }

    #[test]
    fn test_modifier_usage_ids_map_to_report_bits() {
        assert_eq!(HidKeyCode::ControlLeft.modifier_bit(), Some(MOD_LEFT_CTRL));
        assert_eq!(HidKeyCode::MetaRight.modifier_bit(), Some(MOD_RIGHT_GUI));
        assert_eq!(HidKeyCode::KeyA.modifier_bit(), None);
        assert_eq!(HidKeyCode::Unknown.modifier_bit(), None);
    }

    #[test]
    fn test_modifier_names_resolve_through_their_usage_bit() {
        for &(name, code) in MODIFIER_NAMES {
            let binding = resolve_key(name);
            assert_eq!(binding.code, HidKeyCode::Unknown, "{name}");
            assert_eq!(Some(binding.modifiers), code.modifier_bit(), "{name}");
        }
    }

    #[test]
    fn test_empty_slot_has_no_name() {
        assert_eq!(key_name(0x00), None);
        assert_eq!(key_name(0x04), Some("a"));
    }
}
