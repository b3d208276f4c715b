//! Gamepad vocabulary: button names ↔ logical ids, stick aliases, and the
//! scaling of normalized analog values onto wire integers.
//!
//! Ids 0–11 are bits of the report's button mask.  Ids 12–15 are the four
//! D-pad directions, which the report carries as a single hat value instead.

use serde::{Deserialize, Serialize};

use crate::protocol::messages::Side;

/// Hat value meaning "no direction pressed".
pub const HAT_CENTERED: u8 = 8;

/// Logical gamepad buttons and their wire ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GamepadButton {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    LeftBumper = 4,
    RightBumper = 5,
    LeftTrigger = 6,
    RightTrigger = 7,
    Back = 8,
    Start = 9,
    LeftThumb = 10,
    RightThumb = 11,
    DpadUp = 12,
    DpadDown = 13,
    DpadLeft = 14,
    DpadRight = 15,
}

const ALL_BUTTONS: [GamepadButton; 16] = [
    GamepadButton::A,
    GamepadButton::B,
    GamepadButton::X,
    GamepadButton::Y,
    GamepadButton::LeftBumper,
    GamepadButton::RightBumper,
    GamepadButton::LeftTrigger,
    GamepadButton::RightTrigger,
    GamepadButton::Back,
    GamepadButton::Start,
    GamepadButton::LeftThumb,
    GamepadButton::RightThumb,
    GamepadButton::DpadUp,
    GamepadButton::DpadDown,
    GamepadButton::DpadLeft,
    GamepadButton::DpadRight,
];

impl GamepadButton {
    /// Looks up a wire id.  Ids above 15 have no button.
    pub fn from_id(id: u8) -> Option<Self> {
        ALL_BUTTONS.get(id as usize).copied()
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Parses a button name as used in legacy tokens (`A`, `LB`, `START`,
    /// `DPAD_UP`, `UP`, `LSTICK`, ...).  Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let button = match name.to_ascii_uppercase().as_str() {
            "A" => GamepadButton::A,
            "B" => GamepadButton::B,
            "X" => GamepadButton::X,
            "Y" => GamepadButton::Y,
            "LB" => GamepadButton::LeftBumper,
            "RB" => GamepadButton::RightBumper,
            "LT" => GamepadButton::LeftTrigger,
            "RT" => GamepadButton::RightTrigger,
            "BACK" | "SELECT" => GamepadButton::Back,
            "START" => GamepadButton::Start,
            "LS" | "LSTICK" | "L3" => GamepadButton::LeftThumb,
            "RS" | "RSTICK" | "R3" => GamepadButton::RightThumb,
            "UP" | "DPAD_UP" => GamepadButton::DpadUp,
            "DOWN" | "DPAD_DOWN" => GamepadButton::DpadDown,
            "LEFT" | "DPAD_LEFT" => GamepadButton::DpadLeft,
            "RIGHT" | "DPAD_RIGHT" => GamepadButton::DpadRight,
            _ => return None,
        };
        Some(button)
    }

    /// Canonical name, accepted back by [`from_name`](Self::from_name).
    pub fn name(self) -> &'static str {
        match self {
            GamepadButton::A => "A",
            GamepadButton::B => "B",
            GamepadButton::X => "X",
            GamepadButton::Y => "Y",
            GamepadButton::LeftBumper => "LB",
            GamepadButton::RightBumper => "RB",
            GamepadButton::LeftTrigger => "LT",
            GamepadButton::RightTrigger => "RT",
            GamepadButton::Back => "BACK",
            GamepadButton::Start => "START",
            GamepadButton::LeftThumb => "LS",
            GamepadButton::RightThumb => "RS",
            GamepadButton::DpadUp => "DPAD_UP",
            GamepadButton::DpadDown => "DPAD_DOWN",
            GamepadButton::DpadLeft => "DPAD_LEFT",
            GamepadButton::DpadRight => "DPAD_RIGHT",
        }
    }

    /// `true` for ids 12–15, which drive the hat rather than the mask.
    pub fn is_dpad(self) -> bool {
        self.id() >= GamepadButton::DpadUp.id()
    }

    /// Bit in the 16-bit report mask, `None` for D-pad directions.
    pub fn mask_bit(self) -> Option<u16> {
        (!self.is_dpad()).then(|| 1u16 << self.id())
    }

    /// The digital button a trigger is emulated with.
    pub fn for_trigger(side: Side) -> Self {
        match side {
            Side::Left => GamepadButton::LeftTrigger,
            Side::Right => GamepadButton::RightTrigger,
        }
    }
}

// ── Stick aliases ─────────────────────────────────────────────────────────────

/// The one alias table for stick names.
const STICK_ALIASES: &[(&str, Side)] = &[
    ("L", Side::Left),
    ("LS", Side::Left),
    ("LEFT", Side::Left),
    ("STICK", Side::Left),
    ("STICK_L", Side::Left),
    ("R", Side::Right),
    ("RS", Side::Right),
    ("RIGHT", Side::Right),
    ("STICK_R", Side::Right),
];

/// Canonicalizes a stick name.  Case-insensitive.
pub fn stick_side(alias: &str) -> Option<Side> {
    let alias = alias.trim().to_ascii_uppercase();
    STICK_ALIASES
        .iter()
        .find(|(name, _)| *name == alias)
        .map(|&(_, side)| side)
}

// ── Hat ───────────────────────────────────────────────────────────────────────

/// Folds the four D-pad directions into a hat value.
///
/// `0` is up, increasing clockwise in 45° steps to `7` (up-left);
/// [`HAT_CENTERED`] when nothing, or only opposing directions, are held.
pub fn hat_from_dpad(up: bool, down: bool, left: bool, right: bool) -> u8 {
    let vertical = i8::from(down) - i8::from(up);
    let horizontal = i8::from(right) - i8::from(left);
    match (vertical, horizontal) {
        (-1, 0) => 0,
        (-1, 1) => 1,
        (0, 1) => 2,
        (1, 1) => 3,
        (1, 0) => 4,
        (1, -1) => 5,
        (0, -1) => 6,
        (-1, -1) => 7,
        _ => HAT_CENTERED,
    }
}

// ── Analog scaling ────────────────────────────────────────────────────────────

/// Maps a normalized stick coordinate in `[-1, 1]` onto the wire's i16 range.
/// Out-of-range and NaN inputs are clamped (NaN to 0).
pub fn stick_axis_from_unit(value: f32) -> i16 {
    let clamped = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) };
    (clamped * i16::MAX as f32).round() as i16
}

/// Maps a normalized trigger position in `[0, 1]` onto the wire's u8 range.
pub fn trigger_from_unit(value: f32) -> u8 {
    let clamped = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    (clamped * u8::MAX as f32).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_from_id() {
        for id in 0..16u8 {
            let button = GamepadButton::from_id(id).expect("ids 0-15 are buttons");
            assert_eq!(button.id(), id);
        }
        assert_eq!(GamepadButton::from_id(16), None);
    }

    #[test]
    fn test_canonical_names_parse_back() {
        for button in ALL_BUTTONS {
            assert_eq!(GamepadButton::from_name(button.name()), Some(button));
        }
    }

    #[test]
    fn test_dpad_ids_have_no_mask_bit() {
        // Arrange / Act / Assert
        assert_eq!(GamepadButton::A.mask_bit(), Some(0x0001));
        assert_eq!(GamepadButton::RightThumb.mask_bit(), Some(0x0800));
        for id in 12..16u8 {
            let button = GamepadButton::from_id(id).unwrap();
            assert!(button.is_dpad());
            assert_eq!(button.mask_bit(), None);
        }
    }

    #[test]
    fn test_stick_alias_table_is_deterministic() {
        for alias in ["l", "LS", "Left", "STICK", "stick_l"] {
            assert_eq!(stick_side(alias), Some(Side::Left), "{alias}");
        }
        for alias in ["R", "rs", "RIGHT", "STICK_R"] {
            assert_eq!(stick_side(alias), Some(Side::Right), "{alias}");
        }
        assert_eq!(stick_side("MIDDLE"), None);
    }

    #[test]
    fn test_hat_directions_run_clockwise_from_up() {
        assert_eq!(hat_from_dpad(false, false, false, false), HAT_CENTERED);
        assert_eq!(hat_from_dpad(true, false, false, false), 0);
        assert_eq!(hat_from_dpad(true, false, false, true), 1);
        assert_eq!(hat_from_dpad(false, false, false, true), 2);
        assert_eq!(hat_from_dpad(false, true, false, true), 3);
        assert_eq!(hat_from_dpad(false, true, false, false), 4);
        assert_eq!(hat_from_dpad(false, true, true, false), 5);
        assert_eq!(hat_from_dpad(false, false, true, false), 6);
        assert_eq!(hat_from_dpad(true, false, true, false), 7);
    }

    #[test]
    fn test_opposing_dpad_directions_cancel() {
        assert_eq!(hat_from_dpad(true, true, false, false), HAT_CENTERED);
        assert_eq!(hat_from_dpad(true, true, true, true), HAT_CENTERED);
        assert_eq!(hat_from_dpad(true, true, false, true), 2);
    }

    #[test]
    fn test_unit_scaling_clamps_and_rounds() {
        assert_eq!(stick_axis_from_unit(1.0), 32767);
        assert_eq!(stick_axis_from_unit(-2.5), -32767);
        assert_eq!(stick_axis_from_unit(0.5), 16384);
        assert_eq!(stick_axis_from_unit(f32::NAN), 0);
        assert_eq!(trigger_from_unit(1.0), 255);
        assert_eq!(trigger_from_unit(0.5), 128);
        assert_eq!(trigger_from_unit(-1.0), 0);
    }
}
