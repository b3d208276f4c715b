//! HID output report layouts.
//!
//! | Report | Size | Layout |
//! |--------|------|--------|
//! | Keyboard | 8 | `[modifiers, reserved, key1..key6]` (boot protocol) |
//! | Mouse | 3 | `[buttons, dx:i8, dy:i8]` |
//! | Gamepad | 7 | `[buttons:u16 LE, hat, lx, ly, rx, ry]` |
//!
//! The report descriptors configured on the USB gadget must match these sizes.

use cbv0_core::semantics::HAT_CENTERED;

/// Boot-protocol keyboard report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardReport {
    pub modifiers: u8,
    pub keys: [u8; 6],
}

impl KeyboardReport {
    pub const SIZE: usize = 8;

    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let k = self.keys;
        [self.modifiers, 0, k[0], k[1], k[2], k[3], k[4], k[5]]
    }
}

/// Relative mouse report.  Deltas never exceed ±127.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseReport {
    pub buttons: u8,
    pub dx: i8,
    pub dy: i8,
}

impl MouseReport {
    pub const SIZE: usize = 3;

    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        [self.buttons, self.dx as u8, self.dy as u8]
    }
}

/// Gamepad report: 12 mask buttons, a hat for the D-pad, four 8-bit axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamepadReport {
    pub buttons: u16,
    /// 0–7 clockwise from up, [`HAT_CENTERED`] for none.
    pub hat: u8,
    pub left_x: i8,
    pub left_y: i8,
    pub right_x: i8,
    pub right_y: i8,
}

impl GamepadReport {
    pub const SIZE: usize = 7;

    /// Nothing pressed, hat centered, sticks centered.
    pub const fn neutral() -> Self {
        Self {
            buttons: 0,
            hat: HAT_CENTERED,
            left_x: 0,
            left_y: 0,
            right_x: 0,
            right_y: 0,
        }
    }

    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let b = self.buttons.to_le_bytes();
        [
            b[0],
            b[1],
            self.hat,
            self.left_x as u8,
            self.left_y as u8,
            self.right_x as u8,
            self.right_y as u8,
        ]
    }
}

impl Default for GamepadReport {
    fn default() -> Self {
        Self::neutral()
    }
}
