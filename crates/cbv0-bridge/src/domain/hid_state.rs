//! Emulated keyboard, mouse, and gamepad state.
//!
//! Everything here is a mask or a set, never a counter: releasing twice
//! leaves the same state as releasing once.  All three devices start neutral
//! and are only changed through the methods below.

use cbv0_core::semantics::{hat_from_dpad, GamepadButton, KeyBinding};
use cbv0_core::Side;

use crate::domain::filters::smooth_step;
use crate::domain::reports::{GamepadReport, KeyboardReport, MouseReport};

/// Largest per-report mouse movement.
pub const MOUSE_DELTA_LIMIT: i16 = 127;

// ── Keyboard ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    modifiers: u8,
    keys: [u8; 6],
}

impl KeyboardState {
    /// ORs in the binding's modifier bits and puts its keycode in the first
    /// free slot.  Already-held keys and a full slot table leave the slots
    /// unchanged.
    pub fn press(&mut self, binding: KeyBinding) {
        self.modifiers |= binding.modifiers;
        let code = binding.code.as_u8();
        if code == 0 || self.keys.contains(&code) {
            return;
        }
        if let Some(slot) = self.keys.iter_mut().find(|k| **k == 0) {
            *slot = code;
        }
    }

    /// Clears the binding's modifier bits and its slot, if held.
    pub fn release(&mut self, binding: KeyBinding) {
        self.modifiers &= !binding.modifiers;
        let code = binding.code.as_u8();
        if code == 0 {
            return;
        }
        for slot in self.keys.iter_mut().filter(|k| **k == code) {
            *slot = 0;
        }
    }

    pub fn report(&self) -> KeyboardReport {
        KeyboardReport {
            modifiers: self.modifiers,
            keys: self.keys,
        }
    }
}

// ── Mouse ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MouseState {
    buttons: u8,
    acc_dx: i16,
    acc_dy: i16,
}

impl MouseState {
    /// Adds a delta to the accumulator.  Each addition saturates at the
    /// report's ±127 range.
    pub fn add_delta(&mut self, dx: i16, dy: i16) {
        self.acc_dx = saturating_accumulate(self.acc_dx, dx);
        self.acc_dy = saturating_accumulate(self.acc_dy, dy);
    }

    /// Sets or clears button bits.  Returns `true` if the mask changed.
    pub fn set_buttons(&mut self, bits: u8, pressed: bool) -> bool {
        let before = self.buttons;
        if pressed {
            self.buttons |= bits;
        } else {
            self.buttons &= !bits;
        }
        self.buttons != before
    }

    /// Replaces the whole mask.  Returns `true` if it changed.
    pub fn replace_buttons(&mut self, mask: u8) -> bool {
        let changed = self.buttons != mask;
        self.buttons = mask;
        changed
    }

    pub fn buttons(&self) -> u8 {
        self.buttons
    }

    pub fn has_motion(&self) -> bool {
        self.acc_dx != 0 || self.acc_dy != 0
    }

    /// Drains the accumulator into a report.
    pub fn take_motion_report(&mut self) -> MouseReport {
        let report = MouseReport {
            buttons: self.buttons,
            dx: self.acc_dx as i8,
            dy: self.acc_dy as i8,
        };
        self.acc_dx = 0;
        self.acc_dy = 0;
        report
    }

    /// A report carrying the current buttons and no movement.
    pub fn button_report(&self) -> MouseReport {
        MouseReport {
            buttons: self.buttons,
            dx: 0,
            dy: 0,
        }
    }
}

fn saturating_accumulate(acc: i16, delta: i16) -> i16 {
    (i32::from(acc) + i32::from(delta))
        .clamp(-i32::from(MOUSE_DELTA_LIMIT), i32::from(MOUSE_DELTA_LIMIT)) as i16
}

// ── Gamepad ───────────────────────────────────────────────────────────────────

/// Axis indices into [`GamepadState`]'s axis arrays.
const LX: usize = 0;
const LY: usize = 1;
const RX: usize = 2;
const RY: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct GamepadState {
    buttons: u16,
    /// Up, down, left, right.
    dpad: [bool; 4],
    /// Filtered axes, as the next report will carry them.
    axes: [i8; 4],
    dirty: bool,
}

impl Default for GamepadState {
    fn default() -> Self {
        Self {
            buttons: 0,
            dpad: [false; 4],
            axes: [0; 4],
            dirty: false,
        }
    }
}

impl GamepadState {
    /// Presses or releases a button; D-pad ids drive the hat instead of the
    /// mask.  Marks the state dirty.
    pub fn set_button(&mut self, button: GamepadButton, pressed: bool) {
        match button.mask_bit() {
            Some(bit) if pressed => self.buttons |= bit,
            Some(bit) => self.buttons &= !bit,
            None => {
                let index = usize::from(button.id() - GamepadButton::DpadUp.id());
                self.dpad[index] = pressed;
            }
        }
        self.dirty = true;
    }

    /// Blends one quantized stick sample into the axes of `side`.
    ///
    /// Each accepted sample moves the axis `weight` of the way toward it, so
    /// several samples inside one tick are all folded in.
    pub fn blend_stick_sample(&mut self, side: Side, x: i8, y: i8, weight: f32) {
        let (ix, iy) = match side {
            Side::Left => (LX, LY),
            Side::Right => (RX, RY),
        };
        self.axes[ix] = smooth_step(self.axes[ix], x, weight);
        self.axes[iy] = smooth_step(self.axes[iy], y, weight);
        self.dirty = true;
    }

    /// `true` if something changed since the last report.
    pub fn needs_report(&self) -> bool {
        self.dirty
    }

    /// Produces the report and clears the dirty flag.
    pub fn take_report(&mut self) -> GamepadReport {
        self.dirty = false;
        self.report()
    }

    pub fn report(&self) -> GamepadReport {
        let [up, down, left, right] = self.dpad;
        GamepadReport {
            buttons: self.buttons,
            hat: hat_from_dpad(up, down, left, right),
            left_x: self.axes[LX],
            left_y: self.axes[LY],
            right_x: self.axes[RX],
            right_y: self.axes[RY],
        }
    }

    pub fn buttons(&self) -> u16 {
        self.buttons
    }

    /// Filtered axes in report order: left x, left y, right x, right y.
    pub fn axes(&self) -> [i8; 4] {
        self.axes
    }
}

// ── Aggregate ─────────────────────────────────────────────────────────────────

/// The complete emulated input state of the bridge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HidState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
    pub gamepad: GamepadState,
}

impl HidState {
    /// Fresh, neutral state: no keys, no buttons, sticks centered.
    pub fn neutral() -> Self {
        Self::default()
    }
}
