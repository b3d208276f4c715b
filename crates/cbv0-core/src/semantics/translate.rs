//! Legacy token → typed [`Command`] translation.
//!
//! The client uses this to send binary frames for text commands, and the
//! bridge uses the same mapping when it executes a legacy line, so both paths
//! agree on scaling and orientation.

use tracing::trace;

use crate::legacy::grammar::LegacyToken;
use crate::protocol::messages::Command;
use crate::semantics::gamepad::{stick_axis_from_unit, trigger_from_unit};

/// Mouse counts per normalized `DELTA` unit.
pub const DELTA_GAIN: f32 = 40.0;

/// Maps one token onto the command it stands for.
///
/// Returns `None` for tokens with no typed equivalent (`WAIT_n`, resets,
/// ignored keep-alives).  A client transmits lines containing such tokens as a
/// raw legacy-text frame instead.
///
/// Stick Y is inverted: legacy tokens use "up is positive", HID reports use
/// "down is positive".
pub fn translate(token: &LegacyToken) -> Option<Command> {
    let cmd = match token {
        LegacyToken::Delta { dx, dy } => Command::MouseDelta {
            dx: scale_delta(*dx),
            dy: scale_delta(*dy),
        },
        LegacyToken::MouseButton { op, button } => Command::MouseButton {
            op: *op,
            button: button.id(),
        },
        LegacyToken::Key { op, name } => Command::KeyEvent {
            op: *op,
            key: name.clone(),
        },
        LegacyToken::GamepadButton { op, button } => Command::GamepadButton {
            op: *op,
            button: button.id(),
        },
        LegacyToken::Stick { side, x, y } => Command::GamepadStick {
            side: *side,
            x: stick_axis_from_unit(*x),
            y: stick_axis_from_unit(-*y),
        },
        LegacyToken::Trigger { side, value } => Command::GamepadTrigger {
            side: *side,
            value: trigger_from_unit(*value),
        },
        LegacyToken::TriggerAction { op, side } => Command::TriggerAction {
            op: *op,
            side: *side,
        },
        LegacyToken::Wait { .. }
        | LegacyToken::SoftReset
        | LegacyToken::HardReset
        | LegacyToken::Noop => {
            trace!(?token, "no typed equivalent");
            return None;
        }
    };
    Some(cmd)
}

/// Normalized delta → counts.  Truncates toward zero and saturates at the
/// i16 range (`as` casts from float saturate; NaN becomes 0).
fn scale_delta(units: f32) -> i16 {
    (units * DELTA_GAIN) as i16
}
