//! The command vocabulary shared by the encode and decode paths: key names,
//! gamepad and mouse button names, stick aliases, and the translator from
//! legacy tokens to typed commands.

pub mod gamepad;
pub mod keys;
pub mod mouse;
pub mod translate;

pub use gamepad::{hat_from_dpad, stick_side, GamepadButton, HAT_CENTERED};
pub use keys::{key_name, modifier_name, resolve_key, HidKeyCode, KeyBinding};
pub use mouse::MouseButton;
pub use translate::{translate, DELTA_GAIN};
