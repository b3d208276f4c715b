//! Tokenizer and token grammar for legacy ASCII command lines.
//!
//! A line is a comma/whitespace separated list of tokens, for example
//! `"MOUSE_LEFT_DOWN,WAIT_50,MOUSE_LEFT_UP"` or `"DELTA:0.5,-0.25"`.
//! Tokens are matched case-insensitively.
//!
//! Because the separator is also the coordinate separator, [`tokenize_line`]
//! glues `DELTA:0.5` and `-0.25` back together before parsing.
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `DELTA:dx,dy` | relative mouse move in normalized units |
//! | `MOUSE_LEFT_DOWN` / `_UP` / `_HOLD` / `_RELEASE` | mouse button hold / release |
//! | `MOUSE_LEFT` | mouse click |
//! | `KEY_DOWN:name` / `KEY_UP:name` | key hold / release |
//! | `name` | key tap |
//! | `X360A`, `X360A_HOLD`, `X360A_RELEASE` | gamepad press / hold / release |
//! | `BUTTON_A_PRESSED` / `BUTTON_A_RELEASED` | gamepad hold / release |
//! | `BUTTON_DPAD_UP` | D-pad press |
//! | `LS:x,y`, `STICK_R:x,y`, ... | stick position, normalized |
//! | `LS_UP`, `RS_LEFT`, ... | stick pushed fully in one direction |
//! | `LT:v`, `TRIGGER_R:v` | analog trigger, normalized 0..1 |
//! | `LT`, `LT_HOLD`, `LT_RELEASE` | digital trigger pulse / hold / release |
//! | `WAIT_n` | delay the rest of the line by `n` ms |
//! | `SOFT_RESET` / `RESET` | release everything |
//! | `HARD_RESET` / `REBOOT` | restart the bridge |
//! | `PING`, `KEY_SYNC:*`, `TOUCHPAD_END`, `TOUCH_END`, `MOUSE_RESET` | ignored |

use thiserror::Error;

use crate::protocol::messages::{ActionOp, Side};
use crate::semantics::gamepad::{stick_side, GamepadButton};
use crate::semantics::mouse::MouseButton;

/// One parsed legacy token.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyToken {
    /// Relative move in normalized units (scaled by the delta gain later).
    Delta { dx: f32, dy: f32 },
    MouseButton { op: ActionOp, button: MouseButton },
    /// Key by name; the name is kept lower-case and resolved later so unknown
    /// names can be absorbed.
    Key { op: ActionOp, name: String },
    GamepadButton { op: ActionOp, button: GamepadButton },
    /// Stick position in `[-1, 1]`, Y pointing up.
    Stick { side: Side, x: f32, y: f32 },
    /// Analog trigger in `[0, 1]`.
    Trigger { side: Side, value: f32 },
    /// Digital trigger action.
    TriggerAction { op: ActionOp, side: Side },
    Wait { ms: u64 },
    SoftReset,
    HardReset,
    /// Recognized token with no effect (keep-alives, touch lifecycle).
    Noop,
}

/// A token that matches nothing in the grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("empty token")]
    Empty,

    #[error("bad number in token {0:?}")]
    BadNumber(String),

    #[error("unknown directive {0:?}")]
    UnknownDirective(String),
}

// ── Tokenizing ────────────────────────────────────────────────────────────────

/// Directives whose argument is an `x,y` pair.
const PAIR_DIRECTIVES: &[&str] = &["DELTA", "STICK", "STICK_L", "STICK_R", "LS", "RS", "L", "R", "LEFT", "RIGHT"];

/// Splits a line into tokens.
///
/// Leading `player1:`/`player2:` and surrounding whitespace/commas are
/// stripped; empty pieces are dropped.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let line = strip_player_prefix(line.trim()).trim_matches(|c: char| c == ',' || c.is_whitespace());

    let mut tokens: Vec<String> = Vec::new();
    let pieces = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty());

    for piece in pieces {
        if let Some(last) = tokens.last_mut() {
            if wants_more(last, piece) {
                if !last.ends_with(':') {
                    last.push(',');
                }
                last.push_str(piece);
                continue;
            }
        }
        tokens.push(piece.to_string());
    }
    tokens
}

/// Whether `piece` is the missing argument of the directive in `token`.
fn wants_more(token: &str, piece: &str) -> bool {
    let Some((head, args)) = token.split_once(':') else {
        return false;
    };
    let head = head.to_ascii_uppercase();
    if PAIR_DIRECTIVES.contains(&head.as_str()) {
        let have = args.split(',').filter(|a| !a.is_empty()).count();
        have < 2 && piece.parse::<f32>().is_ok()
    } else {
        // Single-argument directives (`KEY_DOWN:`, `LT:`) written with a space.
        args.is_empty()
    }
}

fn strip_player_prefix(s: &str) -> &str {
    for prefix in ["player1:", "player2:"] {
        if let Some(head) = s.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                return &s[prefix.len()..];
            }
        }
    }
    s
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parses a single token.
///
/// Anything that is not a recognized directive and contains no `:` is a key
/// tap; the key name is validated only when it is resolved.
///
/// # Errors
///
/// [`GrammarError::Empty`] for a blank token, [`GrammarError::BadNumber`]
/// when a numeric argument does not parse, [`GrammarError::UnknownDirective`]
/// for an unrecognized `NAME:args` token.
pub fn parse_token(raw: &str) -> Result<LegacyToken, GrammarError> {
    let raw = strip_player_prefix(raw.trim()).trim_end_matches(',').trim();
    if raw.is_empty() {
        return Err(GrammarError::Empty);
    }
    let upper = raw.to_ascii_uppercase();
    let bad_number = || GrammarError::BadNumber(raw.to_string());

    match upper.as_str() {
        "PING" | "TOUCHPAD_END" | "TOUCH_END" | "MOUSE_RESET" => return Ok(LegacyToken::Noop),
        "SOFT_RESET" | "RESET" => return Ok(LegacyToken::SoftReset),
        "HARD_RESET" | "REBOOT" => return Ok(LegacyToken::HardReset),
        _ => {}
    }

    if let Some((head, args)) = upper.split_once(':') {
        let raw_args = &raw[head.len() + 1..];
        return match head {
            "KEY_SYNC" => Ok(LegacyToken::Noop),
            "DELTA" => {
                let (dx, dy) = parse_pair(args).ok_or_else(bad_number)?;
                Ok(LegacyToken::Delta { dx, dy })
            }
            "KEY_DOWN" | "KEY_UP" => {
                let name = raw_args.trim();
                if name.is_empty() {
                    return Err(GrammarError::UnknownDirective(raw.to_string()));
                }
                let op = if head == "KEY_DOWN" { ActionOp::Hold } else { ActionOp::Release };
                Ok(LegacyToken::Key { op, name: name.to_ascii_lowercase() })
            }
            "LT" | "TRIGGER_L" | "RT" | "TRIGGER_R" => {
                let side = match head {
                    "LT" | "TRIGGER_L" => Side::Left,
                    _ => Side::Right,
                };
                let value = args.trim().parse::<f32>().map_err(|_| bad_number())?;
                Ok(LegacyToken::Trigger { side, value })
            }
            _ => match stick_side(head) {
                Some(side) => {
                    let (x, y) = parse_pair(args).ok_or_else(bad_number)?;
                    Ok(LegacyToken::Stick { side, x, y })
                }
                None => Err(GrammarError::UnknownDirective(raw.to_string())),
            },
        };
    }

    if let Some(ms) = upper.strip_prefix("WAIT_") {
        let ms = ms.parse::<u64>().map_err(|_| bad_number())?;
        return Ok(LegacyToken::Wait { ms });
    }

    if let Some(token) = parse_mouse(&upper)
        .or_else(|| parse_stick_shortcut(&upper))
        .or_else(|| parse_trigger_action(&upper))
        .or_else(|| parse_x360(&upper))
        .or_else(|| parse_button_event(&upper))
    {
        return Ok(token);
    }

    Ok(LegacyToken::Key {
        op: ActionOp::Press,
        name: raw.to_ascii_lowercase(),
    })
}

fn parse_pair(args: &str) -> Option<(f32, f32)> {
    let (x, y) = args.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// `MOUSE_LEFT`, `MOUSE_LEFT_DOWN`, `MOUSE_RIGHT_RELEASE`, ...
fn parse_mouse(upper: &str) -> Option<LegacyToken> {
    let rest = upper.strip_prefix("MOUSE_")?;
    let (name, suffix) = match rest.split_once('_') {
        Some((name, suffix)) => (name, Some(suffix)),
        None => (rest, None),
    };
    let button = MouseButton::from_name(name)?;
    let op = match suffix {
        None => ActionOp::Press,
        Some("DOWN") | Some("HOLD") => ActionOp::Hold,
        Some("UP") | Some("RELEASE") => ActionOp::Release,
        Some(_) => return None,
    };
    Some(LegacyToken::MouseButton { op, button })
}

/// `LS_UP`, `RS_LEFT`, ...: full deflection in one direction.
fn parse_stick_shortcut(upper: &str) -> Option<LegacyToken> {
    let (stick, direction) = upper.split_once('_')?;
    if stick != "LS" && stick != "RS" {
        return None;
    }
    let side = stick_side(stick)?;
    let (x, y) = match direction {
        "UP" => (0.0, 1.0),
        "DOWN" => (0.0, -1.0),
        "LEFT" => (-1.0, 0.0),
        "RIGHT" => (1.0, 0.0),
        _ => return None,
    };
    Some(LegacyToken::Stick { side, x, y })
}

/// `LT`, `LT_HOLD`, `LT_RELEASE` and the `RT` equivalents.
fn parse_trigger_action(upper: &str) -> Option<LegacyToken> {
    let (side, suffix) = if let Some(s) = upper.strip_prefix("LT") {
        (Side::Left, s)
    } else if let Some(s) = upper.strip_prefix("RT") {
        (Side::Right, s)
    } else {
        return None;
    };
    let op = match suffix {
        "" => ActionOp::Press,
        "_HOLD" => ActionOp::Hold,
        "_RELEASE" => ActionOp::Release,
        _ => return None,
    };
    Some(LegacyToken::TriggerAction { op, side })
}

/// `X360A` (momentary), `X360A_HOLD`, `X360A_RELEASE`.
fn parse_x360(upper: &str) -> Option<LegacyToken> {
    let rest = upper.strip_prefix("X360")?;
    let (name, op) = if let Some(name) = rest.strip_suffix("_HOLD") {
        (name, ActionOp::Hold)
    } else if let Some(name) = rest.strip_suffix("_RELEASE") {
        (name, ActionOp::Release)
    } else {
        (rest, ActionOp::Press)
    };
    let button = GamepadButton::from_name(name)?;
    Some(LegacyToken::GamepadButton { op, button })
}

/// `BUTTON_A_PRESSED`, `BUTTON_A_RELEASED`, `BUTTON_DPAD_UP`.
fn parse_button_event(upper: &str) -> Option<LegacyToken> {
    let rest = upper.strip_prefix("BUTTON_")?;
    let (name, op) = if let Some(name) = rest.strip_suffix("_PRESSED") {
        (name, ActionOp::Hold)
    } else if let Some(name) = rest.strip_suffix("_RELEASED") {
        (name, ActionOp::Release)
    } else if rest.starts_with("DPAD_") {
        (rest, ActionOp::Press)
    } else {
        return None;
    };
    let button = GamepadButton::from_name(name)?;
    Some(LegacyToken::GamepadButton { op, button })
}
