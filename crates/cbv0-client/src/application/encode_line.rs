//! Turns a legacy command line into the frames that carry it.
//!
//! # Typed or raw?
//!
//! A line whose tokens all have a typed equivalent is sent as one typed frame
//! per token.  A line with any token that has none (`WAIT_n`, resets, a token
//! that does not parse) is sent whole, as a single raw frame of type
//! [`LEGACY_TEXT_KIND`], and the bridge runs it through its legacy text
//! interpreter.  Splitting such a line would lose the timing that `WAIT_n`
//! imposes on the tokens after it.

use cbv0_core::protocol::{encode_payload, LEGACY_TEXT_KIND};
use cbv0_core::semantics::translate;
use cbv0_core::{parse_token, tokenize_line, Command, FrameEncoder, PayloadError};
use tracing::debug;

/// How a line will be transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinePlan {
    /// One typed frame per command, in order.
    Typed(Vec<Command>),
    /// The whole line as one legacy-text frame.
    Raw(String),
    /// Nothing to send.
    Empty,
}

/// Decides how `line` is transmitted.
pub fn plan_line(line: &str) -> LinePlan {
    let tokens = tokenize_line(line);
    if tokens.is_empty() {
        return LinePlan::Empty;
    }

    let commands: Option<Vec<Command>> = tokens
        .iter()
        .map(|raw| parse_token(raw).ok().and_then(|token| translate(&token)))
        .collect();

    match commands {
        Some(commands) => LinePlan::Typed(commands),
        None => {
            debug!(line, "line has untranslatable tokens; sending raw");
            LinePlan::Raw(line.trim().to_string())
        }
    }
}

/// Frame builder for one client.  Shares one sequence counter across every
/// frame it produces.
#[derive(Debug, Default)]
pub struct ClientEncoder {
    frames: FrameEncoder,
}

impl ClientEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes one typed command.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] for key names that cannot be carried in a
    /// KEY payload.
    pub fn encode_command(&self, cmd: &Command) -> Result<Vec<u8>, PayloadError> {
        self.frames.encode(cmd)
    }

    /// Wraps `line` unchanged in a legacy-text frame.
    pub fn encode_raw_line(&self, line: &str) -> Vec<u8> {
        self.frames.encode_raw(LEGACY_TEXT_KIND, line.as_bytes().to_vec())
    }

    /// Encodes `line` by the typed-or-raw rule.
    ///
    /// A typed command that fails to encode (an over-long key name) sends
    /// the line raw instead, so the frames of one line are never partial.
    pub fn encode_line(&self, line: &str) -> Vec<Vec<u8>> {
        match plan_line(line) {
            LinePlan::Empty => Vec::new(),
            LinePlan::Raw(text) => vec![self.encode_raw_line(&text)],
            LinePlan::Typed(commands) => {
                let payloads: Result<Vec<(u8, Vec<u8>)>, PayloadError> = commands
                    .iter()
                    .map(|cmd| Ok((cmd.message_type() as u8, encode_payload(cmd)?)))
                    .collect();
                match payloads {
                    Ok(payloads) => payloads
                        .into_iter()
                        .map(|(kind, payload)| self.frames.encode_raw(kind, payload))
                        .collect(),
                    Err(e) => {
                        debug!("typed encoding failed ({e}); sending raw");
                        vec![self.encode_raw_line(line.trim())]
                    }
                }
            }
        }
    }

    /// The sequence number the next frame will carry.
    pub fn next_sequence(&self) -> u16 {
        self.frames.next_sequence()
    }
}
