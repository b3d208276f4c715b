//! Executes one legacy ASCII command line against the synthesizer.
//!
//! Tokens run in order.  `WAIT_n` does not block: it pushes every following
//! token `n` ms further into the future, and those tokens are queued in the
//! synthesizer's deferred queue instead of being applied now.
//!
//! ```text
//! "MOUSE_LEFT_DOWN,WAIT_50,MOUSE_LEFT_UP"
//!    t+0   left button down (report now)
//!    t+50  left button up   (report when poll() reaches t+50)
//! ```

use std::time::{Duration, Instant};

use cbv0_core::legacy::{parse_token, tokenize_line, LegacyToken};
use cbv0_core::semantics::translate;
use tracing::{debug, trace, warn};

use crate::application::deferred::{ControlAction, DeferredAction};
use crate::application::synthesizer::ReportSynthesizer;

/// What happened to the tokens of one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineOutcome {
    /// Tokens applied immediately.
    pub applied: usize,
    /// Tokens queued behind a `WAIT_n`.
    pub scheduled: usize,
    /// Tokens that failed to parse.
    pub skipped: usize,
}

/// Runs `line` at time `now`.
///
/// Never fails: a token that does not parse is logged and skipped, and the
/// rest of the line still runs.
pub fn run_legacy_line(synth: &mut ReportSynthesizer, line: &str, now: Instant) -> LineOutcome {
    let max_wait = synth.config().max_wait;
    let mut outcome = LineOutcome::default();
    let mut offset = Duration::ZERO;

    for raw in tokenize_line(line) {
        let token = match parse_token(&raw) {
            Ok(token) => token,
            Err(e) => {
                warn!("skipping legacy token: {e}");
                outcome.skipped += 1;
                continue;
            }
        };

        let action = match &token {
            LegacyToken::Wait { ms } => {
                let wait = Duration::from_millis(*ms);
                if wait > max_wait {
                    warn!(requested_ms = ms, "WAIT clamped to {max_wait:?}");
                }
                offset += wait.min(max_wait);
                continue;
            }
            LegacyToken::Noop => {
                trace!(token = %raw, "ignored");
                continue;
            }
            LegacyToken::SoftReset => DeferredAction::Control(ControlAction::SoftReset),
            LegacyToken::HardReset => DeferredAction::Control(ControlAction::HardReset),
            other => match translate(other) {
                Some(cmd) => DeferredAction::Apply(cmd),
                None => continue,
            },
        };

        if offset.is_zero() {
            match action {
                DeferredAction::Apply(cmd) => synth.apply(&cmd, now),
                DeferredAction::Control(control) => synth.control(control),
            }
            outcome.applied += 1;
        } else {
            synth.schedule(now + offset, action);
            outcome.scheduled += 1;
        }
    }

    debug!(?outcome, "legacy line done");
    outcome
}
