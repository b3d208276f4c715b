//! Dispatcher: datagram bytes in, synthesizer calls out.
//!
//! # Routing
//!
//! ```text
//! datagram
//!   │ decode_frame
//!   ├─ Ok, known type ──── decode_payload ─── Ok ──► synthesizer.apply
//!   │                                    └─ Err ─► drop (malformed)
//!   ├─ Ok, unknown type ── classify_payload
//!   │                        ├─ Text ─────────► legacy line
//!   │                        ├─ MouseDelta ───► synthesizer.apply
//!   │                        ├─ MouseButtons ─► replace mouse mask
//!   │                        └─ Unclassified ─► drop
//!   ├─ ChecksumMismatch ──────────────────────► drop
//!   └─ TooShort / BadHeader
//!         ├─ printable ASCII ─► legacy line (pre-binary client)
//!         └─ otherwise ───────► drop (malformed)
//! ```
//!
//! Nothing here returns an error.  Every failure ends as a log line and a
//! [`DispatchOutcome`] so the receive loop keeps going.

use std::time::Instant;

use cbv0_core::legacy::{classify_payload, is_printable_text, PayloadClass};
use cbv0_core::protocol::decode_payload;
use cbv0_core::{decode_frame, Command, FrameError, MessageType};
use tracing::{debug, trace, warn};

use crate::application::legacy_line::run_legacy_line;
use crate::application::synthesizer::ReportSynthesizer;

/// What the dispatcher did with one datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A typed frame was applied.
    Applied(MessageType),
    /// The bytes were run as a legacy text line.
    LegacyLine,
    /// An unknown-type payload was read as a mouse delta.
    HeuristicDelta,
    /// An unknown-type payload was read as a mouse button mask.
    HeuristicButtons,
    DroppedChecksum,
    /// Bad header, too short, or a known type with a broken payload.
    DroppedMalformed,
    /// An unknown-type payload that matched no heuristic.
    DroppedUnclassified,
}

/// Running totals, logged periodically by the receive loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub datagrams: u64,
    pub applied: u64,
    pub legacy_lines: u64,
    pub heuristic_deltas: u64,
    pub heuristic_buttons: u64,
    pub dropped_checksum: u64,
    pub dropped_malformed: u64,
    pub dropped_unclassified: u64,
}

impl DispatchStats {
    pub fn dropped(&self) -> u64 {
        self.dropped_checksum + self.dropped_malformed + self.dropped_unclassified
    }

    fn record(&mut self, outcome: DispatchOutcome) {
        let counter = match outcome {
            DispatchOutcome::Applied(_) => &mut self.applied,
            DispatchOutcome::LegacyLine => &mut self.legacy_lines,
            DispatchOutcome::HeuristicDelta => &mut self.heuristic_deltas,
            DispatchOutcome::HeuristicButtons => &mut self.heuristic_buttons,
            DispatchOutcome::DroppedChecksum => &mut self.dropped_checksum,
            DispatchOutcome::DroppedMalformed => &mut self.dropped_malformed,
            DispatchOutcome::DroppedUnclassified => &mut self.dropped_unclassified,
        };
        *counter += 1;
    }
}

/// Owns the synthesizer and routes every inbound datagram to it.
pub struct Dispatcher {
    synth: ReportSynthesizer,
    stats: DispatchStats,
}

impl Dispatcher {
    pub fn new(synth: ReportSynthesizer) -> Self {
        Self {
            synth,
            stats: DispatchStats::default(),
        }
    }

    /// Routes one datagram received at `now`.
    pub fn handle_datagram(&mut self, bytes: &[u8], now: Instant) -> DispatchOutcome {
        trace!(len = bytes.len(), "datagram");
        self.stats.datagrams += 1;
        let outcome = self.route(bytes, now);
        self.stats.record(outcome);
        outcome
    }

    /// Advances timers and output pacing.  Call at least once per tick.
    pub fn poll(&mut self, now: Instant) {
        self.synth.poll(now);
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    pub fn synthesizer(&self) -> &ReportSynthesizer {
        &self.synth
    }

    pub fn synthesizer_mut(&mut self) -> &mut ReportSynthesizer {
        &mut self.synth
    }

    /// `true` once a hard reset has been executed.
    pub fn restart_requested(&self) -> bool {
        self.synth.restart_requested()
    }

    fn route(&mut self, bytes: &[u8], now: Instant) -> DispatchOutcome {
        let frame = match decode_frame(bytes) {
            Ok(frame) => frame,
            Err(e @ FrameError::ChecksumMismatch { .. }) => {
                warn!("dropping frame: {e}");
                return DispatchOutcome::DroppedChecksum;
            }
            Err(e) => {
                if is_printable_text(bytes) {
                    debug!("not a frame ({e}); running as legacy text");
                    return self.run_text(bytes, now);
                }
                warn!("dropping datagram: {e}");
                return DispatchOutcome::DroppedMalformed;
            }
        };

        match MessageType::try_from(frame.kind) {
            Ok(kind) => match decode_payload(kind, &frame.payload) {
                Ok(cmd) => {
                    debug!(seq = frame.sequence, ?cmd, "frame");
                    self.synth.apply(&cmd, now);
                    DispatchOutcome::Applied(kind)
                }
                Err(e) => {
                    warn!(seq = frame.sequence, "dropping frame: {e}");
                    DispatchOutcome::DroppedMalformed
                }
            },
            Err(()) => self.route_unknown(frame.kind, &frame.payload, now),
        }
    }

    fn route_unknown(&mut self, kind: u8, payload: &[u8], now: Instant) -> DispatchOutcome {
        match classify_payload(payload) {
            PayloadClass::Text(line) => {
                debug!(kind, "unknown type carries legacy text");
                run_legacy_line(&mut self.synth, line, now);
                DispatchOutcome::LegacyLine
            }
            PayloadClass::MouseDelta { dx, dy } => {
                debug!(kind, dx, dy, "unknown type read as mouse delta");
                self.synth.apply(&Command::MouseDelta { dx, dy }, now);
                DispatchOutcome::HeuristicDelta
            }
            PayloadClass::MouseButtons(mask) => {
                debug!(kind, mask, "unknown type read as mouse buttons");
                self.synth.replace_mouse_buttons(mask);
                DispatchOutcome::HeuristicButtons
            }
            PayloadClass::Unclassified => {
                warn!(kind, len = payload.len(), "dropping unclassified payload");
                DispatchOutcome::DroppedUnclassified
            }
        }
    }

    fn run_text(&mut self, bytes: &[u8], now: Instant) -> DispatchOutcome {
        // is_printable_text() guarantees ASCII.
        match std::str::from_utf8(bytes) {
            Ok(line) => {
                run_legacy_line(&mut self.synth, line, now);
                DispatchOutcome::LegacyLine
            }
            Err(_) => DispatchOutcome::DroppedMalformed,
        }
    }
}
