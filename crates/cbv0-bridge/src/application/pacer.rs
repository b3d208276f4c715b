//! Fixed-rate output pacing.
//!
//! Mouse and gamepad reports are only written when the pacer says a tick is
//! due, which caps the output endpoint at one report per device per interval
//! no matter how bursty the input is.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Pacer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// `true` if a tick may fire at `now`.  The first check is always due.
    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due.map_or(true, |due| now >= due)
    }

    /// Consumes the tick at `now` if one is due.
    ///
    /// The next deadline advances by one interval from the previous one, so a
    /// caller that polls slightly late does not drift.  A caller that fell more
    /// than a whole interval behind restarts the schedule from `now` instead
    /// of firing a burst of catch-up ticks.
    pub fn try_tick(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        let next = match self.next_due {
            Some(prev) if prev + self.interval > now => prev + self.interval,
            _ => now + self.interval,
        };
        self.next_due = Some(next);
        true
    }
}
