//! One-shot actions scheduled against the monotonic clock.
//!
//! Momentary presses, trigger pulses, and the tail of a legacy line after a
//! `WAIT_n` are not slept through.  They are queued here with a due time and
//! run by [`ReportSynthesizer::poll`](super::synthesizer::ReportSynthesizer::poll)
//! once that time has passed, so the receive loop never stalls.
//!
//! Entries with the same due time run in the order they were scheduled.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Instant;

use cbv0_core::Command;

/// Device-control directives that can be scheduled like commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Release everything and send neutral reports.
    SoftReset,
    /// Ask the bridge process to exit so its supervisor restarts it.
    HardReset,
}

/// What a queue entry does when it comes due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredAction {
    Apply(Command),
    Control(ControlAction),
}

#[derive(Debug)]
struct Entry {
    due: Instant,
    seq: u64,
    action: DeferredAction,
}

// Ordered by (due, seq) only; the action takes no part in the ordering.
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Min-heap of scheduled actions.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Instant, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.heap.push(Reverse(Entry { due, seq, action }));
    }

    /// Removes and returns the earliest entry if it is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<DeferredAction> {
        match self.heap.peek() {
            Some(Reverse(entry)) if entry.due <= now => {
                self.heap.pop().map(|Reverse(entry)| entry.action)
            }
            _ => None,
        }
    }

    /// Due time of the earliest entry.
    pub fn next_due(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(entry)| entry.due)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
