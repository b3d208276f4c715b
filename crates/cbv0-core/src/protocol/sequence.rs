//! Thread-safe 16-bit sequence counter for outbound frames.
//!
//! # What is the sequence number for? (for beginners)
//!
//! Every CBv0 frame carries a 16-bit sequence number assigned by the sender.
//! Unlike a TCP sequence number it is **purely informational**: the bridge
//! never reorders, acknowledges, or deduplicates frames by it.  It exists so
//! that a packet capture or a debug log can show gaps and reordering on a
//! lossy Wi-Fi link.
//!
//! # Thread safety
//!
//! Several input-producing contexts (a touch handler, a gamepad overlay, a
//! keyboard widget) may encode frames concurrently.  The counter uses an
//! `AtomicU16` so two callers can both call `next()` simultaneously without
//! a lock and without ever receiving the same value.

use std::sync::atomic::{AtomicU16, Ordering};

/// A thread-safe, wrapping counter for CBv0 sequence numbers.
///
/// Sequence numbers start at 0 and increment by 1 with each call to [`next`].
/// The counter wraps from `u16::MAX` back to 0 without panicking.
///
/// [`next`]: SequenceCounter::next
///
/// # Examples
///
/// ```rust
/// use cbv0_core::protocol::SequenceCounter;
///
/// let counter = SequenceCounter::new();
/// assert_eq!(counter.next(), 0);
/// assert_eq!(counter.next(), 1);
/// ```
#[derive(Debug)]
pub struct SequenceCounter {
    inner: AtomicU16,
}

impl SequenceCounter {
    /// Creates a new counter starting at 0.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a counter whose first [`next`](Self::next) returns `first`.
    pub fn starting_at(first: u16) -> Self {
        Self {
            inner: AtomicU16::new(first),
        }
    }

    /// Returns the next sequence number and atomically increments the counter.
    ///
    /// `Ordering::Relaxed` is sufficient: the value is not used to publish
    /// any other memory to other threads.
    pub fn next(&self) -> u16 {
        // `fetch_add` wraps on overflow for atomics, so u16::MAX + 1 == 0.
        self.inner.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the value the next call to [`next`](Self::next) will produce.
    pub fn current(&self) -> u16 {
        self.inner.load(Ordering::Relaxed)
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}
