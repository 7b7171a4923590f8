//! Scheduled press feedback.
//!
//! A momentary button is drawn inverted when touched and restored
//! [`PRESS_FEEDBACK_MS`] later by the main loop. The loop never waits.

use heapless::Deque;

use crate::config::PRESS_FEEDBACK_MS;
use crate::screen::Screen;

/// Maximum buttons waiting to be restored.
pub const FEEDBACK_QUEUE: usize = 4;

/// A pressed button to restore.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingRevert {
    pub screen: Screen,
    /// Index into the screen's hit table.
    pub hit: usize,
    pub at_ms: u64,
}

/// FIFO of pending reverts, ordered by deadline.
#[derive(Default)]
pub struct PressFeedback {
    pending: Deque<PendingRevert, FEEDBACK_QUEUE>,
}

impl PressFeedback {
    pub const fn new() -> Self { Self { pending: Deque::new() } }

    /// Queue a revert for `hit` on `screen`.
    ///
    /// When the queue is full the oldest entry is returned so the caller can
    /// restore it right away.
    pub fn schedule(
        &mut self,
        screen: Screen,
        hit: usize,
        now_ms: u64,
    ) -> Option<PendingRevert> {
        let evicted = if self.pending.is_full() { self.pending.pop_front() } else { None };
        let entry = PendingRevert {
            screen,
            hit,
            at_ms: now_ms + PRESS_FEEDBACK_MS,
        };
        self.pending.push_back(entry).ok();
        evicted
    }

    /// Next revert whose deadline has passed.
    pub fn due(
        &mut self,
        now_ms: u64,
    ) -> Option<PendingRevert> {
        match self.pending.front() {
            Some(entry) if entry.at_ms <= now_ms => self.pending.pop_front(),
            _ => None,
        }
    }

    /// Drop every pending revert (the screen is being fully redrawn).
    pub fn clear(&mut self) { self.pending.clear(); }

    #[inline]
    pub fn len(&self) -> usize { self.pending.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.pending.is_empty() }
}

// =============================================================================
// Unit Tests
// =============================================================================
