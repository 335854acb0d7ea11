/// Deadline-based debouncing for history snapshots.
///
/// There is no timer thread: the owner schedules an entry with the current
/// instant and later polls with a newer one. A pending push lives exactly as
/// long as its owner, so dropping or cancelling it can never leak a snapshot
/// into a discarded stack.
use std::time::{Duration, Instant};

use crate::entry::HistoryEntry;

/// A single scheduled snapshot, replaced on every reschedule.
#[derive(Debug, Clone, Default)]
pub struct PendingPush {
    slot: Option<(HistoryEntry, Instant)>,
}

impl PendingPush {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `entry` to fire `delay` after `now`.
    ///
    /// Any previously scheduled entry is discarded.
    pub fn schedule(&mut self, entry: HistoryEntry, now: Instant, delay: Duration) {
        self.slot = Some((entry, now + delay));
    }

    /// Whether an entry is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    /// Takes the pending entry if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<HistoryEntry> {
        match &self.slot {
            Some((_, due)) if now >= *due => self.slot.take().map(|(entry, _)| entry),
            _ => None,
        }
    }

    /// Takes the pending entry regardless of its deadline.
    pub fn take(&mut self) -> Option<HistoryEntry> {
        self.slot.take().map(|(entry, _)| entry)
    }

    /// Drops the pending entry. Returns true if one was discarded.
    pub fn cancel(&mut self) -> bool {
        self.slot.take().is_some()
    }
}
