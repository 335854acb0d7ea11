/// Bounded snapshot stack with explicit restore modes.
///
/// `past` holds restore points oldest-first; its top is always the state the
/// buffer is currently in. `future` holds undone snapshots with the most
/// recently undone on top. Restoring a snapshot puts the stack into an
/// applying mode so the buffer change the restore causes is not recorded
/// again.
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::HistoryConfig;
use crate::debounce::PendingPush;
use crate::entry::HistoryEntry;

/// What the stack is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMode {
    /// Accepting pushes.
    #[default]
    Idle,
    /// The caller is restoring an entry returned by `undo()`.
    ApplyingUndo,
    /// The caller is restoring an entry returned by `redo()`.
    ApplyingRedo,
}

/// Manages undo/redo snapshots for a single editing session.
pub struct HistoryStack {
    /// Restore points, oldest first. Never longer than `limit`.
    past: VecDeque<HistoryEntry>,
    /// Undone entries, most recently undone last.
    future: Vec<HistoryEntry>,
    /// Maximum length of `past`.
    limit: usize,
    /// Debounce window for typing snapshots.
    debounce: Duration,
    /// Restore mode guarding against re-recording.
    mode: HistoryMode,
    /// Typing snapshot waiting for its debounce window to elapse.
    pending: PendingPush,
}

impl std::fmt::Debug for HistoryStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStack")
            .field("past_len", &self.past.len())
            .field("future_len", &self.future.len())
            .field("limit", &self.limit)
            .field("mode", &self.mode)
            .field("pending", &self.pending.is_pending())
            .finish()
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl HistoryStack {
    /// Creates an empty stack. A limit of zero is treated as one.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: config.limit.max(1),
            debounce: config.debounce(),
            mode: HistoryMode::Idle,
            pending: PendingPush::new(),
        }
    }

    /// Creates a stack already seeded with the session's initial state.
    pub fn seeded(config: HistoryConfig, seed: HistoryEntry) -> Self {
        let mut stack = Self::new(config);
        stack.push_state(seed);
        stack
    }

    /// Returns the configured limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the current restore mode.
    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    /// Number of entries in `past`, seed included.
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    /// Number of entries available for redo.
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// The snapshot matching the current buffer state, if any was recorded.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.past.back()
    }

    /// Records a snapshot.
    ///
    /// Evicts the oldest entry when `past` is full and always clears
    /// `future`. Identical consecutive content is still recorded since the
    /// selection may differ. Returns false when suppressed by a restore in
    /// progress.
    pub fn push_state(&mut self, entry: HistoryEntry) -> bool {
        if self.mode != HistoryMode::Idle {
            tracing::debug!("History push suppressed while {:?}", self.mode);
            return false;
        }

        self.past.push_back(entry);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
        true
    }

    /// Schedules a snapshot after the configured debounce window.
    ///
    /// A call within the window replaces the pending entry and restarts the
    /// window.
    pub fn debounced_push(&mut self, entry: HistoryEntry, now: Instant) {
        let delay = self.debounce;
        self.debounced_push_with_delay(entry, now, delay);
    }

    /// Schedules a snapshot after an explicit delay.
    pub fn debounced_push_with_delay(&mut self, entry: HistoryEntry, now: Instant, delay: Duration) {
        if self.mode != HistoryMode::Idle {
            tracing::debug!("Debounced history push suppressed while {:?}", self.mode);
            return;
        }
        self.pending.schedule(entry, now, delay);
    }

    /// Commits the pending snapshot if its window has elapsed.
    ///
    /// Returns true if an entry was pushed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.mode != HistoryMode::Idle {
            return false;
        }
        match self.pending.take_due(now) {
            Some(entry) => self.push_state(entry),
            None => false,
        }
    }

    /// Commits the pending snapshot immediately, ignoring its deadline.
    pub fn flush_pending(&mut self) -> bool {
        if self.mode != HistoryMode::Idle {
            return false;
        }
        match self.pending.take() {
            Some(entry) => self.push_state(entry),
            None => false,
        }
    }

    /// Drops the pending snapshot without recording it.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.cancel()
    }

    /// Whether a debounced snapshot is waiting.
    pub fn has_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// Steps back one snapshot.
    ///
    /// Returns the entry the caller must restore, or `None` when only the
    /// seed remains or a restore is already in progress. On success the
    /// stack enters `ApplyingUndo` until [`finish_restore`](Self::finish_restore).
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        if self.mode != HistoryMode::Idle {
            tracing::debug!("Undo rejected while {:?}", self.mode);
            return None;
        }
        if self.past.len() <= 1 {
            return None;
        }

        let top = self.past.pop_back()?;
        self.future.push(top);
        let restore = self.past.back().cloned();
        if restore.is_some() {
            self.mode = HistoryMode::ApplyingUndo;
        }
        restore
    }

    /// Steps forward one snapshot.
    ///
    /// Returns the entry the caller must restore, or `None` when nothing
    /// was undone or a restore is already in progress. On success the stack
    /// enters `ApplyingRedo` until [`finish_restore`](Self::finish_restore).
    pub fn redo(&mut self) -> Option<HistoryEntry> {
        if self.mode != HistoryMode::Idle {
            tracing::debug!("Redo rejected while {:?}", self.mode);
            return None;
        }

        let entry = self.future.pop()?;
        self.past.push_back(entry.clone());
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.mode = HistoryMode::ApplyingRedo;
        Some(entry)
    }

    /// Returns the stack to `Idle` once the caller has applied a restore.
    pub fn finish_restore(&mut self) {
        self.mode = HistoryMode::Idle;
    }

    /// Whether there is a snapshot before the current one.
    pub fn can_undo(&self) -> bool {
        self.past.len() > 1
    }

    /// Whether there is an undone snapshot to return to.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}
