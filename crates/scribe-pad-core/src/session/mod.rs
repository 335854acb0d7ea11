//! Editing session over one shared text input.
//!
//! An `EditingSession` ties a [`TextInputHandle`] to a selection tracker and
//! a snapshot history. Free typing is snapshotted after a debounce window;
//! discrete operations (AI results, speech fragments, undo/redo) flush that
//! window first so every operation gets its own restore point. The debounce
//! deadline is polled by the owner and cancelled when the session ends.

mod input;

pub use input::{BufferInput, TextInputHandle};

use std::time::{Duration, Instant};

use crate::capitalize::{fix_buffer_around, DEFAULT_WINDOW_RADIUS};
use crate::history::{generate_session_id, snapshot, HistoryConfig, HistoryEntry, HistoryStack};
use crate::insert::{insert_at_cursor, InsertOptions, InsertOutcome};
use crate::operation::AiOperation;
use crate::selection::{
    CaptureMode, SelectionRange, SelectionTracker, SentenceHint, DEFAULT_HINT_DURATION,
};

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub history: HistoryConfig,
    /// UTF-16 radius examined by capitalization repair.
    pub capitalization_window: usize,
    pub auto_capitalize: bool,
    /// How long a sentence-boundary hint stays active.
    pub hint_duration: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            capitalization_window: DEFAULT_WINDOW_RADIUS,
            auto_capitalize: true,
            hint_duration: DEFAULT_HINT_DURATION,
        }
    }
}

/// One editing session over a text input.
pub struct EditingSession<H: TextInputHandle = BufferInput> {
    id: String,
    input: H,
    tracker: SelectionTracker,
    history: HistoryStack,
    options: SessionOptions,
}

impl<H: TextInputHandle> std::fmt::Debug for EditingSession<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditingSession")
            .field("id", &self.id)
            .field("tracker", &self.tracker)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl EditingSession<BufferInput> {
    /// Starts a session over an in-memory input holding `initial`.
    pub fn new(initial: &str) -> Self {
        Self::with_input(BufferInput::new(initial), SessionOptions::default())
    }
}

impl<H: TextInputHandle> EditingSession<H> {
    /// Starts a session over `input`, seeding history with its current state.
    pub fn with_input(input: H, options: SessionOptions) -> Self {
        let buffer = input.buffer();
        let selection = input.selection().clamp(&buffer);
        let mut tracker = SelectionTracker::with_hint_duration(options.hint_duration);
        tracker.set_captured(&buffer, selection);
        let seed = snapshot(buffer.to_string(), selection);
        let history = HistoryStack::seeded(options.history.clone(), seed);
        let id = generate_session_id();
        tracing::debug!("Started editing session {id}");

        Self {
            id,
            input,
            tracker,
            history,
            options,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn input(&self) -> &H {
        &self.input
    }

    /// Mutable access to the input. Call [`on_input_changed`](Self::on_input_changed)
    /// after editing through it so the change is snapshotted.
    pub fn input_mut(&mut self) -> &mut H {
        &mut self.input
    }

    pub fn text(&self) -> String {
        self.input.text()
    }

    pub fn tracker_mut(&mut self) -> &mut SelectionTracker {
        &mut self.tracker
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    // ── Selection ────────────────────────────────────────────────────

    /// The selection operations will act on, kept across focus loss.
    pub fn captured_selection(&self) -> SelectionRange {
        self.tracker.captured()
    }

    /// Overwrites the captured selection with a raw range, clamped.
    pub fn update_captured_selection(&mut self, start: usize, end: usize) {
        let buffer = self.input.buffer();
        self.tracker
            .set_captured(&buffer, SelectionRange::new(start, end));
    }

    /// Captures the input's current selection, expanding it to whole words.
    ///
    /// The expanded range is written back to the input.
    pub fn capture_selection(&mut self, mode: CaptureMode, now: Instant) -> SelectionRange {
        let buffer = self.input.buffer();
        let raw = self.input.selection();
        let captured = self.tracker.capture_at(&buffer, raw.start, raw.end, mode, now);
        if captured != raw {
            self.input.set_selection(captured);
        }
        captured
    }

    /// Re-captures when the input loses focus.
    ///
    /// Ignored while the input still reports focus.
    pub fn blur(&mut self) -> SelectionRange {
        if self.input.has_focus() {
            tracing::debug!("Ignoring blur while the input has focus");
            return self.tracker.captured();
        }
        let buffer = self.input.buffer();
        let raw = self.input.selection();
        self.tracker.blur(&buffer, raw.start, raw.end)
    }

    /// The sentence-boundary hint, while it is still active.
    pub fn sentence_hint(&self, now: Instant) -> Option<SentenceHint> {
        self.tracker.active_hint(now)
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Records the input's current state after the debounce window.
    pub fn on_input_changed(&mut self, now: Instant) {
        let buffer = self.input.buffer();
        let selection = self.input.selection().clamp(&buffer);
        self.tracker.clamp_to(&buffer);
        self.history
            .debounced_push(snapshot(buffer.to_string(), selection), now);
    }

    /// Types `text` over the input's selection, as a keystroke would.
    ///
    /// No merging or capitalization happens; the snapshot is debounced.
    pub fn type_text(&mut self, text: &str, now: Instant) {
        let mut buffer = self.input.buffer();
        let (start, end) = self.input.selection().to_chars(&buffer);
        if let Err(e) = buffer.replace(start, end, text) {
            tracing::warn!("Typing at {start}..{end} failed: {e}");
            return;
        }
        let caret_char = start + text.chars().count();
        let caret = SelectionRange::from_chars(&buffer, caret_char, caret_char);

        self.input.set_text(&buffer.to_string());
        self.input.set_selection(caret);
        self.tracker.set_captured(&buffer, caret);
        self.history
            .debounced_push(snapshot(buffer.to_string(), caret), now);
    }

    /// Merges `text` at the captured selection with the given options.
    ///
    /// Pending typing is committed first. The result is recorded as its
    /// own restore point.
    pub fn insert_with(&mut self, text: &str, opts: InsertOptions) -> InsertOutcome {
        self.history.flush_pending();

        let buffer = self.input.buffer();
        let mut outcome = insert_at_cursor(&buffer, self.tracker.captured(), text, opts);
        if self.options.auto_capitalize {
            let window = self.options.capitalization_window;
            let start = outcome.inserted.start;
            let mut changed = fix_buffer_around(&mut outcome.buffer, start, window);
            if outcome.inserted.len() > window {
                let end = outcome.edit_position();
                changed += fix_buffer_around(&mut outcome.buffer, end, window);
            }
            if changed > 0 {
                tracing::debug!("Capitalized {changed} sentence start(s) around insertion");
            }
        }

        let content = outcome.buffer.to_string();
        self.input.set_text(&content);
        self.input.set_selection(outcome.selection);
        self.tracker.set_captured(&outcome.buffer, outcome.selection);
        self.history.push_state(snapshot(content, outcome.selection));
        outcome
    }

    /// Merges `text` at the captured selection. Returns the new selection.
    pub fn insert_at_cursor(
        &mut self,
        text: &str,
        select_after_insert: bool,
        replace_selection: bool,
    ) -> SelectionRange {
        let opts = InsertOptions {
            select_after_insert,
            replace_selection,
        };
        self.insert_with(text, opts).selection
    }

    /// Applies the output of an external operation.
    ///
    /// The state before the operation becomes a restore point if it is not
    /// one already, then the text is merged like any insertion.
    pub fn apply_operation_result(
        &mut self,
        kind: AiOperation,
        text: &str,
        opts: InsertOptions,
    ) -> InsertOutcome {
        self.history.flush_pending();
        let content = self.input.text();
        let recorded = self
            .history
            .current()
            .is_some_and(|entry| entry.content == content);
        if !recorded {
            let selection = self.input.selection();
            self.push_to_history(&content, selection.start, selection.end);
        }
        tracing::debug!("Applying {kind} result ({} chars)", text.chars().count());
        self.insert_with(text, opts)
    }

    /// Records a snapshot immediately, dropping any pending typing snapshot.
    pub fn push_to_history(&mut self, content: &str, sel_start: usize, sel_end: usize) -> bool {
        self.history.cancel_pending();
        self.history
            .push_state(HistoryEntry::new(content, sel_start, sel_end))
    }

    // ── History ──────────────────────────────────────────────────────

    /// Commits the typing snapshot once its window elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.history.poll(now)
    }

    pub fn undo(&mut self) -> Option<HistoryEntry> {
        self.history.flush_pending();
        let entry = self.history.undo()?;
        self.restore(&entry);
        Some(entry)
    }

    pub fn redo(&mut self) -> Option<HistoryEntry> {
        self.history.flush_pending();
        let entry = self.history.redo()?;
        self.restore(&entry);
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.history.has_pending()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn restore(&mut self, entry: &HistoryEntry) {
        self.input.set_text(&entry.content);
        let selection = SelectionRange::from(entry);
        self.input.set_selection(selection);
        let buffer = self.input.buffer();
        self.tracker.set_captured(&buffer, selection);
        self.history.finish_restore();
    }

    /// Ends the session and returns the final text.
    pub fn end(mut self) -> String {
        if self.history.cancel_pending() {
            tracing::debug!("Discarded pending snapshot at end of session {}", self.id);
        }
        self.input.text()
    }
}

impl<H: TextInputHandle> Drop for EditingSession<H> {
    fn drop(&mut self) {
        if self.history.cancel_pending() {
            tracing::trace!("Cancelled pending snapshot of session {}", self.id);
        }
    }
}
