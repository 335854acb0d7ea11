/// Selection model and selection capture for the shared text input.
///
/// Offsets in a [`SelectionRange`] are UTF-16 code units, the unit text
/// inputs report. Word and sentence scanning happens on chars and is
/// converted at the edges.
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::buffer::TextBuffer;
use crate::words::word_char_at;

/// How long a sentence-boundary hint stays visible.
pub const DEFAULT_HINT_DURATION: Duration = Duration::from_millis(500);

/// A caret (`start == end`) or a selection (`start < end`) in UTF-16 units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    /// Creates a range, ordering the bounds.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Creates a caret at `pos`.
    pub fn caret(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Returns true for a zero-width range.
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Width in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for a zero-width range.
    pub fn is_empty(&self) -> bool {
        self.is_caret()
    }

    /// Clamps both ends into the buffer and snaps them to char boundaries.
    pub fn clamp(&self, buffer: &TextBuffer) -> Self {
        Self::new(buffer.clamp_utf16(self.start), buffer.clamp_utf16(self.end))
    }

    /// Converts to a char-index range, clamping into the buffer.
    pub fn to_chars(&self, buffer: &TextBuffer) -> (usize, usize) {
        let start = buffer.utf16_to_char(self.start);
        let end = buffer.utf16_to_char(self.end);
        (start.min(end), start.max(end))
    }

    /// Builds a range from char indices.
    pub fn from_chars(buffer: &TextBuffer, start: usize, end: usize) -> Self {
        Self::new(buffer.char_to_utf16(start), buffer.char_to_utf16(end))
    }
}

/// Whether a caret capture may show a sentence-boundary hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    /// Record the range only.
    #[default]
    Plain,
    /// A caret indicator is on screen; carets inside a sentence produce a hint.
    CaretIndicator,
}

/// Transient, advisory highlight of the sentence boundary nearest the caret.
///
/// Never changes the committed caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceHint {
    /// The boundary offset to highlight (UTF-16).
    pub boundary: usize,
    /// The sentence enclosing the caret (UTF-16).
    pub sentence: SelectionRange,
    /// When the hint stops being shown.
    pub expires_at: Instant,
}

impl SentenceHint {
    /// Whether the hint should still be presented at `now`.
    pub fn is_active(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

type SelectionListener = Box<dyn FnMut(SelectionRange)>;

/// Tracks the captured selection of a text input.
///
/// The captured range survives focus loss so toolbar actions can still act
/// on what the user selected before clicking.
pub struct SelectionTracker {
    /// Last known range, caret or selection.
    captured: SelectionRange,
    /// Last selection announced to listeners.
    notified: Option<SelectionRange>,
    /// Current sentence-boundary hint, if one was produced.
    hint: Option<SentenceHint>,
    hint_duration: Duration,
    listeners: Vec<SelectionListener>,
}

impl std::fmt::Debug for SelectionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionTracker")
            .field("captured", &self.captured)
            .field("notified", &self.notified)
            .field("hint", &self.hint)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTracker {
    /// Creates a tracker with a caret at 0.
    pub fn new() -> Self {
        Self::with_hint_duration(DEFAULT_HINT_DURATION)
    }

    /// Creates a tracker with a custom hint duration.
    pub fn with_hint_duration(hint_duration: Duration) -> Self {
        Self {
            captured: SelectionRange::default(),
            notified: None,
            hint: None,
            hint_duration,
            listeners: Vec::new(),
        }
    }

    /// Registers a callback invoked whenever a non-empty selection is announced.
    pub fn on_selection(&mut self, listener: impl FnMut(SelectionRange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// The last captured range.
    pub fn captured(&self) -> SelectionRange {
        self.captured
    }

    /// The last selection announced to listeners.
    pub fn notified(&self) -> Option<SelectionRange> {
        self.notified
    }

    /// Overwrites the captured range without notifying listeners.
    pub fn set_captured(&mut self, buffer: &TextBuffer, range: SelectionRange) {
        self.captured = range.clamp(buffer);
    }

    /// Captures a raw range reported by the input.
    pub fn capture(
        &mut self,
        buffer: &TextBuffer,
        raw_start: usize,
        raw_end: usize,
        mode: CaptureMode,
    ) -> SelectionRange {
        self.capture_at(buffer, raw_start, raw_end, mode, Instant::now())
    }

    /// Captures a raw range, using `now` to time any sentence hint.
    ///
    /// A caret is recorded as-is and not announced. A selection is expanded
    /// to whole words, recorded and announced.
    pub fn capture_at(
        &mut self,
        buffer: &TextBuffer,
        raw_start: usize,
        raw_end: usize,
        mode: CaptureMode,
        now: Instant,
    ) -> SelectionRange {
        let range = SelectionRange::new(raw_start, raw_end).clamp(buffer);

        if range.is_caret() {
            self.captured = range;
            self.hint = match mode {
                CaptureMode::CaretIndicator => self.sentence_hint_for(buffer, range.start, now),
                CaptureMode::Plain => None,
            };
            return range;
        }

        let expanded = expand_to_words(buffer, range);
        self.captured = expanded;
        self.hint = None;
        self.notify(expanded);
        expanded
    }

    /// Re-captures on focus loss.
    ///
    /// A caret never replaces a captured selection here, and listeners only
    /// hear about a selection that differs from the one they already have.
    pub fn blur(&mut self, buffer: &TextBuffer, raw_start: usize, raw_end: usize) -> SelectionRange {
        let range = SelectionRange::new(raw_start, raw_end).clamp(buffer);
        self.hint = None;

        if range.is_caret() {
            if self.captured.is_caret() {
                self.captured = range;
            }
            return self.captured;
        }

        let expanded = expand_to_words(buffer, range);
        self.captured = expanded;
        if self.notified != Some(expanded) {
            self.notify(expanded);
        }
        expanded
    }

    /// The sentence hint, if still active at `now`.
    pub fn active_hint(&self, now: Instant) -> Option<SentenceHint> {
        self.hint.filter(|h| h.is_active(now))
    }

    /// Re-clamps stored ranges after the buffer changed underneath them.
    pub fn clamp_to(&mut self, buffer: &TextBuffer) {
        self.captured = self.captured.clamp(buffer);
        self.notified = self.notified.map(|r| r.clamp(buffer));
        self.hint = None;
    }

    fn notify(&mut self, range: SelectionRange) {
        self.notified = Some(range);
        for listener in &mut self.listeners {
            listener(range);
        }
    }

    fn sentence_hint_for(
        &self,
        buffer: &TextBuffer,
        caret_utf16: usize,
        now: Instant,
    ) -> Option<SentenceHint> {
        let caret = buffer.utf16_to_char(caret_utf16);
        if is_sentence_boundary(buffer, caret) {
            return None;
        }
        let (start, end) = sentence_bounds(buffer, caret);
        let boundary = if caret - start <= end - caret { start } else { end };
        Some(SentenceHint {
            boundary: buffer.char_to_utf16(boundary),
            sentence: SelectionRange::from_chars(buffer, start, end),
            expires_at: now + self.hint_duration,
        })
    }
}

/// Whether the char at `idx` is part of a word.
fn is_word_at(buffer: &TextBuffer, idx: usize) -> bool {
    let Some(c) = buffer.get_char(idx) else {
        return false;
    };
    let prev = idx.checked_sub(1).and_then(|i| buffer.get_char(i));
    word_char_at(prev, c, buffer.get_char(idx + 1))
}

/// Grows a selection to word boundaries.
///
/// `start` walks back while the preceding char is a word char and `end`
/// walks forward while the following char is one, so a range touching a
/// word on either side takes in the whole word.
pub fn expand_to_words(buffer: &TextBuffer, range: SelectionRange) -> SelectionRange {
    let (mut start, mut end) = range.to_chars(buffer);
    let len = buffer.len_chars();

    while start > 0 && is_word_at(buffer, start - 1) {
        start -= 1;
    }
    while end < len && is_word_at(buffer, end) {
        end += 1;
    }
    SelectionRange::from_chars(buffer, start, end)
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | '\u{201D}' | '\u{2019}' | ')' | ']' | '\u{BB}')
}

/// If `idx` holds a sentence terminator that ends a sentence, returns the
/// char index just past it and any closing quotes.
fn terminator_end(buffer: &TextBuffer, idx: usize) -> Option<usize> {
    if !buffer.get_char(idx).is_some_and(is_terminator) {
        return None;
    }
    let mut end = idx + 1;
    while buffer.get_char(end).is_some_and(is_closing) {
        end += 1;
    }
    match buffer.get_char(end) {
        None => Some(end),
        Some(c) if c.is_whitespace() => Some(end),
        Some(_) => None,
    }
}

/// Whether the caret (char index) sits on a sentence boundary: document
/// edges, or right after a terminator with only whitespace in between.
pub fn is_sentence_boundary(buffer: &TextBuffer, caret: usize) -> bool {
    let len = buffer.len_chars();
    if caret == 0 || caret >= len {
        return true;
    }
    let mut i = caret;
    while i > 0 && buffer.get_char(i - 1).is_some_and(char::is_whitespace) {
        i -= 1;
    }
    if i == 0 {
        return true;
    }
    while i > 0 && buffer.get_char(i - 1).is_some_and(is_closing) {
        i -= 1;
    }
    i > 0 && buffer.get_char(i - 1).is_some_and(is_terminator)
}

/// Char bounds of the sentence containing `caret`.
///
/// The start skips the whitespace after the previous terminator; the end
/// includes the terminator and its closing quotes.
pub fn sentence_bounds(buffer: &TextBuffer, caret: usize) -> (usize, usize) {
    let len = buffer.len_chars();
    let caret = caret.min(len);

    let mut start = 0;
    let mut i = caret;
    while i > 0 {
        if let Some(end) = terminator_end(buffer, i - 1) {
            if end <= caret {
                start = end;
                break;
            }
        }
        i -= 1;
    }
    while start < caret && buffer.get_char(start).is_some_and(char::is_whitespace) {
        start += 1;
    }

    let mut end = len;
    for j in caret..len {
        if let Some(e) = terminator_end(buffer, j) {
            end = e;
            break;
        }
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn buf(s: &str) -> TextBuffer {
        TextBuffer::from(s)
    }

    // ── SelectionRange ───────────────────────────────────────────────

    #[test]
    fn test_range_orders_bounds() {
        let r = SelectionRange::new(9, 4);
        assert_eq!(r, SelectionRange { start: 4, end: 9 });
        assert_eq!(r.len(), 5);
        assert!(!r.is_caret());
    }

    #[test]
    fn test_range_clamps_to_buffer() {
        let b = buf("hello");
        assert_eq!(SelectionRange::new(3, 50).clamp(&b), SelectionRange::new(3, 5));
        assert_eq!(SelectionRange::caret(99).clamp(&b), SelectionRange::caret(5));
    }

    // ── Word expansion ───────────────────────────────────────────────

    #[test]
    fn test_selection_on_word_boundaries_is_unchanged() {
        let b = buf("the quick fox");
        let mut tracker = SelectionTracker::new();
        let r = tracker.capture(&b, 4, 9, CaptureMode::Plain);
        assert_eq!(r, SelectionRange::new(4, 9));
    }

    #[test]
    fn test_selection_inside_word_expands() {
        let b = buf("the quick fox");
        let mut tracker = SelectionTracker::new();
        let r = tracker.capture(&b, 5, 8, CaptureMode::Plain);
        assert_eq!(r, SelectionRange::new(4, 9));
        assert_eq!(tracker.captured(), SelectionRange::new(4, 9));
    }

    #[test]
    fn test_start_touching_previous_word_takes_it_in() {
        let b = buf("the quick fox");
        let r = expand_to_words(&b, SelectionRange::new(3, 9));
        assert_eq!(r, SelectionRange::new(0, 9));
    }

    #[test]
    fn test_end_touching_next_word_takes_it_in() {
        let b = buf("the quick fox");
        let r = expand_to_words(&b, SelectionRange::new(4, 10));
        assert_eq!(r, SelectionRange::new(4, 13));
    }

    #[test]
    fn test_expansion_across_multiple_words() {
        let b = buf("the quick fox");
        let r = expand_to_words(&b, SelectionRange::new(1, 11));
        assert_eq!(r, SelectionRange::new(0, 13));
    }

    #[test]
    fn test_expansion_keeps_contractions_whole() {
        let b = buf("I don't know");
        let r = expand_to_words(&b, SelectionRange::new(3, 4));
        assert_eq!(r, SelectionRange::new(2, 7));
    }

    #[test]
    fn test_expansion_with_surrogate_pairs() {
        // "🌍 abc": the emoji takes two UTF-16 units.
        let b = buf("🌍 abc");
        let r = expand_to_words(&b, SelectionRange::new(4, 5));
        assert_eq!(r, SelectionRange::new(3, 6));
    }

    // ── Notification ─────────────────────────────────────────────────

    fn recorder(tracker: &mut SelectionTracker) -> Rc<RefCell<Vec<SelectionRange>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        tracker.on_selection(move |r| sink.borrow_mut().push(r));
        seen
    }

    #[test]
    fn test_caret_capture_does_not_notify() {
        let b = buf("the quick fox");
        let mut tracker = SelectionTracker::new();
        let seen = recorder(&mut tracker);

        tracker.capture(&b, 5, 8, CaptureMode::Plain);
        tracker.capture(&b, 2, 2, CaptureMode::Plain);

        assert_eq!(seen.borrow().as_slice(), &[SelectionRange::new(4, 9)]);
        assert_eq!(tracker.captured(), SelectionRange::caret(2));
        assert_eq!(tracker.notified(), Some(SelectionRange::new(4, 9)));
    }

    #[test]
    fn test_blur_with_caret_keeps_selection() {
        let b = buf("the quick fox");
        let mut tracker = SelectionTracker::new();
        let seen = recorder(&mut tracker);
        tracker.capture(&b, 4, 9, CaptureMode::Plain);

        let r = tracker.blur(&b, 9, 9);
        assert_eq!(r, SelectionRange::new(4, 9));
        assert_eq!(tracker.captured(), SelectionRange::new(4, 9));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_blur_with_same_selection_does_not_renotify() {
        let b = buf("the quick fox");
        let mut tracker = SelectionTracker::new();
        let seen = recorder(&mut tracker);
        tracker.capture(&b, 4, 9, CaptureMode::Plain);
        tracker.blur(&b, 5, 9);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_blur_with_new_selection_notifies() {
        let b = buf("the quick fox");
        let mut tracker = SelectionTracker::new();
        let seen = recorder(&mut tracker);
        tracker.capture(&b, 4, 9, CaptureMode::Plain);
        tracker.blur(&b, 10, 13);
        assert_eq!(
            seen.borrow().as_slice(),
            &[SelectionRange::new(4, 9), SelectionRange::new(10, 13)]
        );
    }

    #[test]
    fn test_blur_with_caret_after_caret_updates_caret() {
        let b = buf("the quick fox");
        let mut tracker = SelectionTracker::new();
        tracker.capture(&b, 2, 2, CaptureMode::Plain);
        assert_eq!(tracker.blur(&b, 7, 7), SelectionRange::caret(7));
    }

    // ── Sentence hint ────────────────────────────────────────────────

    #[test]
    fn test_sentence_boundary_detection() {
        let b = buf("One two. Three four.");
        assert!(is_sentence_boundary(&b, 0));
        assert!(is_sentence_boundary(&b, 8)); // right after "."
        assert!(is_sentence_boundary(&b, 9)); // after ". "
        assert!(!is_sentence_boundary(&b, 5));
        assert!(is_sentence_boundary(&b, 20));
    }

    #[test]
    fn test_sentence_bounds() {
        let b = buf("One two. Three four. Five");
        assert_eq!(sentence_bounds(&b, 11), (9, 20));
        assert_eq!(sentence_bounds(&b, 2), (0, 8));
        assert_eq!(sentence_bounds(&b, 23), (21, 25));
    }

    #[test]
    fn test_decimal_point_is_not_a_terminator() {
        let b = buf("Pi is 3.14 roughly.");
        assert_eq!(sentence_bounds(&b, 12), (0, 19));
    }

    #[test]
    fn test_caret_inside_sentence_produces_transient_hint() {
        let b = buf("One two. Three four.");
        let now = Instant::now();
        let mut tracker = SelectionTracker::new();
        let r = tracker.capture_at(&b, 11, 11, CaptureMode::CaretIndicator, now);

        // The committed caret never moves.
        assert_eq!(r, SelectionRange::caret(11));
        assert_eq!(tracker.captured(), SelectionRange::caret(11));

        let hint = tracker.active_hint(now).expect("hint");
        assert_eq!(hint.boundary, 9);
        assert_eq!(hint.sentence, SelectionRange::new(9, 20));
        assert!(tracker
            .active_hint(now + Duration::from_millis(499))
            .is_some());
        assert!(tracker
            .active_hint(now + Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn test_hint_prefers_nearer_end() {
        let b = buf("One two. Three four.");
        let now = Instant::now();
        let mut tracker = SelectionTracker::new();
        tracker.capture_at(&b, 18, 18, CaptureMode::CaretIndicator, now);
        assert_eq!(tracker.active_hint(now).map(|h| h.boundary), Some(20));
    }

    #[test]
    fn test_no_hint_on_boundary_or_plain_mode() {
        let b = buf("One two. Three four.");
        let now = Instant::now();
        let mut tracker = SelectionTracker::new();
        tracker.capture_at(&b, 9, 9, CaptureMode::CaretIndicator, now);
        assert!(tracker.active_hint(now).is_none());

        tracker.capture_at(&b, 11, 11, CaptureMode::Plain, now);
        assert!(tracker.active_hint(now).is_none());
    }

    #[test]
    fn test_clamp_to_after_shrink() {
        let mut tracker = SelectionTracker::new();
        tracker.capture(&buf("the quick fox"), 4, 13, CaptureMode::Plain);
        let shorter = buf("the");
        tracker.clamp_to(&shorter);
        assert_eq!(tracker.captured(), SelectionRange::caret(3));
        assert_eq!(tracker.notified(), Some(SelectionRange::caret(3)));
    }

    proptest! {
        #[test]
        fn prop_clamped_range_is_within_buffer(
            text in "\\PC{0,40}",
            a in 0usize..100,
            b in 0usize..100,
        ) {
            let buffer = buf(&text);
            let r = SelectionRange::new(a, b).clamp(&buffer);
            prop_assert!(r.start <= r.end);
            prop_assert!(r.end <= buffer.len_utf16());
            prop_assert_eq!(buffer.clamp_utf16(r.start), r.start);
            prop_assert_eq!(buffer.clamp_utf16(r.end), r.end);
        }

        #[test]
        fn prop_expansion_contains_selection(
            text in "[a-z' .-]{0,40}",
            a in 0usize..50,
            b in 0usize..50,
        ) {
            let buffer = buf(&text);
            let r = SelectionRange::new(a, b).clamp(&buffer);
            let expanded = expand_to_words(&buffer, r);
            prop_assert!(expanded.start <= r.start);
            prop_assert!(expanded.end >= r.end);
            prop_assert!(expanded.end <= buffer.len_utf16());
        }
    }
}
