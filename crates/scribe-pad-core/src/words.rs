// Word classification and word-run scanning shared by selection expansion
// and seam overlap suppression.

/// Characters that count as word characters on their own.
fn is_word_core(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Punctuation that belongs to a word only between two word characters
/// (`don't`, `rock’n’roll`, `well-known`).
fn is_internal_punct(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | '-')
}

/// Whether `c` is a word character given its neighbours.
pub(crate) fn word_char_at(prev: Option<char>, c: char, next: Option<char>) -> bool {
    if is_word_core(c) {
        return true;
    }
    is_internal_punct(c) && prev.is_some_and(is_word_core) && next.is_some_and(is_word_core)
}

/// Whether `chars[idx]` is a word character.
pub(crate) fn is_word_in(chars: &[char], idx: usize) -> bool {
    let Some(&c) = chars.get(idx) else {
        return false;
    };
    let prev = idx.checked_sub(1).and_then(|i| chars.get(i)).copied();
    word_char_at(prev, c, chars.get(idx + 1).copied())
}

/// A word run as a half-open char range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WordSpan {
    pub start: usize,
    pub end: usize,
}

impl WordSpan {
    /// Lowercased word text, used for case-insensitive comparison.
    pub fn folded(&self, chars: &[char]) -> String {
        chars[self.start..self.end]
            .iter()
            .flat_map(|c| c.to_lowercase())
            .collect()
    }
}

/// Leading whitespace-separated words of `chars`, at most `max`.
///
/// Scanning stops at the first character that is neither whitespace nor part
/// of a word, so `"the, cat"` yields only `the`.
pub(crate) fn leading_words(chars: &[char], max: usize) -> Vec<WordSpan> {
    let mut words = Vec::new();
    let mut i = 0;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    while words.len() < max && i < chars.len() && is_word_in(chars, i) {
        let start = i;
        while i < chars.len() && is_word_in(chars, i) {
            i += 1;
        }
        words.push(WordSpan { start, end: i });
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
    }
    words
}

/// Trailing whitespace-separated words of `chars`, at most `max`, returned in
/// document order.
pub(crate) fn trailing_words(chars: &[char], max: usize) -> Vec<WordSpan> {
    let mut words = Vec::new();
    let mut i = chars.len();
    while i > 0 && chars[i - 1].is_whitespace() {
        i -= 1;
    }
    while words.len() < max && i > 0 && is_word_in(chars, i - 1) {
        let end = i;
        while i > 0 && is_word_in(chars, i - 1) {
            i -= 1;
        }
        words.push(WordSpan { start: i, end });
        while i > 0 && chars[i - 1].is_whitespace() {
            i -= 1;
        }
    }
    words.reverse();
    words
}
