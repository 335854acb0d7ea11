/// Smart insertion of externally produced text at the captured selection.
///
/// AI results and speech fragments both arrive here. The inserted text is
/// trimmed where it repeats words already present on either side of the
/// seam, and a single space is added where an insertion would otherwise glue
/// two words together. Existing buffer content is never trimmed.
use crate::buffer::TextBuffer;
use crate::selection::SelectionRange;
use crate::words::{leading_words, trailing_words};

/// Most words compared on each side of a seam.
pub const MAX_SEAM_WORDS: usize = 8;

/// Chars of context read on each side of the seam.
const SEAM_CONTEXT_CHARS: usize = 512;

/// How an insertion treats the captured selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertOptions {
    /// Select the inserted text instead of placing a caret after it.
    pub select_after_insert: bool,
    /// Replace a non-empty captured selection instead of inserting at its end.
    pub replace_selection: bool,
}

/// Result of [`insert_at_cursor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    /// The merged buffer.
    pub buffer: TextBuffer,
    /// Selection to apply after the insertion.
    pub selection: SelectionRange,
    /// Span of the inserted text, excluding synthetic spaces.
    pub inserted: SelectionRange,
}

impl InsertOutcome {
    /// Position to run capitalization repair around.
    pub fn edit_position(&self) -> usize {
        self.inserted.end
    }
}

/// Drops the leading words of `text` that repeat the trailing words of
/// `before`. The longest match wins.
fn drop_leading_overlap(before: &[char], text: &mut Vec<char>) -> bool {
    let tail = trailing_words(before, MAX_SEAM_WORDS);
    let lead = leading_words(text, MAX_SEAM_WORDS);
    let max_k = tail.len().min(lead.len());

    for k in (1..=max_k).rev() {
        let seam = &tail[tail.len() - k..];
        let head = &lead[..k];
        let matches = seam
            .iter()
            .zip(head)
            .all(|(a, b)| a.folded(before) == b.folded(text));
        if matches {
            let mut cut = head[k - 1].end;
            while cut < text.len() && text[cut].is_whitespace() {
                cut += 1;
            }
            text.drain(..cut);
            return true;
        }
    }
    false
}

/// Drops the trailing words of `text` that repeat the leading words of
/// `after`. The longest match wins.
fn drop_trailing_overlap(text: &mut Vec<char>, after: &[char]) -> bool {
    let tail = trailing_words(text, MAX_SEAM_WORDS);
    let lead = leading_words(after, MAX_SEAM_WORDS);
    let max_k = tail.len().min(lead.len());

    for k in (1..=max_k).rev() {
        let seam = &tail[tail.len() - k..];
        let head = &lead[..k];
        let matches = seam
            .iter()
            .zip(head)
            .all(|(a, b)| a.folded(text) == b.folded(after));
        if matches {
            let mut keep = seam[0].start;
            while keep > 0 && text[keep - 1].is_whitespace() {
                keep -= 1;
            }
            text.truncate(keep);
            return true;
        }
    }
    false
}

/// Merges `text` into `buffer` at the captured selection.
///
/// With `replace_selection` and a non-empty selection the selection is
/// replaced verbatim apart from overlap trimming. Otherwise the text goes
/// in at the caret (the selection end) with one space added at any seam
/// lacking whitespace. Never fails: the selection is clamped first.
pub fn insert_at_cursor(
    buffer: &TextBuffer,
    captured: SelectionRange,
    text: &str,
    opts: InsertOptions,
) -> InsertOutcome {
    let captured = captured.clamp(buffer);
    let replacing = opts.replace_selection && !captured.is_caret();
    let (start, end) = if replacing {
        captured.to_chars(buffer)
    } else {
        let caret = buffer.utf16_to_char(captured.end);
        (caret, caret)
    };

    let rope = buffer.rope();
    let before: Vec<char> = rope
        .slice(start.saturating_sub(SEAM_CONTEXT_CHARS)..start)
        .chars()
        .collect();
    let after: Vec<char> = rope
        .slice(end..(end + SEAM_CONTEXT_CHARS).min(buffer.len_chars()))
        .chars()
        .collect();
    let mut chars: Vec<char> = text.chars().collect();

    // A caret inside a word has no word boundary to compare against.
    let splits_word = before.last().is_some_and(|c| c.is_alphanumeric())
        && after.first().is_some_and(|c| c.is_alphanumeric());
    if !splits_word {
        if drop_leading_overlap(&before, &mut chars) {
            tracing::debug!("Dropped duplicated leading words at insertion seam");
        }
        if drop_trailing_overlap(&mut chars, &after) {
            tracing::debug!("Dropped duplicated trailing words at insertion seam");
        }
    }

    let mut prefix = "";
    let mut suffix = "";
    if !replacing && !chars.is_empty() {
        let glued_before = before.last().is_some_and(|c| !c.is_whitespace());
        let glued_after = after.first().is_some_and(|c| !c.is_whitespace());
        if glued_before && chars.first().is_some_and(|c| !c.is_whitespace()) {
            prefix = " ";
        }
        if glued_after && chars.last().is_some_and(|c| !c.is_whitespace()) {
            suffix = " ";
        }
    }

    let body: String = chars.iter().collect();
    let mut merged = buffer.clone();
    if let Err(e) = merged.replace(start, end, &format!("{prefix}{body}{suffix}")) {
        tracing::warn!("Insertion at {start}..{end} failed, leaving buffer unchanged: {e}");
        return InsertOutcome {
            buffer: buffer.clone(),
            selection: captured,
            inserted: SelectionRange::caret(captured.end),
        };
    }

    let inserted_start = start + prefix.chars().count();
    let inserted_end = inserted_start + chars.len();
    let inserted = SelectionRange::from_chars(&merged, inserted_start, inserted_end);
    let selection = if opts.select_after_insert {
        inserted
    } else {
        SelectionRange::caret(inserted.end)
    };

    InsertOutcome {
        buffer: merged,
        selection,
        inserted,
    }
}
