/// Sentence-initial capitalization repair around an edit.
///
/// Only a window around the edit position is examined. A letter starts a
/// sentence when it is the first letter of the document (leading whitespace
/// and opening quotes allowed) or when the nearest non-whitespace character
/// before it is `.`, `!` or `?`, possibly followed by closing quotes, with
/// at least one whitespace character in between.
///
/// Known limitation: abbreviations and other dotted tokens followed by a
/// space (`e.g. foo`, `Mr. smith`) are treated as sentence ends. Decimals
/// (`3.14`) are safe because no whitespace follows the dot.
use crate::buffer::TextBuffer;

/// Default number of UTF-16 units examined on each side of the edit.
pub const DEFAULT_WINDOW_RADIUS: usize = 500;

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | '\u{201D}' | '\u{2019}' | ')' | ']' | '\u{BB}')
}

fn is_opening(c: char) -> bool {
    matches!(c, '"' | '\'' | '\u{201C}' | '\u{2018}' | '(' | '[' | '\u{AB}')
}

/// Uppercase form of `c` when it is a single char of the same UTF-16 width.
///
/// Anything else (`ß` → `SS`) is left alone so offsets stay valid.
fn single_upper(c: char) -> Option<char> {
    let mut upper = c.to_uppercase();
    let u = upper.next()?;
    if upper.next().is_some() || u == c || u.len_utf16() != c.len_utf16() {
        return None;
    }
    Some(u)
}

/// Whether `window[idx]` begins a sentence. Lookback stops at the window
/// start, which only counts as a sentence start when it is the document start.
fn starts_sentence(window: &[char], idx: usize, window_at_doc_start: bool) -> bool {
    let mut j = idx;
    while j > 0 && is_opening(window[j - 1]) {
        j -= 1;
    }
    let before_space = j;
    while j > 0 && window[j - 1].is_whitespace() {
        j -= 1;
    }
    if j == 0 {
        return window_at_doc_start;
    }
    if j == before_space {
        return false;
    }
    while j > 0 && is_closing(window[j - 1]) {
        j -= 1;
    }
    j > 0 && is_terminator(window[j - 1])
}

/// Repairs capitalization in place. Returns the number of letters changed.
///
/// `edit_position` and `window_radius` are in UTF-16 units; both are
/// clamped, so an out-of-range position simply scans the buffer tail.
pub fn fix_buffer_around(
    buffer: &mut TextBuffer,
    edit_position: usize,
    window_radius: usize,
) -> usize {
    let len = buffer.len_utf16();
    let pos = edit_position.min(len);
    let lo = buffer.utf16_to_char(pos.saturating_sub(window_radius));
    let hi = buffer.utf16_to_char(pos.saturating_add(window_radius).min(len));
    if lo >= hi {
        return 0;
    }

    let window: Vec<char> = buffer.rope().slice(lo..hi).chars().collect();
    let fixes: Vec<(usize, char)> = window
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_lowercase())
        .filter(|(i, _)| starts_sentence(&window, *i, lo == 0))
        .filter_map(|(i, c)| single_upper(*c).map(|u| (lo + i, u)))
        .collect();

    let mut changed = 0;
    for (idx, upper) in fixes {
        let mut tmp = [0u8; 4];
        match buffer.replace(idx, idx + 1, upper.encode_utf8(&mut tmp)) {
            Ok(()) => changed += 1,
            Err(e) => tracing::debug!("Skipping capitalization at {idx}: {e}"),
        }
    }
    changed
}

/// Returns `text` with sentence starts near `edit_position` capitalized.
pub fn fix_around(text: &str, edit_position: usize, window_radius: usize) -> String {
    let mut buffer = TextBuffer::from(text);
    if fix_buffer_around(&mut buffer, edit_position, window_radius) == 0 {
        return text.to_string();
    }
    buffer.to_string()
}
