/// Snapshot type stored by the history stack.
use serde::{Deserialize, Serialize};

/// A restore point: buffer content plus the selection at that moment.
///
/// Offsets are UTF-16 code units, matching the selection model of the
/// editing core. Entries are immutable once pushed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Full buffer content.
    pub content: String,
    /// Selection start (UTF-16 code units).
    pub selection_start: usize,
    /// Selection end (UTF-16 code units).
    pub selection_end: usize,
}

impl HistoryEntry {
    /// Creates an entry, ordering the selection bounds.
    pub fn new(content: impl Into<String>, selection_start: usize, selection_end: usize) -> Self {
        Self {
            content: content.into(),
            selection_start: selection_start.min(selection_end),
            selection_end: selection_start.max(selection_end),
        }
    }

    /// Creates an entry with a caret at `pos`.
    pub fn with_caret(content: impl Into<String>, pos: usize) -> Self {
        Self::new(content, pos, pos)
    }

    /// Returns true if the snapshot recorded a caret rather than a selection.
    pub fn is_caret(&self) -> bool {
        self.selection_start == self.selection_end
    }
}
