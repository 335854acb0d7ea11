// Re-exports from scribe-pad-mod-history and conversion traits.
// Bridges the history crate's snapshot type with the core's SelectionRange.
pub use scribe_pad_mod_history::config::generate_session_id;
pub use scribe_pad_mod_history::{HistoryConfig, HistoryEntry, HistoryMode, HistoryStack};

use crate::selection::SelectionRange;

impl From<&HistoryEntry> for SelectionRange {
    fn from(entry: &HistoryEntry) -> Self {
        SelectionRange::new(entry.selection_start, entry.selection_end)
    }
}

/// Builds a snapshot of `content` with `selection`.
pub fn snapshot(content: impl Into<String>, selection: SelectionRange) -> HistoryEntry {
    HistoryEntry::new(content, selection.start, selection.end)
}
