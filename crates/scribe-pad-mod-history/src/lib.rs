/// Snapshot-based undo/redo history for editing sessions.
///
/// Provides a `HistoryStack` holding bounded `past`/`future` sequences of
/// `(content, selection)` snapshots, an explicit restore mode that keeps
/// restorations from being re-recorded, and a deadline-driven debounced push
/// for free typing.
pub mod config;
pub mod debounce;
pub mod entry;
pub mod manager;

pub use config::HistoryConfig;
pub use debounce::PendingPush;
pub use entry::HistoryEntry;
pub use manager::{HistoryMode, HistoryStack};
