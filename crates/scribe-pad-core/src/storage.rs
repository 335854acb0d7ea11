/// The persistence collaborator consumed by the version carousel.
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A persisted version record as returned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredVersion {
    /// Identifier of the persisted record.
    pub history_id: String,
    /// Stored text of the record.
    pub text: String,
    /// Stored like flag after the toggle.
    pub is_liked: bool,
}

/// Storage for persisted operation history.
///
/// Implementations perform the actual I/O; the carousel only calls this
/// after a local like flip and reconciles with whatever comes back.
pub trait StorageService {
    /// Flips the liked flag of a persisted record.
    ///
    /// Returns the updated record, or `None` when no record has that id.
    fn toggle_history_liked(&self, history_id: &str) -> Result<Option<StoredVersion>>;
}
