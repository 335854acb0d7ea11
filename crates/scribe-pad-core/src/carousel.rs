/// Version carousel: named variants of one text, browsed one at a time.
///
/// The carousel always holds exactly one original version at index 0. Each
/// completed operation appends a derived version and selects it. Likes on
/// versions linked to persisted history go through a two-phase request so
/// the storage round-trip can happen outside the carousel.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::buffer::TextBuffer;
use crate::insert::{insert_at_cursor, InsertOptions, InsertOutcome};
use crate::operation::AiOperation;
use crate::selection::SelectionRange;
use crate::storage::{StorageService, StoredVersion};

/// Label given to the original version.
pub const ORIGINAL_LABEL: &str = "Original";

/// One variant of the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub id: Uuid,
    pub text: String,
    pub label: String,
    /// User-chosen title shown instead of the label.
    pub title: Option<String>,
    pub is_original: bool,
    pub is_liked: bool,
    pub timestamp: DateTime<Utc>,
    /// Persisted history record backing this version, if any.
    pub history_id: Option<String>,
}

impl Version {
    /// Creates the original version of a text.
    pub fn original(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            label: ORIGINAL_LABEL.to_string(),
            title: None,
            is_original: true,
            is_liked: false,
            timestamp: Utc::now(),
            history_id: None,
        }
    }

    /// Creates a non-original version.
    pub fn derived(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            is_original: false,
            ..Self::original(text)
        }
    }

    /// Links this version to a persisted history record.
    pub fn with_history_id(mut self, history_id: impl Into<String>) -> Self {
        self.history_id = Some(history_id.into());
        self
    }

    /// Title if set, otherwise the label.
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.label)
    }
}

/// A pending like flip that must be confirmed by storage.
///
/// Produced by [`VersionCarousel::toggle_like`] and consumed by
/// [`VersionCarousel::resolve_like`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an unresolved like request leaves the local flip unconfirmed"]
pub struct LikeRequest {
    pub version_id: Uuid,
    pub history_id: String,
    /// Liked flag before the local flip.
    pub previous: bool,
}

/// Ordered versions plus the index of the one on screen.
#[derive(Debug, Clone)]
pub struct VersionCarousel {
    versions: Vec<Version>,
    current: usize,
}

impl Default for VersionCarousel {
    fn default() -> Self {
        Self::new("")
    }
}

impl VersionCarousel {
    /// Creates a carousel holding only the original text.
    pub fn new(original_text: impl Into<String>) -> Self {
        Self {
            versions: vec![Version::original(original_text)],
            current: 0,
        }
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The version on screen.
    pub fn current(&self) -> &Version {
        &self.versions[self.current]
    }

    /// The original version.
    pub fn original(&self) -> &Version {
        &self.versions[0]
    }

    pub fn get(&self, id: Uuid) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == id)
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.versions.iter().position(|v| v.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut Version> {
        self.versions.iter_mut().find(|v| v.id == id)
    }

    /// Liked versions in carousel order.
    pub fn liked(&self) -> impl Iterator<Item = &Version> {
        self.versions.iter().filter(|v| v.is_liked)
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Selects the version at `index`. Out-of-range indices are ignored.
    pub fn navigate(&mut self, index: usize) -> bool {
        if index >= self.versions.len() {
            tracing::debug!(
                "Ignoring navigation to {index} (carousel has {} versions)",
                self.versions.len()
            );
            return false;
        }
        self.current = index;
        true
    }

    pub fn next(&mut self) -> bool {
        self.navigate(self.current + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.navigate(index),
            None => false,
        }
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Appends a version and selects it. The version is never original.
    pub fn append(&mut self, mut version: Version) -> Uuid {
        version.is_original = false;
        let id = version.id;
        self.versions.push(version);
        self.current = self.versions.len() - 1;
        id
    }

    /// Appends the output of an operation with an auto-generated label
    /// such as `Rewrite 2`, numbered by carousel position.
    pub fn append_result(&mut self, kind: AiOperation, text: impl Into<String>) -> Uuid {
        let label = format!("{} {}", kind.label(), self.versions.len() + 1);
        self.append(Version::derived(text, label))
    }

    /// Removes a version. The original cannot be deleted.
    ///
    /// The version just before the removed one becomes current, whichever
    /// version was current before.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let Some(idx) = self.position(id) else {
            tracing::debug!("Ignoring delete of unknown version {id}");
            return false;
        };
        if self.versions[idx].is_original {
            tracing::debug!("Refusing to delete the original version");
            return false;
        }

        self.versions.remove(idx);
        self.current = idx.saturating_sub(1).min(self.versions.len() - 1);
        true
    }

    /// Replaces the text of a version in place.
    pub fn edit(&mut self, id: Uuid, text: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(version) => {
                version.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Sets a version's title. A blank title clears it.
    pub fn edit_title(&mut self, id: Uuid, title: impl Into<String>) -> bool {
        let title = title.into();
        match self.get_mut(id) {
            Some(version) => {
                let trimmed = title.trim();
                version.title = (!trimmed.is_empty()).then(|| trimmed.to_string());
                true
            }
            None => false,
        }
    }

    /// Merges `text` into a version's text at `captured`, like a session
    /// insertion. Returns the outcome so the caller can restore the selection.
    pub fn insert_into(
        &mut self,
        id: Uuid,
        captured: SelectionRange,
        text: &str,
        opts: InsertOptions,
    ) -> Option<InsertOutcome> {
        let version = self.get_mut(id)?;
        let buffer = TextBuffer::from(version.text.as_str());
        let outcome = insert_at_cursor(&buffer, captured, text, opts);
        version.text = outcome.buffer.to_string();
        Some(outcome)
    }

    /// Drops every version and starts over with an empty original.
    pub fn clear_all(&mut self) {
        self.versions = vec![Version::original("")];
        self.current = 0;
    }

    // ── Likes ────────────────────────────────────────────────────────

    /// Flips the liked flag locally.
    ///
    /// Returns a request to confirm with storage when the version is linked
    /// to a history record; unlinked versions are settled immediately.
    pub fn toggle_like(&mut self, id: Uuid) -> Option<LikeRequest> {
        let version = self.get_mut(id)?;
        let previous = version.is_liked;
        version.is_liked = !previous;
        version.history_id.clone().map(|history_id| LikeRequest {
            version_id: id,
            history_id,
            previous,
        })
    }

    /// Reconciles a like request with the storage result.
    ///
    /// A stored record wins over the local flag. A missing record or a
    /// storage error reverts the local flip. Returns the settled flag, or
    /// `None` if the version was deleted meanwhile.
    pub fn resolve_like(
        &mut self,
        request: LikeRequest,
        result: anyhow::Result<Option<StoredVersion>>,
    ) -> Option<bool> {
        let Some(version) = self.get_mut(request.version_id) else {
            tracing::debug!(
                "Version {} vanished before its like was confirmed",
                request.version_id
            );
            return None;
        };
        match result {
            Ok(Some(stored)) => version.is_liked = stored.is_liked,
            Ok(None) => {
                tracing::warn!(
                    "History record {} not found, reverting like",
                    request.history_id
                );
                version.is_liked = request.previous;
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to toggle like for history record {}: {e:#}",
                    request.history_id
                );
                version.is_liked = request.previous;
            }
        }
        Some(version.is_liked)
    }

    /// Toggles a like and settles it against `storage` in one step.
    pub fn toggle_like_with(&mut self, id: Uuid, storage: &dyn StorageService) -> Option<bool> {
        match self.toggle_like(id) {
            Some(request) => {
                let result = storage.toggle_history_liked(&request.history_id);
                self.resolve_like(request, result)
            }
            None => self.get(id).map(|v| v.is_liked),
        }
    }
}
