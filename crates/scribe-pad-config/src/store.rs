/// Operation history persistence: every AI/speech result, with its input,
/// output and like flag.
///
/// Records are stored in a single redb table keyed by record id, with the
/// record itself encoded as bincode.
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use scribe_pad_core::{AiOperation, StorageService, StoredVersion, Version};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operation history table: record id → bincode(`HistoryRecord`).
const OPERATION_HISTORY: TableDefinition<&str, &[u8]> = TableDefinition::new("operation_history");

/// One persisted operation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub operation: AiOperation,
    /// Text the operation was given.
    pub input: String,
    /// Text the operation produced.
    pub output: String,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Builds a carousel version linked back to this record.
    pub fn to_version(&self) -> Version {
        let mut version =
            Version::derived(self.output.clone(), self.operation.label()).with_history_id(&self.id);
        version.is_liked = self.liked;
        version.timestamp = self.created_at;
        version
    }
}

/// Persistence layer for operation history, backed by redb.
pub struct OperationHistoryStore {
    db: Database,
}

impl std::fmt::Debug for OperationHistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationHistoryStore").finish()
    }
}

impl OperationHistoryStore {
    /// Opens or creates the history database at `path`.
    ///
    /// Missing parent directories are created.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }
        let db = Database::create(path)
            .with_context(|| format!("Failed to open history database: {}", path.display()))?;

        // Ensure the table exists
        let write_txn = db
            .begin_write()
            .context("Failed to begin initial history write transaction")?;
        {
            let _ = write_txn
                .open_table(OPERATION_HISTORY)
                .context("Failed to create operation_history table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial history transaction")?;

        Ok(Self { db })
    }

    fn write_record(&self, record: &HistoryRecord) -> Result<()> {
        let bytes = bincode::serialize(record).context("Failed to serialize history record")?;

        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(OPERATION_HISTORY)
                .context("Failed to open operation_history table")?;
            table
                .insert(record.id.as_str(), bytes.as_slice())
                .context("Failed to insert history record")?;
        }
        write_txn
            .commit()
            .context("Failed to commit history record")?;
        Ok(())
    }

    /// Persists a new operation result and returns its id.
    pub fn record(&self, operation: AiOperation, input: &str, output: &str) -> Result<String> {
        let record = HistoryRecord {
            id: Uuid::new_v4().to_string(),
            operation,
            input: input.to_string(),
            output: output.to_string(),
            liked: false,
            created_at: Utc::now(),
        };
        self.write_record(&record)?;
        tracing::debug!("Recorded {operation} result as {}", record.id);
        Ok(record.id)
    }

    /// Loads one record, or `None` if not found.
    pub fn get(&self, id: &str) -> Result<Option<HistoryRecord>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(OPERATION_HISTORY)
            .context("Failed to open operation_history table")?;

        match table.get(id).context("Failed to read history record")? {
            Some(guard) => {
                let record: HistoryRecord = bincode::deserialize(guard.value())
                    .context("Failed to deserialize history record")?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Loads all records, newest first. Unreadable records are skipped.
    pub fn list(&self) -> Result<Vec<HistoryRecord>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(OPERATION_HISTORY)
            .context("Failed to open operation_history table")?;

        let mut records = Vec::new();
        for entry in table.iter().context("Failed to iterate operation_history")? {
            let (key, value) = entry.context("Failed to read history entry")?;
            match bincode::deserialize::<HistoryRecord>(value.value()) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping unreadable history record {}: {e}", key.value()),
            }
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    /// Flips the liked flag of a record and returns the updated record, or
    /// `None` if not found.
    pub fn toggle_liked(&self, id: &str) -> Result<Option<HistoryRecord>> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        let updated = {
            let mut table = write_txn
                .open_table(OPERATION_HISTORY)
                .context("Failed to open operation_history table")?;
            let existing = table
                .get(id)
                .context("Failed to read history record")?
                .map(|guard| guard.value().to_vec());

            match existing {
                Some(bytes) => {
                    let mut record: HistoryRecord = bincode::deserialize(&bytes)
                        .context("Failed to deserialize history record")?;
                    record.liked = !record.liked;
                    let bytes = bincode::serialize(&record)
                        .context("Failed to serialize history record")?;
                    table
                        .insert(id, bytes.as_slice())
                        .context("Failed to update history record")?;
                    Some(record)
                }
                None => None,
            }
        };
        write_txn
            .commit()
            .context("Failed to commit like toggle")?;
        Ok(updated)
    }

    /// Deletes a record. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        let existed = {
            let mut table = write_txn
                .open_table(OPERATION_HISTORY)
                .context("Failed to open operation_history table")?;
            let removed = table
                .remove(id)
                .context("Failed to delete history record")?;
            removed.is_some()
        };
        write_txn
            .commit()
            .context("Failed to commit history deletion")?;
        Ok(existed)
    }
}

impl StorageService for OperationHistoryStore {
    fn toggle_history_liked(&self, history_id: &str) -> Result<Option<StoredVersion>> {
        Ok(self.toggle_liked(history_id)?.map(|record| StoredVersion {
            history_id: record.id,
            text: record.output,
            is_liked: record.liked,
        }))
    }
}
