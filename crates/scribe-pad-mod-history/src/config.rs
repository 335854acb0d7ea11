/// Configuration and utility functions for the history system.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Maximum number of snapshots kept in `past`, seed entry included.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Inactivity window in milliseconds before a typing snapshot is committed.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Configuration for the history system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Max snapshots retained in the undo (`past`) sequence.
    pub limit: usize,
    /// Debounce window for typing snapshots, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl HistoryConfig {
    /// Returns the debounce window as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Counter for generating unique session IDs within a process lifetime.
static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a unique identifier for a new editing session.
///
/// Used to tag log output so interleaved sessions can be told apart.
pub fn generate_session_id() -> String {
    let count = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("session-{count}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HistoryConfig::default();
        assert_eq!(config.limit, 10);
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_generate_session_ids_are_unique() {
        let id1 = generate_session_id();
        let id2 = generate_session_id();
        assert_ne!(id1, id2);
        assert!(id1.starts_with("session-"));
        assert!(id2.starts_with("session-"));
    }
}
