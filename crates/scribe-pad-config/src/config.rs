/// Editor configuration: load, save, and sanitize.
use std::path::PathBuf;
use std::time::Duration;

use scribe_pad_core::capitalize::DEFAULT_WINDOW_RADIUS;
use scribe_pad_core::{InsertOptions, SessionOptions};
use scribe_pad_mod_history::config::{DEFAULT_DEBOUNCE_MS, DEFAULT_HISTORY_LIMIT};
use scribe_pad_mod_history::HistoryConfig;
use serde::{Deserialize, Serialize};

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Max undo snapshots per session (1..=500).
    pub history_limit: usize,
    /// Typing debounce window in milliseconds (at most 5000).
    pub debounce_ms: u64,
    /// How long a sentence-boundary hint stays visible, in milliseconds.
    pub sentence_hint_ms: u64,
    /// UTF-16 radius examined by capitalization repair.
    pub capitalization_window: usize,
    pub auto_capitalize: bool,
    /// Select inserted text instead of placing the caret after it.
    pub select_after_insert: bool,
    /// Time budget for one external operation. Panels enforce it; the core
    /// never waits.
    pub operation_timeout_secs: u64,
    /// Operation history database. Empty = per-user data directory.
    pub history_db: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            sentence_hint_ms: 500,
            capitalization_window: DEFAULT_WINDOW_RADIUS,
            auto_capitalize: true,
            select_after_insert: false,
            operation_timeout_secs: 60,
            history_db: String::new(),
        }
    }
}

impl EditorConfig {
    /// Returns the config file path: exe directory + `scribe-pad.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("scribe-pad.json")))
            .unwrap_or_else(|| PathBuf::from("scribe-pad.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &std::path::Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<EditorConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Keep the broken file for the user to fix
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Clamps values to valid ranges.
    pub fn sanitize(&mut self) {
        self.history_limit = self.history_limit.clamp(1, 500);
        self.debounce_ms = self.debounce_ms.min(5_000);
        self.sentence_hint_ms = self.sentence_hint_ms.clamp(100, 5_000);
        self.capitalization_window = self.capitalization_window.max(1);
        self.operation_timeout_secs = self.operation_timeout_secs.max(1);
    }

    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            limit: self.history_limit,
            debounce_ms: self.debounce_ms,
        }
    }

    /// Session tunables derived from this config.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            history: self.history_config(),
            capitalization_window: self.capitalization_window,
            auto_capitalize: self.auto_capitalize,
            hint_duration: Duration::from_millis(self.sentence_hint_ms),
        }
    }

    /// Insertion options with the configured selection behaviour.
    pub fn insert_options(&self, replace_selection: bool) -> InsertOptions {
        InsertOptions {
            select_after_insert: self.select_after_insert,
            replace_selection,
        }
    }

    /// Resolves the operation history database path.
    ///
    /// Resolution order:
    /// 1. `history_db` (if non-empty)
    /// 2. `scribe-pad/history.redb` under the user's data directory
    /// 3. `scribe-pad-history.redb` next to the executable
    pub fn history_db_path(&self) -> PathBuf {
        if !self.history_db.is_empty() {
            return PathBuf::from(&self.history_db);
        }
        if let Some(dir) = dirs::data_dir() {
            return dir.join("scribe-pad").join("history.redb");
        }
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("scribe-pad-history.redb")))
            .unwrap_or_else(|| PathBuf::from("scribe-pad-history.redb"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.sentence_hint_ms, 500);
        assert_eq!(config.capitalization_window, 500);
        assert!(config.auto_capitalize);
        assert!(!config.select_after_insert);
        assert_eq!(config.operation_timeout_secs, 60);
        assert!(config.history_db.is_empty());
    }

    #[test]
    fn test_sanitize_clamps_history_limit() {
        let mut config = EditorConfig {
            history_limit: 0,
            ..EditorConfig::default()
        };
        config.sanitize();
        assert_eq!(config.history_limit, 1);

        config.history_limit = 10_000;
        config.sanitize();
        assert_eq!(config.history_limit, 500);
    }

    #[test]
    fn test_sanitize_clamps_timings() {
        let mut config = EditorConfig {
            debounce_ms: 60_000,
            sentence_hint_ms: 1,
            capitalization_window: 0,
            operation_timeout_secs: 0,
            ..EditorConfig::default()
        };
        config.sanitize();
        assert_eq!(config.debounce_ms, 5_000);
        assert_eq!(config.sentence_hint_ms, 100);
        assert_eq!(config.capitalization_window, 1);
        assert_eq!(config.operation_timeout_secs, 1);
    }

    #[test]
    fn test_zero_debounce_is_allowed() {
        let mut config = EditorConfig {
            debounce_ms: 0,
            ..EditorConfig::default()
        };
        config.sanitize();
        assert_eq!(config.debounce_ms, 0);
    }

    #[test]
    fn test_session_options_mirror_config() {
        let config = EditorConfig {
            history_limit: 25,
            debounce_ms: 150,
            sentence_hint_ms: 800,
            auto_capitalize: false,
            ..EditorConfig::default()
        };
        let options = config.session_options();
        assert_eq!(options.history.limit, 25);
        assert_eq!(options.history.debounce(), Duration::from_millis(150));
        assert_eq!(options.hint_duration, Duration::from_millis(800));
        assert!(!options.auto_capitalize);
    }

    #[test]
    fn test_insert_options() {
        let config = EditorConfig {
            select_after_insert: true,
            ..EditorConfig::default()
        };
        let opts = config.insert_options(true);
        assert!(opts.select_after_insert);
        assert!(opts.replace_selection);
    }

    #[test]
    fn test_explicit_history_db_path() {
        let config = EditorConfig {
            history_db: "/tmp/custom.redb".to_string(),
            ..EditorConfig::default()
        };
        assert_eq!(config.history_db_path(), PathBuf::from("/tmp/custom.redb"));
    }

    #[test]
    fn test_default_history_db_path_is_redb() {
        let path = EditorConfig::default().history_db_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("redb"));
    }

    #[test]
    fn test_config_path_file_name() {
        let path = EditorConfig::config_path();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("scribe-pad.json")
        );
    }
}
