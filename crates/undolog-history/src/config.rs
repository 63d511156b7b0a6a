/// Configuration for the history system: size limits and point recording.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Soft limit: once the kept units exceed this many bytes, older units
/// are forgotten at the next collection.
const DEFAULT_UNDO_LIMIT: usize = 80_000;

/// Strong limit: a unit whose inclusion passes this many bytes is dropped
/// along with everything older. The newest unit is always kept.
const DEFAULT_UNDO_STRONG_LIMIT: usize = 120_000;

/// Outer limit: a single unit larger than this is handed to the
/// outer-limit hook.
const DEFAULT_UNDO_OUTER_LIMIT: usize = 12_000_000;

/// Configuration for the history system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Soft limit in bytes.
    pub undo_limit: usize,
    /// Strong limit in bytes.
    pub undo_strong_limit: usize,
    /// Outer limit in bytes. `None` means no limit.
    pub undo_outer_limit: Option<usize>,
    /// When set, cursor positions are never recorded.
    pub inhibit_record_point: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            undo_limit: DEFAULT_UNDO_LIMIT,
            undo_strong_limit: DEFAULT_UNDO_STRONG_LIMIT,
            undo_outer_limit: Some(DEFAULT_UNDO_OUTER_LIMIT),
            inhibit_record_point: false,
        }
    }
}

impl HistoryConfig {
    /// Resolves the config file path.
    ///
    /// Resolution order:
    /// 1. `UNDOLOG_CONFIG` environment variable
    /// 2. `undolog/history.json` under the platform config directory
    /// 3. `history.json` in the working directory
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("UNDOLOG_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|d| d.join("undolog").join("history.json"))
            .unwrap_or_else(|| PathBuf::from("history.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (unreadable file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<HistoryConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse history config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read history config at {}: {e}", path.display());
                }
            }
            // Don't overwrite a broken file
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!(
                    "Failed to create default history config at {}: {e}",
                    path.display()
                );
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Orders the limits so that soft <= strong <= outer.
    pub fn sanitize(&mut self) {
        self.undo_strong_limit = self.undo_strong_limit.max(self.undo_limit);
        if let Some(outer) = self.undo_outer_limit.as_mut() {
            *outer = (*outer).max(self.undo_strong_limit);
        }
    }
}
