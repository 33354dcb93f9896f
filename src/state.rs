//! Event log persistence
//!
//! Pluggable snapshot storage so the query log survives process restarts.
//! The `AnalyticsStore` auto-loads on creation and auto-saves after every
//! mutation when a `StateStore` is configured; the log itself knows nothing
//! about durability.

use crate::error::{AnalyticsError, Result};
use crate::types::QueryEvent;
use std::path::{Path, PathBuf};

/// Fixed identifier the snapshot blob is keyed by
///
/// Matches the storage key used by earlier deployments, so existing
/// recorded data keeps loading.
pub const STORAGE_KEY: &str = "rag-analytics-storage";

/// Trait for persisting query log snapshots
pub trait StateStore: Send + Sync {
    /// Save a wholesale snapshot of the event log
    fn save(&self, events: &[QueryEvent]) -> Result<()>;

    /// Load the last saved snapshot; empty if none exists
    fn load(&self) -> Result<Vec<QueryEvent>>;
}

/// JSON file-based state store
///
/// Persists the event log as a JSON file on disk.
/// Atomic writes via temp file + rename to prevent corruption.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a new file state store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the conventional location inside `dir`
    ///
    /// Uses the fixed [`STORAGE_KEY`] as the file stem.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", STORAGE_KEY)),
        }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn save(&self, events: &[QueryEvent]) -> Result<()> {
        let json = serde_json::to_string_pretty(events)?;

        // Atomic write: write to temp file, then rename
        let tmp_path = self.path.with_extension("tmp");

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AnalyticsError::Storage(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        std::fs::write(&tmp_path, json).map_err(|e| {
            AnalyticsError::Storage(format!(
                "Failed to write state file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;

        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            AnalyticsError::Storage(format!(
                "Failed to rename state file {} → {}: {}",
                tmp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %self.path.display(), count = events.len(), "State saved");
        Ok(())
    }

    fn load(&self) -> Result<Vec<QueryEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            AnalyticsError::Storage(format!(
                "Failed to read state file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let events: Vec<QueryEvent> = serde_json::from_str(&json).map_err(|e| {
            AnalyticsError::Storage(format!(
                "Failed to parse state file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            count = events.len(),
            "State loaded"
        );
        Ok(events)
    }
}

/// In-memory state store for testing
///
/// Stores the snapshot in memory — lost on drop, but useful for tests.
#[derive(Default)]
pub struct MemoryStateStore {
    state: std::sync::RwLock<Vec<QueryEvent>>,
}

impl StateStore for MemoryStateStore {
    fn save(&self, events: &[QueryEvent]) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| AnalyticsError::Storage(format!("Failed to acquire state lock: {}", e)))?;
        *state = events.to_vec();
        Ok(())
    }

    fn load(&self) -> Result<Vec<QueryEvent>> {
        let state = self
            .state
            .read()
            .map_err(|e| AnalyticsError::Storage(format!("Failed to acquire state lock: {}", e)))?;
        Ok(state.clone())
    }
}
