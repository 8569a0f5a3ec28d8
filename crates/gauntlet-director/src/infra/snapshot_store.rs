//! Snapshot storage backends

use std::path::{Path, PathBuf};

use gauntlet_common::{GauntletError, Result};
use parking_lot::Mutex;
use tracing::debug;

use super::snapshot::ValueSnapshot;

/// Durable home for the value table
pub trait SnapshotStore: Send + Sync {
    /// Read the last snapshot; `Ok(None)` when nothing was ever saved
    fn load(&self) -> Result<Option<ValueSnapshot>>;

    /// Replace the stored snapshot
    fn save(&self, snapshot: &ValueSnapshot) -> Result<()>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

/// JSON file replaced atomically through a sibling temp file
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<ValueSnapshot>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(GauntletError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        ValueSnapshot::from_json(&bytes).map(Some)
    }

    fn save(&self, snapshot: &ValueSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.temp_path();
        std::fs::write(&tmp, snapshot.to_json()?)?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            GauntletError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), entries = snapshot.entries.len(), "Snapshot written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store for tests and persistence-free runs
#[derive(Default)]
pub struct InMemorySnapshotStore {
    slot: Mutex<Option<ValueSnapshot>>,
    saves: Mutex<usize>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store as if a previous session had saved
    pub fn with_snapshot(snapshot: ValueSnapshot) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
            saves: Mutex::new(0),
        }
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }

    pub fn latest(&self) -> Option<ValueSnapshot> {
        self.slot.lock().clone()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Option<ValueSnapshot>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, snapshot: &ValueSnapshot) -> Result<()> {
        *self.slot.lock() = Some(snapshot.clone());
        *self.saves.lock() += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<T> {
    fn load(&self) -> Result<Option<ValueSnapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &ValueSnapshot) -> Result<()> {
        (**self).save(snapshot)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::ValueStore;
    use gauntlet_common::{DifficultyAction, DifficultyLevel, StateKey};
    use uuid::Uuid;

    fn snapshot() -> ValueSnapshot {
        let mut store = ValueStore::new();
        store.set(StateKey::new(DifficultyLevel::new(3), 2, 2, 2), DifficultyAction::Maintain, 0.25);
        ValueSnapshot::capture(&store, Uuid::now_v7())
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("difficulty_model.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_round_trip_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("difficulty_model.json");
        let store = FileSnapshotStore::new(&path);
        let snap = snapshot();
        store.save(&snap).unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().unwrap(), Some(snap));
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("difficulty_model.json");
        std::fs::write(&path, b"not json").unwrap();
        assert!(FileSnapshotStore::new(&path).load().is_err());
    }

    #[test]
    fn test_in_memory_counts_saves() {
        let store = InMemorySnapshotStore::new();
        store.save(&snapshot()).unwrap();
        store.save(&snapshot()).unwrap();
        assert_eq!(store.save_count(), 2);
        assert!(store.load().unwrap().is_some());
    }
}
