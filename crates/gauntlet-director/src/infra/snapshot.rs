//! Versioned value-table snapshot
//!
//! Entries are sorted by key and checksummed with BLAKE3 over their canonical
//! bytes, so a truncated or hand-edited file is detected instead of silently
//! loading a partial table.

use chrono::{DateTime, Utc};
use gauntlet_common::{
    ActionValues, GauntletError, Result, SnapshotError, StateKey, SNAPSHOT_SCHEMA_VERSION,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::learning::ValueStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub key: StateKey,
    pub values: ActionValues,
}

/// Persisted form of the whole [`ValueStore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSnapshot {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    /// Session that wrote the snapshot
    pub session_id: Uuid,
    /// BLAKE3 hex digest of the entries
    pub checksum: String,
    pub entries: Vec<SnapshotEntry>,
}

impl ValueSnapshot {
    pub fn capture(store: &ValueStore, session_id: Uuid) -> Self {
        let entries: Vec<SnapshotEntry> = store
            .sorted_entries()
            .into_iter()
            .map(|(key, values)| SnapshotEntry { key, values })
            .collect();
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            session_id,
            checksum: checksum(&entries),
            entries,
        }
    }

    /// Check the schema version and the checksum
    pub fn verify(&self) -> Result<()> {
        if self.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.schema_version,
                expected: SNAPSHOT_SCHEMA_VERSION,
            }
            .into());
        }
        let actual = checksum(&self.entries);
        if actual != self.checksum {
            return Err(SnapshotError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual,
            }
            .into());
        }
        Ok(())
    }

    /// Verify and rebuild the value table
    pub fn into_store(self) -> Result<ValueStore> {
        self.verify()?;
        Ok(ValueStore::from_entries(
            self.entries.into_iter().map(|e| (e.key, e.values)),
        ))
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| GauntletError::Snapshot(SnapshotError::Malformed(e.to_string())))
    }
}

fn checksum(entries: &[SnapshotEntry]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&SNAPSHOT_SCHEMA_VERSION.to_le_bytes());
    for entry in entries {
        hasher.update(&entry.key.to_bytes());
        for value in entry.values.0 {
            hasher.update(&value.to_bits().to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
