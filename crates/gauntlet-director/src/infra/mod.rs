//! Infrastructure: value-table persistence

pub mod snapshot;
pub mod snapshot_store;

pub use snapshot::{SnapshotEntry, ValueSnapshot};
pub use snapshot_store::{FileSnapshotStore, InMemorySnapshotStore, SnapshotStore};
