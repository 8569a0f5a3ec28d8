//! Error types for the Gauntlet director
//!
//! Provides a unified error type and the snapshot-specific variants

use thiserror::Error;

/// Result type alias using GauntletError
pub type Result<T> = std::result::Result<T, GauntletError>;

/// Unified error type for Gauntlet operations
#[derive(Debug, Error)]
pub enum GauntletError {
    // Snapshot errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Telemetry registry errors
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Value-table snapshot errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Unsupported snapshot schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Snapshot checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Malformed snapshot: {0}")]
    Malformed(String),
}

// Implement From for common external error types
impl From<serde_json::Error> for GauntletError {
    fn from(err: serde_json::Error) -> Self {
        GauntletError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for GauntletError {
    fn from(err: std::io::Error) -> Self {
        GauntletError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for GauntletError {
    fn from(err: anyhow::Error) -> Self {
        GauntletError::Internal(err.to_string())
    }
}

impl From<prometheus::Error> for GauntletError {
    fn from(err: prometheus::Error) -> Self {
        GauntletError::Telemetry(err.to_string())
    }
}
