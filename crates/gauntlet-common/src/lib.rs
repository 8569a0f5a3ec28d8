//! # Gauntlet Common
//!
//! Shared vocabulary for the Gauntlet adaptive-difficulty director.
//!
//! ## Core Types
//!
//! - [`DifficultyLevel`]: clamped 1-10 challenge level
//! - [`DifficultyAction`]: the three learner actions (increase, decrease, maintain)
//! - [`StateKey`]: discretized (difficulty, accuracy, health, kill-rate) tuple
//! - [`ActionValues`]: per-action value estimates stored for each [`StateKey`]
//!
//! ## Errors
//!
//! - [`GauntletError`]: unified error type, with [`SnapshotError`] for the
//!   persisted value table

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{GauntletError, Result, SnapshotError};
pub use types::{
    action::{ActionValues, DifficultyAction},
    difficulty::DifficultyLevel,
    state_key::StateKey,
};

/// Gauntlet version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lowest difficulty level
pub const MIN_DIFFICULTY: u8 = 1;

/// Highest difficulty level
pub const MAX_DIFFICULTY: u8 = 10;

/// Highest bucket index used by the state encoder
pub const MAX_BUCKET: u8 = 5;

/// Number of learner actions
pub const ACTION_COUNT: usize = 3;

/// Schema version written into value-table snapshots
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;
