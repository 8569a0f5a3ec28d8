//! StateKey - discretized player situation used to index learned values
//!
//! Two live situations that bucket identically share one key; that is how the
//! value table generalizes across similar play.

use serde::{Deserialize, Serialize};

use crate::types::difficulty::DifficultyLevel;
use crate::MAX_BUCKET;

/// (difficulty, accuracy bucket, health bucket, kill-rate bucket)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateKey {
    pub difficulty: DifficultyLevel,
    /// Accuracy bucket (0-5)
    pub accuracy: u8,
    /// Health bucket (0-5)
    pub health: u8,
    /// Kill-rate bucket (0-5)
    pub kill_rate: u8,
}

impl StateKey {
    /// Create a key, clamping every bucket to `0..=MAX_BUCKET`
    pub fn new(difficulty: DifficultyLevel, accuracy: u8, health: u8, kill_rate: u8) -> Self {
        Self {
            difficulty,
            accuracy: accuracy.min(MAX_BUCKET),
            health: health.min(MAX_BUCKET),
            kill_rate: kill_rate.min(MAX_BUCKET),
        }
    }

    /// Bucket a unit-range ratio as `floor(ratio * scale)`, clamped to the bucket range
    pub fn bucket(ratio: f64, scale: f64) -> u8 {
        if !ratio.is_finite() || ratio <= 0.0 {
            return 0;
        }
        (ratio * scale).floor().min(MAX_BUCKET as f64) as u8
    }

    /// Stable byte form used for snapshot checksums
    pub fn to_bytes(&self) -> [u8; 4] {
        [self.difficulty.get(), self.accuracy, self.health, self.kill_rate]
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(lvl={}, acc={}, hp={}, kpm={})",
            self.difficulty.get(),
            self.accuracy,
            self.health,
            self.kill_rate
        )
    }
}
