//! State encoder: (level, metrics, health) -> StateKey

use gauntlet_common::{DifficultyLevel, StateKey};

use crate::metrics::PerformanceMetrics;

/// Accuracy and health buckets are `floor(ratio * 5)`
const RATIO_SCALE: f64 = 5.0;

/// Kill-rate bucket is `floor(kills_per_minute * 2)`
const KILL_RATE_SCALE: f64 = 2.0;

pub struct StateEncoder;

impl StateEncoder {
    /// Discretize the live situation into a value-table key
    pub fn encode(level: DifficultyLevel, metrics: &PerformanceMetrics, health_fraction: f64) -> StateKey {
        StateKey::new(
            level,
            StateKey::bucket(metrics.accuracy(), RATIO_SCALE),
            StateKey::bucket(health_fraction.clamp(0.0, 1.0), RATIO_SCALE),
            StateKey::bucket(metrics.kills_per_minute(), KILL_RATE_SCALE),
        )
    }
}
