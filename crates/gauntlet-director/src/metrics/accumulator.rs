//! Event counters and the ratios derived from them

use serde::{Deserialize, Serialize};

/// Minutes used in place of zero when computing per-minute rates
pub const MIN_RATE_MINUTES: f64 = 0.1;

/// Raw performance counters for the current evaluation window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Damage instances taken
    pub damage_taken: u64,
    /// Enemies killed
    pub enemies_killed: u64,
    /// Shots fired by the player
    pub shots_fired: u64,
    /// Shots that hit an enemy
    pub shots_hit: u64,
    /// Seconds alive; never reset
    pub time_alive: f64,
    /// Euclidean distance covered
    pub distance_traveled: f64,
    /// `time_alive` at the last evaluation boundary
    pub last_evaluation_time: f64,
    /// Seconds spent in the active challenge
    pub challenge_time: f64,
}

impl PerformanceMetrics {
    /// Hits over shots fired, floor-guarded and capped at 1.0
    pub fn accuracy(&self) -> f64 {
        (self.shots_hit as f64 / self.shots_fired.max(1) as f64).min(1.0)
    }

    /// Kills per minute of time alive, never dividing by less than 0.1 minutes
    pub fn kills_per_minute(&self) -> f64 {
        let minutes = (self.time_alive / 60.0).max(MIN_RATE_MINUTES);
        self.enemies_killed as f64 / minutes
    }

    /// `1 - damage / kills`, floored at zero
    pub fn damage_efficiency(&self) -> f64 {
        (1.0 - self.damage_taken as f64 / self.enemies_killed.max(1) as f64).max(0.0)
    }

    /// Seconds since the last evaluation boundary
    pub fn since_last_evaluation(&self) -> f64 {
        self.time_alive - self.last_evaluation_time
    }
}

/// Mutable accumulator owned by the engine
#[derive(Debug, Clone, Default)]
pub struct MetricsAccumulator {
    metrics: PerformanceMetrics,
    last_position: Option<(f64, f64)>,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    pub fn record_shot_fired(&mut self) {
        self.metrics.shots_fired += 1;
    }

    pub fn record_shot_hit(&mut self) {
        self.metrics.shots_hit += 1;
    }

    pub fn record_kill(&mut self) {
        self.metrics.enemies_killed += 1;
    }

    pub fn record_damage(&mut self) {
        self.metrics.damage_taken += 1;
    }

    /// Add the distance from the previous reported position; the first report only seeds it
    pub fn record_position(&mut self, x: f64, y: f64) {
        if let Some((px, py)) = self.last_position {
            let step = ((x - px).powi(2) + (y - py).powi(2)).sqrt();
            if step.is_finite() {
                self.metrics.distance_traveled += step;
            }
        }
        self.last_position = Some((x, y));
    }

    /// Advance time alive by a frame's elapsed seconds
    pub fn advance(&mut self, delta_secs: f64) {
        self.metrics.time_alive += delta_secs.max(0.0);
    }

    /// Advance the active challenge clock
    pub fn advance_challenge(&mut self, delta_secs: f64) {
        self.metrics.challenge_time += delta_secs.max(0.0);
    }

    pub fn reset_challenge_clock(&mut self) {
        self.metrics.challenge_time = 0.0;
    }

    /// Record the evaluation boundary without touching the counters
    pub fn mark_evaluation(&mut self) {
        self.metrics.last_evaluation_time = self.metrics.time_alive;
    }

    /// Close the evaluation window: mark the boundary and zero the combat counters
    pub fn reset_window(&mut self) {
        self.mark_evaluation();
        self.metrics.damage_taken = 0;
        self.metrics.enemies_killed = 0;
        self.metrics.shots_fired = 0;
        self.metrics.shots_hit = 0;
    }
}
