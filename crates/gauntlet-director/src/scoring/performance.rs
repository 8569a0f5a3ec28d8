//! Performance score and reward
//!
//! ```text
//! score  = 0.25·accuracy + 0.25·health + 0.30·min(1, kpm/5) + 0.20·damage_efficiency
//! reward = 0.7·(2·score − 1) + 0.3·(1 − |health − 0.75|)
//! ```

use crate::metrics::PerformanceMetrics;

/// Kills per minute treated as a perfect kill score
pub const EXCELLENT_KILLS_PER_MINUTE: f64 = 5.0;

/// Health fraction the reward steers towards
pub const OPTIMAL_HEALTH: f64 = 0.75;

/// Share of the reward taken from the performance score
const PERFORMANCE_BLEND: f64 = 0.7;

/// Share of the reward taken from the health balance
const HEALTH_BLEND: f64 = 0.3;

/// Component weights of the performance score; they sum to 1.0
#[derive(Debug, Clone, Copy)]
pub struct PerformanceWeights {
    pub accuracy: f64,
    pub health: f64,
    pub kills: f64,
    pub damage_efficiency: f64,
}

impl Default for PerformanceWeights {
    fn default() -> Self {
        Self {
            accuracy: 0.25,
            health: 0.25,
            kills: 0.30,
            damage_efficiency: 0.20,
        }
    }
}

pub struct PerformanceCalculator;

impl PerformanceCalculator {
    /// Weighted performance score in [0, 1]
    pub fn score(metrics: &PerformanceMetrics, health_fraction: f64) -> f64 {
        Self::score_with(&PerformanceWeights::default(), metrics, health_fraction)
    }

    pub fn score_with(weights: &PerformanceWeights, metrics: &PerformanceMetrics, health_fraction: f64) -> f64 {
        let kills = (metrics.kills_per_minute() / EXCELLENT_KILLS_PER_MINUTE).min(1.0);
        let score = weights.accuracy * metrics.accuracy()
            + weights.health * health_fraction.clamp(0.0, 1.0)
            + weights.kills * kills
            + weights.damage_efficiency * metrics.damage_efficiency();
        score.clamp(0.0, 1.0)
    }

    /// Reward for the transition just applied, bounded to [-1, 1]
    pub fn reward(metrics: &PerformanceMetrics, health_fraction: f64) -> f64 {
        let health = health_fraction.clamp(0.0, 1.0);
        let base = Self::score(metrics, health) * 2.0 - 1.0;
        let health_balance = 1.0 - (health - OPTIMAL_HEALTH).abs();
        base * PERFORMANCE_BLEND + health_balance * HEALTH_BLEND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_player() -> PerformanceMetrics {
        PerformanceMetrics {
            shots_fired: 20,
            shots_hit: 18,
            enemies_killed: 10,
            damage_taken: 1,
            time_alive: 60.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let w = PerformanceWeights::default();
        assert!((w.accuracy + w.health + w.kills + w.damage_efficiency - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_score_strong_player() {
        // 0.25·0.9 + 0.25·1 + 0.3·1 + 0.2·0.9 = 0.955
        let score = PerformanceCalculator::score(&strong_player(), 1.0);
        assert!((score - 0.955).abs() < 1e-9);
    }

    #[test]
    fn test_score_fresh_session() {
        // nothing happened yet: only health and damage efficiency count
        let score = PerformanceCalculator::score(&PerformanceMetrics::default(), 1.0);
        assert!((score - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_reward_at_optimal_health() {
        let metrics = strong_player();
        let reward = PerformanceCalculator::reward(&metrics, OPTIMAL_HEALTH);
        let score = PerformanceCalculator::score(&metrics, OPTIMAL_HEALTH);
        assert!((reward - ((score * 2.0 - 1.0) * 0.7 + 0.3)).abs() < 1e-9);
    }

    #[test]
    fn test_reward_bounds_at_extremes() {
        let worst = PerformanceMetrics {
            shots_fired: 50,
            damage_taken: 30,
            time_alive: 600.0,
            ..Default::default()
        };
        let low = PerformanceCalculator::reward(&worst, 0.0);
        let high = PerformanceCalculator::reward(&strong_player(), 1.0);
        assert!((-1.0..=1.0).contains(&low));
        assert!((-1.0..=1.0).contains(&high));
        assert!(low < high);
    }
}
