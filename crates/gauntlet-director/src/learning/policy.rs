//! Epsilon-greedy policy with heuristic overrides

use gauntlet_common::{DifficultyAction, DifficultyLevel, StateKey};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::value_store::ValueStore;
use crate::config::EvaluationSettings;

/// Rule that replaced the policy's choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicOverride {
    /// Strong play at the easiest level
    StrongStart,
    /// Weak play above the easiest level
    Struggling,
}

impl HeuristicOverride {
    pub fn as_str(self) -> &'static str {
        match self {
            HeuristicOverride::StrongStart => "strong_start",
            HeuristicOverride::Struggling => "struggling",
        }
    }
}

/// Final action for an evaluation and how it was reached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyDecision {
    pub action: DifficultyAction,
    /// The policy drew a random action
    pub explored: bool,
    pub overridden: Option<HeuristicOverride>,
}

pub struct Policy {
    epsilon: f64,
    good_threshold: f64,
    poor_threshold: f64,
}

impl Policy {
    pub fn new(epsilon: f64, evaluation: &EvaluationSettings) -> Self {
        Self {
            epsilon,
            good_threshold: evaluation.good_performance_threshold,
            poor_threshold: evaluation.poor_performance_threshold,
        }
    }

    /// Epsilon-greedy draw over the stored estimates
    ///
    /// Returns the action and whether it was an exploration draw.
    pub fn choose<R: Rng + ?Sized>(&self, store: &mut ValueStore, state: StateKey, rng: &mut R) -> (DifficultyAction, bool) {
        if rng.gen::<f64>() < self.epsilon {
            let index = rng.gen_range(0..DifficultyAction::ALL.len());
            return (DifficultyAction::ALL[index], true);
        }
        (store.values(state).best_action(), false)
    }

    /// Heuristic that takes precedence over the policy, if any applies
    pub fn heuristic(&self, level: DifficultyLevel, performance_score: f64) -> Option<(DifficultyAction, HeuristicOverride)> {
        if level.is_min() && performance_score > self.good_threshold {
            Some((DifficultyAction::Increase, HeuristicOverride::StrongStart))
        } else if performance_score < self.poor_threshold && !level.is_min() {
            Some((DifficultyAction::Decrease, HeuristicOverride::Struggling))
        } else {
            None
        }
    }

    /// Policy choice followed by the heuristic overrides
    pub fn decide<R: Rng + ?Sized>(
        &self,
        store: &mut ValueStore,
        state: StateKey,
        performance_score: f64,
        rng: &mut R,
    ) -> PolicyDecision {
        let (action, explored) = self.choose(store, state, rng);
        match self.heuristic(state.difficulty, performance_score) {
            Some((forced, rule)) => PolicyDecision {
                action: forced,
                explored,
                overridden: Some(rule),
            },
            None => PolicyDecision {
                action,
                explored,
                overridden: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_common::ActionValues;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn policy(epsilon: f64) -> Policy {
        Policy::new(epsilon, &EvaluationSettings::default())
    }

    fn key(level: u8) -> StateKey {
        StateKey::new(DifficultyLevel::new(level), 2, 2, 2)
    }

    #[test]
    fn test_greedy_picks_best() {
        let mut store = ValueStore::from_entries([(key(4), ActionValues([0.1, 0.7, 0.3]))]);
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..20 {
            assert_eq!(policy(0.0).choose(&mut store, key(4), &mut rng), (DifficultyAction::Decrease, false));
        }
    }

    #[test]
    fn test_unseen_state_prefers_increase() {
        let mut store = ValueStore::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(policy(0.0).choose(&mut store, key(6), &mut rng).0, DifficultyAction::Increase);
        assert!(store.peek(&key(6)).is_some());
    }

    #[test]
    fn test_full_exploration_covers_all_actions() {
        let mut store = ValueStore::new();
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let (action, explored) = policy(1.0).choose(&mut store, key(5), &mut rng);
            assert!(explored);
            seen[action.index()] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_strong_start_forces_increase() {
        let mut store = ValueStore::from_entries([(key(1), ActionValues([-5.0, 0.0, 9.0]))]);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let decision = policy(0.2).decide(&mut store, key(1), 0.85, &mut rng);
            assert_eq!(decision.action, DifficultyAction::Increase);
            assert_eq!(decision.overridden, Some(HeuristicOverride::StrongStart));
        }
    }

    #[test]
    fn test_struggling_forces_decrease() {
        let mut store = ValueStore::from_entries([(key(5), ActionValues([9.0, -5.0, 0.0]))]);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let decision = policy(0.2).decide(&mut store, key(5), 0.2, &mut rng);
            assert_eq!(decision.action, DifficultyAction::Decrease);
            assert_eq!(decision.overridden, Some(HeuristicOverride::Struggling));
        }
    }

    #[test]
    fn test_no_override_in_middle_band() {
        let p = policy(0.2);
        assert_eq!(p.heuristic(DifficultyLevel::MIN, 0.7), None);
        assert_eq!(p.heuristic(DifficultyLevel::MIN, 0.1), None);
        assert_eq!(p.heuristic(DifficultyLevel::new(4), 0.5), None);
        assert_eq!(p.heuristic(DifficultyLevel::new(4), 0.95), None);
    }
}
