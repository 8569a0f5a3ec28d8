//! Q-learning update with experience replay
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α·(r + γ·max_a' Q(s',a') − Q(s,a))
//! ```

use rand::Rng;
use tracing::debug;

use super::replay::{ReplayBuffer, Transition};
use super::value_store::ValueStore;
use crate::config::LearningSettings;

pub struct Learner {
    learning_rate: f64,
    discount: f64,
    replay: ReplayBuffer,
    batch_size: usize,
}

impl Learner {
    pub fn new(settings: &LearningSettings) -> Self {
        Self {
            learning_rate: settings.learning_rate,
            discount: settings.discount,
            replay: ReplayBuffer::new(settings.replay_capacity),
            batch_size: settings.replay_batch,
        }
    }

    /// Apply the update rule to one transition and return the new estimate
    pub fn update(&self, store: &mut ValueStore, t: &Transition) -> f64 {
        let current = store.lookup(t.state, t.action);
        let next_max = store.max_value(t.next_state);
        let updated = current + self.learning_rate * (t.reward + self.discount * next_max - current);
        store.set(t.state, t.action, updated);
        updated
    }

    /// Learn from an applied transition, remember it, then replay a batch
    ///
    /// Returns the number of replayed transitions.
    pub fn learn<R: Rng + ?Sized>(&mut self, store: &mut ValueStore, transition: Transition, rng: &mut R) -> usize {
        let updated = self.update(store, &transition);
        self.replay.push(transition);
        debug!(
            state = %transition.state,
            action = %transition.action,
            reward = transition.reward,
            value = updated,
            "Value updated"
        );
        self.replay_batch(store, rng)
    }

    /// Re-apply the update rule to a random batch once the buffer holds more than a batch
    pub fn replay_batch<R: Rng + ?Sized>(&self, store: &mut ValueStore, rng: &mut R) -> usize {
        if self.replay.len() <= self.batch_size {
            return 0;
        }
        let batch = self.replay.sample(rng, self.batch_size);
        for t in &batch {
            self.update(store, t);
        }
        batch.len()
    }

    pub fn replay_buffer(&self) -> &ReplayBuffer {
        &self.replay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_common::{DifficultyAction, DifficultyLevel, StateKey};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn key(level: u8) -> StateKey {
        StateKey::new(DifficultyLevel::new(level), 3, 4, 1)
    }

    #[test]
    fn test_update_rule() {
        let learner = Learner::new(&LearningSettings::default());
        let mut store = ValueStore::new();
        store.set(key(2), DifficultyAction::Maintain, 0.5);

        let t = Transition {
            state: key(1),
            action: DifficultyAction::Increase,
            reward: 1.0,
            next_state: key(2),
        };
        // 0 + 0.1·(1 + 0.9·0.5 − 0) = 0.145
        let value = learner.update(&mut store, &t);
        assert!((value - 0.145).abs() < 1e-12);
        assert!((store.lookup(key(1), DifficultyAction::Increase) - 0.145).abs() < 1e-12);
    }

    #[test]
    fn test_no_replay_until_buffer_exceeds_batch() {
        let mut learner = Learner::new(&LearningSettings::default());
        let mut store = ValueStore::new();
        let mut rng = StdRng::seed_from_u64(1);

        let t = Transition {
            state: key(3),
            action: DifficultyAction::Decrease,
            reward: 0.2,
            next_state: key(2),
        };
        for _ in 0..32 {
            assert_eq!(learner.learn(&mut store, t, &mut rng), 0);
        }
        assert_eq!(learner.learn(&mut store, t, &mut rng), 32);
        assert_eq!(learner.replay_buffer().len(), 33);
    }

    #[test]
    fn test_replay_reinforces_towards_reward() {
        let mut learner = Learner::new(&LearningSettings::default());
        let mut store = ValueStore::new();
        let mut rng = StdRng::seed_from_u64(3);

        let t = Transition {
            state: key(4),
            action: DifficultyAction::Maintain,
            reward: 0.6,
            next_state: key(5),
        };
        for _ in 0..40 {
            learner.learn(&mut store, t, &mut rng);
        }
        let value = store.lookup(key(4), DifficultyAction::Maintain);
        assert!(value > 0.5 && value <= 0.6 + 1e-9, "value = {}", value);
    }
}
