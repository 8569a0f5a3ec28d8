//! Bounded FIFO of observed transitions

use std::collections::VecDeque;

use gauntlet_common::{DifficultyAction, StateKey};
use rand::Rng;

/// One applied decision and its outcome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: StateKey,
    pub action: DifficultyAction,
    pub reward: f64,
    pub next_state: StateKey,
}

/// Replay buffer; the oldest transition is evicted on overflow
#[derive(Debug, Clone)]
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, transition: Transition) {
        if self.capacity == 0 {
            return;
        }
        while self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Draw up to `count` distinct transitions uniformly at random
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<Transition> {
        let amount = count.min(self.buffer.len());
        rand::seq::index::sample(rng, self.buffer.len(), amount)
            .into_iter()
            .map(|i| self.buffer[i])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_common::DifficultyLevel;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn transition(reward: f64) -> Transition {
        let key = StateKey::new(DifficultyLevel::MIN, 0, 0, 0);
        Transition {
            state: key,
            action: DifficultyAction::Maintain,
            reward,
            next_state: key,
        }
    }

    #[test]
    fn test_evicts_oldest() {
        let mut buffer = ReplayBuffer::new(1000);
        for i in 0..1001 {
            buffer.push(transition(i as f64));
        }
        assert_eq!(buffer.len(), 1000);
        assert!(buffer.iter().all(|t| t.reward != 0.0));
        assert_eq!(buffer.iter().next().map(|t| t.reward), Some(1.0));
        assert_eq!(buffer.iter().last().map(|t| t.reward), Some(1000.0));
    }

    #[test]
    fn test_sample_is_distinct_and_bounded() {
        let mut buffer = ReplayBuffer::new(100);
        for i in 0..40 {
            buffer.push(transition(i as f64));
        }
        let mut rng = StdRng::seed_from_u64(7);
        let batch = buffer.sample(&mut rng, 32);
        assert_eq!(batch.len(), 32);

        let mut rewards: Vec<i64> = batch.iter().map(|t| t.reward as i64).collect();
        rewards.sort_unstable();
        rewards.dedup();
        assert_eq!(rewards.len(), 32);

        assert_eq!(buffer.sample(&mut rng, 500).len(), 40);
    }

    #[test]
    fn test_sample_is_seed_deterministic() {
        let mut buffer = ReplayBuffer::new(100);
        for i in 0..60 {
            buffer.push(transition(i as f64));
        }
        let a = buffer.sample(&mut StdRng::seed_from_u64(11), 32);
        let b = buffer.sample(&mut StdRng::seed_from_u64(11), 32);
        assert_eq!(a, b);
    }
}
