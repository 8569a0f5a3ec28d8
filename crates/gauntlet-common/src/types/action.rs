//! Learner actions and the per-state value vector

use serde::{Deserialize, Serialize};

use crate::ACTION_COUNT;

/// Difficulty adjustment chosen by the policy
///
/// The discriminant is the slot index in [`ActionValues`]; argmax ties resolve
/// to the lowest index, so the declaration order matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyAction {
    Increase = 0,
    Decrease = 1,
    Maintain = 2,
}

impl DifficultyAction {
    /// All actions in slot order
    pub const ALL: [DifficultyAction; ACTION_COUNT] = [
        DifficultyAction::Increase,
        DifficultyAction::Decrease,
        DifficultyAction::Maintain,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyAction::Increase => "increase",
            DifficultyAction::Decrease => "decrease",
            DifficultyAction::Maintain => "maintain",
        }
    }
}

impl std::fmt::Display for DifficultyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value estimates for one state, one slot per [`DifficultyAction`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionValues(pub [f64; ACTION_COUNT]);

impl ActionValues {
    pub fn get(&self, action: DifficultyAction) -> f64 {
        self.0[action.index()]
    }

    pub fn set(&mut self, action: DifficultyAction, value: f64) {
        self.0[action.index()] = value;
    }

    /// Largest estimate across all actions
    pub fn max_value(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Action with the largest estimate; ties go to the first-listed action
    pub fn best_action(&self) -> DifficultyAction {
        let mut best = DifficultyAction::Increase;
        for action in DifficultyAction::ALL {
            if self.get(action) > self.get(best) {
                best = action;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for action in DifficultyAction::ALL {
            assert_eq!(DifficultyAction::from_index(action.index()), Some(action));
        }
        assert_eq!(DifficultyAction::from_index(3), None);
    }

    #[test]
    fn test_best_action_ties_prefer_first() {
        assert_eq!(ActionValues::default().best_action(), DifficultyAction::Increase);
        assert_eq!(
            ActionValues([0.1, 0.5, 0.5]).best_action(),
            DifficultyAction::Decrease
        );
        assert_eq!(
            ActionValues([-1.0, -2.0, -0.5]).best_action(),
            DifficultyAction::Maintain
        );
    }

    #[test]
    fn test_max_value() {
        assert!((ActionValues([-0.3, -0.1, -0.2]).max_value() + 0.1).abs() < 1e-12);
    }
}
