//! DifficultyLevel - clamped challenge level (1-10)
//!
//! The level drives every combat multiplier. It moves by one step per normal
//! evaluation and by two on a challenge reward, never leaving the valid range.

use serde::{Deserialize, Serialize};

use crate::{MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Challenge level, always within `MIN_DIFFICULTY..=MAX_DIFFICULTY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DifficultyLevel(u8);

impl Default for DifficultyLevel {
    fn default() -> Self {
        Self::MIN
    }
}

impl DifficultyLevel {
    /// Easiest level, where every session starts
    pub const MIN: Self = Self(MIN_DIFFICULTY);

    /// Hardest level
    pub const MAX: Self = Self(MAX_DIFFICULTY);

    /// Create a level, clamping out-of-range input
    pub fn new(level: u8) -> Self {
        Self(level.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY))
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Level `steps` higher, saturating at the maximum
    pub fn raised(self, steps: u8) -> Self {
        Self::new(self.0.saturating_add(steps))
    }

    /// Level `steps` lower, saturating at the minimum
    pub fn lowered(self, steps: u8) -> Self {
        Self::new(self.0.saturating_sub(steps))
    }

    pub fn is_min(self) -> bool {
        self.0 == MIN_DIFFICULTY
    }

    pub fn is_max(self) -> bool {
        self.0 == MAX_DIFFICULTY
    }

    /// Levels above the easiest one (0 at level 1)
    pub fn steps_above_min(self) -> u8 {
        self.0 - MIN_DIFFICULTY
    }
}

impl TryFrom<u8> for DifficultyLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "difficulty level {} outside {}..={}",
                value, MIN_DIFFICULTY, MAX_DIFFICULTY
            ))
        }
    }
}

impl From<DifficultyLevel> for u8 {
    fn from(level: DifficultyLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, MAX_DIFFICULTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        assert_eq!(DifficultyLevel::new(0).get(), 1);
        assert_eq!(DifficultyLevel::new(42).get(), 10);
        assert_eq!(DifficultyLevel::new(6).get(), 6);
    }

    #[test]
    fn test_raise_and_lower_saturate() {
        let mut level = DifficultyLevel::MIN;
        for _ in 0..25 {
            level = level.raised(1);
        }
        assert_eq!(level, DifficultyLevel::MAX);

        assert_eq!(DifficultyLevel::new(9).raised(2), DifficultyLevel::MAX);

        for _ in 0..25 {
            level = level.lowered(1);
        }
        assert_eq!(level, DifficultyLevel::MIN);
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let ok: DifficultyLevel = serde_json::from_str("4").unwrap();
        assert_eq!(ok.get(), 4);
        assert!(serde_json::from_str::<DifficultyLevel>("11").is_err());
        assert!(serde_json::from_str::<DifficultyLevel>("0").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(DifficultyLevel::new(3).to_string(), "3/10");
    }
}
