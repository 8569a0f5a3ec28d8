//! Events emitted by the decision engine

use gauntlet_common::DifficultyLevel;
use serde::{Deserialize, Serialize};

use crate::controller::engine::DecisionKind;
use crate::controller::params::CombatTuning;

/// Something the presentation layer or the host game should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DirectorEvent {
    /// An increase is being suggested
    WarningRaised { message: String },
    /// A decision window opened
    DecisionOpened { kind: DecisionKind, timeout_secs: f64 },
    /// A decision window closed, by answer or by timeout
    DecisionResolved {
        kind: DecisionKind,
        accepted: bool,
        timed_out: bool,
    },
    /// Transient message for the player
    Feedback { message: String },
    /// Live and future combatants must be retuned
    DifficultyChanged {
        from: DifficultyLevel,
        to: DifficultyLevel,
        tuning: CombatTuning,
    },
    ChallengeStarted { duration_secs: f64, target_accuracy: f64 },
    ChallengeCompleted { accuracy: f64 },
    ChallengeFailed { accuracy: f64 },
}

impl DirectorEvent {
    pub fn feedback(message: impl Into<String>) -> Self {
        DirectorEvent::Feedback {
            message: message.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DirectorEvent::WarningRaised { .. } => "warning_raised",
            DirectorEvent::DecisionOpened { .. } => "decision_opened",
            DirectorEvent::DecisionResolved { .. } => "decision_resolved",
            DirectorEvent::Feedback { .. } => "feedback",
            DirectorEvent::DifficultyChanged { .. } => "difficulty_changed",
            DirectorEvent::ChallengeStarted { .. } => "challenge_started",
            DirectorEvent::ChallengeCompleted { .. } => "challenge_completed",
            DirectorEvent::ChallengeFailed { .. } => "challenge_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serialization() {
        let event = DirectorEvent::DecisionOpened {
            kind: DecisionKind::ChallengePrompt,
            timeout_secs: 8.0,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "decision_opened");
        assert_eq!(json["kind"], "challenge_prompt");
    }
}
