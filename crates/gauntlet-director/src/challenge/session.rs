//! Challenge session state machine

use gauntlet_common::DifficultyLevel;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ChallengeSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    Inactive,
    Active,
    Completed,
    Failed,
}

impl ChallengeStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ChallengeStatus::Completed | ChallengeStatus::Failed)
    }
}

#[derive(Debug, Clone)]
pub struct ChallengeSession {
    status: ChallengeStatus,
    /// Time alive when the challenge started
    started_at: Option<f64>,
    duration_secs: f64,
    accuracy_threshold: f64,
    trigger_accuracy: f64,
    trigger_below: DifficultyLevel,
}

impl ChallengeSession {
    pub fn new(settings: &ChallengeSettings) -> Self {
        Self {
            status: ChallengeStatus::Inactive,
            started_at: None,
            duration_secs: settings.duration_secs,
            accuracy_threshold: settings.accuracy_threshold,
            trigger_accuracy: settings.trigger_accuracy,
            trigger_below: DifficultyLevel::new(settings.trigger_below_level),
        }
    }

    pub fn status(&self) -> ChallengeStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == ChallengeStatus::Active
    }

    pub fn started_at(&self) -> Option<f64> {
        self.started_at
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn accuracy_threshold(&self) -> f64 {
        self.accuracy_threshold
    }

    /// Whether an evaluation should announce the challenge instead of consulting the policy
    pub fn should_trigger(&self, accuracy: f64, level: DifficultyLevel) -> bool {
        self.status == ChallengeStatus::Inactive && accuracy >= self.trigger_accuracy && level < self.trigger_below
    }

    /// Inactive → Active; returns false if the session already ran
    pub fn start(&mut self, now: f64) -> bool {
        if self.status != ChallengeStatus::Inactive {
            return false;
        }
        self.status = ChallengeStatus::Active;
        self.started_at = Some(now);
        info!(
            started_at = now,
            duration_secs = self.duration_secs,
            target = self.accuracy_threshold,
            "Challenge started"
        );
        true
    }

    /// Active → Completed when the accuracy target is met within the budget
    pub fn check_completion(&mut self, accuracy: f64, challenge_time: f64) -> bool {
        if self.is_active() && accuracy >= self.accuracy_threshold && challenge_time <= self.duration_secs {
            self.status = ChallengeStatus::Completed;
            info!(accuracy, challenge_time, "Challenge completed");
            return true;
        }
        false
    }

    /// Resolve the session once its budget is spent
    ///
    /// At the exact boundary a met accuracy target still completes the
    /// challenge; otherwise the session fails. Returns the terminal status
    /// reached on this call, if any.
    pub fn check_deadline(&mut self, accuracy: f64, challenge_time: f64) -> Option<ChallengeStatus> {
        if !self.is_active() || challenge_time < self.duration_secs {
            return None;
        }
        if self.check_completion(accuracy, challenge_time) {
            return Some(ChallengeStatus::Completed);
        }
        self.status = ChallengeStatus::Failed;
        info!(accuracy, challenge_time, "Challenge failed");
        Some(ChallengeStatus::Failed)
    }

    /// Seconds left while active
    pub fn remaining(&self, challenge_time: f64) -> Option<f64> {
        self.is_active().then(|| (self.duration_secs - challenge_time).max(0.0))
    }
}
