//! Notification gateway
//!
//! Presentation-side countdowns for the warning banner, the decision prompt
//! and the feedback line. The engine decides; this only tracks what is on
//! screen and for how long.

use crate::config::NotificationSettings;
use crate::controller::engine::DecisionKind;

use super::events::DirectorEvent;

pub const WARNING_TEXT: &str = "DIFFICULTY INCREASE SUGGESTED!";

/// A timed message on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub remaining_secs: f64,
}

/// The open prompt as the player sees it
#[derive(Debug, Clone, PartialEq)]
pub struct PromptNotice {
    pub kind: DecisionKind,
    pub title: &'static str,
    pub instructions: &'static str,
    pub remaining_secs: f64,
}

impl PromptNotice {
    fn new(kind: DecisionKind, remaining_secs: f64) -> Self {
        let (title, instructions) = match kind {
            DecisionKind::DifficultyPrompt => (
                "You're doing well! Increase difficulty?",
                "Press Y to increase, N to stay at current level",
            ),
            DecisionKind::ChallengePrompt => (
                "Challenge completed! Accept harder difficulty?",
                "Press Y to increase enemy damage, N to decline",
            ),
        };
        Self {
            kind,
            title,
            instructions,
            remaining_secs,
        }
    }
}

pub struct NotificationGateway {
    settings: NotificationSettings,
    warning: Option<Notice>,
    prompt: Option<PromptNotice>,
    feedback: Option<Notice>,
}

impl NotificationGateway {
    pub fn new(settings: NotificationSettings) -> Self {
        Self {
            settings,
            warning: None,
            prompt: None,
            feedback: None,
        }
    }

    /// Update what is on screen from engine events
    pub fn absorb<'a>(&mut self, events: impl IntoIterator<Item = &'a DirectorEvent>) {
        for event in events {
            match event {
                DirectorEvent::WarningRaised { message } => {
                    self.warning = Some(Notice {
                        message: message.clone(),
                        remaining_secs: self.settings.warning_secs,
                    });
                }
                DirectorEvent::DecisionOpened { kind, timeout_secs } => {
                    self.prompt = Some(PromptNotice::new(*kind, *timeout_secs));
                }
                DirectorEvent::DecisionResolved { .. } => {
                    self.prompt = None;
                }
                DirectorEvent::Feedback { message } => {
                    self.feedback = Some(Notice {
                        message: message.clone(),
                        remaining_secs: self.settings.feedback_secs,
                    });
                }
                _ => {}
            }
        }
    }

    /// Count down every visible element, dropping the expired ones
    pub fn advance(&mut self, delta_secs: f64) {
        let delta = delta_secs.max(0.0);
        if delta == 0.0 {
            return;
        }
        expire(&mut self.warning, delta);
        expire(&mut self.feedback, delta);
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.remaining_secs -= delta;
            if prompt.remaining_secs <= 0.0 {
                self.prompt = None;
            }
        }
    }

    pub fn warning(&self) -> Option<&Notice> {
        self.warning.as_ref()
    }

    pub fn prompt(&self) -> Option<&PromptNotice> {
        self.prompt.as_ref()
    }

    pub fn feedback(&self) -> Option<&Notice> {
        self.feedback.as_ref()
    }
}

fn expire(slot: &mut Option<Notice>, delta: f64) {
    if let Some(notice) = slot.as_mut() {
        notice.remaining_secs -= delta;
        if notice.remaining_secs <= 0.0 {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> NotificationGateway {
        NotificationGateway::new(NotificationSettings::default())
    }

    #[test]
    fn test_warning_expires_after_budget() {
        let mut gw = gateway();
        gw.absorb(&[DirectorEvent::WarningRaised {
            message: WARNING_TEXT.to_string(),
        }]);
        gw.advance(2.5);
        assert!((gw.warning().unwrap().remaining_secs - 0.5).abs() < 1e-9);
        gw.advance(0.5);
        assert!(gw.warning().is_none());
    }

    #[test]
    fn test_feedback_replaced_with_fresh_budget() {
        let mut gw = gateway();
        gw.absorb(&[DirectorEvent::feedback("first")]);
        gw.advance(4.0);
        gw.absorb(&[DirectorEvent::feedback("second")]);
        let notice = gw.feedback().unwrap();
        assert_eq!(notice.message, "second");
        assert_eq!(notice.remaining_secs, 5.0);
    }

    #[test]
    fn test_prompt_lifecycle() {
        let mut gw = gateway();
        gw.absorb(&[DirectorEvent::DecisionOpened {
            kind: DecisionKind::ChallengePrompt,
            timeout_secs: 8.0,
        }]);
        let prompt = gw.prompt().unwrap();
        assert_eq!(prompt.kind, DecisionKind::ChallengePrompt);
        assert!(prompt.instructions.contains("enemy damage"));

        gw.advance(1.0);
        assert_eq!(gw.prompt().unwrap().remaining_secs, 7.0);

        gw.absorb(&[DirectorEvent::DecisionResolved {
            kind: DecisionKind::ChallengePrompt,
            accepted: true,
            timed_out: false,
        }]);
        assert!(gw.prompt().is_none());
    }

    #[test]
    fn test_zero_delta_changes_nothing() {
        let mut gw = gateway();
        gw.absorb(&[DirectorEvent::feedback("hold")]);
        gw.advance(0.0);
        assert_eq!(gw.feedback().unwrap().remaining_secs, 5.0);
    }
}
