//! # Gauntlet Director
//!
//! Adaptive difficulty for a real-time action game. The director watches the
//! player's performance, and on a fixed cadence decides whether to raise,
//! lower or hold the challenge level. It learns which choice pays off from a
//! tabular value function that survives across sessions, and runs a one-shot
//! accuracy challenge that can escalate difficulty for good.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  DifficultyDirector                      │
//! │  ┌───────────────────────────┐  ┌─────────────────────┐  │
//! │  │     DifficultyEngine      │  │ NotificationGateway │  │
//! │  │  metrics → encoder →      │──▶  warning / prompt / │  │
//! │  │  policy → apply-or-prompt │  │  feedback countdown │  │
//! │  │  challenge state machine  │  └─────────────────────┘  │
//! │  └─────────────┬─────────────┘                           │
//! │  ┌─────────────┴─────────────┐  ┌─────────────────────┐  │
//! │  │ Learner (Q-update+replay) │──▶   SnapshotStore     │  │
//! │  │ ValueStore                │  │ (versioned JSON)    │  │
//! │  └───────────────────────────┘  └─────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The host game calls the `notify_*` and `report_*` methods as events happen,
//! `tick` once per frame, and `submit_decision` when the player answers a
//! prompt. Everything runs on the caller's thread.

pub mod challenge;
pub mod config;
pub mod controller;
pub mod infra;
pub mod learning;
pub mod metrics;
pub mod notify;
pub mod scoring;
pub mod telemetry;

// Re-export core types
pub use challenge::{ChallengeSession, ChallengeStatus};
pub use config::DirectorConfig;
pub use controller::director::{DifficultyDirector, HudStatus};
pub use controller::engine::{DecisionKind, DifficultyEngine, EvaluationOutcome, PendingDecision};
pub use controller::params::{CombatTuning, DifficultyParams, TunableCombatant};
pub use infra::snapshot_store::{FileSnapshotStore, InMemorySnapshotStore, SnapshotStore};
pub use learning::{Learner, Policy, ReplayBuffer, Transition, ValueStore};
pub use metrics::PerformanceMetrics;
pub use notify::{DirectorEvent, NotificationGateway};
pub use telemetry::DirectorTelemetry;

/// Default α for the value update
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Default γ for the value update
pub const DEFAULT_DISCOUNT: f64 = 0.9;

/// Default exploration probability
pub const DEFAULT_EPSILON: f64 = 0.2;

/// Replay buffer capacity
pub const REPLAY_CAPACITY: usize = 1000;

/// Transitions replayed per learning step
pub const REPLAY_BATCH: usize = 32;

/// Default value-table snapshot location
pub const DEFAULT_SNAPSHOT_PATH: &str = "difficulty_model.json";
