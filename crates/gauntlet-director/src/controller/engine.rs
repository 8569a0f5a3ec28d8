//! Difficulty decision engine
//!
//! Pure decision logic with no display state: it accumulates metrics, runs
//! the periodic evaluation (challenge gate → encode → policy → heuristics →
//! apply or prompt), resolves decisions, drives the learner and persists the
//! value table. Everything the outside world should know about is pushed to
//! an event outbox.
//!
//! ## Tick order
//!
//! 1. time alive, then challenge time
//! 2. challenge deadline (completion wins at the exact boundary)
//! 3. pending decision timeout (auto-decline)
//! 4. evaluation, only when no decision is open

use gauntlet_common::{DifficultyAction, DifficultyLevel, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::challenge::{ChallengeSession, ChallengeStatus};
use crate::config::DirectorConfig;
use crate::controller::params::{CombatTuning, DifficultyParams};
use crate::infra::{FileSnapshotStore, SnapshotStore, ValueSnapshot};
use crate::learning::{Learner, Policy, Transition, ValueStore};
use crate::metrics::{MetricsAccumulator, PerformanceMetrics};
use crate::notify::gateway::WARNING_TEXT;
use crate::notify::DirectorEvent;
use crate::scoring::{PerformanceCalculator, StateEncoder};
use crate::telemetry::DirectorTelemetry;

/// What an open decision is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// Accept a one-level increase
    DifficultyPrompt,
    /// Accept the challenge reward
    ChallengePrompt,
}

/// Decision window waiting for the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingDecision {
    pub kind: DecisionKind,
    /// Time alive when the window opened
    pub opened_at: f64,
    pub timeout_secs: f64,
}

impl PendingDecision {
    pub fn remaining(&self, now: f64) -> f64 {
        (self.timeout_secs - (now - self.opened_at)).max(0.0)
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now - self.opened_at >= self.timeout_secs
    }
}

/// Result of one periodic evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationOutcome {
    /// The challenge was announced instead of a difficulty decision
    ChallengeStarted,
    /// An increase prompt was opened
    IncreaseSuggested,
    Decreased,
    Maintained,
    /// A decision is already open
    Deferred,
}

impl EvaluationOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationOutcome::ChallengeStarted => "challenge_started",
            EvaluationOutcome::IncreaseSuggested => "increase_suggested",
            EvaluationOutcome::Decreased => "decreased",
            EvaluationOutcome::Maintained => "maintained",
            EvaluationOutcome::Deferred => "deferred",
        }
    }
}

/// How a decision turned into a level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Increase,
    Decrease,
    /// `declined` distinguishes a refused prompt from a policy hold
    Maintain { declined: bool },
    ChallengeReward,
}

impl Resolution {
    /// Learner action credited for the transition
    fn action(self) -> DifficultyAction {
        match self {
            Resolution::Increase | Resolution::ChallengeReward => DifficultyAction::Increase,
            Resolution::Decrease => DifficultyAction::Decrease,
            Resolution::Maintain { .. } => DifficultyAction::Maintain,
        }
    }
}

pub struct DifficultyEngine {
    session_id: Uuid,
    config: DirectorConfig,
    level: DifficultyLevel,
    /// Permanent enemy bullet damage earned through challenges
    bullet_damage_bonus: u32,
    health_fraction: f64,
    metrics: MetricsAccumulator,
    store: ValueStore,
    learner: Learner,
    policy: Policy,
    challenge: ChallengeSession,
    pending: Option<PendingDecision>,
    /// Challenge reward waiting for the open decision to close
    queued_challenge_prompt: bool,
    snapshots: Option<Box<dyn SnapshotStore>>,
    telemetry: DirectorTelemetry,
    rng: StdRng,
    outbox: Vec<DirectorEvent>,
}

impl DifficultyEngine {
    /// Build an engine persisting to the configured snapshot file
    pub fn new(config: DirectorConfig) -> Result<Self> {
        let snapshots: Option<Box<dyn SnapshotStore>> = if config.storage.enable_persistence {
            Some(Box::new(FileSnapshotStore::new(config.storage.snapshot_path.clone())))
        } else {
            None
        };
        Self::build(config, snapshots)
    }

    /// Build an engine on an explicit snapshot backend
    pub fn with_snapshot_store(config: DirectorConfig, snapshots: Box<dyn SnapshotStore>) -> Result<Self> {
        Self::build(config, Some(snapshots))
    }

    /// Build an engine that never touches durable storage
    pub fn without_persistence(config: DirectorConfig) -> Result<Self> {
        Self::build(config, None)
    }

    fn build(config: DirectorConfig, snapshots: Option<Box<dyn SnapshotStore>>) -> Result<Self> {
        config.validate()?;

        let session_id = Uuid::now_v7();
        let telemetry = DirectorTelemetry::new()?;
        let store = match snapshots.as_deref() {
            Some(backend) => restore(backend, &telemetry),
            None => ValueStore::new(),
        };
        let rng = match config.learning.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let level = DifficultyLevel::MIN;
        telemetry.difficulty_level.set(level.get() as i64);
        telemetry.value_table_states.set(store.len() as i64);

        info!(
            session = %session_id,
            states = store.len(),
            seeded = config.learning.seed.is_some(),
            "Difficulty engine ready"
        );

        Ok(Self {
            session_id,
            level,
            bullet_damage_bonus: 0,
            health_fraction: 1.0,
            metrics: MetricsAccumulator::new(),
            learner: Learner::new(&config.learning),
            policy: Policy::new(config.learning.epsilon, &config.evaluation),
            challenge: ChallengeSession::new(&config.challenge),
            pending: None,
            queued_challenge_prompt: false,
            snapshots,
            telemetry,
            rng,
            outbox: Vec::new(),
            store,
            config,
        })
    }

    // ============ INBOUND EVENTS ============

    pub fn record_shot_fired(&mut self) {
        self.metrics.record_shot_fired();
    }

    /// Count a hit and re-check the active challenge
    pub fn record_shot_hit(&mut self) {
        self.metrics.record_shot_hit();
        let m = self.metrics.metrics();
        let (accuracy, challenge_time) = (m.accuracy(), m.challenge_time);
        if self.challenge.check_completion(accuracy, challenge_time) {
            self.on_challenge_completed(accuracy);
        }
    }

    pub fn record_kill(&mut self) {
        self.metrics.record_kill();
    }

    pub fn record_damage(&mut self) {
        self.metrics.record_damage();
    }

    pub fn record_position(&mut self, x: f64, y: f64) {
        self.metrics.record_position(x, y);
    }

    /// Live player health; a non-positive maximum counts as full health
    pub fn record_health(&mut self, current: f64, max: f64) {
        self.health_fraction = if max > 0.0 && current.is_finite() {
            (current / max).clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    /// Advance the engine by one frame
    pub fn tick(&mut self, delta_secs: f64) {
        let delta = if delta_secs.is_finite() { delta_secs.max(0.0) } else { 0.0 };
        self.metrics.advance(delta);

        if self.challenge.is_active() {
            self.metrics.advance_challenge(delta);
            let m = self.metrics.metrics();
            let accuracy = m.accuracy();
            match self.challenge.check_deadline(accuracy, m.challenge_time) {
                Some(ChallengeStatus::Completed) => self.on_challenge_completed(accuracy),
                Some(ChallengeStatus::Failed) => self.on_challenge_failed(accuracy),
                _ => {}
            }
        }

        self.expire_pending();

        if self.pending.is_none() && self.evaluation_due() {
            self.evaluate();
        }
    }

    /// Answer the open decision; returns false when nothing was open
    pub fn submit_decision(&mut self, accept: bool) -> bool {
        match self.pending.take() {
            Some(pending) => {
                self.resolve(pending, accept, false);
                true
            }
            None => {
                debug!(accept, "No decision open, ignoring response");
                false
            }
        }
    }

    // ============ EVALUATION ============

    /// Whether the evaluation interval has elapsed
    pub fn evaluation_due(&self) -> bool {
        let m = self.metrics.metrics();
        m.since_last_evaluation() >= self.config.evaluation.interval_at(m.time_alive)
    }

    /// Run one evaluation now
    #[instrument(skip(self), fields(session = %self.session_id, level = self.level.get()))]
    pub fn evaluate(&mut self) -> EvaluationOutcome {
        if self.pending.is_some() {
            return EvaluationOutcome::Deferred;
        }

        let metrics = self.metrics.metrics().clone();
        let accuracy = metrics.accuracy();

        let outcome = if self.challenge.should_trigger(accuracy, self.level) {
            self.start_challenge(&metrics);
            EvaluationOutcome::ChallengeStarted
        } else {
            let score = PerformanceCalculator::score(&metrics, self.health_fraction);
            let state = StateEncoder::encode(self.level, &metrics, self.health_fraction);
            let decision = self.policy.decide(&mut self.store, state, score, &mut self.rng);

            if decision.explored {
                self.telemetry.exploration_total.inc();
            }
            if let Some(rule) = decision.overridden {
                debug!(rule = rule.as_str(), score, "Heuristic override");
                self.telemetry
                    .heuristic_overrides_total
                    .with_label_values(&[rule.as_str()])
                    .inc();
            }

            match self.effective_action(decision.action) {
                DifficultyAction::Increase => {
                    self.open_decision(DecisionKind::DifficultyPrompt);
                    self.emit(DirectorEvent::WarningRaised {
                        message: WARNING_TEXT.to_string(),
                    });
                    self.emit(DirectorEvent::feedback(
                        "You're doing well! Consider increasing the difficulty?",
                    ));
                    EvaluationOutcome::IncreaseSuggested
                }
                DifficultyAction::Decrease => {
                    self.apply(Resolution::Decrease);
                    EvaluationOutcome::Decreased
                }
                DifficultyAction::Maintain => {
                    self.apply(Resolution::Maintain { declined: false });
                    EvaluationOutcome::Maintained
                }
            }
        };

        info!(
            outcome = outcome.as_str(),
            accuracy,
            time_alive = metrics.time_alive,
            "Evaluation complete"
        );
        self.telemetry
            .evaluations_total
            .with_label_values(&[outcome.as_str()])
            .inc();
        outcome
    }

    /// Increase at the top and decrease at the bottom both hold the level
    fn effective_action(&self, action: DifficultyAction) -> DifficultyAction {
        match action {
            DifficultyAction::Increase if self.level.is_max() => DifficultyAction::Maintain,
            DifficultyAction::Decrease if self.level.is_min() => DifficultyAction::Maintain,
            other => other,
        }
    }

    // ============ CHALLENGE ============

    fn start_challenge(&mut self, metrics: &PerformanceMetrics) {
        if !self.challenge.start(metrics.time_alive) {
            return;
        }
        self.metrics.reset_challenge_clock();
        self.metrics.mark_evaluation();
        self.telemetry
            .challenge_outcomes_total
            .with_label_values(&["started"])
            .inc();

        let duration_secs = self.challenge.duration_secs();
        let target_accuracy = self.challenge.accuracy_threshold();
        self.emit(DirectorEvent::ChallengeStarted {
            duration_secs,
            target_accuracy,
        });
        self.emit(DirectorEvent::feedback(format!(
            "Challenge started! Maintain {:.0}% accuracy for {}.",
            target_accuracy * 100.0,
            format_duration(duration_secs)
        )));
    }

    fn on_challenge_completed(&mut self, accuracy: f64) {
        self.telemetry
            .challenge_outcomes_total
            .with_label_values(&["completed"])
            .inc();
        self.emit(DirectorEvent::ChallengeCompleted { accuracy });

        if self.pending.is_none() {
            self.open_decision(DecisionKind::ChallengePrompt);
        } else {
            debug!("Decision already open, queueing challenge reward prompt");
            self.queued_challenge_prompt = true;
        }
    }

    fn on_challenge_failed(&mut self, accuracy: f64) {
        self.telemetry
            .challenge_outcomes_total
            .with_label_values(&["failed"])
            .inc();
        self.emit(DirectorEvent::ChallengeFailed { accuracy });
        self.emit(DirectorEvent::feedback("Challenge failed! Better luck next time."));
    }

    // ============ DECISIONS ============

    fn open_decision(&mut self, kind: DecisionKind) {
        let timeout_secs = self.config.notifications.prompt_secs;
        self.pending = Some(PendingDecision {
            kind,
            opened_at: self.metrics.metrics().time_alive,
            timeout_secs,
        });
        debug!(?kind, timeout_secs, "Decision opened");
        self.emit(DirectorEvent::DecisionOpened { kind, timeout_secs });
    }

    fn expire_pending(&mut self) {
        let now = self.metrics.metrics().time_alive;
        if let Some(pending) = self.pending.filter(|p| p.is_expired(now)) {
            self.pending = None;
            info!(kind = ?pending.kind, "Decision timed out, declining");
            self.resolve(pending, false, true);
        }
    }

    #[instrument(skip(self, pending), fields(session = %self.session_id, kind = ?pending.kind))]
    fn resolve(&mut self, pending: PendingDecision, accepted: bool, timed_out: bool) {
        self.emit(DirectorEvent::DecisionResolved {
            kind: pending.kind,
            accepted,
            timed_out,
        });

        match (pending.kind, accepted) {
            (DecisionKind::DifficultyPrompt, true) => self.apply(Resolution::Increase),
            (DecisionKind::DifficultyPrompt, false) => self.apply(Resolution::Maintain { declined: true }),
            (DecisionKind::ChallengePrompt, true) => self.apply(Resolution::ChallengeReward),
            (DecisionKind::ChallengePrompt, false) => {
                // closes the evaluation window without a transition
                self.metrics.mark_evaluation();
                self.emit(DirectorEvent::feedback(
                    "Challenge reward declined. Difficulty remains the same.",
                ));
            }
        }

        if self.queued_challenge_prompt && self.pending.is_none() {
            self.queued_challenge_prompt = false;
            self.open_decision(DecisionKind::ChallengePrompt);
        }
    }

    /// Change the level, learn from the transition and close the evaluation window
    fn apply(&mut self, resolution: Resolution) {
        let health = self.health_fraction;
        let before = StateEncoder::encode(self.level, self.metrics.metrics(), health);
        let old_level = self.level;
        let old_tuning = self.tuning();

        let message = match resolution {
            Resolution::Increase => {
                self.level = self.level.raised(1);
                format!(
                    "Difficulty increased to level {}. Enemies are stronger now!",
                    self.level.get()
                )
            }
            Resolution::Decrease => {
                self.level = self.level.lowered(1);
                format!(
                    "Difficulty decreased to level {}. You'll find the game a bit easier.",
                    self.level.get()
                )
            }
            Resolution::Maintain { declined: true } => {
                format!("Difficulty maintained at level {}.", self.level.get())
            }
            Resolution::Maintain { declined: false } => {
                "Difficulty remains the same. You're playing at a good level.".to_string()
            }
            Resolution::ChallengeReward => {
                self.level = self.level.raised(self.config.challenge.reward_levels);
                self.bullet_damage_bonus += self.config.challenge.reward_bullet_damage;
                format!(
                    "Challenge completed! Difficulty jumped to level {}. Enemy bullets now deal more damage!",
                    self.level.get()
                )
            }
        };
        self.emit(DirectorEvent::feedback(message));

        let tuning = self.tuning();
        if self.level != old_level || tuning != old_tuning {
            info!(from = old_level.get(), to = self.level.get(), ?tuning, "Difficulty changed");
            self.emit(DirectorEvent::DifficultyChanged {
                from: old_level,
                to: self.level,
                tuning,
            });
        }

        let metrics = self.metrics.metrics();
        let reward = PerformanceCalculator::reward(metrics, health);
        let after = StateEncoder::encode(self.level, metrics, health);
        let transition = Transition {
            state: before,
            action: resolution.action(),
            reward,
            next_state: after,
        };
        let replayed = self.learner.learn(&mut self.store, transition, &mut self.rng);
        debug!(reward, replayed, "Transition learned");

        if self.level != old_level {
            self.persist();
        }

        self.metrics.reset_window();

        self.telemetry.reward.observe(reward);
        self.telemetry.difficulty_level.set(self.level.get() as i64);
        self.telemetry
            .replay_buffer_len
            .set(self.learner.replay_buffer().len() as i64);
        self.telemetry.value_table_states.set(self.store.len() as i64);
    }

    /// Write the value table; failures are logged and skipped
    fn persist(&self) {
        let Some(backend) = self.snapshots.as_deref() else {
            return;
        };
        let snapshot = ValueSnapshot::capture(&self.store, self.session_id);
        match backend.save(&snapshot) {
            Ok(()) => {
                self.telemetry.record_snapshot("save", true);
                info!(
                    location = %backend.describe(),
                    states = snapshot.entries.len(),
                    "Difficulty model saved"
                );
            }
            Err(e) => {
                self.telemetry.record_snapshot("save", false);
                warn!(location = %backend.describe(), error = %e, "Failed to save difficulty model");
            }
        }
    }

    fn emit(&mut self, event: DirectorEvent) {
        self.outbox.push(event);
    }

    // ============ OUTBOUND QUERIES ============

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<DirectorEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn level(&self) -> DifficultyLevel {
        self.level
    }

    pub fn params(&self) -> DifficultyParams {
        DifficultyParams::for_level(self.level)
    }

    pub fn tuning(&self) -> CombatTuning {
        CombatTuning::derive(&self.config.base_stats, self.level, self.bullet_damage_bonus)
    }

    pub fn bullet_damage_bonus(&self) -> u32 {
        self.bullet_damage_bonus
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        self.metrics.metrics()
    }

    pub fn health_fraction(&self) -> f64 {
        self.health_fraction
    }

    pub fn performance_score(&self) -> f64 {
        PerformanceCalculator::score(self.metrics.metrics(), self.health_fraction)
    }

    pub fn pending_decision(&self) -> Option<&PendingDecision> {
        self.pending.as_ref()
    }

    /// Seconds left on the open decision
    pub fn pending_remaining(&self) -> Option<f64> {
        let now = self.metrics.metrics().time_alive;
        self.pending.map(|p| p.remaining(now))
    }

    pub fn challenge(&self) -> &ChallengeSession {
        &self.challenge
    }

    pub fn value_store(&self) -> &ValueStore {
        &self.store
    }

    pub fn learner(&self) -> &Learner {
        &self.learner
    }

    pub fn telemetry(&self) -> &DirectorTelemetry {
        &self.telemetry
    }

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }
}

/// Load the value table, falling back to an empty one on any failure
fn restore(backend: &dyn SnapshotStore, telemetry: &DirectorTelemetry) -> ValueStore {
    match backend.load().and_then(|s| s.map(ValueSnapshot::into_store).transpose()) {
        Ok(Some(store)) => {
            telemetry.record_snapshot("load", true);
            info!(location = %backend.describe(), states = store.len(), "Difficulty model loaded");
            store
        }
        Ok(None) => {
            debug!(location = %backend.describe(), "No difficulty model found, starting empty");
            ValueStore::new()
        }
        Err(e) => {
            telemetry.record_snapshot("load", false);
            warn!(
                location = %backend.describe(),
                error = %e,
                "Failed to load difficulty model, starting empty"
            );
            ValueStore::new()
        }
    }
}

fn format_duration(secs: f64) -> String {
    let whole = secs.round() as u64;
    if whole % 60 == 0 {
        let minutes = whole / 60;
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    } else {
        format!("{} seconds", whole)
    }
}
