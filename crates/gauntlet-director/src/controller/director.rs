//! Difficulty director facade
//!
//! The single object a host game talks to. It forwards gameplay events to the
//! [`DifficultyEngine`], keeps the [`NotificationGateway`] in step with the
//! engine's events, and queues those events for the host so it can retune
//! live entities when the level changes.

use gauntlet_common::{DifficultyLevel, Result};
use serde::Serialize;
use tracing::debug;

use crate::challenge::ChallengeStatus;
use crate::config::DirectorConfig;
use crate::infra::SnapshotStore;
use crate::notify::{DirectorEvent, Notice, NotificationGateway, PromptNotice};

use super::engine::{DifficultyEngine, PendingDecision};
use super::params::{CombatTuning, DifficultyParams};

/// What a HUD overlay needs each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudStatus {
    pub difficulty_level: DifficultyLevel,
    pub accuracy: f64,
    pub enemies_killed: u64,
    pub performance_score: f64,
    pub challenge_status: ChallengeStatus,
    /// Seconds left while a challenge runs
    pub challenge_remaining_secs: Option<f64>,
    pub challenge_target_accuracy: f64,
}

pub struct DifficultyDirector {
    engine: DifficultyEngine,
    gateway: NotificationGateway,
    /// Events not yet taken by the host
    events: Vec<DirectorEvent>,
}

impl DifficultyDirector {
    /// Director persisting to the configured snapshot file
    pub fn new(config: DirectorConfig) -> Result<Self> {
        let gateway = NotificationGateway::new(config.notifications.clone());
        Ok(Self::assemble(DifficultyEngine::new(config)?, gateway))
    }

    pub fn with_snapshot_store(config: DirectorConfig, snapshots: Box<dyn SnapshotStore>) -> Result<Self> {
        let gateway = NotificationGateway::new(config.notifications.clone());
        Ok(Self::assemble(
            DifficultyEngine::with_snapshot_store(config, snapshots)?,
            gateway,
        ))
    }

    pub fn without_persistence(config: DirectorConfig) -> Result<Self> {
        let gateway = NotificationGateway::new(config.notifications.clone());
        Ok(Self::assemble(DifficultyEngine::without_persistence(config)?, gateway))
    }

    fn assemble(engine: DifficultyEngine, gateway: NotificationGateway) -> Self {
        Self {
            engine,
            gateway,
            events: Vec::new(),
        }
    }

    // ============ INBOUND ============

    pub fn notify_shot_fired(&mut self) {
        self.engine.record_shot_fired();
    }

    pub fn notify_shot_hit(&mut self) {
        self.engine.record_shot_hit();
        self.sync();
    }

    pub fn notify_enemy_killed(&mut self) {
        self.engine.record_kill();
    }

    pub fn notify_damage_taken(&mut self) {
        self.engine.record_damage();
    }

    pub fn report_position(&mut self, x: f64, y: f64) {
        self.engine.record_position(x, y);
    }

    pub fn report_health(&mut self, current: f64, max: f64) {
        self.engine.record_health(current, max);
    }

    /// Per-frame entry point
    ///
    /// Runs the engine first, then counts down what was already on screen,
    /// then shows whatever the engine produced this frame at full budget.
    pub fn tick(&mut self, delta_secs: f64) {
        self.engine.tick(delta_secs);
        self.gateway.advance(delta_secs);
        self.sync();
    }

    /// Player's answer to the open prompt; ignored when nothing is open
    pub fn submit_decision(&mut self, accept: bool) -> bool {
        let resolved = self.engine.submit_decision(accept);
        self.sync();
        resolved
    }

    fn sync(&mut self) {
        let fresh = self.engine.drain_events();
        if fresh.is_empty() {
            return;
        }
        for event in &fresh {
            debug!(event = event.name(), "Director event");
        }
        self.gateway.absorb(&fresh);
        self.events.extend(fresh);
    }

    // ============ OUTBOUND ============

    pub fn difficulty_level(&self) -> DifficultyLevel {
        self.engine.level()
    }

    pub fn difficulty_params(&self) -> DifficultyParams {
        self.engine.params()
    }

    pub fn combat_tuning(&self) -> CombatTuning {
        self.engine.tuning()
    }

    pub fn pending_decision(&self) -> Option<&PendingDecision> {
        self.engine.pending_decision()
    }

    /// Seconds left on the open decision
    pub fn pending_remaining(&self) -> Option<f64> {
        self.engine.pending_remaining()
    }

    pub fn warning(&self) -> Option<&Notice> {
        self.gateway.warning()
    }

    pub fn prompt(&self) -> Option<&PromptNotice> {
        self.gateway.prompt()
    }

    pub fn feedback(&self) -> Option<&Notice> {
        self.gateway.feedback()
    }

    pub fn challenge_status(&self) -> ChallengeStatus {
        self.engine.challenge().status()
    }

    pub fn hud(&self) -> HudStatus {
        let metrics = self.engine.metrics();
        let challenge = self.engine.challenge();
        HudStatus {
            difficulty_level: self.engine.level(),
            accuracy: metrics.accuracy(),
            enemies_killed: metrics.enemies_killed,
            performance_score: self.engine.performance_score(),
            challenge_status: challenge.status(),
            challenge_remaining_secs: challenge.remaining(metrics.challenge_time),
            challenge_target_accuracy: challenge.accuracy_threshold(),
        }
    }

    /// Take every event produced since the last call
    pub fn take_events(&mut self) -> Vec<DirectorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Prometheus text exposition for this director
    pub fn render_metrics(&self) -> Result<String> {
        self.engine.telemetry().render()
    }

    pub fn engine(&self) -> &DifficultyEngine {
        &self.engine
    }
}
