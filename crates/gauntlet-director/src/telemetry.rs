//! Prometheus metrics for the director
//!
//! Each director owns its own registry so several sessions (or tests) can
//! coexist in one process.

use gauntlet_common::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct DirectorTelemetry {
    registry: Registry,
    pub evaluations_total: IntCounterVec,
    pub heuristic_overrides_total: IntCounterVec,
    pub exploration_total: IntCounter,
    pub challenge_outcomes_total: IntCounterVec,
    pub snapshot_operations_total: IntCounterVec,
    pub difficulty_level: IntGauge,
    pub replay_buffer_len: IntGauge,
    pub value_table_states: IntGauge,
    pub reward: Histogram,
}

impl DirectorTelemetry {
    pub fn new() -> Result<Self> {
        let telemetry = Self {
            registry: Registry::new(),
            evaluations_total: IntCounterVec::new(
                Opts::new("gauntlet_evaluations_total", "Difficulty evaluations by outcome"),
                &["outcome"],
            )?,
            heuristic_overrides_total: IntCounterVec::new(
                Opts::new(
                    "gauntlet_heuristic_overrides_total",
                    "Policy choices replaced by a heuristic rule",
                ),
                &["rule"],
            )?,
            exploration_total: IntCounter::new(
                "gauntlet_exploration_total",
                "Evaluations where the policy drew a random action",
            )?,
            challenge_outcomes_total: IntCounterVec::new(
                Opts::new("gauntlet_challenge_outcomes_total", "Challenge lifecycle transitions"),
                &["status"],
            )?,
            snapshot_operations_total: IntCounterVec::new(
                Opts::new("gauntlet_snapshot_operations_total", "Value-table snapshot loads and saves"),
                &["operation", "result"],
            )?,
            difficulty_level: IntGauge::new("gauntlet_difficulty_level", "Current difficulty level")?,
            replay_buffer_len: IntGauge::new(
                "gauntlet_replay_buffer_len",
                "Transitions held for experience replay",
            )?,
            value_table_states: IntGauge::new(
                "gauntlet_value_table_states",
                "Distinct states in the value table",
            )?,
            reward: Histogram::with_opts(
                HistogramOpts::new("gauntlet_reward", "Reward of applied transitions")
                    .buckets(vec![-1.0, -0.5, -0.25, 0.0, 0.25, 0.5, 0.75, 1.0]),
            )?,
        };
        telemetry.register()?;
        Ok(telemetry)
    }

    fn register(&self) -> Result<()> {
        self.registry.register(Box::new(self.evaluations_total.clone()))?;
        self.registry.register(Box::new(self.heuristic_overrides_total.clone()))?;
        self.registry.register(Box::new(self.exploration_total.clone()))?;
        self.registry.register(Box::new(self.challenge_outcomes_total.clone()))?;
        self.registry.register(Box::new(self.snapshot_operations_total.clone()))?;
        self.registry.register(Box::new(self.difficulty_level.clone()))?;
        self.registry.register(Box::new(self.replay_buffer_len.clone()))?;
        self.registry.register(Box::new(self.value_table_states.clone()))?;
        self.registry.register(Box::new(self.reward.clone()))?;
        Ok(())
    }

    pub fn record_snapshot(&self, operation: &str, ok: bool) {
        self.snapshot_operations_total
            .with_label_values(&[operation, if ok { "ok" } else { "error" }])
            .inc();
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Text exposition of every metric
    pub fn render(&self) -> Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| gauntlet_common::GauntletError::Telemetry(e.to_string()))
    }
}
