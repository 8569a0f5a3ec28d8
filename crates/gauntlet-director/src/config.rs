//! Director configuration

use std::path::PathBuf;

use gauntlet_common::{GauntletError, Result};
use serde::{Deserialize, Serialize};

/// Optional configuration file read by [`DirectorConfig::load`]
pub const CONFIG_FILE: &str = "gauntlet.toml";

/// Environment prefix for overrides, e.g. `GAUNTLET__LEARNING__EPSILON=0.1`
pub const ENV_PREFIX: &str = "GAUNTLET";

/// Difficulty director configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// Value-table learning settings
    pub learning: LearningSettings,
    /// Evaluation cadence and heuristic thresholds
    pub evaluation: EvaluationSettings,
    /// Skill-challenge settings
    pub challenge: ChallengeSettings,
    /// Display budgets for notifications
    pub notifications: NotificationSettings,
    /// Snapshot persistence
    pub storage: StorageSettings,
    /// Base combat stats scaled by difficulty
    pub base_stats: BaseCombatStats,
    /// Headless simulation settings (binary only)
    pub simulation: SimulationSettings,
}

impl DirectorConfig {
    /// Load configuration from `.env`, an optional config file and the environment
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let path = std::env::var("GAUNTLET_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Load configuration layering `path` (if present) and `GAUNTLET__*` variables over defaults
    pub fn load_from(path: &str) -> Result<Self> {
        let cfg: DirectorConfig = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| GauntletError::Config(e.to_string()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the learner or the challenge timers cannot work with
    pub fn validate(&self) -> Result<()> {
        let l = &self.learning;
        if !(0.0..=1.0).contains(&l.epsilon) {
            return Err(GauntletError::Config(format!(
                "learning.epsilon must be within [0, 1], got {}",
                l.epsilon
            )));
        }
        if !(l.learning_rate > 0.0 && l.learning_rate <= 1.0) {
            return Err(GauntletError::Config(format!(
                "learning.learning_rate must be within (0, 1], got {}",
                l.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&l.discount) {
            return Err(GauntletError::Config(format!(
                "learning.discount must be within [0, 1), got {}",
                l.discount
            )));
        }
        if l.replay_capacity == 0 || l.replay_batch == 0 || l.replay_batch > l.replay_capacity {
            return Err(GauntletError::Config(format!(
                "replay batch {} must be non-zero and fit capacity {}",
                l.replay_batch, l.replay_capacity
            )));
        }

        let durations = [
            ("evaluation.interval_secs", self.evaluation.interval_secs),
            ("evaluation.early_interval_secs", self.evaluation.early_interval_secs),
            ("challenge.duration_secs", self.challenge.duration_secs),
            ("notifications.warning_secs", self.notifications.warning_secs),
            ("notifications.prompt_secs", self.notifications.prompt_secs),
            ("notifications.feedback_secs", self.notifications.feedback_secs),
        ];
        for (name, value) in durations {
            if !(value > 0.0) {
                return Err(GauntletError::Config(format!("{} must be positive, got {}", name, value)));
            }
        }

        if !(0.0..=1.0).contains(&self.challenge.accuracy_threshold)
            || !(0.0..=1.0).contains(&self.challenge.trigger_accuracy)
        {
            return Err(GauntletError::Config(
                "challenge accuracy thresholds must be within [0, 1]".to_string(),
            ));
        }

        Ok(())
    }
}

/// Q-learning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningSettings {
    /// α in the update rule
    pub learning_rate: f64,
    /// γ in the update rule
    pub discount: f64,
    /// Exploration probability
    pub epsilon: f64,
    /// Replay buffer capacity (FIFO)
    pub replay_capacity: usize,
    /// Transitions replayed per applied transition
    pub replay_batch: usize,
    /// Seed for exploration and replay sampling; entropy when unset
    pub seed: Option<u64>,
}

impl Default for LearningSettings {
    fn default() -> Self {
        Self {
            learning_rate: crate::DEFAULT_LEARNING_RATE,
            discount: crate::DEFAULT_DISCOUNT,
            epsilon: crate::DEFAULT_EPSILON,
            replay_capacity: crate::REPLAY_CAPACITY,
            replay_batch: crate::REPLAY_BATCH,
            seed: None,
        }
    }
}

/// Evaluation cadence and heuristic thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Seconds between evaluations once the early phase is over
    pub interval_secs: f64,
    /// Seconds between evaluations during the early phase
    pub early_interval_secs: f64,
    /// Length of the early phase, measured in time alive
    pub early_phase_secs: f64,
    /// Score above which a level-1 player is pushed up
    pub good_performance_threshold: f64,
    /// Score below which the player is pulled down
    pub poor_performance_threshold: f64,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            interval_secs: 60.0,
            early_interval_secs: 30.0,
            early_phase_secs: 180.0,
            good_performance_threshold: 0.7,
            poor_performance_threshold: 0.3,
        }
    }
}

impl EvaluationSettings {
    /// Evaluation interval in effect at `time_alive`
    pub fn interval_at(&self, time_alive: f64) -> f64 {
        if time_alive < self.early_phase_secs {
            self.early_interval_secs
        } else {
            self.interval_secs
        }
    }
}

/// Skill-challenge settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeSettings {
    /// Time budget for a challenge
    pub duration_secs: f64,
    /// Accuracy that completes the challenge
    pub accuracy_threshold: f64,
    /// Accuracy that starts the challenge
    pub trigger_accuracy: f64,
    /// Challenge is only offered below this level
    pub trigger_below_level: u8,
    /// Levels gained when the reward is accepted
    pub reward_levels: u8,
    /// Permanent enemy bullet damage increase on reward
    pub reward_bullet_damage: u32,
}

impl Default for ChallengeSettings {
    fn default() -> Self {
        Self {
            duration_secs: 180.0,
            accuracy_threshold: 0.85,
            trigger_accuracy: 0.75,
            trigger_below_level: 3,
            reward_levels: 2,
            reward_bullet_damage: 1,
        }
    }
}

/// Display budgets, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub warning_secs: f64,
    pub prompt_secs: f64,
    pub feedback_secs: f64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            warning_secs: 3.0,
            prompt_secs: 8.0,
            feedback_secs: 5.0,
        }
    }
}

/// Snapshot persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where the value table is written
    pub snapshot_path: PathBuf,
    /// Load at startup and save on level changes
    pub enable_persistence: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(crate::DEFAULT_SNAPSHOT_PATH),
            enable_persistence: true,
        }
    }
}

/// Enemy and player stats at the nominal multiplier of 1.0
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseCombatStats {
    pub enemy_health: u32,
    pub enemy_fire_interval_ms: u32,
    pub enemy_bullet_damage: u32,
    pub enemy_bullet_speed: u32,
    pub player_bullet_damage: u32,
    /// Enemies never fire faster than this
    pub min_fire_interval_ms: u32,
}

impl Default for BaseCombatStats {
    fn default() -> Self {
        Self {
            enemy_health: 2,
            enemy_fire_interval_ms: 1500,
            enemy_bullet_damage: 1,
            enemy_bullet_speed: 300,
            player_bullet_damage: 2,
            min_fire_interval_ms: 300,
        }
    }
}

/// Headless simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Simulated play time
    pub duration_secs: f64,
    /// Frames per simulated second
    pub frame_rate: u32,
    /// Sleep between frames instead of running flat out
    pub realtime: bool,
    /// Scripted player skill (0-1)
    pub player_skill: f64,
    /// Probability that the scripted player accepts a prompt
    pub accept_probability: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            duration_secs: 900.0,
            frame_rate: 60,
            realtime: false,
            player_skill: 0.8,
            accept_probability: 0.7,
        }
    }
}
