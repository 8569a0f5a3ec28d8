//! Difficulty parameter mapper
//!
//! Level 1 is deliberately softer than the nominal base stats; every level
//! above it scales linearly:
//!
//! ```text
//! health      = 0.7 + 0.30·(level − 1)
//! fire_rate   = 1.5 − 0.15·(level − 1)   (interval multiplier, floor-guarded at 300 ms)
//! bullet_speed = 0.8 + 0.20·(level − 1)
//! ```

use gauntlet_common::DifficultyLevel;
use serde::{Deserialize, Serialize};

use crate::config::BaseCombatStats;

/// Multipliers derived from a difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    pub health_factor: f64,
    pub fire_rate_factor: f64,
    pub bullet_speed_factor: f64,
}

impl DifficultyParams {
    pub fn for_level(level: DifficultyLevel) -> Self {
        let steps = level.steps_above_min() as f64;
        Self {
            health_factor: 0.7 + 0.3 * steps,
            fire_rate_factor: 1.5 - 0.15 * steps,
            bullet_speed_factor: 0.8 + 0.2 * steps,
        }
    }
}

/// Concrete combat values for live and newly spawned entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatTuning {
    pub enemy_health: u32,
    pub enemy_fire_interval_ms: u32,
    pub enemy_bullet_speed: u32,
    pub enemy_bullet_damage: u32,
    pub player_bullet_damage: u32,
}

impl CombatTuning {
    /// Scale base stats by the level's multipliers
    ///
    /// `bullet_damage_bonus` is the permanent increase earned through challenges.
    pub fn derive(base: &BaseCombatStats, level: DifficultyLevel, bullet_damage_bonus: u32) -> Self {
        let params = DifficultyParams::for_level(level);
        let health = (base.enemy_health as f64 * params.health_factor).floor() as u32;
        let interval = (base.enemy_fire_interval_ms as f64 * params.fire_rate_factor).floor().max(0.0) as u32;
        let speed = (base.enemy_bullet_speed as f64 * params.bullet_speed_factor).floor() as u32;

        Self {
            enemy_health: health.max(1),
            enemy_fire_interval_ms: interval.max(base.min_fire_interval_ms),
            enemy_bullet_speed: speed,
            enemy_bullet_damage: base.enemy_bullet_damage + bullet_damage_bonus,
            player_bullet_damage: base.player_bullet_damage,
        }
    }

    /// Apply health and fire interval to every live non-player combatant
    pub fn apply_to<'a, C, I>(&self, combatants: I) -> usize
    where
        C: TunableCombatant + ?Sized + 'a,
        I: IntoIterator<Item = &'a mut C>,
    {
        let mut applied = 0;
        for combatant in combatants {
            if combatant.is_player() {
                continue;
            }
            combatant.set_health(self.enemy_health);
            combatant.set_fire_interval_ms(self.enemy_fire_interval_ms);
            applied += 1;
        }
        applied
    }
}

/// Live game entity that difficulty changes are pushed onto
pub trait TunableCombatant {
    fn set_health(&mut self, health: u32);

    fn set_fire_interval_ms(&mut self, interval_ms: u32);

    /// The player is never retuned
    fn is_player(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_level_one_is_soft() {
        let p = DifficultyParams::for_level(DifficultyLevel::MIN);
        assert!(approx(p.health_factor, 0.7));
        assert!(approx(p.fire_rate_factor, 1.5));
        assert!(approx(p.bullet_speed_factor, 0.8));
    }

    #[test]
    fn test_linear_scaling() {
        let p = DifficultyParams::for_level(DifficultyLevel::new(5));
        assert!(approx(p.health_factor, 1.9));
        assert!(approx(p.fire_rate_factor, 0.9));
        assert!(approx(p.bullet_speed_factor, 1.6));
    }

    #[test]
    fn test_tuning_level_one() {
        let t = CombatTuning::derive(&BaseCombatStats::default(), DifficultyLevel::MIN, 0);
        assert_eq!(t.enemy_health, 1);
        assert_eq!(t.enemy_fire_interval_ms, 2250);
        assert_eq!(t.enemy_bullet_speed, 240);
        assert_eq!(t.enemy_bullet_damage, 1);
        assert_eq!(t.player_bullet_damage, 2);
    }

    #[test]
    fn test_fire_interval_floor() {
        let t = CombatTuning::derive(&BaseCombatStats::default(), DifficultyLevel::MAX, 0);
        // 1500 · (1.5 − 1.35) = 225 → floored to 300
        assert_eq!(t.enemy_fire_interval_ms, 300);
        assert_eq!(t.enemy_health, 6);
        assert_eq!(t.enemy_bullet_speed, 780);
    }

    #[test]
    fn test_bullet_damage_bonus() {
        let t = CombatTuning::derive(&BaseCombatStats::default(), DifficultyLevel::new(3), 1);
        assert_eq!(t.enemy_bullet_damage, 2);
    }

    struct Dummy {
        player: bool,
        health: u32,
        interval: u32,
    }

    impl TunableCombatant for Dummy {
        fn set_health(&mut self, health: u32) {
            self.health = health;
        }

        fn set_fire_interval_ms(&mut self, interval_ms: u32) {
            self.interval = interval_ms;
        }

        fn is_player(&self) -> bool {
            self.player
        }
    }

    #[test]
    fn test_apply_skips_player() {
        let mut crowd = vec![
            Dummy { player: true, health: 10, interval: 0 },
            Dummy { player: false, health: 10, interval: 0 },
            Dummy { player: false, health: 10, interval: 0 },
        ];
        let tuning = CombatTuning::derive(&BaseCombatStats::default(), DifficultyLevel::new(4), 0);
        assert_eq!(tuning.apply_to(crowd.iter_mut()), 2);
        assert_eq!(crowd[0].health, 10);
        assert_eq!(crowd[1].health, tuning.enemy_health);
        assert_eq!(crowd[2].interval, tuning.enemy_fire_interval_ms);
    }
}
