//! Scripted player and arena for headless runs

use gauntlet_director::config::SimulationSettings;
use gauntlet_director::{CombatTuning, DifficultyDirector, TunableCombatant};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PLAYER_MAX_HEALTH: f64 = 100.0;
const HEALTH_PER_DAMAGE: f64 = 8.0;
const REGEN_PER_SEC: f64 = 1.5;
const SHOT_COOLDOWN_SECS: f64 = 0.35;
const ENEMY_COUNT: usize = 4;
const ARENA_SIZE: f64 = 800.0;

/// Something on the field
#[derive(Debug, Clone)]
pub struct Combatant {
    pub player: bool,
    pub health: u32,
    pub fire_interval_ms: u32,
}

impl TunableCombatant for Combatant {
    fn set_health(&mut self, health: u32) {
        self.health = health;
    }

    fn set_fire_interval_ms(&mut self, interval_ms: u32) {
        self.fire_interval_ms = interval_ms;
    }

    fn is_player(&self) -> bool {
        self.player
    }
}

/// Player plus enemies; index 0 is the player
pub struct Arena {
    combatants: Vec<Combatant>,
    tuning: CombatTuning,
}

impl Arena {
    pub fn new(tuning: CombatTuning) -> Self {
        let mut combatants = vec![Combatant {
            player: true,
            health: PLAYER_MAX_HEALTH as u32,
            fire_interval_ms: 0,
        }];
        combatants.extend((0..ENEMY_COUNT).map(|_| spawn(&tuning)));
        Self { combatants, tuning }
    }

    /// Push a new tuning onto every live enemy and future spawns
    pub fn retune(&mut self, tuning: CombatTuning) -> usize {
        self.tuning = tuning;
        tuning.apply_to(self.combatants.iter_mut())
    }

    fn enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| !c.player)
    }
}

fn spawn(tuning: &CombatTuning) -> Combatant {
    Combatant {
        player: false,
        health: tuning.enemy_health,
        fire_interval_ms: tuning.enemy_fire_interval_ms,
    }
}

/// Player driven by a fixed skill level and a coin for prompts
pub struct ScriptedPlayer {
    skill: f64,
    accept_probability: f64,
    rng: StdRng,
    health: f64,
    position: (f64, f64),
    shot_cooldown: f64,
    /// Seconds until the player answers the open prompt
    answer_in: Option<f64>,
    pub deaths: u32,
}

impl ScriptedPlayer {
    pub fn new(settings: &SimulationSettings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        Self {
            skill: settings.player_skill.clamp(0.0, 1.0),
            accept_probability: settings.accept_probability.clamp(0.0, 1.0),
            rng,
            health: PLAYER_MAX_HEALTH,
            position: (ARENA_SIZE / 2.0, ARENA_SIZE / 2.0),
            shot_cooldown: 0.0,
            answer_in: None,
            deaths: 0,
        }
    }

    /// Play one frame against the arena, reporting everything to the director
    pub fn step(&mut self, director: &mut DifficultyDirector, arena: &mut Arena, dt: f64) {
        self.shoot(director, arena, dt);
        self.take_fire(director, arena, dt);
        self.wander(director, dt);
        self.answer(director, dt);
    }

    fn shoot(&mut self, director: &mut DifficultyDirector, arena: &mut Arena, dt: f64) {
        self.shot_cooldown -= dt;
        let level = director.difficulty_level().get() as f64;
        let hit_chance = (self.skill * (1.05 - 0.04 * level)).clamp(0.05, 0.98);

        while self.shot_cooldown <= 0.0 {
            self.shot_cooldown += SHOT_COOLDOWN_SECS;
            director.notify_shot_fired();
            if !self.rng.gen_bool(hit_chance) {
                continue;
            }
            director.notify_shot_hit();

            let damage = arena.tuning.player_bullet_damage;
            let tuning = arena.tuning;
            if let Some(target) = arena.combatants.iter_mut().find(|c| !c.player) {
                target.health = target.health.saturating_sub(damage);
                if target.health == 0 {
                    *target = spawn(&tuning);
                    director.notify_enemy_killed();
                }
            }
        }
    }

    fn take_fire(&mut self, director: &mut DifficultyDirector, arena: &Arena, dt: f64) {
        let dodge = 0.4 + 0.5 * self.skill;
        let volleys: f64 = arena
            .enemies()
            .map(|e| dt * 1000.0 / e.fire_interval_ms.max(1) as f64)
            .sum();
        let speed_factor = arena.tuning.enemy_bullet_speed as f64 / 300.0;
        let hit_probability = (volleys * (1.0 - dodge) * speed_factor.min(2.0) * 0.5).clamp(0.0, 1.0);

        if self.rng.gen_bool(hit_probability) {
            director.notify_damage_taken();
            self.health -= HEALTH_PER_DAMAGE * arena.tuning.enemy_bullet_damage as f64;
        }
        self.health = (self.health + REGEN_PER_SEC * dt).min(PLAYER_MAX_HEALTH);
        if self.health <= 0.0 {
            self.deaths += 1;
            self.health = PLAYER_MAX_HEALTH;
        }
        director.report_health(self.health, PLAYER_MAX_HEALTH);
    }

    fn wander(&mut self, director: &mut DifficultyDirector, dt: f64) {
        let speed = 120.0 * dt;
        let (x, y) = self.position;
        let nx = (x + self.rng.gen_range(-speed..=speed)).clamp(0.0, ARENA_SIZE);
        let ny = (y + self.rng.gen_range(-speed..=speed)).clamp(0.0, ARENA_SIZE);
        self.position = (nx, ny);
        director.report_position(nx, ny);
    }

    fn answer(&mut self, director: &mut DifficultyDirector, dt: f64) {
        if director.pending_decision().is_none() {
            self.answer_in = None;
            return;
        }
        // slow answers past the prompt budget let it time out
        let remaining = self
            .answer_in
            .get_or_insert_with(|| self.rng.gen_range(0.5..10.0));
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.answer_in = None;
            let accept = self.rng.gen_bool(self.accept_probability);
            director.submit_decision(accept);
        }
    }
}
