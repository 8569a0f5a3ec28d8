//! End-to-end director scenarios
//!
//! Every test drives the public facade the way a game loop would: events,
//! one-second ticks and prompt answers.

use gauntlet_common::{DifficultyLevel, StateKey};
use gauntlet_director::config::DirectorConfig;
use gauntlet_director::scoring::StateEncoder;
use gauntlet_director::{
    ChallengeStatus, DecisionKind, DifficultyDirector, DirectorEvent, PerformanceMetrics,
};

fn config() -> DirectorConfig {
    let mut cfg = DirectorConfig::default();
    cfg.learning.seed = Some(42);
    cfg.learning.epsilon = 0.0;
    cfg
}

fn director(cfg: DirectorConfig) -> DifficultyDirector {
    DifficultyDirector::without_persistence(cfg).unwrap()
}

fn shoot(d: &mut DifficultyDirector, fired: u32, hit: u32) {
    for i in 0..fired {
        d.notify_shot_fired();
        if i < hit {
            d.notify_shot_hit();
        }
    }
}

/// Tick one second at a time until a decision opens
fn tick_until_prompt(d: &mut DifficultyDirector) -> DecisionKind {
    for _ in 0..120 {
        d.tick(1.0);
        if let Some(pending) = d.pending_decision() {
            return pending.kind;
        }
    }
    panic!("no decision opened within 120s");
}

#[test]
fn scenario_a_perfect_accuracy_fills_top_bucket() {
    let metrics = PerformanceMetrics {
        shots_fired: 10,
        shots_hit: 10,
        ..Default::default()
    };
    let key = StateEncoder::encode(DifficultyLevel::MIN, &metrics, 1.0);
    assert_eq!(key.accuracy, 5);
    assert_eq!(key, StateKey::new(DifficultyLevel::MIN, 5, 5, 0));
}

#[test]
fn scenario_b_strong_start_prompts_increase() {
    let mut cfg = config();
    // full exploration cannot override the heuristic
    cfg.learning.epsilon = 1.0;
    let mut d = director(cfg);

    shoot(&mut d, 10, 7);
    for _ in 0..10 {
        d.notify_enemy_killed();
    }
    assert!(d.hud().performance_score > 0.7);

    assert_eq!(tick_until_prompt(&mut d), DecisionKind::DifficultyPrompt);
    assert_eq!(d.warning().unwrap().message, "DIFFICULTY INCREASE SUGGESTED!");
    assert!(d.prompt().unwrap().instructions.contains("Press Y"));
}

#[test]
fn scenario_c_struggling_player_is_eased_without_prompt() {
    let mut d = director(config());

    // climb to level 2 first
    shoot(&mut d, 10, 5);
    assert_eq!(tick_until_prompt(&mut d), DecisionKind::DifficultyPrompt);
    d.submit_decision(true);
    assert_eq!(d.difficulty_level().get(), 2);
    d.take_events();

    d.report_health(5.0, 100.0);
    shoot(&mut d, 20, 1);
    for _ in 0..6 {
        d.notify_damage_taken();
    }
    assert!(d.hud().performance_score < 0.3);

    for _ in 0..30 {
        d.tick(1.0);
        assert!(d.pending_decision().is_none());
    }
    assert_eq!(d.difficulty_level(), DifficultyLevel::MIN);
    let events = d.take_events();
    assert!(events.iter().any(|e| matches!(
        e,
        DirectorEvent::DifficultyChanged { from, to, .. } if from.get() == 2 && to.get() == 1
    )));
    assert!(d.feedback().is_some());
}

#[test]
fn scenario_d_completion_wins_at_exact_deadline() {
    let mut d = director(config());

    // 90% accuracy before the challenge exists
    shoot(&mut d, 10, 9);
    d.tick(30.0);
    assert_eq!(d.challenge_status(), ChallengeStatus::Active);
    assert_eq!(d.hud().challenge_remaining_secs, Some(180.0));

    d.tick(180.0);
    assert_eq!(d.challenge_status(), ChallengeStatus::Completed);
    assert_eq!(d.pending_decision().map(|p| p.kind), Some(DecisionKind::ChallengePrompt));
}

#[test]
fn scenario_d_low_accuracy_fails_at_deadline() {
    let mut d = director(config());
    shoot(&mut d, 10, 8);
    d.tick(30.0);
    assert_eq!(d.challenge_status(), ChallengeStatus::Active);

    // drag accuracy under the target without ever landing a hit
    shoot(&mut d, 20, 0);
    for _ in 0..180 {
        d.tick(1.0);
    }
    assert_eq!(d.challenge_status(), ChallengeStatus::Failed);
    assert!(d
        .take_events()
        .iter()
        .any(|e| matches!(e, DirectorEvent::ChallengeFailed { .. })));

    // never offered again
    shoot(&mut d, 10, 10);
    for _ in 0..120 {
        d.tick(1.0);
        assert_ne!(d.challenge_status(), ChallengeStatus::Active);
    }
}

#[test]
fn scenario_e_challenge_reward_clamps_at_top_level() {
    let mut cfg = config();
    cfg.challenge.trigger_below_level = 10;
    let mut d = director(cfg);

    // a middling player accepts every increase
    while d.difficulty_level().get() < 9 {
        shoot(&mut d, 10, 5);
        assert_eq!(tick_until_prompt(&mut d), DecisionKind::DifficultyPrompt);
        assert!(d.submit_decision(true));
    }
    assert_eq!(d.challenge_status(), ChallengeStatus::Inactive);
    let base_damage = d.combat_tuning().enemy_bullet_damage;

    shoot(&mut d, 10, 9);
    for _ in 0..120 {
        d.tick(1.0);
        if d.challenge_status() == ChallengeStatus::Active {
            break;
        }
    }
    assert_eq!(d.challenge_status(), ChallengeStatus::Active);

    shoot(&mut d, 1, 1);
    assert_eq!(d.challenge_status(), ChallengeStatus::Completed);
    assert_eq!(d.prompt().unwrap().kind, DecisionKind::ChallengePrompt);

    assert!(d.submit_decision(true));
    assert_eq!(d.difficulty_level(), DifficultyLevel::MAX);
    assert_eq!(d.combat_tuning().enemy_bullet_damage, base_damage + 1);
}

#[test]
fn unanswered_prompt_declines_after_eight_seconds() {
    let mut d = director(config());
    shoot(&mut d, 10, 5);
    tick_until_prompt(&mut d);
    d.take_events();

    for _ in 0..7 {
        d.tick(1.0);
    }
    assert!(d.pending_decision().is_some());
    d.tick(1.0);
    assert!(d.pending_decision().is_none());
    assert!(d.prompt().is_none());
    assert_eq!(d.difficulty_level(), DifficultyLevel::MIN);
    assert_eq!(d.feedback().unwrap().message, "Difficulty maintained at level 1.");

    // a late answer finds nothing to resolve
    assert!(!d.submit_decision(true));
    assert_eq!(d.difficulty_level(), DifficultyLevel::MIN);
}

#[test]
fn evaluation_waits_for_open_decision() {
    let mut d = director(config());
    shoot(&mut d, 10, 5);
    tick_until_prompt(&mut d);
    let evaluated_at = d.engine().metrics().last_evaluation_time;

    d.tick(5.0);
    assert_eq!(d.engine().metrics().last_evaluation_time, evaluated_at);
    assert_eq!(
        d.take_events()
            .iter()
            .filter(|e| matches!(e, DirectorEvent::DecisionOpened { .. }))
            .count(),
        1
    );
}

#[test]
fn cadence_slows_after_early_phase() {
    let mut d = director(config());
    let mut evaluations = Vec::new();
    let mut last = 0.0;
    for _ in 0..400 {
        d.tick(1.0);
        d.submit_decision(false);
        let mark = d.engine().metrics().last_evaluation_time;
        if mark != last {
            evaluations.push(mark);
            last = mark;
        }
    }
    assert_eq!(&evaluations[..3], &[30.0, 60.0, 90.0]);
    assert!(evaluations.windows(2).any(|w| w[1] - w[0] == 60.0));
}
