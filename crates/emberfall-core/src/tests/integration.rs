//! Integration tests for the full tick.
//!
//! These drive [`Simulation::step`] end to end and check:
//! - Landing and ground snapping
//! - Cooldown gating through player input
//! - Enemy chase and attack decisions
//! - Parry, dash and hit arbitration
//! - Death, kill credit and corpse removal
//! - Determinism of repeated runs

use glam::Vec2;

use crate::director::WaveDirector;
use crate::event::Event;
use crate::resolver::Outcome;
use crate::simulation::{PlayerInput, Simulation};
use crate::state::{ActionState, Direction};

use super::helpers::{
    attack, dash, floor_sim, grounded_enemy, grounded_player, idle, parry, run_idle, FLOOR_TOP,
    FRAME_MS,
};

// =============================================================================
// Movement and terrain
// =============================================================================

#[test]
fn rising_body_lands_and_snaps_to_floor() {
    let mut sim = floor_sim();
    let id = sim.spawn_player(Vec2::new(100.0, 440.0));
    sim.arena_mut().get_mut(id).unwrap().body.velocity.y = -5.0;

    let mut now = 0;
    for _ in 0..200 {
        sim.step(now, &idle());
        now += FRAME_MS;
        if sim.arena().get(id).unwrap().body.on_ground {
            break;
        }
    }

    let player = sim.arena().get(id).unwrap();
    assert!(player.body.on_ground);
    assert_eq!(player.body.position.y, 450.0);
    assert_eq!(player.bounding_box().bottom(), FLOOR_TOP);
    assert_eq!(player.body.velocity.y, 0.0);
    assert_eq!(player.state(), ActionState::Idle);
}

#[test]
fn held_move_runs_then_friction_stops() {
    let mut sim = floor_sim();
    let id = grounded_player(&mut sim, 100.0);
    let right = PlayerInput {
        move_dir: Some(Direction::Right),
        ..PlayerInput::default()
    };

    sim.step(0, &right);
    let player = sim.arena().get(id).unwrap();
    assert_eq!(player.state(), ActionState::Running);
    assert!(player.body.position.x > 100.0);

    run_idle(&mut sim, FRAME_MS, 40);
    let player = sim.arena().get(id).unwrap();
    assert_eq!(player.body.velocity.x, 0.0);
    assert_eq!(player.state(), ActionState::Idle);
}

#[test]
fn jump_leaves_ground_and_returns() {
    let mut sim = floor_sim();
    let id = grounded_player(&mut sim, 100.0);
    let jump = PlayerInput {
        jump: true,
        ..PlayerInput::default()
    };

    let report = sim.step(0, &jump);
    assert_eq!(
        report.transitions_of(id),
        vec![(ActionState::Idle, ActionState::Jumping)]
    );
    assert!(sim.arena().get(id).unwrap().body.position.y < 450.0);

    run_idle(&mut sim, FRAME_MS, 60);
    let player = sim.arena().get(id).unwrap();
    assert!(player.body.on_ground);
    assert_eq!(player.body.position.y, 450.0);
    assert_eq!(player.state(), ActionState::Idle);
}

// =============================================================================
// Cooldowns
// =============================================================================

#[test]
fn second_attack_inside_cooldown_is_ignored() {
    let mut sim = floor_sim();
    let id = grounded_player(&mut sim, 100.0);

    sim.step(1_000, &attack());
    sim.step(1_100, &attack());
    let player = sim.arena().get(id).unwrap();
    assert_eq!(player.action.last_attack, Some(1_000));

    // Past duration but inside cooldown: back to idle, still refused.
    sim.step(1_350, &attack());
    let player = sim.arena().get(id).unwrap();
    assert_eq!(player.state(), ActionState::Idle);
    assert_eq!(player.action.last_attack, Some(1_000));

    sim.step(1_500, &attack());
    assert_eq!(sim.arena().get(id).unwrap().action.last_attack, Some(1_500));
}

// =============================================================================
// Enemy AI
// =============================================================================

#[test]
fn enemy_within_attack_range_swings() {
    let mut sim = floor_sim();
    grounded_player(&mut sim, 100.0);
    // Centres 40 apart.
    let enemy = grounded_enemy(&mut sim, 140.0);

    let report = sim.step(0, &idle());
    let enemy = sim.arena().get(enemy).unwrap();
    assert_eq!(enemy.state(), ActionState::Attacking);
    assert!(!enemy.facing_right);
    assert_eq!(enemy.body.velocity.x, 0.0);
    assert!(report
        .combat()
        .any(|(_, _, outcome)| outcome == Outcome::Hit));
}

#[test]
fn enemy_chases_then_stops_outside_detection() {
    let mut sim = floor_sim();
    grounded_player(&mut sim, 100.0);
    let near = grounded_enemy(&mut sim, 300.0);
    let far = grounded_enemy(&mut sim, 900.0);

    sim.step(0, &idle());
    let near = sim.arena().get(near).unwrap();
    assert!(near.body.position.x < 300.0);
    assert!(!near.facing_right);
    assert_eq!(near.state(), ActionState::Running);

    let far = sim.arena().get(far).unwrap();
    assert_eq!(far.body.position.x, 900.0);
    assert_eq!(far.state(), ActionState::Idle);
}

// =============================================================================
// Combat
// =============================================================================

#[test]
fn chasing_enemy_closes_in_and_lands_a_hit() {
    let mut sim = floor_sim();
    let player = grounded_player(&mut sim, 100.0);
    let enemy = grounded_enemy(&mut sim, 300.0);

    let (reports, _) = run_idle(&mut sim, 0, 120);
    let outcomes: Vec<_> = reports
        .iter()
        .flat_map(|r| r.combat().collect::<Vec<_>>())
        .collect();

    assert_eq!(outcomes.first(), Some(&(enemy, player, Outcome::Hit)));
    assert!(outcomes.iter().all(|(_, _, o)| *o != Outcome::Miss));
    assert!(sim.arena().get(player).unwrap().is_dead());
}

#[test]
fn parry_deflects_enemy_swing() {
    let mut sim = floor_sim();
    let player = grounded_player(&mut sim, 100.0);
    let enemy = grounded_enemy(&mut sim, 140.0);

    let report = sim.step(0, &parry());

    assert_eq!(
        report.combat().collect::<Vec<_>>(),
        vec![(enemy, player, Outcome::Parried)]
    );
    let p = sim.arena().get(player).unwrap();
    assert_eq!(p.state(), ActionState::Parrying);
    assert!(p.body.velocity.x < 0.0);
    assert_eq!(p.progress.successful_parries, 1);
    assert_eq!(p.last_outcome, Some(Outcome::Parried));
}

#[test]
fn dash_parries_first_swing_and_negates_the_rest() {
    let mut sim = floor_sim();
    let player = grounded_player(&mut sim, 100.0);
    sim.arena_mut().get_mut(player).unwrap().progress.enemies_defeated = 15;
    grounded_enemy(&mut sim, 215.0);
    grounded_enemy(&mut sim, 216.0);

    let mut reports = vec![sim.step(0, &dash())];
    assert_eq!(
        sim.arena().get(player).unwrap().state(),
        ActionState::Dashing
    );
    let (more, _) = run_idle(&mut sim, FRAME_MS, 20);
    reports.extend(more);

    let outcomes: Vec<Outcome> = reports
        .iter()
        .flat_map(|r| r.combat().map(|(_, _, o)| o).collect::<Vec<_>>())
        .collect();
    assert_eq!(outcomes, vec![Outcome::Parried, Outcome::NegatedByDash]);

    let p = sim.arena().get(player).unwrap();
    assert_eq!(p.progress.successful_parries, 1);
    assert_ne!(p.state(), ActionState::TakeHit);
    assert!(!p.action.is_invincible);
}

#[test]
fn killing_an_enemy_credits_the_player() {
    let mut sim = floor_sim();
    let player = grounded_player(&mut sim, 100.0);
    let enemy = grounded_enemy(&mut sim, 134.0);

    let first = sim.step(0, &attack());
    assert_eq!(
        first.combat().collect::<Vec<_>>(),
        vec![(player, enemy, Outcome::Hit)]
    );
    assert_eq!(
        sim.arena().get(enemy).unwrap().state(),
        ActionState::TakeHit
    );

    let (reports, _) = run_idle(&mut sim, FRAME_MS, 20);
    let died: Vec<_> = reports.iter().flat_map(|r| r.deaths().collect::<Vec<_>>()).collect();
    assert_eq!(died, vec![enemy]);

    let e = sim.arena().get(enemy).unwrap();
    assert_eq!(e.state(), ActionState::Death);
    assert!(e.is_dead());
    assert_eq!(e.body.velocity.x, 0.0);
    assert_eq!(
        sim.arena().get(player).unwrap().progress.enemies_defeated,
        1
    );
}

#[test]
fn dead_player_stays_dead_and_enemies_stand_down() {
    let mut sim = floor_sim();
    let player = grounded_player(&mut sim, 100.0);
    let enemy = grounded_enemy(&mut sim, 140.0);

    sim.step(0, &idle());
    assert_eq!(
        sim.arena().get(player).unwrap().state(),
        ActionState::TakeHit
    );
    let (reports, now) = run_idle(&mut sim, FRAME_MS, 25);
    assert!(reports.iter().any(|r| r.deaths().any(|id| id == player)));

    let spam = PlayerInput {
        move_dir: Some(Direction::Left),
        jump: true,
        attack: true,
        parry: true,
        dash: true,
    };
    for i in 0..10 {
        let report = sim.step(now + i * FRAME_MS, &spam);
        assert!(report.transitions_of(player).is_empty());
    }
    let p = sim.arena().get(player).unwrap();
    assert_eq!(p.state(), ActionState::Death);
    assert_eq!(p.body.velocity.x, 0.0);

    let e = sim.arena().get(enemy).unwrap();
    assert_ne!(e.state(), ActionState::Attacking);
    assert_eq!(e.body.velocity.x, 0.0);
}

// =============================================================================
// Wave director
// =============================================================================

#[test]
fn director_replaces_fallen_enemy() {
    let mut sim = floor_sim();
    let mut director = WaveDirector::with_seed(sim.config(), 99);
    grounded_player(&mut sim, 100.0);
    let enemy = director.spawn_enemy(sim.arena_mut(), Vec2::new(134.0, 450.0));
    sim.arena_mut().get_mut(enemy).unwrap().body.on_ground = true;

    sim.step(0, &attack());
    let mut now = FRAME_MS;
    let mut events = Vec::new();
    while now < 3_000 {
        sim.step(now, &idle());
        events.extend(director.update(sim.arena_mut(), now));
        now += FRAME_MS;
    }

    assert!(events.contains(&Event::Despawned { entity: enemy }));
    let spawned = events
        .iter()
        .filter(|e| matches!(e, Event::Spawned { .. }))
        .count();
    assert!(spawned >= 1);
    assert!(sim.arena().get(enemy).is_none());
}

// =============================================================================
// Determinism
// =============================================================================

fn scripted_run() -> Simulation {
    let mut sim = floor_sim();
    grounded_player(&mut sim, 100.0);
    grounded_enemy(&mut sim, 400.0);
    grounded_enemy(&mut sim, 700.0);

    let script = [idle(), attack(), parry(), dash()];
    for frame in 0..240u64 {
        let mut input = script[(frame % 4) as usize];
        input.move_dir = if frame % 60 < 30 {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        };
        sim.step(frame * FRAME_MS, &input);
    }
    sim
}

#[test]
fn identical_runs_produce_identical_arenas() {
    let a = serde_json::to_string(scripted_run().arena()).unwrap();
    let b = serde_json::to_string(scripted_run().arena()).unwrap();
    assert_eq!(a, b);
}
