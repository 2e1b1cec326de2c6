//! Integration tests for the engine: determinism, lifecycle and the
//! end-to-end tick pipeline.

use petri_core::commands::PlayerCommand;
use petri_core::components::{CONSTRAINT, FOOD_TAG, VERLET_POINT};
use petri_core::constants::{DT, MAX_ENTITIES};
use petri_core::types::{Bounds, Dna};

use crate::engine::{Engine, GamePhase, SimConfig};

fn small_config(seed: u64) -> SimConfig {
    SimConfig {
        seed,
        bounds: Bounds::new(1000.0, 1000.0),
        target_food: 50,
        starting_dna: Dna::default(),
    }
}

// ---- Determinism ----

#[test]
fn same_seed_same_simulation() {
    let mut engine_a = Engine::new(small_config(12345)).unwrap();
    let mut engine_b = Engine::new(small_config(12345)).unwrap();

    engine_a.queue_command(PlayerCommand::Steer { x: 1.0, y: 0.3 });
    engine_b.queue_command(PlayerCommand::Steer { x: 1.0, y: 0.3 });

    for _ in 0..300 {
        let snap_a = engine_a.tick(DT).unwrap();
        let snap_b = engine_b.tick(DT).unwrap();
        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn different_seeds_diverge() {
    let mut engine_a = Engine::new(small_config(111)).unwrap();
    let mut engine_b = Engine::new(small_config(222)).unwrap();

    // Hostile cells and food spawn at seeded random positions, so the
    // very first snapshots already differ.
    let mut diverged = false;
    for _ in 0..100 {
        let snap_a = engine_a.tick(DT).unwrap();
        let snap_b = engine_b.tick(DT).unwrap();
        if serde_json::to_string(&snap_a).unwrap() != serde_json::to_string(&snap_b).unwrap() {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Tick pipeline ----

#[test]
fn engine_runs_and_feeds_the_world() {
    let mut engine = Engine::new(small_config(7)).unwrap();

    let first = engine.tick(DT).unwrap();
    assert!(first.player_alive);
    assert!(first.food_count > 0, "spawner should start topping up food");

    let mut last_food = first.food_count;
    for _ in 0..30 {
        last_food = engine.tick(DT).unwrap().food_count;
    }
    // Top-up is capped per tick; by now the small target is reached, give
    // or take whatever the cells grazed on the final tick.
    assert!(last_food >= 45, "food population stuck at {last_food}");
    assert_eq!(engine.phase(), GamePhase::Running);
}

#[test]
fn world_stays_within_entity_cap() {
    let mut engine = Engine::new(small_config(3)).unwrap();
    for _ in 0..600 {
        engine.tick(DT).unwrap();
    }
    assert!(engine.registry().active_entities() <= MAX_ENTITIES);

    // Every surviving constraint endpoint is either live or dangling;
    // dangling is allowed, but records themselves must still parse.
    let registry = engine.registry();
    let constraints = registry.store::<f32>(CONSTRAINT.name).unwrap();
    for c in 0..constraints.count() {
        let rec = &constraints.raw_data()[c * 4..c * 4 + 4];
        assert!(rec[0] >= 0.0 && rec[1] >= 0.0);
        assert!(rec[2] > 0.0, "rest length must stay positive");
    }
}

#[test]
fn steering_moves_the_player() {
    let mut engine = Engine::new(small_config(5)).unwrap();
    let start = engine.tick(DT).unwrap();
    let start_cam = (start.camera.x, start.camera.y);

    engine.queue_command(PlayerCommand::Steer { x: 1.0, y: 0.0 });
    let mut snap = start;
    for _ in 0..120 {
        snap = engine.tick(DT).unwrap();
    }
    // The camera trails the player, so sustained steering drags it along.
    assert!(snap.camera.x > start_cam.0 + 10.0);
    assert!((snap.camera.y - start_cam.1).abs() < 50.0);

    engine.queue_command(PlayerCommand::Coast);
    for _ in 0..120 {
        snap = engine.tick(DT).unwrap();
    }
    assert_eq!(engine.phase(), GamePhase::Running);
    assert!(snap.player_alive);
}

#[test]
fn losing_the_player_ends_the_game() {
    let mut engine = Engine::new(small_config(11)).unwrap();
    let snap = engine.tick(DT).unwrap();
    assert!(snap.player_alive);
    assert_eq!(engine.phase(), GamePhase::Running);

    engine.kill_player().unwrap();
    let snap = engine.tick(DT).unwrap();
    assert!(!snap.player_alive);
    assert_eq!(engine.phase(), GamePhase::GameOver);

    // A finished game no longer advances.
    let tick = engine.current_tick();
    engine.tick(DT).unwrap();
    assert_eq!(engine.current_tick(), tick);
}

// ---- Food bookkeeping ----

#[test]
fn predation_consumes_food_over_time() {
    let mut engine = Engine::new(SimConfig {
        seed: 2,
        bounds: Bounds::new(400.0, 400.0),
        target_food: 0,
        starting_dna: Dna::default(),
    })
    .unwrap();

    // No respawns; whatever the cells eat stays eaten.
    let start = engine.tick(DT).unwrap();
    assert_eq!(start.food_count, 0);
    let start_points = start.point_count;
    for _ in 0..600 {
        engine.tick(DT).unwrap();
    }
    let end = engine.tick(DT).unwrap();
    assert!(end.point_count <= start_points);
    assert_eq!(end.food_count, 0);
    assert_eq!(
        engine.registry().count(FOOD_TAG.name).unwrap(),
        end.food_count
    );
    assert_eq!(
        engine.registry().count(VERLET_POINT.name).unwrap(),
        end.point_count
    );
}
