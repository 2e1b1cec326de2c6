//! Simulation engine.
//!
//! `Engine` owns the registry, the broad-phase grid, the solver and the
//! RNG, processes player commands, runs all systems in a fixed order and
//! produces `StateSnapshot`s. Completely headless, enabling deterministic
//! testing: same seed and same command stream means the same simulation.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use petri_core::commands::PlayerCommand;
use petri_core::components::{register_all, CAMERA_DATA, PLAYER_TAG};
use petri_core::constants::{
    CAMERA_BASE_SCALE, GRID_CELL_SIZE, HOSTILE_CELL_COUNT, HOSTILE_CELL_RADIUS,
    HOSTILE_CELL_SEGMENTS, PLAYER_CELL_RADIUS, PLAYER_CELL_SEGMENTS, TARGET_FOOD_COUNT,
};
use petri_core::types::{Bounds, Dna};
use petri_core::{EcsError, Registry};

use crate::cell::{self, CellKind};
use crate::grid::SpatialHashGrid;
use crate::systems;
use crate::systems::snapshot::StateSnapshot;
use crate::verlet::VerletSolver;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism.
    pub seed: u64,
    pub bounds: Bounds,
    /// Food population the spawner maintains.
    pub target_food: usize,
    /// Player traits, usually loaded from the save file.
    pub starting_dna: Dna,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            bounds: Bounds::default(),
            target_food: TARGET_FOOD_COUNT,
            starting_dna: Dna::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    GameOver,
}

pub struct Engine {
    registry: Registry,
    grid: SpatialHashGrid,
    solver: VerletSolver,
    rng: ChaCha8Rng,
    bounds: Bounds,
    target_food: usize,
    phase: GamePhase,
    tick: u64,
    command_queue: VecDeque<PlayerCommand>,
    /// Steering is level-triggered: the last command stays in effect until
    /// replaced.
    steering: PlayerCommand,
}

impl Engine {
    pub fn new(config: SimConfig) -> Result<Self, EcsError> {
        let mut registry = Registry::new();
        register_all(&mut registry)?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let bounds = config.bounds;

        let cx = bounds.width * 0.5;
        let cy = bounds.height * 0.5;
        cell::spawn_cell(
            &mut registry,
            cx,
            cy,
            PLAYER_CELL_RADIUS,
            PLAYER_CELL_SEGMENTS,
            CellKind::Player,
            Some(&config.starting_dna),
        )?;
        for _ in 0..HOSTILE_CELL_COUNT {
            let x = rng.gen_range(0.0..bounds.width);
            let y = rng.gen_range(0.0..bounds.height);
            cell::spawn_cell(
                &mut registry,
                x,
                y,
                HOSTILE_CELL_RADIUS,
                HOSTILE_CELL_SEGMENTS,
                CellKind::Hostile,
                None,
            )?;
        }

        let camera = registry.create_entity()?;
        let zoom = CAMERA_BASE_SCALE / PLAYER_CELL_RADIUS;
        registry.add_component(camera, CAMERA_DATA.name, &[cx, cy, zoom, zoom])?;

        Ok(Self {
            registry,
            grid: SpatialHashGrid::new(bounds, GRID_CELL_SIZE),
            solver: VerletSolver::new(bounds),
            rng,
            bounds,
            target_food: config.target_food,
            phase: GamePhase::Running,
            tick: 0,
            command_queue: VecDeque::new(),
            steering: PlayerCommand::Coast,
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Advance the simulation by one fixed step and return the resulting
    /// snapshot. Errors here mean a broken component table, which is a
    /// startup configuration defect, not a runtime condition.
    pub fn tick(&mut self, dt: f32) -> Result<StateSnapshot, EcsError> {
        while let Some(command) = self.command_queue.pop_front() {
            self.steering = command;
        }

        if self.phase == GamePhase::Running {
            systems::spawner::run(
                &mut self.registry,
                &mut self.rng,
                self.bounds,
                self.target_food,
            )?;
            systems::control::run(&mut self.registry, &self.steering)?;
            self.solver.step(&mut self.registry, &mut self.grid, dt)?;
            systems::predation::run(&mut self.registry, &self.grid)?;
            systems::camera::run(&mut self.registry)?;

            if self.registry.store::<u8>(PLAYER_TAG.name)?.count() == 0 {
                self.phase = GamePhase::GameOver;
            }
            self.tick += 1;
        }

        systems::snapshot::build_snapshot(&self.registry, self.tick)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Destroy the player's center point (for testing the game-over path).
    #[cfg(test)]
    pub fn kill_player(&mut self) -> Result<(), EcsError> {
        let tags: Vec<_> = {
            let store = self.registry.store::<u8>(PLAYER_TAG.name)?;
            store.dense_entities()[..store.count()].to_vec()
        };
        for entity in tags {
            self.registry.destroy_entity(entity);
        }
        Ok(())
    }
}
