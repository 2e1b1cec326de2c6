//! Simulation engine for PETRI.
//!
//! Owns the component registry, runs the Verlet solver and the gameplay
//! systems at a fixed tick rate, and produces serializable state snapshots
//! for whatever renders or inspects the world. Completely headless.

pub mod cell;
pub mod engine;
pub mod grid;
pub mod persistence;
pub mod systems;
pub mod verlet;

pub use engine::{Engine, GamePhase, SimConfig};
pub use grid::SpatialHashGrid;
pub use petri_core as core;

#[cfg(test)]
mod tests;
