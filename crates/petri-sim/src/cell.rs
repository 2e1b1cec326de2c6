//! Soft-body cell construction.
//!
//! A cell is a center point plus a ring of rim points, laced together with
//! soft spoke constraints (center to rim) and stiff rim constraints
//! (neighbor to neighbor). Constraint records live on dedicated entities so
//! destroying a point never takes its constraints' storage with it; the
//! solver skips records whose endpoints are gone.

use petri_core::components::{
    ACCELERATION, COLOR, CONSTRAINT, DNA, FOOD_TAG, PLAYER_TAG, POSITION, PREV_POSITION,
    VERLET_POINT,
};
use petri_core::constants::{
    CENTER_FRICTION, FOOD_FRICTION, FOOD_RADIUS_MAX, FOOD_RADIUS_MIN, RIM_STIFFNESS,
    SEGMENT_FRICTION, SEGMENT_RADIUS, SPOKE_STIFFNESS,
};
use petri_core::types::{Bounds, Dna};
use petri_core::{EcsError, Entity, Registry};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Player,
    Hostile,
}

pub struct CellHandles {
    pub center: Entity,
    pub rim: Vec<Entity>,
}

const HOSTILE_COLOR: [f32; 3] = [0.8, 0.3, 0.3];
const FOOD_COLOR: [f32; 3] = [0.3, 0.8, 0.3];

fn spawn_point(
    registry: &mut Registry,
    x: f32,
    y: f32,
    radius: f32,
    friction: f32,
    color: [f32; 3],
) -> Result<Entity, EcsError> {
    let e = registry.create_entity()?;
    registry.add_component(e, POSITION.name, &[x, y])?;
    registry.add_component(e, PREV_POSITION.name, &[x, y])?;
    registry.add_component(e, ACCELERATION.name, &[0.0, 0.0])?;
    registry.add_component(e, VERLET_POINT.name, &[radius, friction, 0.0])?;
    registry.add_component(e, COLOR.name, &color)?;
    Ok(e)
}

fn spawn_constraint(
    registry: &mut Registry,
    a: Entity,
    b: Entity,
    rest_length: f32,
    stiffness: f32,
) -> Result<Entity, EcsError> {
    let e = registry.create_entity()?;
    registry.add_component(
        e,
        CONSTRAINT.name,
        &[a as f32, b as f32, rest_length, stiffness],
    )?;
    Ok(e)
}

/// Build a cell at `(cx, cy)`. The center point carries half the cell
/// radius; rim points are small and sit on the full-radius circle. The
/// player's center additionally gets the player tag, its DNA record and the
/// DNA's color.
pub fn spawn_cell(
    registry: &mut Registry,
    cx: f32,
    cy: f32,
    radius: f32,
    segments: u32,
    kind: CellKind,
    dna: Option<&Dna>,
) -> Result<CellHandles, EcsError> {
    let color = match (kind, dna) {
        (CellKind::Player, Some(d)) => [d.r, d.g, d.b],
        _ => HOSTILE_COLOR,
    };

    let center = spawn_point(registry, cx, cy, radius * 0.5, CENTER_FRICTION, color)?;
    if kind == CellKind::Player {
        registry.add_component(center, PLAYER_TAG.name, &[1.0])?;
        let d = dna.cloned().unwrap_or_default();
        registry.add_component(center, DNA.name, &d.to_values())?;
    }

    let mut rim = Vec::with_capacity(segments as usize);
    for i in 0..segments {
        let angle = std::f32::consts::TAU * i as f32 / segments as f32;
        let px = cx + radius * angle.cos();
        let py = cy + radius * angle.sin();
        rim.push(spawn_point(
            registry,
            px,
            py,
            SEGMENT_RADIUS,
            SEGMENT_FRICTION,
            color,
        )?);
    }

    // Chord between adjacent rim points on the full circle.
    let chord = 2.0 * radius * (std::f32::consts::PI / segments as f32).sin();
    for i in 0..segments as usize {
        spawn_constraint(registry, center, rim[i], radius, SPOKE_STIFFNESS)?;
        let next = rim[(i + 1) % segments as usize];
        spawn_constraint(registry, rim[i], next, chord, RIM_STIFFNESS)?;
    }

    Ok(CellHandles { center, rim })
}

/// A food pellet is a single free point with the food tag.
pub fn spawn_food(
    registry: &mut Registry,
    rng: &mut ChaCha8Rng,
    bounds: Bounds,
) -> Result<Entity, EcsError> {
    let x = rng.gen_range(0.0..bounds.width);
    let y = rng.gen_range(0.0..bounds.height);
    let radius = rng.gen_range(FOOD_RADIUS_MIN..FOOD_RADIUS_MAX);
    let e = spawn_point(registry, x, y, radius, FOOD_FRICTION, FOOD_COLOR)?;
    registry.add_component(e, FOOD_TAG.name, &[1.0])?;
    Ok(e)
}
