//! The component vocabulary: names, strides and element types.
//!
//! Field layouts (per dense record):
//! - `position`, `prev_position`: x, y. Previous position doubles as the
//!   implicit velocity source for Verlet integration.
//! - `acceleration`: ax, ay. Per-step force accumulator, zeroed after
//!   integration.
//! - `verlet_point`: radius, friction, pinned (0/1).
//! - `constraint`: entity_a, entity_b, rest_length, stiffness. Stored on a
//!   dedicated entity, not on the points it links, so constraints can be
//!   created and destroyed independently of their endpoints.
//! - `player_tag`, `food_tag`: presence markers, value unused.
//! - `color`: r, g, b. Render hint only; the core never reads it.
//! - `dna`: speed, perception, r, g, b, density. Seeded from the save file.
//! - `camera_data`: x, y, zoom, target_zoom. One record on a camera entity.

use crate::error::EcsError;
use crate::registry::Registry;

pub struct ComponentDef {
    pub name: &'static str,
    pub stride: usize,
}

pub const POSITION: ComponentDef = ComponentDef { name: "position", stride: 2 };
pub const PREV_POSITION: ComponentDef = ComponentDef { name: "prev_position", stride: 2 };
pub const ACCELERATION: ComponentDef = ComponentDef { name: "acceleration", stride: 2 };
pub const VERLET_POINT: ComponentDef = ComponentDef { name: "verlet_point", stride: 3 };
pub const CONSTRAINT: ComponentDef = ComponentDef { name: "constraint", stride: 4 };
pub const PLAYER_TAG: ComponentDef = ComponentDef { name: "player_tag", stride: 1 };
pub const FOOD_TAG: ComponentDef = ComponentDef { name: "food_tag", stride: 1 };
pub const COLOR: ComponentDef = ComponentDef { name: "color", stride: 3 };
pub const DNA: ComponentDef = ComponentDef { name: "dna", stride: 6 };
pub const CAMERA_DATA: ComponentDef = ComponentDef { name: "camera_data", stride: 4 };

/// Register the full component table. Once, at startup.
pub fn register_all(registry: &mut Registry) -> Result<(), EcsError> {
    registry.register::<f32>(POSITION.name, POSITION.stride)?;
    registry.register::<f32>(PREV_POSITION.name, PREV_POSITION.stride)?;
    registry.register::<f32>(ACCELERATION.name, ACCELERATION.stride)?;
    registry.register::<f32>(VERLET_POINT.name, VERLET_POINT.stride)?;
    registry.register::<f32>(CONSTRAINT.name, CONSTRAINT.stride)?;
    registry.register::<u8>(PLAYER_TAG.name, PLAYER_TAG.stride)?;
    registry.register::<u8>(FOOD_TAG.name, FOOD_TAG.stride)?;
    registry.register::<f32>(COLOR.name, COLOR.stride)?;
    registry.register::<f32>(DNA.name, DNA.stride)?;
    registry.register::<f32>(CAMERA_DATA.name, CAMERA_DATA.stride)?;
    Ok(())
}
