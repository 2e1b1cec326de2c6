//! Player steering.
//!
//! The solver's velocity is implicit (position minus previous position), so
//! steering works by rewriting the player's `prev_position`: the current
//! implied velocity is blended toward the target each tick and the previous
//! position is set to `pos - v`.

use glam::Vec2;
use petri_core::commands::PlayerCommand;
use petri_core::components::{DNA, PLAYER_TAG, POSITION, PREV_POSITION};
use petri_core::constants::{
    CONTROL_ACCEL_FACTOR, CONTROL_BRAKE_FACTOR, CONTROL_MAX_SPEED, CONTROL_STOP_EPSILON,
};
use petri_core::{EcsError, Registry};

/// Apply the active command to the player's center point. A missing player
/// (eaten, or never spawned) is a no-op.
pub fn run(registry: &mut Registry, command: &PlayerCommand) -> Result<(), EcsError> {
    let player = {
        let tags = registry.store::<u8>(PLAYER_TAG.name)?;
        if tags.count() == 0 {
            return Ok(());
        }
        tags.dense_entities()[0]
    };

    let pi = registry.index_of(player, POSITION.name)?;
    let qi = registry.index_of(player, PREV_POSITION.name)?;
    if pi < 0 || qi < 0 {
        return Ok(());
    }

    // DNA speed scales the top speed; an absent record means 1.0.
    let speed_gene = registry
        .component_data(player, DNA.name)?
        .map_or(1.0, |d| d[0]);

    let pos = {
        let positions = registry.store::<f32>(POSITION.name)?;
        let i = pi as usize * 2;
        Vec2::new(positions.raw_data()[i], positions.raw_data()[i + 1])
    };
    let prev = {
        let prevs = registry.store::<f32>(PREV_POSITION.name)?;
        let i = qi as usize * 2;
        Vec2::new(prevs.raw_data()[i], prevs.raw_data()[i + 1])
    };
    let velocity = pos - prev;

    let new_velocity = match command {
        PlayerCommand::Steer { x, y } => {
            let dir = Vec2::new(*x, *y);
            match dir.try_normalize() {
                Some(dir) => {
                    let target = dir * CONTROL_MAX_SPEED * speed_gene;
                    velocity.lerp(target, CONTROL_ACCEL_FACTOR)
                }
                None => brake(velocity),
            }
        }
        PlayerCommand::Coast => brake(velocity),
    };

    let prevs = registry.store_mut::<f32>(PREV_POSITION.name)?;
    let i = qi as usize * 2;
    prevs.raw_data_mut()[i] = pos.x - new_velocity.x;
    prevs.raw_data_mut()[i + 1] = pos.y - new_velocity.y;
    Ok(())
}

fn brake(velocity: Vec2) -> Vec2 {
    let damped = velocity * (1.0 - CONTROL_BRAKE_FACTOR);
    if damped.length() < CONTROL_STOP_EPSILON {
        Vec2::ZERO
    } else {
        damped
    }
}
