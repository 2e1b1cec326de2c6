//! Snapshot system: queries the registry and builds a complete
//! `StateSnapshot` for the render/UI side.
//!
//! This system is read-only and only hands out copies; no error and no
//! mutable reference ever crosses this boundary.

use serde::{Deserialize, Serialize};

use petri_core::components::{CAMERA_DATA, COLOR, FOOD_TAG, PLAYER_TAG, POSITION, VERLET_POINT};
use petri_core::{EcsError, Registry};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CameraView {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointSnapshot {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub tick: u64,
    pub player_alive: bool,
    pub player_radius: f32,
    pub food_count: usize,
    pub point_count: usize,
    pub camera: CameraView,
    pub points: Vec<PointSnapshot>,
}

/// Build a complete snapshot of the current world state. Points come out in
/// dense order, which is stable between ticks absent spawns and removals.
pub fn build_snapshot(registry: &Registry, tick: u64) -> Result<StateSnapshot, EcsError> {
    let points_store = registry.store::<f32>(VERLET_POINT.name)?;
    let positions = registry.store::<f32>(POSITION.name)?;
    let colors = registry.store::<f32>(COLOR.name)?;

    let count = points_store.count();
    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let entity = points_store.dense_entities()[i];
        let pi = positions.index_of(entity);
        if pi < 0 {
            continue;
        }
        let pi = pi as usize * 2;
        let radius = points_store.raw_data()[i * 3];
        let rgb = match colors.index_of(entity) {
            ci if ci >= 0 => {
                let ci = ci as usize * 3;
                let c = &colors.raw_data()[ci..ci + 3];
                [c[0], c[1], c[2]]
            }
            _ => [1.0, 1.0, 1.0],
        };
        points.push(PointSnapshot {
            x: positions.raw_data()[pi],
            y: positions.raw_data()[pi + 1],
            radius,
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
        });
    }

    let (player_alive, player_radius) = {
        let tags = registry.store::<u8>(PLAYER_TAG.name)?;
        if tags.count() > 0 {
            let player = tags.dense_entities()[0];
            match points_store.index_of(player) {
                vi if vi >= 0 => (true, points_store.raw_data()[vi as usize * 3]),
                _ => (false, 0.0),
            }
        } else {
            (false, 0.0)
        }
    };

    let camera = {
        let cams = registry.store::<f32>(CAMERA_DATA.name)?;
        if cams.count() > 0 {
            let data = &cams.raw_data()[..4];
            CameraView {
                x: data[0],
                y: data[1],
                zoom: data[2],
            }
        } else {
            CameraView::default()
        }
    };

    Ok(StateSnapshot {
        tick,
        player_alive,
        player_radius,
        food_count: registry.count(FOOD_TAG.name)?,
        point_count: count,
        camera,
        points,
    })
}
