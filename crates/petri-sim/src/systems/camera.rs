//! Camera follow and zoom.

use petri_core::components::{CAMERA_DATA, PLAYER_TAG, POSITION, VERLET_POINT};
use petri_core::constants::{CAMERA_BASE_SCALE, CAMERA_LERP_FACTOR, CAMERA_ZOOM_LERP_FACTOR};
use petri_core::{EcsError, Registry};

/// Ease the camera toward the player and its zoom toward a scale inversely
/// proportional to the player's radius, so a growing cell zooms the view
/// out. No camera or no player leaves the record untouched.
pub fn run(registry: &mut Registry) -> Result<(), EcsError> {
    let camera = {
        let cams = registry.store::<f32>(CAMERA_DATA.name)?;
        if cams.count() == 0 {
            return Ok(());
        }
        cams.dense_entities()[0]
    };
    let player = {
        let tags = registry.store::<u8>(PLAYER_TAG.name)?;
        if tags.count() == 0 {
            return Ok(());
        }
        tags.dense_entities()[0]
    };

    let Some(pos) = registry.component_data(player, POSITION.name)? else {
        return Ok(());
    };
    let Some(vp) = registry.component_data(player, VERLET_POINT.name)? else {
        return Ok(());
    };
    let target_zoom = CAMERA_BASE_SCALE / (2.0 * vp[0].max(1.0));

    let cams = registry.store_mut::<f32>(CAMERA_DATA.name)?;
    let ci = cams.index_of(camera) as usize * 4;
    let data = cams.raw_data_mut();
    data[ci] += (pos[0] - data[ci]) * CAMERA_LERP_FACTOR;
    data[ci + 1] += (pos[1] - data[ci + 1]) * CAMERA_LERP_FACTOR;
    data[ci + 3] = target_zoom;
    data[ci + 2] += (data[ci + 3] - data[ci + 2]) * CAMERA_ZOOM_LERP_FACTOR;
    Ok(())
}
