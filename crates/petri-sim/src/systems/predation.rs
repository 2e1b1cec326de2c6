//! Big-eats-small resolution over the broad-phase grid.

use petri_core::components::{POSITION, VERLET_POINT};
use petri_core::constants::{ABSORPTION, PREDATION_RATIO};
use petri_core::{EcsError, Entity, Registry};

use crate::grid::SpatialHashGrid;

/// A predator eats a neighbor when it is strictly larger than
/// `PREDATION_RATIO` times the neighbor's radius and their circles overlap.
/// The prey is destroyed through the registry (all its components go) and
/// the predator grows by `ABSORPTION` of the prey's area.
///
/// Consumes the grid the solver populated this tick. Destroyed prey are
/// still present in the grid chains, so liveness is re-checked per
/// candidate; predators are re-checked too, since an earlier predator in
/// the same pass may have eaten them. The predator order is a snapshot of
/// the dense list taken before any mutation, walked in descending dense
/// order so swap-and-pop removals never skip or repeat a survivor.
///
/// Returns the number of points eaten.
pub fn run(registry: &mut Registry, grid: &SpatialHashGrid) -> Result<u32, EcsError> {
    let predators: Vec<Entity> = {
        let points = registry.store::<f32>(VERLET_POINT.name)?;
        points.dense_entities()[..points.count()]
            .iter()
            .rev()
            .copied()
            .collect()
    };

    let mut eaten = 0u32;
    let mut candidates: Vec<Entity> = Vec::new();

    for predator in predators {
        let Some((px, py, mut pr)) = point_of(registry, predator)? else {
            continue;
        };

        candidates.clear();
        grid.for_each_neighbor(px, py, |other| {
            if other != predator {
                candidates.push(other);
            }
        });

        for &prey in &candidates {
            let Some((ox, oy, pr_prey)) = point_of(registry, prey)? else {
                continue;
            };
            if pr <= PREDATION_RATIO * pr_prey {
                continue;
            }
            let dx = px - ox;
            let dy = py - oy;
            let min_dist = pr + pr_prey;
            if dx * dx + dy * dy >= min_dist * min_dist {
                continue;
            }

            registry.destroy_entity(prey);
            eaten += 1;
            pr = (pr * pr + ABSORPTION * pr_prey * pr_prey).sqrt();
            let points = registry.store_mut::<f32>(VERLET_POINT.name)?;
            let vi = points.index_of(predator) as usize * 3;
            points.raw_data_mut()[vi] = pr;
        }
    }

    Ok(eaten)
}

/// Position and radius of a live point, `None` if either record is gone.
fn point_of(registry: &Registry, entity: Entity) -> Result<Option<(f32, f32, f32)>, EcsError> {
    let points = registry.store::<f32>(VERLET_POINT.name)?;
    let positions = registry.store::<f32>(POSITION.name)?;
    let vi = points.index_of(entity);
    let pi = positions.index_of(entity);
    if vi < 0 || pi < 0 {
        return Ok(None);
    }
    let radius = points.raw_data()[vi as usize * 3];
    let pos = &positions.raw_data()[pi as usize * 2..pi as usize * 2 + 2];
    Ok(Some((pos[0], pos[1], radius)))
}
