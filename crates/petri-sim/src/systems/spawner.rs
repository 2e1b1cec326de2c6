//! Food population top-up.

use petri_core::components::FOOD_TAG;
use petri_core::constants::FOOD_SPAWN_PER_TICK;
use petri_core::types::Bounds;
use petri_core::{EcsError, Registry};
use rand_chacha::ChaCha8Rng;

use crate::cell;

/// Spawn food until the population reaches `target`, at most
/// `FOOD_SPAWN_PER_TICK` per call. Capacity exhaustion stops the batch
/// quietly; the next tick tries again after predation has freed ids.
pub fn run(
    registry: &mut Registry,
    rng: &mut ChaCha8Rng,
    bounds: Bounds,
    target: usize,
) -> Result<(), EcsError> {
    let current = registry.count(FOOD_TAG.name)?;
    if current >= target {
        return Ok(());
    }
    let missing = (target - current).min(FOOD_SPAWN_PER_TICK);
    for _ in 0..missing {
        match cell::spawn_food(registry, rng, bounds) {
            Ok(_) => {}
            Err(EcsError::CapacityExceeded) => break,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use petri_core::components::register_all;
    use rand::SeedableRng;

    #[test]
    fn tops_up_in_batches_until_target() {
        let mut registry = Registry::new();
        register_all(&mut registry).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let bounds = Bounds::new(1000.0, 1000.0);

        run(&mut registry, &mut rng, bounds, 25).unwrap();
        assert_eq!(registry.count(FOOD_TAG.name).unwrap(), FOOD_SPAWN_PER_TICK);

        run(&mut registry, &mut rng, bounds, 25).unwrap();
        run(&mut registry, &mut rng, bounds, 25).unwrap();
        assert_eq!(registry.count(FOOD_TAG.name).unwrap(), 25);

        // At target: no further spawns.
        run(&mut registry, &mut rng, bounds, 25).unwrap();
        assert_eq!(registry.count(FOOD_TAG.name).unwrap(), 25);
    }
}
