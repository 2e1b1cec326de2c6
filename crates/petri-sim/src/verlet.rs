//! Constraint-based soft-body solver.
//!
//! One fixed step runs: integrate -> relax constraints -> populate the
//! broad-phase grid -> resolve collisions -> clamp to bounds. The grid is a
//! per-tick shared artifact: it is built exactly once here, after
//! integration and relaxation, and the predation pass consumes the same
//! populated grid afterwards.

use petri_core::components::{
    ACCELERATION, CONSTRAINT, POSITION, PREV_POSITION, VERLET_POINT,
};
use petri_core::constants::{BOUNCE_DAMPING, CONSTRAINT_ITERATIONS, MIN_DISTANCE_SQ};
use petri_core::store::downcast_mut;
use petri_core::types::Bounds;
use petri_core::{ComponentStore, EcsError, Registry};

use crate::grid::SpatialHashGrid;

/// Disjoint mutable views over the five physics stores for one step.
struct PhysicsBuffers<'a> {
    positions: &'a mut ComponentStore<f32>,
    prev_positions: &'a mut ComponentStore<f32>,
    accelerations: &'a mut ComponentStore<f32>,
    points: &'a mut ComponentStore<f32>,
    constraints: &'a mut ComponentStore<f32>,
}

impl<'a> PhysicsBuffers<'a> {
    fn borrow(registry: &'a mut Registry) -> Result<Self, EcsError> {
        let [pos, prev, acc, points, constraints] = registry.columns_mut([
            POSITION.name,
            PREV_POSITION.name,
            ACCELERATION.name,
            VERLET_POINT.name,
            CONSTRAINT.name,
        ])?;
        Ok(Self {
            positions: downcast_mut(pos, POSITION.name)?,
            prev_positions: downcast_mut(prev, PREV_POSITION.name)?,
            accelerations: downcast_mut(acc, ACCELERATION.name)?,
            points: downcast_mut(points, VERLET_POINT.name)?,
            constraints: downcast_mut(constraints, CONSTRAINT.name)?,
        })
    }
}

pub struct VerletSolver {
    bounds: Bounds,
}

impl VerletSolver {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    /// Advance all points by one fixed step and leave `grid` populated with
    /// their positions for the rest of the tick.
    pub fn step(
        &self,
        registry: &mut Registry,
        grid: &mut SpatialHashGrid,
        dt: f32,
    ) -> Result<(), EcsError> {
        let mut bufs = PhysicsBuffers::borrow(registry)?;
        Self::integrate(&mut bufs, dt);
        Self::relax_constraints(&mut bufs);
        Self::populate_grid(&bufs, grid);
        Self::resolve_collisions(&mut bufs, grid);
        self.apply_boundaries(&mut bufs);
        Ok(())
    }

    /// Verlet integration: velocity is implicit in the distance to the
    /// previous position. Acceleration is a per-step accumulator and is
    /// zeroed after being consumed. Pinned points are skipped entirely.
    fn integrate(bufs: &mut PhysicsBuffers<'_>, dt: f32) {
        let dt_sq = dt * dt;
        let count = bufs.points.count();
        for i in 0..count {
            let entity = bufs.points.dense_entities()[i];
            let vp = &bufs.points.raw_data()[i * 3..i * 3 + 3];
            let friction = vp[1];
            if vp[2] > 0.0 {
                continue;
            }

            let pi = bufs.positions.index_of(entity);
            let qi = bufs.prev_positions.index_of(entity);
            let ai = bufs.accelerations.index_of(entity);
            if pi < 0 || qi < 0 || ai < 0 {
                continue;
            }
            let pi = pi as usize * 2;
            let qi = qi as usize * 2;
            let ai = ai as usize * 2;

            let positions = bufs.positions.raw_data_mut();
            let x = positions[pi];
            let y = positions[pi + 1];
            let prev = bufs.prev_positions.raw_data_mut();
            let vx = (x - prev[qi]) * friction;
            let vy = (y - prev[qi + 1]) * friction;
            let acc = bufs.accelerations.raw_data_mut();

            // Previous position must be written before the current one is
            // overwritten, or the implicit velocity collapses to zero.
            prev[qi] = x;
            prev[qi + 1] = y;
            positions[pi] = x + vx + acc[ai] * dt_sq;
            positions[pi + 1] = y + vy + acc[ai + 1] * dt_sq;
            acc[ai] = 0.0;
            acc[ai + 1] = 0.0;
        }
    }

    /// Gauss-Seidel relaxation over all distance constraints. A fixed
    /// iteration count trades CPU for stiffness accuracy. Constraints whose
    /// endpoints no longer have a position are dangling and skipped.
    fn relax_constraints(bufs: &mut PhysicsBuffers<'_>) {
        let count = bufs.constraints.count();
        for _ in 0..CONSTRAINT_ITERATIONS {
            for c in 0..count {
                let rec = &bufs.constraints.raw_data()[c * 4..c * 4 + 4];
                let entity_a = rec[0] as i32;
                let entity_b = rec[1] as i32;
                let rest_length = rec[2];
                let stiffness = rec[3];

                let ia = bufs.positions.index_of(entity_a);
                let ib = bufs.positions.index_of(entity_b);
                if ia < 0 || ib < 0 {
                    continue;
                }
                let ia = ia as usize * 2;
                let ib = ib as usize * 2;

                let positions = bufs.positions.raw_data_mut();
                let dx = positions[ia] - positions[ib];
                let dy = positions[ia + 1] - positions[ib + 1];
                let dist_sq = (dx * dx + dy * dy).max(MIN_DISTANCE_SQ);
                let dist = dist_sq.sqrt();

                let percent = (dist - rest_length) / dist * 0.5 * stiffness;
                let offset_x = dx * percent;
                let offset_y = dy * percent;

                positions[ia] -= offset_x;
                positions[ia + 1] -= offset_y;
                positions[ib] += offset_x;
                positions[ib + 1] += offset_y;
            }
        }
    }

    fn populate_grid(bufs: &PhysicsBuffers<'_>, grid: &mut SpatialHashGrid) {
        grid.clear();
        let count = bufs.points.count();
        for i in 0..count {
            let entity = bufs.points.dense_entities()[i];
            let pi = bufs.positions.index_of(entity);
            if pi < 0 {
                continue;
            }
            let pi = pi as usize * 2;
            let data = bufs.positions.raw_data();
            grid.insert(entity, data[pi], data[pi + 1]);
        }
    }

    /// Pairwise circle separation over grid neighbors. Each pair is handled
    /// once, by the lower-id point scanning for strictly greater ids.
    /// Exactly coincident centers take a fixed +x normal so the split stays
    /// deterministic instead of dividing by zero.
    fn resolve_collisions(bufs: &mut PhysicsBuffers<'_>, grid: &SpatialHashGrid) {
        let count = bufs.points.count();
        for i in 0..count {
            let entity_a = bufs.points.dense_entities()[i];
            let radius_a = bufs.points.raw_data()[i * 3];
            let ia = bufs.positions.index_of(entity_a);
            if ia < 0 {
                continue;
            }
            let ia = ia as usize * 2;
            let (qx, qy) = {
                let data = bufs.positions.raw_data();
                (data[ia], data[ia + 1])
            };

            let points = &*bufs.points;
            let positions = &mut *bufs.positions;
            grid.for_each_neighbor(qx, qy, |entity_b| {
                if entity_b <= entity_a {
                    return;
                }
                let vb = points.index_of(entity_b);
                let ib = positions.index_of(entity_b);
                if vb < 0 || ib < 0 {
                    return;
                }
                let radius_b = points.raw_data()[vb as usize * 3];
                let ib = ib as usize * 2;

                let data = positions.raw_data_mut();
                let dx = data[ia] - data[ib];
                let dy = data[ia + 1] - data[ib + 1];
                let dist_sq = dx * dx + dy * dy;
                let min_dist = radius_a + radius_b;
                if dist_sq >= min_dist * min_dist {
                    return;
                }

                let dist = dist_sq.sqrt();
                let (nx, ny) = if dist > 1e-6 {
                    (dx / dist, dy / dist)
                } else {
                    (1.0, 0.0)
                };
                let correction = (min_dist - dist) * 0.5;

                data[ia] += nx * correction;
                data[ia + 1] += ny * correction;
                data[ib] -= nx * correction;
                data[ib + 1] -= ny * correction;
            });
        }
    }

    /// Clamp every positioned point to the world rectangle. On a clamp the
    /// previous position is rewritten to `bound + damping * v`, so the next
    /// integration step sees the reflected, damped velocity `-damping * v`.
    fn apply_boundaries(&self, bufs: &mut PhysicsBuffers<'_>) {
        let count = bufs.positions.count();
        let limits = [self.bounds.width, self.bounds.height];
        for i in 0..count {
            let entity = bufs.positions.dense_entities()[i];
            let qi = bufs.prev_positions.index_of(entity);
            if qi < 0 {
                continue;
            }
            let pi = i * 2;
            let qi = qi as usize * 2;

            for axis in 0..2 {
                let positions = bufs.positions.raw_data_mut();
                let value = positions[pi + axis];
                let bound = if value < 0.0 {
                    0.0
                } else if value > limits[axis] {
                    limits[axis]
                } else {
                    continue;
                };
                let prev = bufs.prev_positions.raw_data_mut();
                let v = value - prev[qi + axis];
                positions[pi + axis] = bound;
                prev[qi + axis] = bound + BOUNCE_DAMPING * v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petri_core::components::{self, register_all};
    use petri_core::Entity;

    fn setup() -> (Registry, SpatialHashGrid, VerletSolver) {
        let bounds = Bounds::new(1000.0, 1000.0);
        let mut registry = Registry::new();
        register_all(&mut registry).unwrap();
        let grid = SpatialHashGrid::new(bounds, 100.0);
        let solver = VerletSolver::new(bounds);
        (registry, grid, solver)
    }

    fn spawn_point(
        registry: &mut Registry,
        x: f32,
        y: f32,
        radius: f32,
        friction: f32,
        pinned: bool,
    ) -> Entity {
        let e = registry.create_entity().unwrap();
        registry
            .add_component(e, components::POSITION.name, &[x, y])
            .unwrap();
        registry
            .add_component(e, components::PREV_POSITION.name, &[x, y])
            .unwrap();
        registry
            .add_component(e, components::ACCELERATION.name, &[0.0, 0.0])
            .unwrap();
        registry
            .add_component(
                e,
                components::VERLET_POINT.name,
                &[radius, friction, if pinned { 1.0 } else { 0.0 }],
            )
            .unwrap();
        e
    }

    fn position_of(registry: &Registry, e: Entity) -> (f32, f32) {
        let p = registry
            .component_data(e, components::POSITION.name)
            .unwrap()
            .unwrap();
        (p[0], p[1])
    }

    #[test]
    fn integration_carries_velocity_and_resets_acceleration() {
        let (mut registry, mut grid, solver) = setup();
        let e = spawn_point(&mut registry, 100.0, 100.0, 5.0, 1.0, false);
        // Implied velocity of (2, 0) per step.
        registry
            .add_component(e, components::PREV_POSITION.name, &[98.0, 100.0])
            .unwrap();
        registry
            .add_component(e, components::ACCELERATION.name, &[60.0 * 60.0, 0.0])
            .unwrap();

        solver.step(&mut registry, &mut grid, 1.0 / 60.0).unwrap();

        let (x, y) = position_of(&registry, e);
        // x + vx + a*dt^2 = 100 + 2 + 1
        assert!((x - 103.0).abs() < 1e-3);
        assert_eq!(y, 100.0);
        let acc = registry
            .component_data(e, components::ACCELERATION.name)
            .unwrap()
            .unwrap();
        assert_eq!(acc, vec![0.0, 0.0]);
    }

    #[test]
    fn pinned_points_do_not_move() {
        let (mut registry, mut grid, solver) = setup();
        let e = spawn_point(&mut registry, 100.0, 100.0, 5.0, 1.0, true);
        registry
            .add_component(e, components::PREV_POSITION.name, &[90.0, 90.0])
            .unwrap();

        solver.step(&mut registry, &mut grid, 1.0 / 60.0).unwrap();
        assert_eq!(position_of(&registry, e), (100.0, 100.0));
    }

    #[test]
    fn constraint_converges_to_rest_length() {
        let (mut registry, mut grid, solver) = setup();
        let a = spawn_point(&mut registry, 400.0, 400.0, 1.0, 1.0, false);
        let b = spawn_point(&mut registry, 460.0, 400.0, 1.0, 1.0, false);
        let c = registry.create_entity().unwrap();
        registry
            .add_component(
                c,
                components::CONSTRAINT.name,
                &[a as f32, b as f32, 100.0, 1.0],
            )
            .unwrap();

        solver.step(&mut registry, &mut grid, 1.0 / 60.0).unwrap();

        let (ax, ay) = position_of(&registry, a);
        let (bx, by) = position_of(&registry, b);
        let dist = ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt();
        assert!((dist - 100.0).abs() < 1.0, "distance {dist} not within 1% of rest");
    }

    #[test]
    fn dangling_constraint_is_skipped() {
        let (mut registry, mut grid, solver) = setup();
        let a = spawn_point(&mut registry, 400.0, 400.0, 1.0, 1.0, false);
        let b = spawn_point(&mut registry, 450.0, 400.0, 1.0, 1.0, false);
        let c = registry.create_entity().unwrap();
        registry
            .add_component(
                c,
                components::CONSTRAINT.name,
                &[a as f32, b as f32, 100.0, 1.0],
            )
            .unwrap();

        registry.destroy_entity(b);
        // Must not error or move `a`; the constraint record still names `b`.
        solver.step(&mut registry, &mut grid, 1.0 / 60.0).unwrap();
        assert_eq!(position_of(&registry, a), (400.0, 400.0));
    }

    #[test]
    fn overlapping_circles_separate_exactly() {
        let (mut registry, mut grid, solver) = setup();
        let a = spawn_point(&mut registry, 498.0, 500.0, 5.0, 1.0, false);
        let b = spawn_point(&mut registry, 502.0, 500.0, 5.0, 1.0, false);

        solver.step(&mut registry, &mut grid, 1.0 / 60.0).unwrap();

        let (ax, _) = position_of(&registry, a);
        let (bx, _) = position_of(&registry, b);
        // Overlap of 6 resolved half each, symmetric about the midpoint.
        assert!((ax - 495.0).abs() < 1e-3);
        assert!((bx - 505.0).abs() < 1e-3);
        assert!(((bx - ax) - 10.0).abs() < 1e-3);
    }

    #[test]
    fn coincident_centers_split_along_x() {
        let (mut registry, mut grid, solver) = setup();
        let a = spawn_point(&mut registry, 500.0, 500.0, 4.0, 1.0, false);
        let b = spawn_point(&mut registry, 500.0, 500.0, 4.0, 1.0, false);

        solver.step(&mut registry, &mut grid, 1.0 / 60.0).unwrap();

        let (ax, ay) = position_of(&registry, a);
        let (bx, by) = position_of(&registry, b);
        assert!(ax.is_finite() && bx.is_finite());
        assert_eq!(ay, 500.0);
        assert_eq!(by, 500.0);
        assert!(((ax - bx).abs() - 8.0).abs() < 1e-3);
    }

    #[test]
    fn boundary_bounce_reflects_with_damping() {
        let (mut registry, mut grid, solver) = setup();
        let e = registry.create_entity().unwrap();
        registry
            .add_component(e, components::POSITION.name, &[-3.0, 500.0])
            .unwrap();
        registry
            .add_component(e, components::PREV_POSITION.name, &[0.0, 500.0])
            .unwrap();

        // No verlet_point: integration skips it, only the clamp applies.
        solver.step(&mut registry, &mut grid, 1.0 / 60.0).unwrap();

        let pos = registry
            .component_data(e, components::POSITION.name)
            .unwrap()
            .unwrap();
        let prev = registry
            .component_data(e, components::PREV_POSITION.name)
            .unwrap()
            .unwrap();
        assert_eq!(pos[0], 0.0);
        // Incoming v = -3; implied next velocity must be -0.8 * v = +2.4.
        assert!((pos[0] - prev[0] - 2.4).abs() < 1e-3);
    }
}
