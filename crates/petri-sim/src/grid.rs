//! Uniform-cell broad-phase index.
//!
//! Entities are binned into cells through two intrusive index arrays:
//! `heads[cell]` holds the first entity in that cell and `next[entity]` the
//! following one, -1 terminating each chain. Rebuilding is `clear()` (reset
//! heads only; stale `next` entries become unreachable) plus one `insert`
//! per live point, all allocation-free.
//!
//! The grid only guarantees candidacy: any two points within `cell_size` of
//! each other share a 3x3 neighbor query. Exact radius filtering is the
//! caller's job.

use petri_core::constants::{MAX_ENTITIES, NULL_ENTITY};
use petri_core::types::Bounds;
use petri_core::Entity;

pub struct SpatialHashGrid {
    heads: Vec<i32>,
    next: Vec<i32>,
    cell_size: f32,
    width_in_cells: i32,
    height_in_cells: i32,
    bounds: Bounds,
}

impl SpatialHashGrid {
    pub fn new(bounds: Bounds, cell_size: f32) -> Self {
        let width_in_cells = (bounds.width / cell_size).ceil() as i32;
        let height_in_cells = (bounds.height / cell_size).ceil() as i32;
        Self {
            heads: vec![NULL_ENTITY; (width_in_cells * height_in_cells) as usize],
            next: vec![NULL_ENTITY; MAX_ENTITIES],
            cell_size,
            width_in_cells,
            height_in_cells,
            bounds,
        }
    }

    /// Reset all cell chains. `next` keeps stale values; they are
    /// unreachable once the heads are cut and get overwritten on insert.
    pub fn clear(&mut self) {
        self.heads.fill(NULL_ENTITY);
    }

    /// Prepend an entity to its cell's chain. Coordinates are clamped to the
    /// world bounds first so the cell index is always in range.
    pub fn insert(&mut self, entity: Entity, x: f32, y: f32) {
        let cell = self.cell_index(self.cell_x(x), self.cell_y(y));
        self.next[entity as usize] = self.heads[cell];
        self.heads[cell] = entity;
    }

    pub fn cell_x(&self, x: f32) -> i32 {
        let clamped = x.clamp(0.0, self.bounds.width - 1.0);
        ((clamped / self.cell_size) as i32).clamp(0, self.width_in_cells - 1)
    }

    pub fn cell_y(&self, y: f32) -> i32 {
        let clamped = y.clamp(0.0, self.bounds.height - 1.0);
        ((clamped / self.cell_size) as i32).clamp(0, self.height_in_cells - 1)
    }

    fn cell_index(&self, cx: i32, cy: i32) -> usize {
        (cx + cy * self.width_in_cells) as usize
    }

    pub fn width_in_cells(&self) -> i32 {
        self.width_in_cells
    }

    pub fn height_in_cells(&self) -> i32 {
        self.height_in_cells
    }

    /// Visit every entity in the 3x3 cell block around the query point,
    /// including the querying entity itself if it was inserted.
    pub fn for_each_neighbor(&self, x: f32, y: f32, mut f: impl FnMut(Entity)) {
        let cx = self.cell_x(x);
        let cy = self.cell_y(y);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let nx = cx + dx;
                let ny = cy + dy;
                if nx < 0 || nx >= self.width_in_cells || ny < 0 || ny >= self.height_in_cells {
                    continue;
                }
                let mut entity = self.heads[self.cell_index(nx, ny)];
                while entity != NULL_ENTITY {
                    f(entity);
                    entity = self.next[entity as usize];
                }
            }
        }
    }
}
