//! Sparse-set component storage.
//!
//! Each registered component kind owns one `ComponentStore`: a sparse array
//! mapping entity id to a dense slot, a dense array mapping slots back to
//! entity ids, and a packed data buffer holding `stride` numeric fields per
//! record. Addition, removal and membership tests are O(1); iteration over
//! the first `count` dense slots is contiguous. Nothing allocates after
//! construction.

use std::any::Any;

use crate::constants::{MAX_ENTITIES, NULL_ENTITY};
use crate::entity::Entity;
use crate::error::EcsError;

/// Numeric element type of a component's data buffer. Two are enough for the
/// whole component table: `f32` for physics data, `u8` for presence tags.
pub trait Element: Copy + Default + 'static {
    fn from_f32(v: f32) -> Self;
    fn to_f32(self) -> f32;
}

impl Element for f32 {
    fn from_f32(v: f32) -> Self {
        v
    }
    fn to_f32(self) -> f32 {
        self
    }
}

impl Element for u8 {
    fn from_f32(v: f32) -> Self {
        v as u8
    }
    fn to_f32(self) -> f32 {
        f32::from(self)
    }
}

pub struct ComponentStore<T: Element> {
    /// entity id -> dense index, NULL_ENTITY when absent.
    sparse: Vec<i32>,
    /// dense index -> entity id, NULL_ENTITY past `count`.
    dense: Vec<i32>,
    /// Packed records: `data[dense_index * stride + k]`.
    data: Vec<T>,
    stride: usize,
    count: usize,
    capacity: usize,
}

impl<T: Element> ComponentStore<T> {
    pub fn new(stride: usize) -> Self {
        Self::with_capacity(stride, MAX_ENTITIES)
    }

    pub fn with_capacity(stride: usize, capacity: usize) -> Self {
        assert!(stride > 0, "component stride must be non-zero");
        Self {
            sparse: vec![NULL_ENTITY; capacity],
            dense: vec![NULL_ENTITY; capacity],
            data: vec![T::default(); capacity * stride],
            stride,
            count: 0,
            capacity,
        }
    }

    /// Upsert a record. Overwrites in place if the entity already has one,
    /// otherwise appends at `count`. `values` must be exactly `stride` long.
    pub fn add(&mut self, entity: Entity, values: &[T]) -> Result<(), EcsError> {
        assert_eq!(values.len(), self.stride, "component value length mismatch");
        if self.has(entity) {
            let idx = self.sparse[entity as usize] as usize;
            self.data[idx * self.stride..(idx + 1) * self.stride].copy_from_slice(values);
            return Ok(());
        }
        if self.count >= self.capacity {
            return Err(EcsError::CapacityExceeded);
        }
        let idx = self.count;
        self.sparse[entity as usize] = idx as i32;
        self.dense[idx] = entity;
        self.data[idx * self.stride..(idx + 1) * self.stride].copy_from_slice(values);
        self.count += 1;
        Ok(())
    }

    /// Remove a record via swap-and-pop: the last record (entire stride block)
    /// relocates into the hole, the displaced entity's sparse entry is
    /// updated, and `count` shrinks. No-op if the entity has no record.
    pub fn remove(&mut self, entity: Entity) {
        if !self.has(entity) {
            return;
        }
        let idx = self.sparse[entity as usize] as usize;
        let last = self.count - 1;
        let last_entity = self.dense[last];

        if idx != last {
            let (head, tail) = self.data.split_at_mut(last * self.stride);
            head[idx * self.stride..(idx + 1) * self.stride]
                .copy_from_slice(&tail[..self.stride]);
            self.dense[idx] = last_entity;
            self.sparse[last_entity as usize] = idx as i32;
        }

        self.sparse[entity as usize] = NULL_ENTITY;
        self.dense[last] = NULL_ENTITY;
        for v in &mut self.data[last * self.stride..(last + 1) * self.stride] {
            *v = T::default();
        }
        self.count -= 1;
    }

    /// O(1) membership test. Ids outside the pool simply do not have records.
    pub fn has(&self, entity: Entity) -> bool {
        entity >= 0
            && (entity as usize) < self.capacity
            && self.sparse[entity as usize] != NULL_ENTITY
    }

    /// Dense index of the entity's record, -1 if absent.
    pub fn index_of(&self, entity: Entity) -> i32 {
        if entity >= 0 && (entity as usize) < self.capacity {
            self.sparse[entity as usize]
        } else {
            NULL_ENTITY
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The record for an entity, if present.
    pub fn get(&self, entity: Entity) -> Option<&[T]> {
        let idx = self.index_of(entity);
        if idx < 0 {
            return None;
        }
        let idx = idx as usize;
        Some(&self.data[idx * self.stride..(idx + 1) * self.stride])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut [T]> {
        let idx = self.index_of(entity);
        if idx < 0 {
            return None;
        }
        let idx = idx as usize;
        Some(&mut self.data[idx * self.stride..(idx + 1) * self.stride])
    }

    /// Backing data buffer. Only the first `count * stride` slots are live.
    pub fn raw_data(&self) -> &[T] {
        &self.data
    }

    pub fn raw_data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Dense entity-id array. Only the first `count` slots are live.
    pub fn dense_entities(&self) -> &[i32] {
        &self.dense
    }
}

/// Capability surface of a store with its element type erased, so the
/// registry can hold heterogeneous stores in one name-keyed collection.
/// Values cross this interface as f32 and convert through [`Element`];
/// systems that need zero-copy iteration downcast via `as_any`.
pub trait Column {
    fn remove(&mut self, entity: Entity);
    fn has(&self, entity: Entity) -> bool;
    fn index_of(&self, entity: Entity) -> i32;
    fn count(&self) -> usize;
    fn stride(&self) -> usize;
    fn add_values(&mut self, entity: Entity, values: &[f32]) -> Result<(), EcsError>;
    fn values_of(&self, entity: Entity) -> Option<Vec<f32>>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Element> Column for ComponentStore<T> {
    fn remove(&mut self, entity: Entity) {
        ComponentStore::remove(self, entity);
    }

    fn has(&self, entity: Entity) -> bool {
        ComponentStore::has(self, entity)
    }

    fn index_of(&self, entity: Entity) -> i32 {
        ComponentStore::index_of(self, entity)
    }

    fn count(&self) -> usize {
        ComponentStore::count(self)
    }

    fn stride(&self) -> usize {
        ComponentStore::stride(self)
    }

    fn add_values(&mut self, entity: Entity, values: &[f32]) -> Result<(), EcsError> {
        assert_eq!(values.len(), self.stride(), "component value length mismatch");
        let mut buf = [T::default(); 8];
        debug_assert!(self.stride() <= buf.len());
        for (slot, v) in buf.iter_mut().zip(values) {
            *slot = T::from_f32(*v);
        }
        let stride = self.stride();
        self.add(entity, &buf[..stride])
    }

    fn values_of(&self, entity: Entity) -> Option<Vec<f32>> {
        self.get(entity)
            .map(|record| record.iter().map(|v| v.to_f32()).collect())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Recover the concrete store behind an erased column handle.
pub fn downcast_mut<'a, T: Element>(
    column: &'a mut dyn Column,
    name: &'static str,
) -> Result<&'a mut ComponentStore<T>, EcsError> {
    column
        .as_any_mut()
        .downcast_mut::<ComponentStore<T>>()
        .ok_or(EcsError::ElementTypeMismatch(name))
}
