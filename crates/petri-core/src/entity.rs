use crate::constants::{MAX_ENTITIES, NULL_ENTITY};
use crate::error::EcsError;

/// Opaque entity handle. Valid ids live in `[0, MAX_ENTITIES)`; the value
/// `NULL_ENTITY` (-1) marks absence in sparse arrays and grid chains, which
/// is why the handle is a signed integer rather than an index type.
pub type Entity = i32;

/// Fixed-pool entity id allocator with LIFO recycling.
///
/// Destroyed ids go onto a free stack and are handed back before any new
/// counter value is issued. Both operations are O(1) and allocation-free
/// after construction.
pub struct EntityManager {
    free_ids: Vec<Entity>,
    next_id: i32,
    capacity: usize,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            free_ids: Vec::with_capacity(capacity),
            next_id: 0,
            capacity,
        }
    }

    /// Create a new entity id, reusing a destroyed one if available.
    pub fn create(&mut self) -> Result<Entity, EcsError> {
        if let Some(id) = self.free_ids.pop() {
            return Ok(id);
        }
        if self.next_id as usize >= self.capacity {
            return Err(EcsError::CapacityExceeded);
        }
        let id = self.next_id;
        self.next_id += 1;
        Ok(id)
    }

    /// Return an id to the pool. Out-of-range or null ids are logged and
    /// ignored.
    pub fn destroy(&mut self, entity: Entity) {
        if entity == NULL_ENTITY {
            return;
        }
        if entity < 0 || entity as usize >= self.capacity {
            eprintln!("attempted to destroy invalid entity id {entity}");
            return;
        }
        self.free_ids.push(entity);
    }

    /// Number of ids currently issued and not yet recycled.
    pub fn active_count(&self) -> usize {
        self.next_id as usize - self.free_ids.len()
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_allocation() {
        let mut mgr = EntityManager::new();
        assert_eq!(mgr.create().unwrap(), 0);
        assert_eq!(mgr.create().unwrap(), 1);
        assert_eq!(mgr.create().unwrap(), 2);
        assert_eq!(mgr.active_count(), 3);
    }

    #[test]
    fn lifo_recycling() {
        let mut mgr = EntityManager::new();
        let a = mgr.create().unwrap();
        let b = mgr.create().unwrap();
        mgr.destroy(a);
        mgr.destroy(b);
        // Most recently destroyed comes back first, before any new id.
        assert_eq!(mgr.create().unwrap(), b);
        assert_eq!(mgr.create().unwrap(), a);
        assert_eq!(mgr.create().unwrap(), 2);
    }

    #[test]
    fn capacity_exceeded() {
        let mut mgr = EntityManager::with_capacity(2);
        mgr.create().unwrap();
        mgr.create().unwrap();
        assert_eq!(mgr.create(), Err(EcsError::CapacityExceeded));
        // Recycling frees capacity again.
        mgr.destroy(0);
        assert_eq!(mgr.create().unwrap(), 0);
    }

    #[test]
    fn invalid_destroy_is_ignored() {
        let mut mgr = EntityManager::with_capacity(4);
        let e = mgr.create().unwrap();
        mgr.destroy(NULL_ENTITY);
        mgr.destroy(-7);
        mgr.destroy(9999);
        assert_eq!(mgr.active_count(), 1);
        mgr.destroy(e);
        assert_eq!(mgr.active_count(), 0);
    }
}
