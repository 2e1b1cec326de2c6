//! The registry ("world"): owns the entity pool and every component store.

use std::collections::HashMap;

use crate::entity::{Entity, EntityManager};
use crate::error::EcsError;
use crate::store::{Column, ComponentStore, Element};

/// Central container for the ECS. Component kinds are fixed at startup via
/// [`Registry::register`]; entity destruction cascades across every store.
/// Stores are independent, so the cascade order is undefined.
pub struct Registry {
    entities: EntityManager,
    stores: HashMap<&'static str, Box<dyn Column>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: EntityManager::new(),
            stores: HashMap::new(),
        }
    }

    /// Register a component kind. Once per name, at startup.
    pub fn register<T: Element>(
        &mut self,
        name: &'static str,
        stride: usize,
    ) -> Result<(), EcsError> {
        if self.stores.contains_key(name) {
            return Err(EcsError::DuplicateComponent(name));
        }
        self.stores
            .insert(name, Box::new(ComponentStore::<T>::new(stride)));
        Ok(())
    }

    pub fn create_entity(&mut self) -> Result<Entity, EcsError> {
        self.entities.create()
    }

    /// Destroy an entity: remove it from every registered store, then
    /// return the id to the pool.
    pub fn destroy_entity(&mut self, entity: Entity) {
        for store in self.stores.values_mut() {
            store.remove(entity);
        }
        self.entities.destroy(entity);
    }

    pub fn active_entities(&self) -> usize {
        self.entities.active_count()
    }

    fn column(&self, name: &'static str) -> Result<&dyn Column, EcsError> {
        self.stores
            .get(name)
            .map(|b| b.as_ref())
            .ok_or(EcsError::UnknownComponent(name))
    }

    fn column_mut(&mut self, name: &'static str) -> Result<&mut (dyn Column + 'static), EcsError> {
        self.stores
            .get_mut(name)
            .map(|b| b.as_mut())
            .ok_or(EcsError::UnknownComponent(name))
    }

    // --- Erased surface for external collaborators ---

    pub fn add_component(
        &mut self,
        entity: Entity,
        name: &'static str,
        values: &[f32],
    ) -> Result<(), EcsError> {
        self.column_mut(name)?.add_values(entity, values)
    }

    pub fn remove_component(&mut self, entity: Entity, name: &'static str) -> Result<(), EcsError> {
        self.column_mut(name)?.remove(entity);
        Ok(())
    }

    pub fn has_component(&self, entity: Entity, name: &'static str) -> Result<bool, EcsError> {
        Ok(self.column(name)?.has(entity))
    }

    /// The entity's record as f32 values, `None` if absent.
    pub fn component_data(
        &self,
        entity: Entity,
        name: &'static str,
    ) -> Result<Option<Vec<f32>>, EcsError> {
        Ok(self.column(name)?.values_of(entity))
    }

    pub fn count(&self, name: &'static str) -> Result<usize, EcsError> {
        Ok(self.column(name)?.count())
    }

    pub fn index_of(&self, entity: Entity, name: &'static str) -> Result<i32, EcsError> {
        Ok(self.column(name)?.index_of(entity))
    }

    /// Disjoint mutable access to several stores at once, for systems that
    /// iterate one component's dense array while writing another's buffers.
    /// Names must be distinct.
    pub fn columns_mut<const N: usize>(
        &mut self,
        names: [&'static str; N],
    ) -> Result<[&mut dyn Column; N], EcsError> {
        let mut picked: [Option<&mut dyn Column>; N] = [const { None }; N];
        for (key, store) in self.stores.iter_mut() {
            if let Some(i) = names.iter().position(|n| n == key) {
                picked[i] = Some(store.as_mut());
            }
        }
        for (i, slot) in picked.iter().enumerate() {
            if slot.is_none() {
                return Err(EcsError::UnknownComponent(names[i]));
            }
        }
        Ok(picked.map(|slot| slot.expect("presence checked above")))
    }

    // --- Typed surface for systems (zero-copy bulk iteration) ---

    pub fn store<T: Element>(&self, name: &'static str) -> Result<&ComponentStore<T>, EcsError> {
        self.column(name)?
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .ok_or(EcsError::ElementTypeMismatch(name))
    }

    pub fn store_mut<T: Element>(
        &mut self,
        name: &'static str,
    ) -> Result<&mut ComponentStore<T>, EcsError> {
        self.column_mut(name)?
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .ok_or(EcsError::ElementTypeMismatch(name))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.register::<f32>("position", 2).unwrap();
        reg.register::<u8>("food_tag", 1).unwrap();
        reg
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut reg = registry();
        assert_eq!(
            reg.register::<f32>("position", 2),
            Err(EcsError::DuplicateComponent("position"))
        );
    }

    #[test]
    fn unknown_component_fails() {
        let reg = registry();
        assert_eq!(
            reg.count("velocity"),
            Err(EcsError::UnknownComponent("velocity"))
        );
    }

    #[test]
    fn wrong_element_type_fails() {
        let reg = registry();
        assert_eq!(
            reg.store::<f32>("food_tag").err(),
            Some(EcsError::ElementTypeMismatch("food_tag"))
        );
        assert!(reg.store::<u8>("food_tag").is_ok());
    }

    #[test]
    fn destroy_cascades_across_stores() {
        let mut reg = registry();
        let e = reg.create_entity().unwrap();
        reg.add_component(e, "position", &[1.0, 2.0]).unwrap();
        reg.add_component(e, "food_tag", &[1.0]).unwrap();

        reg.destroy_entity(e);
        assert!(!reg.has_component(e, "position").unwrap());
        assert!(!reg.has_component(e, "food_tag").unwrap());
        assert_eq!(reg.active_entities(), 0);

        // The id comes back recycled and starts clean.
        let e2 = reg.create_entity().unwrap();
        assert_eq!(e2, e);
        assert_eq!(reg.component_data(e2, "position").unwrap(), None);
    }

    #[test]
    fn columns_mut_borrows_disjoint_stores() {
        let mut reg = registry();
        let e = reg.create_entity().unwrap();
        reg.add_component(e, "position", &[1.0, 1.0]).unwrap();
        reg.add_component(e, "food_tag", &[1.0]).unwrap();

        let [pos, tag] = reg.columns_mut(["position", "food_tag"]).unwrap();
        assert_eq!(pos.count(), 1);
        tag.remove(e);
        assert_eq!(tag.count(), 0);

        assert_eq!(
            reg.columns_mut(["position", "velocity"]).err(),
            Some(EcsError::UnknownComponent("velocity"))
        );
    }

    #[test]
    fn component_data_round_trip() {
        let mut reg = registry();
        let e = reg.create_entity().unwrap();
        reg.add_component(e, "position", &[3.5, -1.0]).unwrap();
        assert_eq!(
            reg.component_data(e, "position").unwrap(),
            Some(vec![3.5, -1.0])
        );
        assert_eq!(reg.index_of(e, "position").unwrap(), 0);
        assert_eq!(reg.count("position").unwrap(), 1);
    }
}
