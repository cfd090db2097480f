//! # Component Storage
//!
//! Dense, contiguous storage for a single component type.
//!
//! The store keeps three structures in lock-step:
//! - `values`: the component data, packed in `[0, len)`
//! - `slot_to_entity`: the owner of each slot, parallel to `values`
//! - `entity_to_slot`: reverse lookup from entity to slot
//!
//! Removal is a swap-remove: the last slot is moved into the hole and both
//! index maps are repointed, so every operation is O(1) and the live values
//! stay contiguous for iteration.
//!
//! ## Invariant
//!
//! ```text
//! for every stored entity e:  slot_to_entity[entity_to_slot[e]] == e
//! values.len() == slot_to_entity.len() == entity_to_slot.len()
//! ```

use std::any::{type_name, Any};
use std::collections::HashMap;

use super::component::Component;
use super::entity::Entity;
use crate::error::{EcsError, EcsResult};

/// Dense storage for one component type.
///
/// # Example
///
/// ```rust,ignore
/// let mut store: ComponentStore<Health> = ComponentStore::new();
/// store.insert(entity, Health { current: 100.0, max: 100.0 })?;
/// let hp = store.get(entity)?.current;
/// ```
pub struct ComponentStore<T: Component> {
    /// Packed component values.
    values: Vec<T>,
    /// Owner of each slot.
    slot_to_entity: Vec<Entity>,
    /// Slot of each owner.
    entity_to_slot: HashMap<Entity, usize>,
}

impl<T: Component> ComponentStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            slot_to_entity: Vec::new(),
            entity_to_slot: HashMap::new(),
        }
    }

    /// Appends a component for `entity`.
    ///
    /// # Errors
    ///
    /// [`EcsError::DuplicateComponent`] if the entity already has one.
    pub fn insert(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        if self.entity_to_slot.contains_key(&entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: type_name::<T>(),
            });
        }

        let slot = self.values.len();
        self.values.push(value);
        self.slot_to_entity.push(entity);
        self.entity_to_slot.insert(entity, slot);
        Ok(())
    }

    /// Removes and returns the entity's component.
    ///
    /// The value in the last slot is moved into the freed slot.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if the entity has none.
    pub fn remove(&mut self, entity: Entity) -> EcsResult<T> {
        let slot = self
            .entity_to_slot
            .remove(&entity)
            .ok_or_else(|| Self::missing(entity))?;

        let removed = self.values.swap_remove(slot);
        self.slot_to_entity.swap_remove(slot);

        // Repoint the relocated entry, unless the removed slot was the last one
        if let Some(&moved) = self.slot_to_entity.get(slot) {
            self.entity_to_slot.insert(moved, slot);
        }

        Ok(removed)
    }

    /// Gets the entity's component.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if the entity has none.
    #[inline]
    pub fn get(&self, entity: Entity) -> EcsResult<&T> {
        let slot = *self
            .entity_to_slot
            .get(&entity)
            .ok_or_else(|| Self::missing(entity))?;
        Ok(&self.values[slot])
    }

    /// Gets the entity's component mutably.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if the entity has none.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> EcsResult<&mut T> {
        let slot = *self
            .entity_to_slot
            .get(&entity)
            .ok_or_else(|| Self::missing(entity))?;
        Ok(&mut self.values[slot])
    }

    /// Returns true if the entity has this component.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_to_slot.contains_key(&entity)
    }

    /// Removes the entity's component if it has one.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        if self.contains(entity) {
            // Presence was just checked, removal cannot fail
            let _ = self.remove(entity);
        }
    }

    /// Returns the number of components stored.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no components are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Owners of each slot, in dense order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.slot_to_entity
    }

    /// The packed values, in dense order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Iterates over `(entity, component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.slot_to_entity.iter().copied().zip(self.values.iter())
    }

    /// Iterates mutably over `(entity, component)` pairs in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.slot_to_entity.iter().copied().zip(self.values.iter_mut())
    }

    /// Drops every stored component.
    pub fn clear(&mut self) {
        self.values.clear();
        self.slot_to_entity.clear();
        self.entity_to_slot.clear();
    }

    fn missing(entity: Entity) -> EcsError {
        EcsError::MissingComponent {
            entity,
            component: type_name::<T>(),
        }
    }

    /// Verifies both index maps agree with each other.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.values.len(), self.slot_to_entity.len());
        assert_eq!(self.values.len(), self.entity_to_slot.len());
        for (slot, entity) in self.slot_to_entity.iter().enumerate() {
            assert_eq!(self.entity_to_slot[entity], slot);
        }
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentStore`].
///
/// The catalog keeps one of these per registered type so it can fan entity
/// destruction and resets out to every store without knowing `T`.
pub trait ErasedStore: Any {
    /// Removes the entity's component if present; no-op otherwise.
    fn entity_destroyed(&mut self, entity: Entity);

    /// Drops every stored component.
    fn reset(&mut self);

    /// Number of components stored.
    fn len(&self) -> usize;

    /// Returns true if no components are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the stored component type.
    fn component_name(&self) -> &'static str;

    /// Converts to Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Converts to mutable Any for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStore for ComponentStore<T> {
    fn entity_destroyed(&mut self, entity: Entity) {
        ComponentStore::entity_destroyed(self, entity);
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn len(&self) -> usize {
        ComponentStore::len(self)
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
