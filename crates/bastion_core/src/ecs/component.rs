//! # Component Catalog
//!
//! Components are plain data records. The catalog assigns each registered
//! type a small sequential [`ComponentTypeId`] (its bit in a [`Signature`])
//! and owns the type's [`ComponentStore`] behind the [`ErasedStore`] interface.
//!
//! [`Signature`]: super::entity::Signature

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use super::entity::{ComponentTypeId, Entity, MAX_COMPONENT_TYPES};
use super::storage::{ComponentStore, ErasedStore};
use crate::error::{EcsError, EcsResult};

/// Marker trait for ECS components.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Debug)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: 'static {}

/// Registry of component types and their stores.
pub struct ComponentCatalog {
    /// Rust type to catalog id.
    type_ids: HashMap<TypeId, ComponentTypeId>,
    /// Stores indexed by `ComponentTypeId::index`.
    stores: Vec<Box<dyn ErasedStore>>,
}

impl ComponentCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            type_ids: HashMap::new(),
            stores: Vec::new(),
        }
    }

    /// Registers `T`, assigning it the next sequential id.
    ///
    /// # Errors
    ///
    /// [`EcsError::DuplicateComponentType`] if `T` is already registered,
    /// [`EcsError::ComponentTypeLimit`] when every signature bit is taken.
    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        if self.type_ids.contains_key(&TypeId::of::<T>()) {
            return Err(EcsError::DuplicateComponentType(type_name::<T>()));
        }
        if self.stores.len() >= MAX_COMPONENT_TYPES {
            return Err(EcsError::ComponentTypeLimit {
                limit: MAX_COMPONENT_TYPES,
            });
        }

        // Bounded by MAX_COMPONENT_TYPES above
        let id = ComponentTypeId::new(self.stores.len() as u8);
        self.type_ids.insert(TypeId::of::<T>(), id);
        self.stores.push(Box::new(ComponentStore::<T>::new()));

        tracing::debug!(component = type_name::<T>(), id = id.index(), "registered component");
        Ok(id)
    }

    /// Returns the id assigned to `T`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] if `T` was never registered.
    #[inline]
    pub fn type_id<T: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.type_ids
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(EcsError::UnregisteredComponent(type_name::<T>()))
    }

    /// Checks whether `T` is registered.
    #[inline]
    #[must_use]
    pub fn is_registered<T: Component>(&self) -> bool {
        self.type_ids.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered component types.
    #[inline]
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.stores.len()
    }

    /// Typed access to `T`'s store.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] if `T` was never registered.
    pub fn store<T: Component>(&self) -> EcsResult<&ComponentStore<T>> {
        let id = self.type_id::<T>()?;
        self.stores[id.index()]
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .ok_or(EcsError::UnregisteredComponent(type_name::<T>()))
    }

    /// Typed mutable access to `T`'s store.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] if `T` was never registered.
    pub fn store_mut<T: Component>(&mut self) -> EcsResult<&mut ComponentStore<T>> {
        let id = self.type_id::<T>()?;
        self.stores[id.index()]
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .ok_or(EcsError::UnregisteredComponent(type_name::<T>()))
    }

    /// Adds a component to an entity.
    ///
    /// # Errors
    ///
    /// Unregistered type, or the entity already has a `T`.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        self.store_mut::<T>()?.insert(entity, component)
    }

    /// Removes a component from an entity.
    ///
    /// # Errors
    ///
    /// Unregistered type, or the entity has no `T`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> EcsResult<T> {
        self.store_mut::<T>()?.remove(entity)
    }

    /// Gets a reference to a component for an entity.
    ///
    /// # Errors
    ///
    /// Unregistered type, or the entity has no `T`.
    pub fn get<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.store::<T>()?.get(entity)
    }

    /// Gets a mutable reference to a component for an entity.
    ///
    /// # Errors
    ///
    /// Unregistered type, or the entity has no `T`.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.store_mut::<T>()?.get_mut(entity)
    }

    /// Checks if an entity has a specific component.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] if `T` was never registered.
    pub fn contains<T: Component>(&self, entity: Entity) -> EcsResult<bool> {
        Ok(self.store::<T>()?.contains(entity))
    }

    /// Drops the entity's data from every store, whether or not it had any.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for store in &mut self.stores {
            store.entity_destroyed(entity);
        }
    }

    /// Empties every store. Registrations and ids are kept.
    pub fn reset(&mut self) {
        for store in &mut self.stores {
            store.reset();
        }
    }

    /// Total number of components across all stores.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.stores.iter().map(|store| store.len()).sum()
    }
}

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Position(i32);
    impl Component for Position {}

    #[derive(Debug, PartialEq)]
    struct Health(u32);
    impl Component for Health {}

    #[test]
    fn test_sequential_ids() {
        let mut catalog = ComponentCatalog::new();
        assert_eq!(catalog.register::<Position>().unwrap(), ComponentTypeId::new(0));
        assert_eq!(catalog.register::<Health>().unwrap(), ComponentTypeId::new(1));
        assert_eq!(catalog.type_id::<Health>().unwrap(), ComponentTypeId::new(1));
        assert_eq!(catalog.registered_count(), 2);
    }

    #[test]
    fn test_type_limit() {
        #[allow(dead_code)]
        struct Slot<const N: usize>;
        impl<const N: usize> Component for Slot<N> {}

        macro_rules! register_slots {
            ($catalog:expr; $($n:literal)*) => {
                $( $catalog.register::<Slot<$n>>().unwrap(); )*
            };
        }

        let mut catalog = ComponentCatalog::new();
        register_slots!(catalog;
            0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
            16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31
            32 33 34 35 36 37 38 39 40 41 42 43 44 45 46 47
            48 49 50 51 52 53 54 55 56 57 58 59 60 61 62 63
        );
        assert_eq!(catalog.registered_count(), MAX_COMPONENT_TYPES);

        assert_eq!(
            catalog.register::<Slot<64>>(),
            Err(EcsError::ComponentTypeLimit { limit: 64 })
        );
        assert_eq!(catalog.registered_count(), 64);
        assert!(!catalog.is_registered::<Slot<64>>());
    }

    #[test]
    fn test_double_registration_fails() {
        let mut catalog = ComponentCatalog::new();
        catalog.register::<Position>().unwrap();
        assert!(matches!(
            catalog.register::<Position>(),
            Err(EcsError::DuplicateComponentType(_))
        ));
        assert_eq!(catalog.registered_count(), 1);
    }

    #[test]
    fn test_unregistered_access_fails() {
        let mut catalog = ComponentCatalog::new();
        let e = Entity::new(0);
        assert!(matches!(catalog.type_id::<Health>(), Err(EcsError::UnregisteredComponent(_))));
        assert!(catalog.insert(e, Health(1)).is_err());
        assert!(catalog.contains::<Health>(e).is_err());
        assert!(!catalog.is_registered::<Health>());
    }

    #[test]
    fn test_forwarding() {
        let mut catalog = ComponentCatalog::new();
        catalog.register::<Position>().unwrap();
        catalog.register::<Health>().unwrap();
        let e = Entity::new(4);

        catalog.insert(e, Position(3)).unwrap();
        assert!(catalog.contains::<Position>(e).unwrap());
        assert!(!catalog.contains::<Health>(e).unwrap());

        catalog.get_mut::<Position>(e).unwrap().0 = 9;
        assert_eq!(*catalog.get::<Position>(e).unwrap(), Position(9));
        assert_eq!(catalog.remove::<Position>(e).unwrap(), Position(9));
        assert!(!catalog.contains::<Position>(e).unwrap());
    }

    #[test]
    fn test_entity_destroyed_hits_every_store() {
        let mut catalog = ComponentCatalog::new();
        catalog.register::<Position>().unwrap();
        catalog.register::<Health>().unwrap();
        let a = Entity::new(0);
        let b = Entity::new(1);

        catalog.insert(a, Position(1)).unwrap();
        catalog.insert(a, Health(1)).unwrap();
        catalog.insert(b, Health(2)).unwrap();

        catalog.entity_destroyed(a);
        assert!(!catalog.contains::<Position>(a).unwrap());
        assert!(!catalog.contains::<Health>(a).unwrap());
        assert_eq!(*catalog.get::<Health>(b).unwrap(), Health(2));
        assert_eq!(catalog.component_count(), 1);
    }

    #[test]
    fn test_reset_keeps_registrations() {
        let mut catalog = ComponentCatalog::new();
        catalog.register::<Position>().unwrap();
        catalog.insert(Entity::new(0), Position(1)).unwrap();

        catalog.reset();
        assert_eq!(catalog.component_count(), 0);
        assert_eq!(catalog.type_id::<Position>().unwrap(), ComponentTypeId::new(0));
    }
}
