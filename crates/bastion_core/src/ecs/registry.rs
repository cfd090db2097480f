//! # Registry
//!
//! Single entry point composing the [`EntityPool`], [`ComponentCatalog`] and
//! [`SystemRegistry`]. Every mutation runs a fixed sequence:
//!
//! ```text
//! create_entity:     pool issue id -> notify systems (empty signature)
//! add_component:     store insert -> set signature bit   -> notify systems
//! remove_component:  store remove -> clear signature bit -> notify systems
//! destroy_entity:    pool (clear signature, free id) -> every store -> every system
//! ```
//!
//! The data always exists before any system can match on it, and no system
//! keeps an entity after its data is gone.
//!
//! One `Registry` is one world. There is no global instance; owners pass it
//! explicitly to systems and consumers.

use std::any::type_name;
use std::collections::BTreeSet;

use super::component::{Component, ComponentCatalog};
use super::entity::{ComponentTypeId, Entity, EntityPool, Signature};
use super::system::{System, SystemRegistry};
use crate::config::RegistryConfig;
use crate::error::{EcsError, EcsResult};

/// The ECS world.
///
/// # Example
///
/// ```rust,ignore
/// let mut registry = Registry::new();
/// registry.register_component::<Health>()?;
/// registry.register_system(Damageable)?;
/// let health = registry.component_type_id::<Health>()?;
/// registry.set_system_signature::<Damageable>(Signature::EMPTY.with(health))?;
///
/// let entity = registry.create_entity()?;
/// registry.add_component(entity, Health { current: 100.0, max: 100.0 })?;
/// assert!(registry.system_entities::<Damageable>()?.contains(&entity));
/// ```
pub struct Registry {
    entities: EntityPool,
    components: ComponentCatalog,
    systems: SystemRegistry,
}

impl Registry {
    /// Creates a registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(RegistryConfig::default().max_entities)
    }

    /// Creates a registry from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] if the configuration is rejected.
    pub fn with_config(config: &RegistryConfig) -> EcsResult<Self> {
        config.validate()?;
        Ok(Self::with_capacity(config.max_entities))
    }

    fn with_capacity(max_entities: u32) -> Self {
        Self {
            entities: EntityPool::new(max_entities),
            components: ComponentCatalog::new(),
            systems: SystemRegistry::new(),
        }
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Creates an entity with an empty signature.
    ///
    /// # Errors
    ///
    /// [`EcsError::CapacityExhausted`] when the pool is full.
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        let entity = self.entities.create_entity()?;
        // Systems requiring nothing match every live entity
        self.systems.entity_signature_changed(entity, Signature::EMPTY);
        tracing::trace!(%entity, "created entity");
        Ok(entity)
    }

    /// Recreates a specific, currently free entity id.
    ///
    /// This is the load-time "restore" path used to replay persisted ids and
    /// costs O(capacity). Afterwards the entity behaves exactly like one from
    /// [`create_entity`](Self::create_entity).
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] or [`EcsError::EntityAlreadyLive`].
    pub fn create_entity_with_id(&mut self, id: Entity) -> EcsResult<Entity> {
        let entity = self.entities.create_entity_with_id(id)?;
        self.systems.entity_signature_changed(entity, Signature::EMPTY);
        tracing::trace!(%entity, "restored entity");
        Ok(entity)
    }

    /// Destroys an entity together with all of its components.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] or [`EcsError::EntityNotAlive`]; nothing
    /// is modified in that case.
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.entities.destroy_entity(entity)?;
        self.components.entity_destroyed(entity);
        self.systems.entity_destroyed(entity);
        tracing::trace!(%entity, "destroyed entity");
        Ok(())
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of alive entities.
    #[inline]
    #[must_use]
    pub fn living_entity_count(&self) -> u32 {
        self.entities.living_entity_count()
    }

    /// Every alive entity in ascending id order.
    #[inline]
    #[must_use]
    pub fn living_entities(&self) -> &BTreeSet<Entity> {
        self.entities.living_entities()
    }

    /// Maximum number of simultaneously alive entities.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.entities.capacity()
    }

    /// The entity's current component signature.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityNotAlive`] for a dead entity.
    pub fn signature_of(&self, entity: Entity) -> EcsResult<Signature> {
        self.ensure_alive(entity)?;
        self.entities.signature(entity)
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Registers a component type and returns its id.
    ///
    /// # Errors
    ///
    /// [`EcsError::DuplicateComponentType`] or [`EcsError::ComponentTypeLimit`].
    pub fn register_component<T: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        self.components.register::<T>()
    }

    /// The id assigned to `T`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`].
    pub fn component_type_id<T: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.components.type_id::<T>()
    }

    /// Attaches a component and updates system membership.
    ///
    /// # Errors
    ///
    /// Dead entity, unregistered type, or the entity already holds a `T`.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        self.ensure_alive(entity)?;
        let id = self.components.type_id::<T>()?;

        self.components.insert(entity, component)?;

        let mut signature = self.entities.signature(entity)?;
        signature.set(id);
        self.entities.set_signature(entity, signature)?;

        self.systems.entity_signature_changed(entity, signature);
        Ok(())
    }

    /// Detaches and returns a component, updating system membership.
    ///
    /// # Errors
    ///
    /// Dead entity, unregistered type, or the entity holds no `T`.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EcsResult<T> {
        self.ensure_alive(entity)?;
        let id = self.components.type_id::<T>()?;

        let removed = self.components.remove::<T>(entity)?;

        let mut signature = self.entities.signature(entity)?;
        signature.clear(id);
        self.entities.set_signature(entity, signature)?;

        self.systems.entity_signature_changed(entity, signature);
        Ok(removed)
    }

    /// Gets a component.
    ///
    /// The reference borrows the registry, so it cannot outlive the next
    /// mutation of any kind.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] past capacity, an unregistered type, or
    /// the entity holds no `T`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.ensure_in_range(entity)?;
        self.components.get::<T>(entity)
    }

    /// Gets a component mutably.
    ///
    /// # Errors
    ///
    /// As [`get_component`](Self::get_component).
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.ensure_in_range(entity)?;
        self.components.get_mut::<T>(entity)
    }

    /// Checks whether the entity holds a `T`.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] past capacity, or
    /// [`EcsError::UnregisteredComponent`].
    pub fn has_component<T: Component>(&self, entity: Entity) -> EcsResult<bool> {
        self.ensure_in_range(entity)?;
        self.components.contains::<T>(entity)
    }

    /// Read access to the catalog, e.g. for iterating a whole store.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &ComponentCatalog {
        &self.components
    }

    // =========================================================================
    // Systems
    // =========================================================================

    /// Registers a system instance. Setup-time only.
    ///
    /// # Errors
    ///
    /// [`EcsError::DuplicateSystem`].
    pub fn register_system<T: System>(&mut self, system: T) -> EcsResult<()> {
        self.systems.register(system)
    }

    /// Declares the components `T` requires. Setup-time only; entities that
    /// already exist are matched immediately.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] or [`EcsError::SignatureAlreadySet`].
    pub fn set_system_signature<T: System>(&mut self, signature: Signature) -> EcsResult<()> {
        let entities = &self.entities;
        let living = entities
            .living_entities()
            .iter()
            .filter_map(|&entity| entities.signature(entity).ok().map(|sig| (entity, sig)));
        self.systems.set_signature::<T>(signature, living)
    }

    /// Builds a signature from component types already registered.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] naming the first unknown id.
    pub fn signature_for(&self, ids: &[ComponentTypeId]) -> EcsResult<Signature> {
        if let Some(unknown) = ids
            .iter()
            .find(|id| id.index() >= self.components.registered_count())
        {
            tracing::warn!(id = unknown.index(), "signature names an unregistered component id");
            return Err(EcsError::UnregisteredComponent(type_name::<ComponentTypeId>()));
        }
        Ok(Signature::from_ids(ids))
    }

    /// Gets a system instance.
    ///
    /// # Errors
    ///
    /// Unregistered `T`, or [`EcsError::SystemBusy`] while `T` is running.
    pub fn get_system<T: System>(&self) -> EcsResult<&T> {
        self.systems.get::<T>()
    }

    /// Gets a system instance mutably.
    ///
    /// # Errors
    ///
    /// Unregistered `T`, or [`EcsError::SystemBusy`] while `T` is running.
    pub fn get_system_mut<T: System>(&mut self) -> EcsResult<&mut T> {
        self.systems.get_mut::<T>()
    }

    /// The entities currently matched by `T`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`].
    pub fn system_entities<T: System>(&self) -> EcsResult<&BTreeSet<Entity>> {
        self.systems.entities::<T>()
    }

    /// Snapshot of the entities matched by `T`, safe to iterate while
    /// mutating the registry.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`].
    pub fn matched_entities<T: System>(&self) -> EcsResult<Vec<Entity>> {
        Ok(self.systems.entities::<T>()?.iter().copied().collect())
    }

    /// Runs one update of `T` against this registry.
    ///
    /// The instance is restored even if `update` fails.
    ///
    /// # Errors
    ///
    /// Unregistered or busy `T`, or whatever `update` returns.
    pub fn run_system<T: System>(&mut self, dt: f32) -> EcsResult<()> {
        let mut system = self.systems.take::<T>()?;
        tracing::trace!(system = system.name(), dt, "running system");

        let result = system.update(self, dt);
        let restored = self.systems.restore(system);
        result.and(restored)
    }

    /// Read access to the system registry.
    #[inline]
    #[must_use]
    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    // =========================================================================
    // World lifecycle
    // =========================================================================

    /// Wipes every entity, component and matched set ("new game" / load).
    ///
    /// Component and system registrations, type ids, system instances and
    /// signatures survive, so setup does not have to be replayed.
    pub fn reset(&mut self) {
        let destroyed = self.entities.living_entity_count();
        self.entities.reset();
        self.components.reset();
        self.systems.reset();
        tracing::info!(destroyed, "registry reset");
    }

    fn ensure_in_range(&self, entity: Entity) -> EcsResult<()> {
        if entity.index() < self.entities.capacity() {
            Ok(())
        } else {
            Err(EcsError::InvalidEntity {
                entity,
                capacity: self.entities.capacity(),
            })
        }
    }

    fn ensure_alive(&self, entity: Entity) -> EcsResult<()> {
        self.ensure_in_range(entity)?;
        if !self.entities.is_alive(entity) {
            return Err(EcsError::EntityNotAlive(entity));
        }
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
