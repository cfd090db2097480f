//! # Systems
//!
//! A system declares the component types it requires as a [`Signature`]. The
//! registry keeps, per system, the set of live entities whose signature is a
//! superset of that requirement, and updates it synchronously every time an
//! entity gains or loses a component.
//!
//! Systems are stored in registration order. Execution order is never derived
//! from signatures; the application declares it with a [`Schedule`].
//!
//! [`Schedule`]: super::schedule::Schedule

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeSet, HashMap};

use super::entity::{Entity, Signature};
use super::registry::Registry;
use crate::error::{EcsError, EcsResult};

/// Per-tick logic operating on the entities that match its signature.
///
/// During `update` the system is checked out of the registry, so it may
/// freely mutate the registry it is handed: create and destroy entities, add
/// and remove components, or read other systems.
///
/// # Examples
///
/// ```rust,ignore
/// struct Decay;
///
/// impl System for Decay {
///     fn update(&mut self, registry: &mut Registry, dt: f32) -> EcsResult<()> {
///         let matched: Vec<Entity> = registry.system_entities::<Self>()?.iter().copied().collect();
///         for entity in matched {
///             registry.get_component_mut::<Health>(entity)?.current -= dt;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait System: 'static {
    /// Update logic for this system, called once per tick.
    ///
    /// # Errors
    ///
    /// Any registry precondition failure hit while updating.
    fn update(&mut self, registry: &mut Registry, dt: f32) -> EcsResult<()>;

    /// Returns the name of this system for debugging purposes.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Bookkeeping for one registered system.
struct SystemSlot {
    name: &'static str,
    /// Required components; `None` until declared.
    signature: Option<Signature>,
    /// Live entities whose signature covers `signature`.
    entities: BTreeSet<Entity>,
    /// `None` while the system is executing.
    instance: Option<Box<dyn Any>>,
}

/// Owns one instance per system type plus its signature and matched set.
pub struct SystemRegistry {
    slots: Vec<SystemSlot>,
    index: HashMap<TypeId, usize>,
}

impl SystemRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Registers a system instance.
    ///
    /// # Errors
    ///
    /// [`EcsError::DuplicateSystem`] if `T` is already registered.
    pub fn register<T: System>(&mut self, system: T) -> EcsResult<()> {
        if self.index.contains_key(&TypeId::of::<T>()) {
            return Err(EcsError::DuplicateSystem(type_name::<T>()));
        }

        let instance: Box<dyn Any> = Box::new(system);
        self.index.insert(TypeId::of::<T>(), self.slots.len());
        self.slots.push(SystemSlot {
            name: type_name::<T>(),
            signature: None,
            entities: BTreeSet::new(),
            instance: Some(instance),
        });

        tracing::debug!(system = type_name::<T>(), "registered system");
        Ok(())
    }

    /// Declares the components `T` requires and computes its initial matched
    /// set from `living`, the current `(entity, signature)` pairs.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `T` is unknown,
    /// [`EcsError::SignatureAlreadySet`] on a second declaration.
    pub fn set_signature<T: System>(
        &mut self,
        signature: Signature,
        living: impl IntoIterator<Item = (Entity, Signature)>,
    ) -> EcsResult<()> {
        let slot = self.slot_mut::<T>()?;
        if slot.signature.is_some() {
            return Err(EcsError::SignatureAlreadySet(slot.name));
        }

        slot.signature = Some(signature);
        slot.entities = living
            .into_iter()
            .filter(|(_, entity_sig)| entity_sig.is_superset_of(signature))
            .map(|(entity, _)| entity)
            .collect();

        tracing::debug!(
            system = slot.name,
            bits = signature.bits(),
            matched = slot.entities.len(),
            "declared system signature"
        );
        Ok(())
    }

    /// Returns the declared signature of `T`, if any.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `T` is unknown.
    pub fn signature<T: System>(&self) -> EcsResult<Option<Signature>> {
        Ok(self.slot::<T>()?.signature)
    }

    /// Re-evaluates `entity` against every system with a declared signature.
    pub fn entity_signature_changed(&mut self, entity: Entity, signature: Signature) {
        for slot in &mut self.slots {
            let Some(required) = slot.signature else {
                continue;
            };

            if signature.is_superset_of(required) {
                slot.entities.insert(entity);
            } else {
                slot.entities.remove(&entity);
            }
        }
    }

    /// Drops `entity` from every matched set.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for slot in &mut self.slots {
            slot.entities.remove(&entity);
        }
    }

    /// The entities currently matched by `T`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `T` is unknown.
    pub fn entities<T: System>(&self) -> EcsResult<&BTreeSet<Entity>> {
        Ok(&self.slot::<T>()?.entities)
    }

    /// Gets the system instance.
    ///
    /// # Errors
    ///
    /// Unregistered `T`, or [`EcsError::SystemBusy`] while `T` is executing.
    pub fn get<T: System>(&self) -> EcsResult<&T> {
        let slot = self.slot::<T>()?;
        slot.instance
            .as_ref()
            .and_then(|instance| instance.downcast_ref::<T>())
            .ok_or(EcsError::SystemBusy(slot.name))
    }

    /// Gets the system instance mutably.
    ///
    /// # Errors
    ///
    /// Unregistered `T`, or [`EcsError::SystemBusy`] while `T` is executing.
    pub fn get_mut<T: System>(&mut self) -> EcsResult<&mut T> {
        let slot = self.slot_mut::<T>()?;
        let name = slot.name;
        slot.instance
            .as_mut()
            .and_then(|instance| instance.downcast_mut::<T>())
            .ok_or(EcsError::SystemBusy(name))
    }

    /// Checks the instance out so it can run against `&mut Registry`.
    ///
    /// # Errors
    ///
    /// Unregistered `T`, or [`EcsError::SystemBusy`] if already checked out.
    pub fn take<T: System>(&mut self) -> EcsResult<Box<T>> {
        let slot = self.slot_mut::<T>()?;
        let instance = slot.instance.take().ok_or(EcsError::SystemBusy(slot.name))?;
        match instance.downcast::<T>() {
            Ok(system) => Ok(system),
            Err(other) => {
                slot.instance = Some(other);
                Err(EcsError::UnregisteredSystem(type_name::<T>()))
            }
        }
    }

    /// Puts a checked-out instance back.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `T` is unknown.
    pub fn restore<T: System>(&mut self, system: Box<T>) -> EcsResult<()> {
        let system: Box<dyn Any> = system;
        self.slot_mut::<T>()?.instance = Some(system);
        Ok(())
    }

    /// Checks whether `T` is registered.
    #[must_use]
    pub fn is_registered<T: System>(&self) -> bool {
        self.index.contains_key(&TypeId::of::<T>())
    }

    /// Clears every matched set. Instances and signatures are kept.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.entities.clear();
        }
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// System names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|slot| slot.name)
    }

    fn slot<T: System>(&self) -> EcsResult<&SystemSlot> {
        self.index
            .get(&TypeId::of::<T>())
            .map(|&i| &self.slots[i])
            .ok_or(EcsError::UnregisteredSystem(type_name::<T>()))
    }

    fn slot_mut<T: System>(&mut self) -> EcsResult<&mut SystemSlot> {
        let i = *self
            .index
            .get(&TypeId::of::<T>())
            .ok_or(EcsError::UnregisteredSystem(type_name::<T>()))?;
        Ok(&mut self.slots[i])
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}
