//! # Entity Management
//!
//! Entities are plain indices into `[0, capacity)`. They carry no data of
//! their own: an entity exists while it is in the pool's living set, and its
//! identity is the set of components attached to it plus its [`Signature`].
//!
//! ## Id Recycling
//!
//! Free ids live in a FIFO seeded with `0..capacity`. Destroyed ids go to the
//! back of the queue, so a freshly destroyed id is the *last* one reissued.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::ops::{BitAnd, BitOr};

use serde::{Deserialize, Serialize};

use crate::error::{EcsError, EcsResult};

/// Default pool capacity.
pub const DEFAULT_MAX_ENTITIES: u32 = 5000;

/// Number of bits in a [`Signature`], i.e. the maximum number of component types.
pub const MAX_COMPONENT_TYPES: usize = 64;

/// Opaque entity handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Creates a handle from a raw index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Small sequential id assigned to a component type at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ComponentTypeId(u8);

impl ComponentTypeId {
    /// Creates a type id. Values at or past [`MAX_COMPONENT_TYPES`] are never
    /// handed out by the catalog.
    #[inline]
    #[must_use]
    pub(crate) const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Returns the id as a bit/array index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Signature bit for this id; zero for ids past the signature width.
    #[inline]
    const fn bit(self) -> u64 {
        match 1u64.checked_shl(self.0 as u32) {
            Some(bit) => bit,
            None => 0,
        }
    }
}

/// Fixed-width component bitmask.
///
/// Bit `i` is set when the entity holds the component type registered with id `i`.
/// For a system it is the set of component types the system requires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Signature(u64);

impl Signature {
    /// Signature with no bits set.
    pub const EMPTY: Self = Self(0);

    /// Builds a signature from a list of component type ids.
    #[must_use]
    pub fn from_ids(ids: &[ComponentTypeId]) -> Self {
        ids.iter().fold(Self::EMPTY, |sig, id| sig.with(*id))
    }

    /// Returns a copy with the bit for `id` set.
    #[inline]
    #[must_use]
    pub const fn with(self, id: ComponentTypeId) -> Self {
        Self(self.0 | id.bit())
    }

    /// Sets the bit for `id`.
    #[inline]
    pub fn set(&mut self, id: ComponentTypeId) {
        self.0 |= id.bit();
    }

    /// Clears the bit for `id`.
    #[inline]
    pub fn clear(&mut self, id: ComponentTypeId) {
        self.0 &= !id.bit();
    }

    /// Checks whether the bit for `id` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, id: ComponentTypeId) -> bool {
        (self.0 & id.bit()) != 0
    }

    /// `true` when every bit of `required` is also set in `self`.
    #[inline]
    #[must_use]
    pub const fn is_superset_of(self, required: Self) -> bool {
        (self.0 & required.0) == required.0
    }

    /// Number of set bits.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// `true` when no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }
}

impl BitAnd for Signature {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for Signature {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Issues and recycles entity ids and stores each entity's signature.
///
/// # Complexity
///
/// - `create_entity`: O(1)
/// - `create_entity_with_id`: O(capacity), load-time only
/// - `destroy_entity`: O(log n) for the ordered living set
pub struct EntityPool {
    /// Free ids in reissue order.
    available: VecDeque<Entity>,
    /// One signature per id, indexed by `Entity::index`.
    signatures: Box<[Signature]>,
    /// Currently alive entities, ordered for deterministic iteration.
    living: BTreeSet<Entity>,
    /// Maximum number of simultaneously alive entities.
    capacity: u32,
}

impl EntityPool {
    /// Creates a pool that can hold `capacity` live entities.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        Self {
            available: (0..capacity).map(Entity::new).collect(),
            signatures: vec![Signature::EMPTY; capacity as usize].into_boxed_slice(),
            living: BTreeSet::new(),
            capacity,
        }
    }

    /// Returns the pool capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Takes the next free id from the front of the queue.
    ///
    /// # Errors
    ///
    /// [`EcsError::CapacityExhausted`] when `capacity` entities are alive.
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        let Some(entity) = self.available.pop_front() else {
            tracing::warn!(capacity = self.capacity, "entity pool exhausted");
            return Err(EcsError::CapacityExhausted { capacity: self.capacity });
        };

        self.living.insert(entity);
        Ok(entity)
    }

    /// Reclaims a specific id, e.g. when replaying persisted entity ids.
    ///
    /// The free queue is rebuilt without `id`, keeping the relative order of
    /// every other free id.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] when out of range,
    /// [`EcsError::EntityAlreadyLive`] when `id` is alive.
    pub fn create_entity_with_id(&mut self, id: Entity) -> EcsResult<Entity> {
        self.check_range(id)?;
        if self.living.contains(&id) {
            return Err(EcsError::EntityAlreadyLive(id));
        }

        self.available.retain(|free| *free != id);
        self.signatures[id.index() as usize] = Signature::EMPTY;
        self.living.insert(id);
        Ok(id)
    }

    /// Clears the entity's signature and returns its id to the free queue.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] when out of range,
    /// [`EcsError::EntityNotAlive`] when the id is not alive.
    pub fn destroy_entity(&mut self, id: Entity) -> EcsResult<()> {
        self.check_range(id)?;
        if !self.living.remove(&id) {
            return Err(EcsError::EntityNotAlive(id));
        }

        self.signatures[id.index() as usize] = Signature::EMPTY;
        self.available.push_back(id);
        Ok(())
    }

    /// Returns the entity's current signature.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] when out of range.
    pub fn signature(&self, id: Entity) -> EcsResult<Signature> {
        self.check_range(id)?;
        Ok(self.signatures[id.index() as usize])
    }

    /// Overwrites the entity's signature.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] when out of range.
    pub fn set_signature(&mut self, id: Entity, signature: Signature) -> EcsResult<()> {
        self.check_range(id)?;
        self.signatures[id.index() as usize] = signature;
        Ok(())
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: Entity) -> bool {
        self.living.contains(&id)
    }

    /// Number of alive entities.
    #[inline]
    #[must_use]
    pub fn living_entity_count(&self) -> u32 {
        // living.len() <= capacity, which is a u32
        self.living.len() as u32
    }

    /// The set of alive entities in ascending id order.
    #[inline]
    #[must_use]
    pub fn living_entities(&self) -> &BTreeSet<Entity> {
        &self.living
    }

    /// Number of ids waiting to be issued.
    #[inline]
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Restores the pristine state: every id free in ascending order, all
    /// signatures empty.
    pub fn reset(&mut self) {
        self.available.clear();
        self.available.extend((0..self.capacity).map(Entity::new));
        self.signatures.fill(Signature::EMPTY);
        self.living.clear();
    }

    fn check_range(&self, id: Entity) -> EcsResult<()> {
        if id.index() < self.capacity {
            Ok(())
        } else {
            Err(EcsError::InvalidEntity {
                entity: id,
                capacity: self.capacity,
            })
        }
    }
}
