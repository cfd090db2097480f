//! # Entity Component System
//!
//! Entities are bare ids, components are plain data in dense per-type
//! stores, and systems see exactly the entities whose signature covers
//! their declared requirement.
//!
//! ## Design
//!
//! - Entity ids are recycled FIFO, so a freed id is reissued as late as possible
//! - Stores stay contiguous through swap-remove
//! - System membership is recomputed synchronously on every signature change

mod component;
mod entity;
mod registry;
mod schedule;
mod storage;
mod system;

pub use component::{Component, ComponentCatalog};
pub use entity::{
    ComponentTypeId, Entity, EntityPool, Signature, DEFAULT_MAX_ENTITIES, MAX_COMPONENT_TYPES,
};
pub use registry::Registry;
pub use schedule::Schedule;
pub use storage::{ComponentStore, ErasedStore};
pub use system::{System, SystemRegistry};
