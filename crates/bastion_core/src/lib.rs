//! # BASTION Core
//!
//! Entity Component System runtime for the BASTION tower-defence loop:
//! - Fixed-capacity entity pool with FIFO id recycling
//! - Dense component stores with O(1) add, remove and lookup
//! - Systems that track their matching entities incrementally
//!
//! ## Architecture Rules
//!
//! 1. **One world, explicitly owned** - There is no global registry
//! 2. **Fail without side effects** - A rejected call leaves every store,
//!    signature and matched set as it was
//! 3. **Single-threaded** - Every call completes before the next begins
//!
//! ## Example
//!
//! ```rust,ignore
//! use bastion_core::{Registry, Signature};
//!
//! let mut registry = Registry::new();
//! let health = registry.register_component::<Health>()?;
//! registry.register_system(HealthSystem::default())?;
//! registry.set_system_signature::<HealthSystem>(Signature::EMPTY.with(health))?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::RegistryConfig;
pub use ecs::{
    Component, ComponentCatalog, ComponentStore, ComponentTypeId, Entity, EntityPool,
    ErasedStore, Registry, Schedule, Signature, System, SystemRegistry, DEFAULT_MAX_ENTITIES,
    MAX_COMPONENT_TYPES,
};
pub use error::{EcsError, EcsResult};
