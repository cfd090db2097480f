//! # ECS Error Types
//!
//! Every precondition the registry enforces maps to one variant here.
//! A failed operation leaves stores, signatures and membership sets untouched.

use thiserror::Error;

use crate::ecs::Entity;

/// Errors that can occur in the ECS runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity pool has no free ids left.
    #[error("entity pool exhausted: {capacity} entities already alive")]
    CapacityExhausted {
        /// Configured pool capacity.
        capacity: u32,
    },

    /// An entity handle outside `[0, capacity)`.
    #[error("{entity} is out of range (capacity {capacity})")]
    InvalidEntity {
        /// The offending handle.
        entity: Entity,
        /// Configured pool capacity.
        capacity: u32,
    },

    /// `create_entity_with_id` was asked for an id that is already live.
    #[error("{0} is already alive")]
    EntityAlreadyLive(Entity),

    /// The entity is in range but not currently alive.
    #[error("{0} is not alive")]
    EntityNotAlive(Entity),

    /// A component type was registered twice.
    #[error("component type {0} registered more than once")]
    DuplicateComponentType(&'static str),

    /// A component type was used before registration.
    #[error("component type {0} is not registered")]
    UnregisteredComponent(&'static str),

    /// No more component type ids fit in a signature.
    #[error("component type limit reached ({limit} types)")]
    ComponentTypeLimit {
        /// Maximum number of component types.
        limit: usize,
    },

    /// The entity already holds a component of this type.
    #[error("{entity} already has component {component}")]
    DuplicateComponent {
        /// The entity.
        entity: Entity,
        /// Component type name.
        component: &'static str,
    },

    /// The entity does not hold a component of this type.
    #[error("{entity} has no component {component}")]
    MissingComponent {
        /// The entity.
        entity: Entity,
        /// Component type name.
        component: &'static str,
    },

    /// A system type was registered twice.
    #[error("system {0} registered more than once")]
    DuplicateSystem(&'static str),

    /// A system type was used before registration.
    #[error("system {0} is not registered")]
    UnregisteredSystem(&'static str),

    /// A system's required signature was declared a second time.
    #[error("signature for system {0} is already declared")]
    SignatureAlreadySet(&'static str),

    /// The system instance is checked out because it is currently running.
    #[error("system {0} is currently executing")]
    SystemBusy(&'static str),

    /// Invalid registry configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;
