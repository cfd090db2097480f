//! # Gameplay
//!
//! Components and systems of the tower-defence loop. Per tick the game runs:
//!
//! ```text
//! ResourceSystem -> MovementSystem -> CombatSystem -> HealthSystem
//! ```
//!
//! `BalanceSystem` carries no signature and is only read and written by the
//! others.

pub mod balance;
pub mod combat;
pub mod components;
pub mod health;
pub mod movement;
pub mod resource;

pub use balance::BalanceSystem;
pub use combat::CombatSystem;
pub use components::{
    Building, BuildingKind, Enemy, Health, Movement, ResourceGenerator, Transform, Turret,
};
pub use health::{HealthSystem, KILL_BOUNTY};
pub use movement::{MovementSystem, STOP_DISTANCE};
pub use resource::ResourceSystem;
