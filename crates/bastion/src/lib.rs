//! # BASTION
//!
//! Light/shadow tower defence running on [`bastion_core`].
//!
//! ## Systems
//!
//! | System | Requires | Does |
//! |--------|----------|------|
//! | `ResourceSystem` | `ResourceGenerator` | banks income scaled by the balance |
//! | `MovementSystem` | `Transform`, `Movement` | walks movers to their target |
//! | `CombatSystem` | `Transform`, `Turret` | turrets shoot, arrived enemies hit the base |
//! | `HealthSystem` | `Health` | destroys the dead, pays bounties |
//! | `BalanceSystem` | nothing | holds the light/shadow balance |
//!
//! ## Example
//!
//! ```rust,ignore
//! use bastion::{Game, GameConfig, Vec3};
//!
//! let mut game = Game::new(GameConfig::default())?;
//! game.spawn_resource_node(Vec3::new(3.0, 0.0, 3.0))?;
//! game.spawn_enemy(Vec3::new(12.0, 0.0, 0.0))?;
//! game.tick(1.0 / 60.0)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod game_loop;
pub mod gameplay;
pub mod math;
pub mod save;
pub mod waves;

pub use config::{EnemyConfig, GameConfig};
pub use error::{GameError, GameResult};
pub use game_loop::Game;
pub use math::Vec3;
pub use save::{SaveGame, SavedEntity};
pub use waves::{WaveConfig, WaveSpawner};
