//! # Game Error Types

use bastion_core::EcsError;
use thiserror::Error;

/// Errors that can occur while driving a game.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// A registry precondition failed.
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// Not enough resources to place a building.
    #[error("insufficient resources: need {required}, have {available:.1}")]
    InsufficientResources {
        /// Building cost.
        required: f64,
        /// Resources currently banked.
        available: f64,
    },

    /// The action needs a base and none is standing.
    #[error("no base placed")]
    NoBase,

    /// A second base was requested.
    #[error("a base is already placed")]
    BaseAlreadyPlaced,

    /// Invalid game configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A save file could not be written or read back.
    #[error("save file error: {0}")]
    Save(String),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
