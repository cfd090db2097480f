//! # Gameplay Components
//!
//! Plain data only. Behaviour lives in the systems that match on these.

use bastion_core::Component;
use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// World placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Centre of the entity.
    pub position: Vec3,
    /// Footprint in world units.
    pub scale: Vec3,
}

impl Transform {
    /// Unit-scaled transform at `position`.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            scale: Vec3::ONE,
        }
    }
}

impl Component for Transform {}

/// Hit points. The entity dies once `current` reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Remaining hit points.
    pub current: f32,
    /// Full hit points.
    pub max: f32,
}

impl Health {
    /// Full health.
    #[must_use]
    pub const fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Returns true once hit points are exhausted.
    #[inline]
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

impl Component for Health {}

/// Produces resources every second.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceGenerator {
    /// Base output per second, before the balance modifier.
    pub per_second: f32,
}

impl Default for ResourceGenerator {
    fn default() -> Self {
        Self { per_second: 1.0 }
    }
}

impl Component for ResourceGenerator {}

/// Straight-line travel toward a target point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Destination.
    pub target: Vec3,
    /// World units per second.
    pub speed: f32,
    /// Set once within stop distance of `target`.
    pub arrived: bool,
}

impl Component for Movement {}

/// Hostile unit. Once arrived, it damages the base.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Damage dealt to the base per second while attacking.
    pub damage_per_second: f32,
}

impl Component for Enemy {}

/// Placeable structure kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    /// The player's base. Losing it ends the game.
    Base,
    /// Generates resources.
    ResourceNode,
    /// Shoots the nearest enemy in range.
    Turret,
}

impl BuildingKind {
    /// Resource cost to place.
    #[must_use]
    pub const fn cost(self) -> f64 {
        match self {
            Self::Base => 100.0,
            Self::ResourceNode => 50.0,
            Self::Turret => 150.0,
        }
    }

    /// Hit points when freshly placed.
    #[must_use]
    pub const fn max_health(self) -> f32 {
        match self {
            Self::Base => 500.0,
            Self::ResourceNode => 50.0,
            Self::Turret => 100.0,
        }
    }
}

/// A placed structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// What was built.
    pub kind: BuildingKind,
}

impl Component for Building {}

/// Turret weapon stats.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turret {
    /// Engagement radius in world units.
    pub range: f32,
    /// Damage dealt to the current target per second.
    pub damage_per_second: f32,
}

impl Default for Turret {
    fn default() -> Self {
        Self {
            range: 6.0,
            damage_per_second: 40.0,
        }
    }
}

impl Component for Turret {}
