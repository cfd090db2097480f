//! # Save Files
//!
//! A save stores the world-wide counters plus every live entity under its
//! original id, so loading replays the exact same ids through
//! [`Registry::create_entity_with_id`](bastion_core::Registry::create_entity_with_id).

use std::collections::BTreeSet;

use bastion_core::{EcsError, Entity};
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::gameplay::{Building, Enemy, Health, Movement, ResourceGenerator, Transform, Turret};

/// One entity and whichever components it held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedEntity {
    /// Raw entity id.
    pub id: u32,
    /// Placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    /// Hit points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<Health>,
    /// Resource output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<ResourceGenerator>,
    /// Travel state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement: Option<Movement>,
    /// Enemy stats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy: Option<Enemy>,
    /// Building kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<Building>,
    /// Turret stats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turret: Option<Turret>,
}

impl SavedEntity {
    /// An entry holding no components.
    #[must_use]
    pub const fn empty(id: u32) -> Self {
        Self {
            id,
            transform: None,
            health: None,
            generator: None,
            movement: None,
            enemy: None,
            building: None,
            turret: None,
        }
    }
}

/// Complete snapshot of a running game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    /// Banked resources.
    pub resources: f64,
    /// Light/shadow balance.
    pub balance: f32,
    /// Ticks simulated so far.
    pub ticks: u64,
    /// Live entities in ascending id order.
    #[serde(default)]
    pub entities: Vec<SavedEntity>,
}

impl SaveGame {
    /// Checks that every saved id fits a pool of `capacity` and appears once.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] or [`EcsError::EntityAlreadyLive`] for the
    /// first offending entry, the same errors a replay would hit.
    pub fn check_ids(&self, capacity: u32) -> GameResult<()> {
        let mut seen = BTreeSet::new();
        for saved in &self.entities {
            let entity = Entity::new(saved.id);
            if saved.id >= capacity {
                return Err(EcsError::InvalidEntity { entity, capacity }.into());
            }
            if !seen.insert(saved.id) {
                return Err(EcsError::EntityAlreadyLive(entity).into());
            }
        }
        Ok(())
    }

    /// Renders the save as TOML.
    ///
    /// # Errors
    ///
    /// [`GameError::Save`] if serialization fails.
    pub fn to_toml_string(&self) -> GameResult<String> {
        toml::to_string(self).map_err(|e| GameError::Save(e.to_string()))
    }

    /// Parses a save from TOML.
    ///
    /// # Errors
    ///
    /// [`GameError::Save`] on malformed input.
    pub fn from_toml_str(source: &str) -> GameResult<Self> {
        toml::from_str(source).map_err(|e| GameError::Save(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::BuildingKind;
    use crate::math::Vec3;

    #[test]
    fn test_toml_keeps_ids_and_components() {
        let mut base = SavedEntity::empty(0);
        base.transform = Some(Transform::at(Vec3::new(1.0, 0.0, -2.0)));
        base.health = Some(Health::full(500.0));
        base.building = Some(Building {
            kind: BuildingKind::Base,
        });

        let save = SaveGame {
            resources: 812.5,
            balance: 0.25,
            ticks: 42,
            entities: vec![base, SavedEntity::empty(17)],
        };

        let text = save.to_toml_string().unwrap();
        assert!(text.contains("Base"));
        let parsed = SaveGame::from_toml_str(&text).unwrap();
        assert_eq!(parsed, save);
        assert_eq!(parsed.entities[1].transform, None);
    }

    #[test]
    fn test_check_ids() {
        let mut save = SaveGame {
            resources: 0.0,
            balance: 0.5,
            ticks: 0,
            entities: vec![SavedEntity::empty(0), SavedEntity::empty(3)],
        };
        assert!(save.check_ids(4).is_ok());
        assert_eq!(
            save.check_ids(3),
            Err(GameError::Ecs(EcsError::InvalidEntity {
                entity: Entity::new(3),
                capacity: 3,
            }))
        );

        save.entities.push(SavedEntity::empty(0));
        assert_eq!(
            save.check_ids(4),
            Err(GameError::Ecs(EcsError::EntityAlreadyLive(Entity::new(0))))
        );
    }

    #[test]
    fn test_malformed_save_fails() {
        assert!(matches!(
            SaveGame::from_toml_str("resources = \"many\""),
            Err(GameError::Save(_))
        ));
    }
}
