//! # Game Configuration
//!
//! ```toml
//! starting_resources = 1000.0
//!
//! [registry]
//! max_entities = 5000
//!
//! [enemy]
//! health = 50.0
//! speed = 3.0
//! damage_per_second = 10.0
//! ```

use bastion_core::RegistryConfig;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Stats for newly spawned enemies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Hit points.
    pub health: f32,
    /// World units per second.
    pub speed: f32,
    /// Damage dealt to the base per second once arrived.
    pub damage_per_second: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            health: 50.0,
            speed: 3.0,
            damage_per_second: 10.0,
        }
    }
}

/// Full game configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Resources banked at the start of every game.
    pub starting_resources: f64,
    /// ECS sizing.
    pub registry: RegistryConfig,
    /// Enemy template.
    pub enemy: EnemyConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_resources: 1000.0,
            registry: RegistryConfig::default(),
            enemy: EnemyConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidConfig`] on malformed TOML or invalid values.
    pub fn from_toml_str(source: &str) -> GameResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values are usable.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidConfig`] for negative resources, non-positive
    /// enemy stats, or an invalid registry section.
    pub fn validate(&self) -> GameResult<()> {
        self.registry
            .validate()
            .map_err(|e| GameError::InvalidConfig(e.to_string()))?;

        if self.starting_resources < 0.0 {
            return Err(GameError::InvalidConfig(
                "starting_resources must not be negative".to_string(),
            ));
        }
        if self.enemy.health <= 0.0 || self.enemy.speed <= 0.0 {
            return Err(GameError::InvalidConfig(
                "enemy health and speed must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.starting_resources, 1000.0);
        assert_eq!(config.registry.max_entities, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = GameConfig::from_toml_str(
            r#"
            starting_resources = 250.0

            [enemy]
            speed = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.starting_resources, 250.0);
        assert_eq!(config.enemy.speed, 1.5);
        assert_eq!(config.enemy.health, 50.0);
        assert_eq!(config.registry, RegistryConfig::default());
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(GameConfig::from_toml_str("starting_resources = -1.0").is_err());
        assert!(GameConfig::from_toml_str("[registry]\nmax_entities = 0").is_err());
        assert!(GameConfig::from_toml_str("[enemy]\nhealth = 0.0").is_err());
        assert!(GameConfig::from_toml_str("starting_resources = [").is_err());
    }
}
