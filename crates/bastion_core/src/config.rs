//! # Registry Configuration
//!
//! Loaded from TOML or built from a preset.
//!
//! ```toml
//! max_entities = 5000
//! ```

use serde::{Deserialize, Serialize};

use crate::ecs::DEFAULT_MAX_ENTITIES;
use crate::error::{EcsError, EcsResult};

/// Registry sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum number of simultaneously alive entities.
    pub max_entities: u32,
}

impl RegistryConfig {
    /// Large pool for load testing.
    #[must_use]
    pub const fn stress() -> Self {
        Self {
            max_entities: 65_536,
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] on malformed TOML or invalid values.
    pub fn from_toml_str(source: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| EcsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values are usable.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] if `max_entities` is zero.
    pub fn validate(&self) -> EcsResult<()> {
        if self.max_entities == 0 {
            return Err(EcsError::InvalidConfig(
                "max_entities must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_entities: DEFAULT_MAX_ENTITIES,
        }
    }
}
