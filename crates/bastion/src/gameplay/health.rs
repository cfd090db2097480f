//! # Health
//!
//! Resolves deaths once per tick. Enemy kills pay a bounty and shift the
//! balance toward light; lost buildings shift it toward shadow.

use bastion_core::{EcsResult, Entity, Registry, System};

use super::balance::BalanceSystem;
use super::components::{Building, BuildingKind, Enemy, Health};
use super::resource::ResourceSystem;

/// Resources awarded per enemy killed.
pub const KILL_BOUNTY: f64 = 25.0;

/// Destroys entities at or below zero hit points. Signature: `{Health}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthSystem {
    enemies_killed: u32,
    buildings_lost: u32,
    base_destroyed: bool,
}

impl HealthSystem {
    /// Enemies killed this game.
    #[must_use]
    pub fn enemies_killed(&self) -> u32 {
        self.enemies_killed
    }

    /// Buildings lost this game.
    #[must_use]
    pub fn buildings_lost(&self) -> u32 {
        self.buildings_lost
    }

    /// Returns true once the base has fallen.
    #[must_use]
    pub fn base_destroyed(&self) -> bool {
        self.base_destroyed
    }

    /// Clears the counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn resolve_death(&mut self, registry: &mut Registry, entity: Entity) -> EcsResult<()> {
        if registry.has_component::<Enemy>(entity)? {
            self.enemies_killed += 1;
            registry.get_system_mut::<BalanceSystem>()?.on_enemy_killed();
            registry.get_system_mut::<ResourceSystem>()?.add(KILL_BOUNTY);
            tracing::debug!(%entity, "enemy destroyed");
        } else if registry.has_component::<Building>(entity)? {
            let kind = registry.get_component::<Building>(entity)?.kind;
            self.buildings_lost += 1;
            registry.get_system_mut::<BalanceSystem>()?.on_building_destroyed();
            if kind == BuildingKind::Base {
                self.base_destroyed = true;
                tracing::info!(%entity, "base destroyed, game over");
            } else {
                tracing::debug!(%entity, ?kind, "building destroyed");
            }
        }

        registry.destroy_entity(entity)
    }
}

impl System for HealthSystem {
    fn update(&mut self, registry: &mut Registry, _dt: f32) -> EcsResult<()> {
        let dead: Vec<Entity> = registry
            .system_entities::<Self>()?
            .iter()
            .copied()
            .filter(|&entity| {
                registry
                    .get_component::<Health>(entity)
                    .map_or(false, Health::is_dead)
            })
            .collect();

        for entity in dead {
            self.resolve_death(registry, entity)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "HealthSystem"
    }
}
