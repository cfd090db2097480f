//! # Combat
//!
//! Turrets shoot the nearest enemy in range; enemies that reached the base
//! attack it. Damage is applied here, deaths are resolved by the
//! [`HealthSystem`](super::health::HealthSystem) later in the tick.

use bastion_core::{EcsResult, Entity, Registry, System};

use super::components::{Building, BuildingKind, Enemy, Health, Movement, Transform, Turret};
use crate::math::Vec3;

/// Applies turret and enemy damage. Signature: `{Transform, Turret}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatSystem;

impl CombatSystem {
    fn nearest_enemy_in_range(
        registry: &Registry,
        enemies: &[Entity],
        origin: Vec3,
        range: f32,
    ) -> Option<Entity> {
        enemies
            .iter()
            .filter_map(|&enemy| {
                let position = registry.get_component::<Transform>(enemy).ok()?.position;
                Some((enemy, position.distance(origin)))
            })
            .filter(|&(_, distance)| distance <= range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(enemy, _)| enemy)
    }

    fn base(registry: &Registry) -> EcsResult<Option<Entity>> {
        Ok(registry
            .components()
            .store::<Building>()?
            .iter()
            .find(|(_, building)| building.kind == BuildingKind::Base)
            .map(|(entity, _)| entity))
    }
}

impl System for CombatSystem {
    fn update(&mut self, registry: &mut Registry, dt: f32) -> EcsResult<()> {
        let mut enemies: Vec<Entity> = registry.components().store::<Enemy>()?.entities().to_vec();
        // Id order, independent of store layout
        enemies.sort_unstable();

        for turret in registry.matched_entities::<Self>()? {
            let origin = registry.get_component::<Transform>(turret)?.position;
            let stats = *registry.get_component::<Turret>(turret)?;

            if let Some(target) = Self::nearest_enemy_in_range(registry, &enemies, origin, stats.range) {
                registry.get_component_mut::<Health>(target)?.current -= stats.damage_per_second * dt;
            }
        }

        let Some(base) = Self::base(registry)? else {
            return Ok(());
        };

        let mut siege = 0.0;
        for &enemy in &enemies {
            let attacking = registry
                .get_component::<Movement>(enemy)
                .map_or(false, |movement| movement.arrived);
            if attacking {
                siege += registry.get_component::<Enemy>(enemy)?.damage_per_second * dt;
            }
        }
        if siege > 0.0 {
            registry.get_component_mut::<Health>(base)?.current -= siege;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "CombatSystem"
    }
}
