//! # Movement
//!
//! Entities with a [`Transform`] and a [`Movement`] walk straight toward
//! their target and stop within [`STOP_DISTANCE`] of it.

use bastion_core::{EcsResult, Registry, System};

use super::components::{Movement, Transform};

/// Distance at which a mover counts as arrived.
pub const STOP_DISTANCE: f32 = 0.5;

/// Advances every mover toward its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn update(&mut self, registry: &mut Registry, dt: f32) -> EcsResult<()> {
        for entity in registry.matched_entities::<Self>()? {
            let mut movement = *registry.get_component::<Movement>(entity)?;
            if movement.arrived {
                continue;
            }

            let transform = registry.get_component_mut::<Transform>(entity)?;
            let to_target = movement.target - transform.position;
            let distance = to_target.length();

            if distance <= STOP_DISTANCE {
                movement.arrived = true;
                tracing::trace!(%entity, "mover reached target");
            } else {
                // Clamped so a step never passes the target
                let step = (movement.speed * dt).min(distance);
                transform.position += to_target.normalized() * step;
            }

            *registry.get_component_mut::<Movement>(entity)? = movement;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "MovementSystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use bastion_core::Signature;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        let transform = registry.register_component::<Transform>().unwrap();
        let movement = registry.register_component::<Movement>().unwrap();
        registry.register_system(MovementSystem).unwrap();
        registry
            .set_system_signature::<MovementSystem>(Signature::EMPTY.with(transform).with(movement))
            .unwrap();
        registry
    }

    #[test]
    fn test_walks_toward_target_and_stops() {
        let mut registry = registry();
        let walker = registry.create_entity().unwrap();
        registry
            .add_component(walker, Transform::at(Vec3::new(10.0, 0.0, 0.0)))
            .unwrap();
        registry
            .add_component(
                walker,
                Movement {
                    target: Vec3::ZERO,
                    speed: 2.0,
                    arrived: false,
                },
            )
            .unwrap();

        registry.run_system::<MovementSystem>(1.0).unwrap();
        let x = registry.get_component::<Transform>(walker).unwrap().position.x;
        assert!((x - 8.0).abs() < 1e-5);

        for _ in 0..10 {
            registry.run_system::<MovementSystem>(1.0).unwrap();
        }
        assert!(registry.get_component::<Movement>(walker).unwrap().arrived);
        let position = registry.get_component::<Transform>(walker).unwrap().position;
        assert!(position.distance(Vec3::ZERO) <= STOP_DISTANCE);
    }

    #[test]
    fn test_without_movement_is_ignored() {
        let mut registry = registry();
        let statue = registry.create_entity().unwrap();
        registry
            .add_component(statue, Transform::at(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();

        registry.run_system::<MovementSystem>(1.0).unwrap();
        assert_eq!(
            registry.get_component::<Transform>(statue).unwrap().position,
            Vec3::new(1.0, 2.0, 3.0)
        );
    }
}
