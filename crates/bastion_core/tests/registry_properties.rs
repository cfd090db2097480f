//! Integration tests for the registry bookkeeping invariants.
//!
//! Random interleavings are driven by a seeded ChaCha RNG so every failure
//! reproduces.

use std::collections::BTreeSet;

use bastion_core::{
    Component, EcsError, EcsResult, Entity, Registry, RegistryConfig, Signature, System,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}
impl Component for Position {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Health {
    current: i32,
}
impl Component for Health {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tag(u32);
impl Component for Tag {}

struct Damageable;
impl System for Damageable {
    fn update(&mut self, _registry: &mut Registry, _dt: f32) -> EcsResult<()> {
        Ok(())
    }
}

struct Locomotion;
impl System for Locomotion {
    fn update(&mut self, _registry: &mut Registry, _dt: f32) -> EcsResult<()> {
        Ok(())
    }
}

struct Everything;
impl System for Everything {
    fn update(&mut self, _registry: &mut Registry, _dt: f32) -> EcsResult<()> {
        Ok(())
    }
}

fn world(max_entities: u32) -> Registry {
    let mut registry = Registry::with_config(&RegistryConfig { max_entities }).unwrap();
    let position = registry.register_component::<Position>().unwrap();
    let health = registry.register_component::<Health>().unwrap();
    registry.register_component::<Tag>().unwrap();

    registry.register_system(Damageable).unwrap();
    registry.register_system(Locomotion).unwrap();
    registry.register_system(Everything).unwrap();
    registry
        .set_system_signature::<Damageable>(Signature::EMPTY.with(health))
        .unwrap();
    registry
        .set_system_signature::<Locomotion>(Signature::EMPTY.with(position).with(health))
        .unwrap();
    registry
        .set_system_signature::<Everything>(Signature::EMPTY)
        .unwrap();
    registry
}

/// Recomputes every matched set from scratch and compares.
fn assert_membership(registry: &Registry) {
    fn expected(registry: &Registry, required: Signature) -> BTreeSet<Entity> {
        registry
            .living_entities()
            .iter()
            .copied()
            .filter(|&e| registry.signature_of(e).unwrap().is_superset_of(required))
            .collect()
    }

    let systems = registry.systems();
    assert_eq!(
        registry.system_entities::<Damageable>().unwrap(),
        &expected(registry, systems.signature::<Damageable>().unwrap().unwrap())
    );
    assert_eq!(
        registry.system_entities::<Locomotion>().unwrap(),
        &expected(registry, systems.signature::<Locomotion>().unwrap().unwrap())
    );
    assert_eq!(
        registry.system_entities::<Everything>().unwrap(),
        registry.living_entities()
    );
}

fn pos(i: u32) -> Position {
    Position {
        x: i as f32,
        y: 0.0,
        z: -(i as f32),
    }
}

#[test]
fn test_count_tracks_creates_minus_destroys() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xB457_1011);
    let mut registry = world(64);
    let mut live: Vec<Entity> = Vec::new();
    let (mut creates, mut destroys) = (0u32, 0u32);

    for _ in 0..5_000 {
        if live.is_empty() || (live.len() < 64 && rng.gen_bool(0.55)) {
            let e = registry.create_entity().unwrap();
            assert!(e.index() < 64);
            live.push(e);
            creates += 1;
        } else {
            let e = live.swap_remove(rng.gen_range(0..live.len()));
            registry.destroy_entity(e).unwrap();
            destroys += 1;
        }
        assert_eq!(registry.living_entity_count(), creates - destroys);
    }
}

#[test]
fn test_destroy_removes_everything() {
    let mut registry = world(16);
    let e = registry.create_entity().unwrap();
    registry.add_component(e, pos(1)).unwrap();
    registry.add_component(e, Health { current: 5 }).unwrap();
    registry.add_component(e, Tag(9)).unwrap();
    assert!(registry.system_entities::<Locomotion>().unwrap().contains(&e));

    registry.destroy_entity(e).unwrap();

    assert!(!registry.has_component::<Position>(e).unwrap());
    assert!(!registry.has_component::<Health>(e).unwrap());
    assert!(!registry.has_component::<Tag>(e).unwrap());
    assert!(!registry.system_entities::<Damageable>().unwrap().contains(&e));
    assert!(!registry.system_entities::<Locomotion>().unwrap().contains(&e));
    assert!(!registry.system_entities::<Everything>().unwrap().contains(&e));

    // Eligible for reissue once the queue cycles round
    let reissued: Vec<_> = (0..16).map(|_| registry.create_entity().unwrap()).collect();
    assert_eq!(reissued.last(), Some(&e));
}

#[test]
fn test_add_then_get_returns_value() {
    let mut registry = world(8);
    let e = registry.create_entity().unwrap();
    let value = Position {
        x: 1.5,
        y: -2.0,
        z: 3.25,
    };
    registry.add_component(e, value).unwrap();
    assert_eq!(*registry.get_component::<Position>(e).unwrap(), value);
}

#[test]
fn test_remove_leaves_other_holders_unchanged() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut registry = world(256);
    let entities: Vec<_> = (0..256).map(|_| registry.create_entity().unwrap()).collect();
    for &e in &entities {
        registry.add_component(e, Tag(e.index() * 3)).unwrap();
    }

    let mut holders: Vec<Entity> = entities.clone();
    while !holders.is_empty() {
        let victim = holders.swap_remove(rng.gen_range(0..holders.len()));
        assert_eq!(registry.remove_component::<Tag>(victim).unwrap(), Tag(victim.index() * 3));
        assert!(!registry.has_component::<Tag>(victim).unwrap());

        for &other in &holders {
            assert_eq!(*registry.get_component::<Tag>(other).unwrap(), Tag(other.index() * 3));
        }
    }
}

#[test]
fn test_membership_never_stale() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xDEAD_BEEF);
    let mut registry = world(32);

    for step in 0..3_000u32 {
        let live: Vec<Entity> = registry.living_entities().iter().copied().collect();
        let op = rng.gen_range(0..7);

        match op {
            0 if live.len() < 32 => {
                registry.create_entity().unwrap();
            }
            1 if !live.is_empty() => {
                let e = live[rng.gen_range(0..live.len())];
                registry.destroy_entity(e).unwrap();
            }
            2..=4 if !live.is_empty() => {
                let e = live[rng.gen_range(0..live.len())];
                let result = match op {
                    2 => registry.add_component(e, pos(step)),
                    3 => registry.add_component(e, Health { current: 1 }),
                    _ => registry.add_component(e, Tag(step)),
                };
                // Duplicates are rejected without side effects
                if let Err(err) = result {
                    assert!(matches!(err, EcsError::DuplicateComponent { .. }));
                }
            }
            5 | 6 if !live.is_empty() => {
                let e = live[rng.gen_range(0..live.len())];
                let result = if op == 5 {
                    registry.remove_component::<Position>(e).map(|_| ())
                } else {
                    registry.remove_component::<Health>(e).map(|_| ())
                };
                if let Err(err) = result {
                    assert!(matches!(err, EcsError::MissingComponent { .. }));
                }
            }
            _ => {}
        }

        assert_membership(&registry);
    }
}

#[test]
fn test_id_replay() {
    let mut registry = world(8);
    let a = registry.create_entity().unwrap();
    assert_eq!(
        registry.create_entity_with_id(a),
        Err(EcsError::EntityAlreadyLive(a))
    );

    let restored = registry.create_entity_with_id(Entity::new(5)).unwrap();
    assert_eq!(restored, Entity::new(5));
    registry.add_component(restored, Health { current: 10 }).unwrap();
    assert!(registry.system_entities::<Damageable>().unwrap().contains(&restored));
    assert_membership(&registry);

    // The replayed id is never handed out twice
    let rest: Vec<_> = (0..6).map(|_| registry.create_entity().unwrap()).collect();
    assert!(!rest.contains(&restored));
    assert!(matches!(
        registry.create_entity(),
        Err(EcsError::CapacityExhausted { capacity: 8 })
    ));

    registry.destroy_entity(restored).unwrap();
    assert!(!registry.has_component::<Health>(restored).unwrap());
    assert_eq!(registry.create_entity().unwrap(), restored);
}

#[test]
fn test_replay_out_of_range_fails() {
    let mut registry = world(8);
    assert!(matches!(
        registry.create_entity_with_id(Entity::new(8)),
        Err(EcsError::InvalidEntity { .. })
    ));
    assert_eq!(registry.living_entity_count(), 0);
}

#[test]
fn test_damageable_membership_scenario() {
    let mut registry = world(8);
    let a = registry.create_entity().unwrap();

    registry.add_component(a, Health { current: 100 }).unwrap();
    assert!(registry.system_entities::<Damageable>().unwrap().contains(&a));

    registry
        .add_component(
            a,
            Position {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
        )
        .unwrap();
    assert!(registry.system_entities::<Damageable>().unwrap().contains(&a));

    registry.remove_component::<Health>(a).unwrap();
    assert!(!registry.system_entities::<Damageable>().unwrap().contains(&a));

    registry.destroy_entity(a).unwrap();
    assert_eq!(registry.living_entity_count(), 0);
}

#[test]
fn test_full_pool_scenario() {
    let mut registry = Registry::new();
    assert_eq!(registry.capacity(), 5000);

    let all: Vec<_> = (0..5000).map(|_| registry.create_entity().unwrap()).collect();
    assert!(matches!(
        registry.create_entity(),
        Err(EcsError::CapacityExhausted { .. })
    ));

    registry.destroy_entity(all[1234]).unwrap();
    let next = registry.create_entity().unwrap();
    assert_eq!(next, all[1234]);
    assert_eq!(registry.living_entity_count(), 5000);
}

#[test]
fn test_freed_ids_come_back_in_fifo_order() {
    let mut registry = world(4);
    let ids: Vec<_> = (0..3).map(|_| registry.create_entity().unwrap()).collect();
    registry.destroy_entity(ids[0]).unwrap();

    // Id 3 was never issued and sits ahead of the freed id
    assert_eq!(registry.create_entity().unwrap(), Entity::new(3));
    assert_eq!(registry.create_entity().unwrap(), ids[0]);
}

#[test]
fn test_reset_then_reuse() {
    let mut registry = world(8);
    for _ in 0..5 {
        let e = registry.create_entity().unwrap();
        registry.add_component(e, Health { current: 1 }).unwrap();
    }
    registry.reset();

    assert_eq!(registry.living_entity_count(), 0);
    assert_membership(&registry);
    let e = registry.create_entity().unwrap();
    assert_eq!(e, Entity::new(0));
    assert!(!registry.has_component::<Health>(e).unwrap());
}
