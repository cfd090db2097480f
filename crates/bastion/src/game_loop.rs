//! # BASTION Game Loop
//!
//! ```text
//! Game::new
//!   ├─ register components and systems (once)
//!   ├─ declare system signatures      (once)
//!   └─ new_game: reset registry, reset system state, place the base
//!
//! Game::tick(dt)
//!   └─ Resource -> Movement -> Combat -> Health
//! ```
//!
//! The game owns its [`Registry`]; nothing else holds one.

use bastion_core::{EcsError, Entity, Registry, Schedule, Signature};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::gameplay::{
    BalanceSystem, Building, BuildingKind, CombatSystem, Enemy, Health, HealthSystem, Movement,
    MovementSystem, ResourceGenerator, ResourceSystem, Transform, Turret,
};
use crate::math::Vec3;
use crate::save::{SaveGame, SavedEntity};

/// A running tower-defence game.
pub struct Game {
    registry: Registry,
    schedule: Schedule,
    config: GameConfig,
    base: Option<Entity>,
    ticks: u64,
}

impl Game {
    /// Builds the world and starts a new game.
    ///
    /// # Errors
    ///
    /// Invalid configuration, or a registry setup failure.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        config.validate()?;
        let mut registry = Registry::with_config(&config.registry)?;

        let transform = registry.register_component::<Transform>()?;
        let health = registry.register_component::<Health>()?;
        let generator = registry.register_component::<ResourceGenerator>()?;
        let movement = registry.register_component::<Movement>()?;
        registry.register_component::<Enemy>()?;
        registry.register_component::<Building>()?;
        let turret = registry.register_component::<Turret>()?;

        registry.register_system(BalanceSystem::new())?;
        registry.register_system(ResourceSystem::new(config.starting_resources))?;
        registry.register_system(MovementSystem)?;
        registry.register_system(CombatSystem)?;
        registry.register_system(HealthSystem::default())?;

        registry.set_system_signature::<ResourceSystem>(Signature::EMPTY.with(generator))?;
        registry.set_system_signature::<MovementSystem>(
            Signature::EMPTY.with(transform).with(movement),
        )?;
        registry.set_system_signature::<CombatSystem>(Signature::EMPTY.with(transform).with(turret))?;
        registry.set_system_signature::<HealthSystem>(Signature::EMPTY.with(health))?;

        let schedule = Schedule::new()
            .with::<ResourceSystem>()
            .with::<MovementSystem>()
            .with::<CombatSystem>()
            .with::<HealthSystem>();

        let mut game = Self {
            registry,
            schedule,
            config,
            base: None,
            ticks: 0,
        };
        game.new_game()?;
        Ok(game)
    }

    /// Clears the world and places a fresh base at the origin.
    ///
    /// # Errors
    ///
    /// Registry failures while placing the base.
    pub fn new_game(&mut self) -> GameResult<Entity> {
        self.clear_world()?;
        let base = self.place(BuildingKind::Base, Vec3::ZERO)?;
        tracing::info!(
            resources = self.config.starting_resources,
            %base,
            "new game started"
        );
        Ok(base)
    }

    fn clear_world(&mut self) -> GameResult<()> {
        self.registry.reset();
        self.registry.get_system_mut::<BalanceSystem>()?.reset();
        self.registry
            .get_system_mut::<ResourceSystem>()?
            .reset(self.config.starting_resources);
        self.registry.get_system_mut::<HealthSystem>()?.reset();
        self.base = None;
        self.ticks = 0;
        Ok(())
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// # Errors
    ///
    /// The first system failure; later systems in the tick do not run.
    pub fn tick(&mut self, dt: f32) -> GameResult<()> {
        self.schedule.run(&mut self.registry, dt)?;
        self.ticks += 1;
        if self.base.is_some_and(|base| !self.registry.is_alive(base)) {
            self.base = None;
        }
        Ok(())
    }

    /// Spawns an enemy that walks to the base.
    ///
    /// # Errors
    ///
    /// [`GameError::NoBase`] without a standing base, or pool exhaustion.
    pub fn spawn_enemy(&mut self, position: Vec3) -> GameResult<Entity> {
        let base = self.base.ok_or(GameError::NoBase)?;
        let target = self.registry.get_component::<Transform>(base)?.position;
        let stats = self.config.enemy;

        let enemy = self.registry.create_entity()?;
        self.registry.add_component(enemy, Transform::at(position))?;
        self.registry.add_component(enemy, Health::full(stats.health))?;
        self.registry.add_component(
            enemy,
            Movement {
                target,
                speed: stats.speed,
                arrived: false,
            },
        )?;
        self.registry.add_component(
            enemy,
            Enemy {
                damage_per_second: stats.damage_per_second,
            },
        )?;
        tracing::debug!(%enemy, x = position.x, z = position.z, "spawned enemy");
        Ok(enemy)
    }

    /// Buys and places a building.
    ///
    /// # Errors
    ///
    /// [`GameError::InsufficientResources`] when unaffordable,
    /// [`GameError::BaseAlreadyPlaced`] for a second base, or pool exhaustion.
    /// Nothing is spent when placement fails.
    pub fn build(&mut self, kind: BuildingKind, position: Vec3) -> GameResult<Entity> {
        if kind == BuildingKind::Base && self.base.is_some() {
            return Err(GameError::BaseAlreadyPlaced);
        }
        if self.registry.living_entity_count() >= self.registry.capacity() {
            return Err(EcsError::CapacityExhausted {
                capacity: self.registry.capacity(),
            }
            .into());
        }

        let cost = kind.cost();
        let resources = self.registry.get_system_mut::<ResourceSystem>()?;
        if !resources.spend(cost) {
            return Err(GameError::InsufficientResources {
                required: cost,
                available: resources.resources(),
            });
        }

        self.place(kind, position)
    }

    /// Buys a resource node at `position`.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build).
    pub fn spawn_resource_node(&mut self, position: Vec3) -> GameResult<Entity> {
        self.build(BuildingKind::ResourceNode, position)
    }

    fn place(&mut self, kind: BuildingKind, position: Vec3) -> GameResult<Entity> {
        let building = self.registry.create_entity()?;
        let scale = if kind == BuildingKind::Base {
            Vec3::new(2.0, 1.0, 2.0)
        } else {
            Vec3::ONE
        };

        self.registry
            .add_component(building, Transform { position, scale })?;
        self.registry.add_component(building, Building { kind })?;
        self.registry
            .add_component(building, Health::full(kind.max_health()))?;

        match kind {
            BuildingKind::Base => self.base = Some(building),
            BuildingKind::ResourceNode => {
                self.registry
                    .add_component(building, ResourceGenerator::default())?;
            }
            BuildingKind::Turret => {
                self.registry.add_component(building, Turret::default())?;
            }
        }
        Ok(building)
    }

    /// Applies `amount` damage; the death is resolved on the next tick.
    ///
    /// # Errors
    ///
    /// The entity has no [`Health`].
    pub fn damage(&mut self, entity: Entity, amount: f32) -> GameResult<()> {
        self.registry.get_component_mut::<Health>(entity)?.current -= amount;
        Ok(())
    }

    /// Captures every live entity and the world-wide counters.
    ///
    /// # Errors
    ///
    /// Registry lookups on unregistered types.
    pub fn snapshot(&self) -> GameResult<SaveGame> {
        let registry = &self.registry;
        let entities = registry
            .living_entities()
            .iter()
            .map(|&entity| SavedEntity {
                id: entity.index(),
                transform: registry.get_component::<Transform>(entity).ok().copied(),
                health: registry.get_component::<Health>(entity).ok().copied(),
                generator: registry.get_component::<ResourceGenerator>(entity).ok().copied(),
                movement: registry.get_component::<Movement>(entity).ok().copied(),
                enemy: registry.get_component::<Enemy>(entity).ok().copied(),
                building: registry.get_component::<Building>(entity).ok().copied(),
                turret: registry.get_component::<Turret>(entity).ok().copied(),
            })
            .collect();

        Ok(SaveGame {
            resources: self.resources()?,
            balance: self.balance()?,
            ticks: self.ticks,
            entities,
        })
    }

    /// Replaces the world with a saved one, restoring every entity under its
    /// saved id.
    ///
    /// # Errors
    ///
    /// Out-of-range or duplicate ids in the save. The ids are checked before
    /// anything is cleared, so a rejected save leaves the current game as is.
    pub fn load(&mut self, save: &SaveGame) -> GameResult<()> {
        save.check_ids(self.registry.capacity())?;
        self.clear_world()?;
        self.registry
            .get_system_mut::<ResourceSystem>()?
            .reset(save.resources);
        self.registry
            .get_system_mut::<BalanceSystem>()?
            .set_balance(save.balance);

        for saved in &save.entities {
            let entity = self.registry.create_entity_with_id(Entity::new(saved.id))?;
            self.restore_components(entity, saved)?;

            if saved.building.is_some_and(|b| b.kind == BuildingKind::Base) {
                self.base = Some(entity);
            }
        }

        self.ticks = save.ticks;
        tracing::info!(entities = save.entities.len(), "game loaded");
        Ok(())
    }

    fn restore_components(&mut self, entity: Entity, saved: &SavedEntity) -> GameResult<()> {
        let registry = &mut self.registry;
        if let Some(c) = saved.transform {
            registry.add_component(entity, c)?;
        }
        if let Some(c) = saved.health {
            registry.add_component(entity, c)?;
        }
        if let Some(c) = saved.generator {
            registry.add_component(entity, c)?;
        }
        if let Some(c) = saved.movement {
            registry.add_component(entity, c)?;
        }
        if let Some(c) = saved.enemy {
            registry.add_component(entity, c)?;
        }
        if let Some(c) = saved.building {
            registry.add_component(entity, c)?;
        }
        if let Some(c) = saved.turret {
            registry.add_component(entity, c)?;
        }
        Ok(())
    }

    /// The world.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The configuration this game was built with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The standing base, if any.
    #[must_use]
    pub fn base(&self) -> Option<Entity> {
        self.base
    }

    /// Ticks simulated since the game started.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Banked resources.
    ///
    /// # Errors
    ///
    /// Only if called from inside a running system.
    pub fn resources(&self) -> GameResult<f64> {
        Ok(self.registry.get_system::<ResourceSystem>()?.resources())
    }

    /// Light/shadow balance.
    ///
    /// # Errors
    ///
    /// Only if called from inside a running system.
    pub fn balance(&self) -> GameResult<f32> {
        Ok(self.registry.get_system::<BalanceSystem>()?.balance())
    }

    /// Enemies killed this game.
    ///
    /// # Errors
    ///
    /// Only if called from inside a running system.
    pub fn enemies_killed(&self) -> GameResult<u32> {
        Ok(self.registry.get_system::<HealthSystem>()?.enemies_killed())
    }

    /// Returns true once the base has fallen.
    ///
    /// # Errors
    ///
    /// Only if called from inside a running system.
    pub fn is_over(&self) -> GameResult<bool> {
        Ok(self.registry.get_system::<HealthSystem>()?.base_destroyed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        Game::new(GameConfig::default()).unwrap()
    }

    #[test]
    fn test_new_game_places_base() {
        let game = game();
        let base = game.base().unwrap();
        assert_eq!(base, Entity::new(0));
        assert_eq!(game.registry().living_entity_count(), 1);
        assert_eq!(
            game.registry().get_component::<Building>(base).unwrap().kind,
            BuildingKind::Base
        );
        assert_eq!(game.resources().unwrap(), 1000.0);
    }

    #[test]
    fn test_build_spends_resources() {
        let mut game = game();
        let node = game.spawn_resource_node(Vec3::new(3.0, 0.0, 3.0)).unwrap();
        assert!(game.registry().has_component::<ResourceGenerator>(node).unwrap());
        assert_eq!(game.resources().unwrap(), 950.0);

        assert!(matches!(
            game.build(BuildingKind::Base, Vec3::ZERO),
            Err(GameError::BaseAlreadyPlaced)
        ));
    }

    #[test]
    fn test_unaffordable_build_is_rejected() {
        let mut game = Game::new(GameConfig {
            starting_resources: 100.0,
            ..GameConfig::default()
        })
        .unwrap();

        let err = game.build(BuildingKind::Turret, Vec3::ZERO).unwrap_err();
        assert!(matches!(err, GameError::InsufficientResources { .. }));
        assert_eq!(game.resources().unwrap(), 100.0);
        assert_eq!(game.registry().living_entity_count(), 1);
    }

    #[test]
    fn test_damage_kills_on_next_tick() {
        let mut game = game();
        let enemy = game.spawn_enemy(Vec3::new(20.0, 0.0, 0.0)).unwrap();
        game.damage(enemy, 1000.0).unwrap();
        assert!(game.registry().is_alive(enemy));

        game.tick(0.1).unwrap();
        assert!(!game.registry().is_alive(enemy));
        assert_eq!(game.enemies_killed().unwrap(), 1);
    }

    #[test]
    fn test_new_game_restores_state() {
        let mut game = game();
        game.spawn_resource_node(Vec3::ONE).unwrap();
        game.spawn_enemy(Vec3::new(9.0, 0.0, 0.0)).unwrap();
        game.tick(1.0).unwrap();

        let base = game.new_game().unwrap();
        assert_eq!(base, Entity::new(0));
        assert_eq!(game.registry().living_entity_count(), 1);
        assert_eq!(game.resources().unwrap(), 1000.0);
        assert_eq!(game.ticks(), 0);
    }
}
