//! # Enemy Waves
//!
//! Spawns enemies on a ring around the base at a fixed interval. Positions
//! come from a seeded ChaCha RNG, so a seed always replays the same waves.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GameResult;
use crate::game_loop::Game;
use crate::math::Vec3;

/// Wave timing and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveConfig {
    /// Seconds between waves.
    pub interval: f32,
    /// Enemies in the first wave.
    pub initial_size: u32,
    /// Extra enemies per subsequent wave.
    pub growth: u32,
    /// Spawn distance from the base.
    pub radius: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            interval: 10.0,
            initial_size: 3,
            growth: 1,
            radius: 12.0,
        }
    }
}

/// Deterministic wave spawner.
pub struct WaveSpawner {
    config: WaveConfig,
    rng: ChaCha8Rng,
    timer: f32,
    waves_spawned: u32,
}

impl WaveSpawner {
    /// Creates a spawner. The first wave spawns on the first update.
    #[must_use]
    pub fn new(config: WaveConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            timer: 0.0,
            waves_spawned: 0,
        }
    }

    /// Number of waves released so far.
    #[must_use]
    pub fn waves_spawned(&self) -> u32 {
        self.waves_spawned
    }

    /// Advances the timer and releases a wave when it runs out.
    ///
    /// Returns the number of enemies spawned.
    ///
    /// # Errors
    ///
    /// Spawn failures, e.g. no base or a full entity pool.
    pub fn update(&mut self, game: &mut Game, dt: f32) -> GameResult<u32> {
        self.timer -= dt;
        if self.timer > 0.0 {
            return Ok(0);
        }
        self.timer = self.config.interval;

        let size = self.config.initial_size + self.waves_spawned * self.config.growth;
        for _ in 0..size {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let position = Vec3::new(
                angle.cos() * self.config.radius,
                0.0,
                angle.sin() * self.config.radius,
            );
            game.spawn_enemy(position)?;
        }

        self.waves_spawned += 1;
        tracing::debug!(wave = self.waves_spawned, size, "wave released");
        Ok(size)
    }
}
