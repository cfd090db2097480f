//! # BASTION Headless Simulation
//!
//! Runs a fixed-step game with deterministic enemy waves and prints a
//! summary. An optional TOML config path may be passed as the first argument.
//!
//! Run with: `cargo run --bin bastion_sim -- [config.toml]`

use std::time::Instant;

use bastion::gameplay::BuildingKind;
use bastion::{Game, GameConfig, GameResult, Vec3, WaveConfig, WaveSpawner};

/// Fixed simulation step (60 Hz).
const DT: f32 = 1.0 / 60.0;

/// Five simulated minutes.
const MAX_TICKS: u64 = 60 * 60 * 5;

const WAVE_SEED: u64 = 0x0BA5_710A;

fn load_config() -> GameConfig {
    let Some(path) = std::env::args().nth(1) else {
        return GameConfig::default();
    };

    match std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| GameConfig::from_toml_str(&text).map_err(|e| e.to_string()))
    {
        Ok(config) => {
            println!("  Config:   {path}");
            config
        }
        Err(e) => {
            eprintln!("  ✗ FATAL: could not load {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn setup(game: &mut Game) -> GameResult<()> {
    for (x, z) in [(3.0, 0.0), (-3.0, 0.0), (0.0, 3.0)] {
        game.spawn_resource_node(Vec3::new(x, 0.0, z))?;
    }
    for (x, z) in [(2.0, 2.0), (-2.0, -2.0)] {
        game.build(BuildingKind::Turret, Vec3::new(x, 0.0, z))?;
    }
    Ok(())
}

fn run() -> GameResult<()> {
    let config = load_config();
    let mut game = Game::new(config)?;
    setup(&mut game)?;

    let mut waves = WaveSpawner::new(WaveConfig::default(), WAVE_SEED);
    let mut spawned = 0u32;
    let start = Instant::now();

    while game.ticks() < MAX_TICKS && !game.is_over()? {
        spawned += waves.update(&mut game, DT)?;
        game.tick(DT)?;
    }

    let elapsed = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let sim_seconds = game.ticks() as f32 * DT;

    println!();
    println!("┌─ RESULT ─────────────────────────────────────────────────────────┐");
    println!("│ Outcome:           {}", if game.is_over()? { "BASE LOST" } else { "SURVIVED" });
    println!("│ Simulated:         {sim_seconds:.1} s ({} ticks)", game.ticks());
    println!("│ Wall clock:        {:.2} ms", elapsed.as_secs_f64() * 1000.0);
    println!("│ Waves:             {}", waves.waves_spawned());
    println!("│ Enemies spawned:   {spawned}");
    println!("│ Enemies killed:    {}", game.enemies_killed()?);
    println!("│ Living entities:   {}", game.registry().living_entity_count());
    println!("│ Resources:         {:.1}", game.resources()?);
    println!("│ Balance:           {:.0}% light", game.balance()? * 100.0);
    println!("└──────────────────────────────────────────────────────────────────┘");
    Ok(())
}

fn main() {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                 BASTION SIMULATION v0.1.0");
    println!("═══════════════════════════════════════════════════════════════════");

    if let Err(e) = run() {
        eprintln!("  ✗ simulation failed: {e}");
        std::process::exit(1);
    }
}
