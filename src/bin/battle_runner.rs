//! Headless Battle Runner
//!
//! Runs one seeded battle between a box-opened player and a stage enemy and
//! prints the result as JSON or text.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use creature_arena::battle::run_battle;
use creature_arena::catalog::Catalog;
use creature_arena::core::{load_config, EngineConfig, Result};
use creature_arena::genetics::{open_box, BoxTier};
use creature_arena::rewards::{stage_enemy, stage_enemy_power};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Headless Battle Runner - one seeded battle against a stage enemy
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run a seeded battle between a generated creature and a stage enemy")]
struct Args {
    /// Stage whose enemy the player fights
    #[arg(long, default_value_t = 1)]
    stage: u32,

    /// Box the player creature comes from: basic, premium or mythic
    #[arg(long, default_value = "premium")]
    tier: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Engine config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog file (TOML); the built-in catalog is used when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Include the full battle log in text output
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct RunnerOutput<'a> {
    seed: u64,
    stage: u32,
    stage_power: u32,
    player_power: u32,
    enemy_power: u32,
    result: &'a creature_arena::battle::BattleResult,
}

fn parse_tier(name: &str) -> Option<BoxTier> {
    match name.to_lowercase().as_str() {
        "basic" => Some(BoxTier::Basic),
        "premium" => Some(BoxTier::Premium),
        "mythic" => Some(BoxTier::Mythic),
        _ => None,
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => Catalog::load_file(path)?,
        None => Catalog::builtin(),
    };
    let tier = parse_tier(&args.tier).unwrap_or_else(|| {
        tracing::warn!("Unknown tier '{}', using premium", args.tier);
        BoxTier::Premium
    });

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let player = open_box(tier, "battle_runner", &catalog, &mut rng);
    let enemy = stage_enemy(args.stage, &config.rewards, &catalog, &mut rng);
    tracing::info!(
        "Seed {}: {} (power {}) vs {} (power {})",
        seed,
        player.name,
        player.power_score(),
        enemy.name,
        enemy.power_score()
    );

    let result = run_battle(&player, &enemy, &catalog, &config.battle, &mut rng)?;

    if args.format == "text" {
        println!("=== {} vs {} (seed {}) ===", player.name, enemy.name, seed);
        if args.verbose {
            for line in result.log_lines() {
                println!("{}", line);
            }
            println!();
        }
        println!("Winner: {}", result.winner.name());
        println!("Turns:  {}", result.turns);
        for side in [&result.player, &result.enemy] {
            println!(
                "  {:<18} HP {:>5}/{:<5} damage {:>6}  skills {}",
                side.name, side.final_hp, side.max_hp, side.damage_dealt, side.skills_used
            );
        }
    } else {
        let output = RunnerOutput {
            seed,
            stage: args.stage,
            stage_power: stage_enemy_power(args.stage, &config.rewards),
            player_power: player.power_score(),
            enemy_power: enemy.power_score(),
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("creature_arena=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("battle_runner failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
