//! Arena Simulation - parallel breed-then-battle trials
//!
//! Each trial opens two boxes, breeds them and sends the offspring against a
//! stage enemy. Trials are independent and run on the rayon pool, each with
//! its own seeded RNG, so results do not depend on thread scheduling.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use ahash::AHashMap;
use clap::Parser;
use creature_arena::battle::{run_battle, Winner};
use creature_arena::catalog::Catalog;
use creature_arena::core::{load_config, EngineConfig, Result};
use creature_arena::genetics::{breed, open_box, BoxTier, BreedingContext};
use creature_arena::rewards::stage_enemy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "arena_sim")]
#[command(about = "Run many independent breed-then-battle trials in parallel")]
struct Args {
    /// Number of trials
    #[arg(long, short = 'n', default_value_t = 1000)]
    trials: u32,

    /// Base seed; trial i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stage whose enemy every offspring fights
    #[arg(long, default_value_t = 5)]
    stage: u32,

    /// Override the configured mutation bonus
    #[arg(long)]
    mutation_bonus: Option<f64>,

    /// Override the configured maximum mutation chain
    #[arg(long)]
    max_chain: Option<u8>,

    /// Engine config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

struct TrialOutcome {
    mutations: u32,
    offspring_power: u32,
    winner: Winner,
    turns: u32,
}

fn run_trial(index: u32, args: &Args, config: &EngineConfig, catalog: &Catalog) -> Result<TrialOutcome> {
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed.wrapping_add(index as u64));

    let parent_a = open_box(BoxTier::Premium, "arena_sim", catalog, &mut rng);
    let parent_b = open_box(BoxTier::Premium, "arena_sim", catalog, &mut rng);
    let ctx = BreedingContext::new(config.breeding.clone(), index + 1, "arena_sim");
    let child = breed(&parent_a, &parent_b, &ctx, catalog, &mut rng);

    let enemy = stage_enemy(args.stage, &config.rewards, catalog, &mut rng);
    let result = run_battle(&child, &enemy, catalog, &config.battle, &mut rng)?;

    Ok(TrialOutcome {
        mutations: child.mutation().count,
        offspring_power: child.power_score(),
        winner: result.winner,
        turns: result.turns,
    })
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    if let Some(bonus) = args.mutation_bonus {
        config.breeding.mutation_bonus = bonus;
    }
    if let Some(chain) = args.max_chain {
        config.breeding.max_chain_mutations = chain;
    }
    config.validate()?;

    let catalog = Catalog::builtin();
    let start = Instant::now();

    let outcomes: Vec<TrialOutcome> = (0..args.trials)
        .into_par_iter()
        .map(|i| run_trial(i, args, &config, &catalog))
        .collect::<Result<Vec<_>>>()?;

    let elapsed = start.elapsed();
    let total = outcomes.len().max(1) as f64;

    let mut mutation_histogram: AHashMap<u32, u32> = AHashMap::new();
    let mut wins: AHashMap<Winner, u32> = AHashMap::new();
    let mut power_sum = 0u64;
    let mut turn_sum = 0u64;
    for outcome in &outcomes {
        *mutation_histogram.entry(outcome.mutations).or_default() += 1;
        *wins.entry(outcome.winner).or_default() += 1;
        power_sum += outcome.offspring_power as u64;
        turn_sum += outcome.turns as u64;
    }

    println!("=== ARENA SIMULATION ===");
    println!(
        "Trials: {}  stage: {}  bonus: {}  max chain: {}",
        outcomes.len(),
        args.stage,
        config.breeding.mutation_bonus,
        config.breeding.max_chain_mutations
    );
    println!("Elapsed: {:.2?}", elapsed);
    println!();
    println!("Mutation count distribution:");
    for count in 0..=5u32 {
        let n = mutation_histogram.get(&count).copied().unwrap_or(0);
        println!("  {}: {:>6} ({:>5.1}%)", count, n, n as f64 / total * 100.0);
    }
    println!();
    println!("Outcomes:");
    for winner in [Winner::Player, Winner::Enemy, Winner::Draw] {
        let n = wins.get(&winner).copied().unwrap_or(0);
        println!("  {:<7} {:>6} ({:>5.1}%)", winner.name(), n, n as f64 / total * 100.0);
    }
    println!();
    println!("Mean offspring power: {:.1}", power_sum as f64 / total);
    println!("Mean battle length:   {:.1} turns", turn_sum as f64 / total);

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("creature_arena=info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("arena_sim failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
