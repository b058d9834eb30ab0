//! Arena CLI: run many seeded bot games from the command line.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 200 --mode cooperative --players 3
//!   cargo run --release --bin arena -- --games 50 --mode levels --players 1 --strategy random

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use edge_match_engine::engine::arena::{run_arena, ArenaSettings};
use edge_match_engine::engine::bot_strategy::StrategyKind;
use edge_match_engine::engine::config::{load_config, load_default_config};
use edge_match_engine::game::GameMode;

#[derive(Parser)]
#[command(name = "arena", about = "Run batches of bot games and report aggregate stats")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    games: usize,

    /// Game mode: competitive, cooperative, sandbox, levels, shape_goal
    #[arg(long, default_value = "competitive")]
    mode: GameMode,

    /// Players per game
    #[arg(long, default_value = "2")]
    players: usize,

    /// Bot strategy: random or greedy
    #[arg(long, default_value = "greedy")]
    strategy: StrategyKind,

    /// Base seed; game i uses seed + i
    #[arg(long, default_value = "42", env = "EDGE_MATCH_SEED")]
    seed: u64,

    /// Step cap per game
    #[arg(long, default_value = "1000")]
    max_steps: usize,

    /// Path to edge_match.toml (default: auto-discover)
    #[arg(long, env = "EDGE_MATCH_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = match cli.config {
        Some(ref path) => load_config(path)?,
        None => load_default_config(),
    };

    let settings = ArenaSettings {
        mode: cli.mode,
        num_players: cli.players,
        strategy: cli.strategy,
        num_games: cli.games,
        base_seed: cli.seed,
        max_steps: cli.max_steps,
    };
    tracing::info!(games = cli.games, mode = %cli.mode, players = cli.players, "starting arena");
    let result = run_arena(&settings, &config)?;
    println!("{}", result.summary());
    Ok(())
}
