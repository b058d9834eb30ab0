use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use edge_match_engine::engine::bot_strategy::StrategyKind;
use edge_match_engine::engine::config::{load_config, load_default_config};
use edge_match_engine::engine::simulator::simulate_game;
use edge_match_engine::game::{GameMode, GameState};

#[derive(Parser)]
#[command(name = "edge-match-engine", about = "Play one seeded edge-matching game with a bot and print the result")]
struct Cli {
    /// Game mode: competitive, cooperative, sandbox, levels, shape_goal
    #[arg(short, long, default_value = "competitive")]
    mode: GameMode,

    /// Number of players
    #[arg(short, long, default_value = "2")]
    players: usize,

    /// Random seed
    #[arg(short, long, default_value = "42", env = "EDGE_MATCH_SEED")]
    seed: u64,

    /// Bot strategy: random or greedy
    #[arg(long, default_value = "greedy")]
    strategy: StrategyKind,

    /// Stop after this many bot actions
    #[arg(long, default_value = "500")]
    max_steps: usize,

    /// Path to edge_match.toml (default: auto-discover)
    #[arg(long, env = "EDGE_MATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Print the final state as JSON instead of text
    #[arg(long)]
    json: bool,
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

    let mut state = GameState::new(cli.mode, cli.players, cli.seed, &config)?;
    let strategy = cli.strategy.build();
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let outcome = simulate_game(&mut state, strategy.as_ref(), &mut rng, cli.max_steps);
    let shapes = state.shapes();

    if cli.json {
        let snapshot = serde_json::json!({
            "mode": cli.mode,
            "seed": cli.seed,
            "board": state.board(),
            "outcome": outcome,
            "stats": state.stats(),
            "progress": state.progress(),
            "shapes": shapes,
        });
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print!("{}", state.board().render_text());
    println!();
    if let Some(message) = state.message() {
        println!("{message}");
    }
    println!("{} shapes on the board:", shapes.len());
    for shape in &shapes {
        println!("  {}", shape.description);
    }
    println!("{}", serde_json::to_string(&state.stats())?);
    Ok(())
}
