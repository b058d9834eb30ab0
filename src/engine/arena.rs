//! Batch runner: many seeded bot games in parallel, aggregated into one report.

use std::collections::BTreeMap;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::engine::bot_strategy::StrategyKind;
use crate::engine::config::EngineConfig;
use crate::engine::simulator::simulate_game;
use crate::game::{GameError, GameMode, GameState};

#[derive(Debug, Clone)]
pub struct ArenaSettings {
    pub mode: GameMode,
    pub num_players: usize,
    pub strategy: StrategyKind,
    pub num_games: usize,
    pub base_seed: u64,
    pub max_steps: usize,
}

/// Per-game record kept for the summary.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub seed: u64,
    pub finished: bool,
    pub stalled: bool,
    pub reason: Option<String>,
    pub points: u32,
    pub stars: u32,
    pub placements: usize,
    pub duration_ms: f64,
}

/// Aggregated results from an arena run.
#[derive(Debug, Clone)]
pub struct ArenaResult {
    pub settings: ArenaSettings,
    pub games: Vec<GameRecord>,
}

impl ArenaResult {
    pub fn num_games(&self) -> usize {
        self.games.len()
    }

    pub fn completion_rate(&self) -> f64 {
        let done = self.games.iter().filter(|g| g.finished).count();
        done as f64 / self.games.len().max(1) as f64
    }

    fn mean(&self, f: impl Fn(&GameRecord) -> f64) -> f64 {
        if self.games.is_empty() {
            return 0.0;
        }
        self.games.iter().map(f).sum::<f64>() / self.games.len() as f64
    }

    pub fn avg_points(&self) -> f64 {
        self.mean(|g| g.points as f64)
    }

    pub fn avg_stars(&self) -> f64 {
        self.mean(|g| g.stars as f64)
    }

    pub fn avg_placements(&self) -> f64 {
        self.mean(|g| g.placements as f64)
    }

    pub fn points_stddev(&self) -> f64 {
        let n = self.games.len();
        if n < 2 {
            return 0.0;
        }
        let avg = self.avg_points();
        let variance = self
            .games
            .iter()
            .map(|g| (g.points as f64 - avg).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;
        variance.sqrt()
    }

    /// How many games ended for each reason.
    pub fn reasons(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for game in &self.games {
            let key = game.reason.clone().unwrap_or_else(|| {
                if game.stalled { "stalled".into() } else { "step_cap".into() }
            });
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self) -> String {
        let s = &self.settings;
        let mut lines = vec![format!(
            "Arena Results ({} games, mode={}, players={}, strategy={})",
            self.num_games(),
            s.mode,
            s.num_players,
            s.strategy
        )];
        lines.push("=".repeat(60));
        lines.push(format!("  {:>12}: {:5.1}%", "Completed", self.completion_rate() * 100.0));
        lines.push(format!(
            "  {:>12}: {:6.1} +/- {:5.1}",
            "Points",
            self.avg_points(),
            self.points_stddev()
        ));
        lines.push(format!("  {:>12}: {:5.2}", "Stars", self.avg_stars()));
        lines.push(format!("  {:>12}: {:5.1}", "Placements", self.avg_placements()));
        for (reason, count) in self.reasons() {
            lines.push(format!("  {:>12}: {}", reason, count));
        }
        if !self.games.is_empty() {
            let total_ms: f64 = self.games.iter().map(|g| g.duration_ms).sum();
            lines.push(format!(
                "  Avg game: {:.1}ms  |  Total: {:.2}s",
                total_ms / self.games.len() as f64,
                total_ms / 1000.0
            ));
        }
        lines.join("\n")
    }
}

/// Run `settings.num_games` games with consecutive seeds, in parallel.
pub fn run_arena(settings: &ArenaSettings, config: &EngineConfig) -> Result<ArenaResult, GameError> {
    // surface a bad player count once instead of per game
    GameState::new(settings.mode, settings.num_players, settings.base_seed, config)?;

    let mut games: Vec<GameRecord> = (0..settings.num_games)
        .into_par_iter()
        .filter_map(|i| {
            let seed = settings.base_seed + i as u64;
            play_one_game(settings, config, seed).ok()
        })
        .collect();
    games.sort_by_key(|g| g.seed);

    tracing::info!(games = games.len(), mode = %settings.mode, "arena run complete");
    Ok(ArenaResult {
        settings: settings.clone(),
        games,
    })
}

fn play_one_game(settings: &ArenaSettings, config: &EngineConfig, seed: u64) -> Result<GameRecord, GameError> {
    let t0 = Instant::now();
    let mut state = GameState::new(settings.mode, settings.num_players, seed, config)?;
    let strategy = settings.strategy.build();
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    let outcome = simulate_game(&mut state, strategy.as_ref(), &mut rng, settings.max_steps);
    let stats = state.stats();
    Ok(GameRecord {
        seed,
        finished: outcome.game_over.is_some(),
        stalled: outcome.stalled,
        reason: outcome
            .game_over
            .and_then(|g| serde_json::to_value(g.reason).ok())
            .and_then(|v| v.as_str().map(str::to_string)),
        points: stats.points,
        stars: stats.stars,
        placements: outcome.placements,
        duration_ms: t0.elapsed().as_secs_f64() * 1000.0,
    })
}
