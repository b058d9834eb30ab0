//! Bot strategy trait and implementations.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fmt;
use std::str::FromStr;

use crate::engine::models::Move;
use crate::game::GameState;

/// A bot strategy picks a move for the active player, or `None` if it has none.
pub trait BotStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn choose_move(&self, state: &GameState, rng: &mut StdRng) -> Option<Move>;
}

/// Picks a uniformly random legal move.
pub struct RandomStrategy;

impl BotStrategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_move(&self, state: &GameState, rng: &mut StdRng) -> Option<Move> {
        let moves = state.legal_moves(state.current_player());
        moves.choose(rng).copied()
    }
}

/// Picks the move with the most matching edges; ties go to a random candidate.
pub struct GreedyStrategy;

impl BotStrategy for GreedyStrategy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn choose_move(&self, state: &GameState, rng: &mut StdRng) -> Option<Move> {
        let player = state.active_player();
        let board = state.board();
        let scored: Vec<(u32, Move)> = state
            .legal_moves(player.index)
            .into_iter()
            .filter_map(|mv| {
                let tile = player.hand.get(mv.tile)?.rotated_steps(mv.rotation);
                let edges = board.matching_edge_count(&tile, mv.position);
                let bonus = u32::from(edges.is_perfect());
                Some((edges.matching * 2 + bonus, mv))
            })
            .collect();
        let best = scored.iter().map(|(s, _)| *s).max()?;
        let top: Vec<Move> = scored
            .into_iter()
            .filter(|(s, _)| *s == best)
            .map(|(_, mv)| mv)
            .collect();
        top.choose(rng).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Random,
    Greedy,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn BotStrategy> {
        match self {
            StrategyKind::Random => Box::new(RandomStrategy),
            StrategyKind::Greedy => Box::new(GreedyStrategy),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.build().name())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(StrategyKind::Random),
            "greedy" => Ok(StrategyKind::Greedy),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}
