//! Synchronous game driver: lets a bot play one game to an end or a stall.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::models::*;
use crate::game::types::Rotation;
use crate::game::validator::PlacementError;
use crate::game::GameState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub placements: usize,
    pub steps: usize,
    pub game_over: Option<GameOver>,
    /// The bot ran out of options before the game ended.
    pub stalled: bool,
}

/// Select, rotate and place according to `mv`.
pub fn apply_move(state: &mut GameState, mv: Move) -> Result<PlaceOutcome, PlacementError> {
    state.select_tile(Some(mv.tile))?;
    for _ in 0..mv.rotation % 4 {
        state.rotate_selected(Rotation::Clockwise)?;
    }
    state.place(mv.position)
}

/// Play until game over, a stall, or `max_steps` actions.
///
/// When the bot has no move it picks up a random tile in modes that allow it,
/// otherwise draws once; a second consecutive miss counts as a stall.
pub fn simulate_game(
    state: &mut GameState,
    strategy: &dyn BotStrategy,
    rng: &mut StdRng,
    max_steps: usize,
) -> SimulationOutcome {
    let mut placements = 0;
    let mut steps = 0;
    let mut stalled = false;
    let mut misses = 0;

    while !state.is_game_over() && steps < max_steps {
        steps += 1;
        if let Some(mv) = strategy.choose_move(state, rng) {
            misses = 0;
            match apply_move(state, mv) {
                Ok(_) => placements += 1,
                Err(e) => {
                    tracing::warn!(error = %e, ?mv, "bot produced an illegal move");
                    stalled = true;
                    break;
                }
            }
            continue;
        }

        misses += 1;
        if misses > 1 {
            stalled = true;
            break;
        }
        if state.allows_pickup() {
            let occupied = state.board().sorted_positions();
            if let Some(&pos) = occupied.choose(rng) {
                if state.pick_up(pos).is_ok() {
                    misses = 0;
                    continue;
                }
            }
        }
        if state.draw_tile().is_ok() {
            misses = 0;
        }
    }

    tracing::debug!(placements, steps, stalled, over = state.is_game_over(), "simulation finished");
    SimulationOutcome {
        placements,
        steps,
        game_over: state.game_over().cloned(),
        stalled,
    }
}
