//! The per-game state machine: selection, rotation, placement, undo, restart.
//!
//! Rejected actions return a [`PlacementError`] and leave everything but the
//! message untouched. Successful placements return the scoring result and the
//! events the mode policy produced.

use thiserror::Error;

use super::board::Board;
use super::modes::{GameMode, ModePolicy, ModeProgress, Table};
use super::scoring::{PlacementResult, ScoreSystem};
use super::shapes::{self, DetectedShape};
use super::types::*;
use super::validator::{PlacementError, PlacementRule};
use crate::engine::config::EngineConfig;
use crate::engine::models::*;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{mode} mode needs {min}-{max} players, got {requested}")]
    InvalidPlayerCount {
        mode: GameMode,
        requested: usize,
        min: usize,
        max: usize,
    },
}

#[derive(Debug)]
pub struct GameState {
    seed: u64,
    policy: Box<dyn ModePolicy>,
    table: Table,
    scores: Vec<ScoreSystem>,
    selected: Option<TileId>,
    legal: Vec<Position>,
    history: Vec<PlacementAction>,
    message: Option<String>,
    last_result: Option<PlacementResult>,
    game_over: Option<GameOver>,
    rotations: u32,
    undos: u32,
}

impl GameState {
    pub fn new(mode: GameMode, num_players: usize, seed: u64, config: &EngineConfig) -> Result<Self, GameError> {
        let range = mode.player_range();
        if !range.contains(&num_players) {
            return Err(GameError::InvalidPlayerCount {
                mode,
                requested: num_players,
                min: *range.start(),
                max: *range.end(),
            });
        }

        let policy = mode.policy(config);
        let score_slots = if policy.shared_score() { 1 } else { num_players };
        let mut state = Self {
            seed,
            policy,
            table: Table::new(num_players, seed),
            scores: vec![ScoreSystem::new(config.scoring); score_slots],
            selected: None,
            legal: Vec::new(),
            history: Vec::new(),
            message: None,
            last_result: None,
            game_over: None,
            rotations: 0,
            undos: 0,
        };
        state.policy.deal(&mut state.table);
        tracing::info!(mode = %mode, players = num_players, seed, "new game");
        Ok(state)
    }

    // --- Commands ---

    /// Select a tile from the active hand, or clear the selection with `None`.
    pub fn select_tile(&mut self, tile: Option<TileId>) -> Result<(), PlacementError> {
        self.message = None;
        let Some(id) = tile else {
            self.selected = None;
            self.legal.clear();
            return Ok(());
        };
        if self.active_player().hand.get(id).is_none() {
            return Err(self.reject(PlacementError::TileNotInHand(id)));
        }
        self.selected = Some(id);
        self.refresh_legal();
        Ok(())
    }

    /// Rotate the selected tile in place within its hand.
    pub fn rotate_selected(&mut self, rotation: Rotation) -> Result<Tile, PlacementError> {
        let Some(id) = self.selected else {
            return Err(self.reject(PlacementError::NoTileSelected));
        };
        let Some(tile) = self.selected_tile() else {
            return Err(self.reject(PlacementError::TileNotInHand(id)));
        };
        let rotated = tile.rotated(rotation);
        let active = self.table.active;
        self.table.players[active].hand.replace(rotated);
        self.rotations += 1;
        self.refresh_legal();
        Ok(rotated)
    }

    /// Place the selected tile at `pos`.
    pub fn place(&mut self, pos: Position) -> Result<PlaceOutcome, PlacementError> {
        if self.game_over.is_some() {
            return Err(self.reject(PlacementError::GameOver));
        }
        let Some(id) = self.selected else {
            return Err(self.reject(PlacementError::NoTileSelected));
        };
        let player = self.table.active;
        let lookup = {
            let hand = &self.table.players[player].hand;
            (hand.index_of(id), hand.get(id).copied())
        };
        let (Some(hand_index), Some(tile)) = lookup else {
            return Err(self.reject(PlacementError::TileNotInHand(id)));
        };
        let edges = match self.policy.rule().check(&self.table.board, &tile, pos) {
            Ok(edges) => edges,
            Err(e) => return Err(self.reject(e)),
        };

        self.table.players[player].hand.remove(id);
        self.table.board.place(pos, tile);
        let slot = self.score_slot(player);
        let result = self.scores[slot].record_placement(edges.matching, edges.total);
        tracing::debug!(player, row = pos.row, col = pos.col, points = result.points_earned, "tile placed");

        let mut events = vec![GameEvent::TilePlaced {
            player,
            tile,
            position: pos,
            points: result.points_earned,
        }];
        events.extend(
            result
                .achievements
                .iter()
                .map(|name| GameEvent::AchievementUnlocked { player, name: name.clone() }),
        );

        let transition = self.policy.after_placement(&mut self.table, &tile, &mut events);
        if transition.clear_history {
            self.history.clear();
        } else {
            self.history.push(PlacementAction {
                tile,
                position: pos,
                player,
                hand_index,
                drawn: transition.drawn,
            });
        }
        if let Some(over) = &transition.game_over {
            tracing::info!(reason = ?over.reason, winners = ?over.winners, "game over");
            events.push(GameEvent::GameOver {
                reason: over.reason,
                winners: over.winners.clone(),
            });
        }
        self.game_over = transition.game_over.clone();

        self.selected = None;
        self.legal.clear();
        self.message = Some(match events.iter().rev().find(|e| e.is_notable()) {
            Some(event) => event.to_string(),
            None => format!("+{} points", result.points_earned),
        });
        self.last_result = Some(result.clone());

        Ok(PlaceOutcome {
            result,
            events,
            game_over: transition.game_over,
        })
    }

    /// Select `tile` and place it at `pos` in one call.
    pub fn place_tile(&mut self, tile: TileId, pos: Position) -> Result<PlaceOutcome, PlacementError> {
        self.select_tile(Some(tile))?;
        self.place(pos)
    }

    /// Revert the last placement. Points already awarded stay awarded.
    pub fn undo(&mut self) -> Option<PlacementAction> {
        let action = self.history.pop()?;
        self.table.board.remove(action.position);
        for &(player, id) in action.drawn.iter().rev() {
            if let Some(tile) = self.table.players[player].hand.remove(id) {
                self.policy.return_to_pool(tile);
            }
        }
        self.table.players[action.player]
            .hand
            .insert(action.hand_index, action.tile);
        self.table.active = action.player;
        self.game_over = None;
        self.selected = None;
        self.legal.clear();
        self.undos += 1;
        self.message = Some(format!("Undid placement at {}", action.position));
        tracing::debug!(player = action.player, row = action.position.row, col = action.position.col, "undo");
        Some(action)
    }

    /// Clear everything and redeal with the original seed.
    pub fn restart(&mut self) {
        let num_players = self.table.players.len();
        self.table = Table::new(num_players, self.seed);
        self.policy.deal(&mut self.table);
        for score in self.scores.iter_mut() {
            score.reset();
        }
        self.selected = None;
        self.legal.clear();
        self.history.clear();
        self.message = None;
        self.last_result = None;
        self.game_over = None;
        self.rotations = 0;
        self.undos = 0;
        tracing::info!(mode = %self.mode(), "game restarted");
    }

    /// Pull one tile from the mode's draw source into the active hand.
    pub fn draw_tile(&mut self) -> Result<Tile, PlacementError> {
        if self.game_over.is_some() {
            return Err(self.reject(PlacementError::GameOver));
        }
        let Some(tile) = self.policy.draw(&mut self.table) else {
            return Err(self.reject(PlacementError::NothingToDraw));
        };
        let active = self.table.active;
        self.table.players[active].hand.push(tile);
        self.message = Some(format!("Drew tile {}", tile.code()));
        Ok(tile)
    }

    /// Take a placed tile back into the active hand. Fixed-grid modes only.
    pub fn pick_up(&mut self, pos: Position) -> Result<Tile, PlacementError> {
        if self.game_over.is_some() {
            return Err(self.reject(PlacementError::GameOver));
        }
        if !self.policy.allows_pickup() {
            return Err(self.reject(PlacementError::PickupNotAllowed));
        }
        let Some(tile) = self.table.board.remove(pos) else {
            return Err(self.reject(PlacementError::EmptyCell(pos)));
        };
        let active = self.table.active;
        self.table.players[active].hand.push(tile);
        self.history.retain(|a| a.position != pos);
        self.refresh_legal();
        self.message = None;
        Ok(tile)
    }

    fn reject(&mut self, error: PlacementError) -> PlacementError {
        tracing::debug!(error = %error, "action rejected");
        self.message = Some(error.to_string());
        error
    }

    fn refresh_legal(&mut self) {
        self.legal = match self.selected_tile() {
            Some(tile) => self.policy.rule().legal_positions(&self.table.board, &tile),
            None => Vec::new(),
        };
    }

    fn score_slot(&self, player: usize) -> usize {
        if self.scores.len() == 1 { 0 } else { player }
    }

    // --- Queries ---

    pub fn mode(&self) -> GameMode {
        self.policy.mode()
    }

    pub fn rule(&self) -> PlacementRule {
        self.policy.rule()
    }

    pub fn board(&self) -> &Board {
        &self.table.board
    }

    pub fn players(&self) -> &[Player] {
        &self.table.players
    }

    pub fn current_player(&self) -> usize {
        self.table.active
    }

    pub fn active_player(&self) -> &Player {
        &self.table.players[self.table.active]
    }

    pub fn selected_tile(&self) -> Option<Tile> {
        let id = self.selected?;
        self.active_player().hand.get(id).copied()
    }

    /// Legal positions for the selected tile in its current orientation.
    pub fn legal_positions(&self) -> &[Position] {
        &self.legal
    }

    pub fn legal_moves(&self, player: usize) -> Vec<Move> {
        self.table.legal_moves(self.policy.rule(), player)
    }

    pub fn has_any_move(&self, player: usize) -> bool {
        self.table.has_any_move(self.policy.rule(), player)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn last_result(&self) -> Option<&PlacementResult> {
        self.last_result.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn game_over(&self) -> Option<&GameOver> {
        self.game_over.as_ref()
    }

    pub fn history(&self) -> &[PlacementAction] {
        &self.history
    }

    pub fn allows_pickup(&self) -> bool {
        self.policy.allows_pickup()
    }

    /// Score for `player`; every player shares one in team modes.
    pub fn score(&self, player: usize) -> &ScoreSystem {
        &self.scores[self.score_slot(player).min(self.scores.len() - 1)]
    }

    pub fn progress(&self) -> ModeProgress {
        self.policy.progress()
    }

    pub fn shapes(&self) -> Vec<DetectedShape> {
        shapes::detect_all(&self.table.board)
    }

    /// Per-edge status of the tile at `pos`; `None` for an empty cell or while
    /// the mode defers feedback and the grid still has gaps.
    pub fn edge_feedback(&self, pos: Position) -> Option<[EdgeStatus; 4]> {
        let tile = self.table.board.get(pos)?;
        if self.policy.defers_feedback() && !self.policy.rule().is_grid_full(&self.table.board) {
            return None;
        }
        Some(self.table.board.edge_statuses(tile, pos))
    }

    pub fn stats(&self) -> SessionStats {
        let mut stats = SessionStats {
            rotations: self.rotations,
            undos: self.undos,
            ..SessionStats::default()
        };
        for score in &self.scores {
            stats.tiles_placed += score.tiles_placed();
            stats.points += score.points();
            stats.perfect_matches += score.perfect_matches();
            stats.stars += score.stars();
        }
        stats
    }
}
