//! Plain data shared between the state machine, mode policies and callers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::scoring::PlacementResult;
use crate::game::shapes::ShapeKind;
use crate::game::types::{Position, Tile, TileId};

/// Ordered tiles owned by one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    tiles: Vec<Tile>,
}

impl Hand {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn index_of(&self, id: TileId) -> Option<usize> {
        self.tiles.iter().position(|t| t.id == id)
    }

    pub fn push(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    /// Insert at `index`, or at the end when the hand has shrunk below it.
    pub fn insert(&mut self, index: usize, tile: Tile) {
        let index = index.min(self.tiles.len());
        self.tiles.insert(index, tile);
    }

    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let index = self.index_of(id)?;
        Some(self.tiles.remove(index))
    }

    /// Swap in a new value for the tile with the same id. Returns false when absent.
    pub fn replace(&mut self, tile: Tile) -> bool {
        match self.tiles.iter_mut().find(|t| t.id == tile.id) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    pub fn extend(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.tiles.extend(tiles);
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub index: usize,
    pub display_name: String,
    pub hand: Hand,
}

impl Player {
    pub fn new(index: usize, display_name: impl Into<String>) -> Self {
        Self {
            index,
            display_name: display_name.into(),
            hand: Hand::default(),
        }
    }
}

/// Undo record for one placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementAction {
    pub tile: Tile,
    pub position: Position,
    pub player: usize,
    /// Slot the tile occupied in the hand before it was placed.
    pub hand_index: usize,
    /// Tiles auto-drawn into hands by the mode after this placement.
    #[serde(default)]
    pub drawn: Vec<(usize, TileId)>,
}

/// A concrete move: which hand tile, how many clockwise quarter turns, where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub tile: TileId,
    pub rotation: u8,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// A player emptied their hand.
    HandEmptied,
    /// No player can move.
    Blocked,
    /// The shared board reached its target size.
    TargetReached,
    /// Draw pool and every hand are empty before the target.
    PoolExhausted,
    AllLevelsCleared,
    AllShapesFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub reason: GameOverReason,
    pub winners: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    TilePlaced { player: usize, tile: Tile, position: Position, points: u32 },
    AchievementUnlocked { player: usize, name: String },
    ExtraTurn { player: usize },
    TurnPassed { from: usize, to: usize },
    PlayerSkipped { player: usize },
    HandRefilled { player: usize, count: usize },
    LevelCompleted { level: usize, grid_size: i32 },
    ShapeCompleted { shape: ShapeKind, level: u32 },
    TargetMissing { shape: ShapeKind },
    GameOver { reason: GameOverReason, winners: Vec<usize> },
}

impl GameEvent {
    /// Events worth surfacing as the user-facing message.
    pub fn is_notable(&self) -> bool {
        !matches!(
            self,
            GameEvent::TilePlaced { .. } | GameEvent::AchievementUnlocked { .. } | GameEvent::TurnPassed { .. }
        )
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::TilePlaced { player, position, points, .. } => {
                write!(f, "Player {} placed a tile at {} for {} points", player + 1, position, points)
            }
            GameEvent::AchievementUnlocked { name, .. } => write!(f, "Achievement unlocked: {name}"),
            GameEvent::ExtraTurn { player } => {
                write!(f, "Solid tile! Player {} takes another turn", player + 1)
            }
            GameEvent::TurnPassed { to, .. } => write!(f, "Player {}'s turn", to + 1),
            GameEvent::PlayerSkipped { player } => {
                write!(f, "Player {} has no legal moves and is skipped", player + 1)
            }
            GameEvent::HandRefilled { player, count } => {
                write!(f, "Player {} drew {} tiles", player + 1, count)
            }
            GameEvent::LevelCompleted { level, grid_size } => {
                write!(f, "Level {} complete ({}x{} grid)", level + 1, grid_size, grid_size)
            }
            GameEvent::ShapeCompleted { shape, .. } => write!(f, "{shape} found!"),
            GameEvent::TargetMissing { shape } => {
                write!(f, "Grid is full but no {} was found; pick up tiles to rearrange", shape.label().to_lowercase())
            }
            GameEvent::GameOver { reason, winners } => match reason {
                GameOverReason::HandEmptied | GameOverReason::Blocked if winners.len() == 1 => {
                    write!(f, "Game over: Player {} wins", winners[0] + 1)
                }
                GameOverReason::Blocked => write!(f, "Game over: no player can move"),
                GameOverReason::TargetReached => write!(f, "Team goal reached!"),
                GameOverReason::PoolExhausted => write!(f, "Out of tiles before reaching the goal"),
                GameOverReason::AllLevelsCleared => write!(f, "All levels complete!"),
                GameOverReason::AllShapesFound => write!(f, "Every shape found!"),
                GameOverReason::HandEmptied => write!(f, "Game over"),
            },
        }
    }
}

/// What a successful placement produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOutcome {
    pub result: PlacementResult,
    pub events: Vec<GameEvent>,
    pub game_over: Option<GameOver>,
}

/// Session counters a caller can turn into a challenge summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub tiles_placed: u32,
    pub rotations: u32,
    pub undos: u32,
    pub points: u32,
    pub perfect_matches: u32,
    pub stars: u32,
}
