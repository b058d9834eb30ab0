//! Placement legality. Each rule is a pure policy over a board snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::board::{Board, EdgeMatch};
use super::types::*;

/// Largest side accepted for a fixed grid.
pub const MAX_GRID_SIZE: i32 = 16;

/// Recoverable failures of a player action. The game state is unchanged
/// apart from its message field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("Select a tile first")]
    NoTileSelected,
    #[error("The game is over")]
    GameOver,
    #[error("Tile {0} is not in the current player's hand")]
    TileNotInHand(TileId),
    #[error("Position {0} is already occupied")]
    Occupied(Position),
    #[error("Position {0} is outside the playable area")]
    OutOfBounds(Position),
    #[error("Position {0} is outside the grid")]
    OutOfGrid(Position),
    #[error("Position {0} is not next to any placed tile")]
    NotAdjacent(Position),
    #[error("Edges do not match ({matching} of {total} neighbors)")]
    EdgeMismatch { matching: u32, total: u32 },
    #[error("Nothing left to draw")]
    NothingToDraw,
    #[error("Tiles cannot be picked up in this mode")]
    PickupNotAllowed,
    #[error("No tile at {0}")]
    EmptyCell(Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PlacementRule {
    /// Every existing neighbor's facing edge must equal the candidate's edge.
    StrictMatch,
    /// Any cell touching the placed area; colors only score.
    FreeAdjacency,
    /// Any empty cell of a `size` x `size` grid anchored at the origin.
    FixedGrid { size: i32 },
}

impl PlacementRule {
    /// Check a placement and return its edge comparison when legal.
    pub fn check(&self, board: &Board, tile: &Tile, pos: Position) -> Result<EdgeMatch, PlacementError> {
        if !pos.is_interior() {
            return Err(PlacementError::OutOfBounds(pos));
        }
        if board.contains(pos) {
            return Err(PlacementError::Occupied(pos));
        }
        let edges = board.matching_edge_count(tile, pos);
        match *self {
            PlacementRule::StrictMatch => {
                if board.is_empty() {
                    return Ok(edges);
                }
                if edges.total == 0 {
                    return Err(PlacementError::NotAdjacent(pos));
                }
                if edges.matching != edges.total {
                    return Err(PlacementError::EdgeMismatch {
                        matching: edges.matching,
                        total: edges.total,
                    });
                }
                Ok(edges)
            }
            PlacementRule::FreeAdjacency => {
                if board.is_empty() || board.has_occupied_neighbor(pos) {
                    Ok(edges)
                } else {
                    Err(PlacementError::NotAdjacent(pos))
                }
            }
            PlacementRule::FixedGrid { size } => {
                if in_grid(pos, size) {
                    Ok(edges)
                } else {
                    Err(PlacementError::OutOfGrid(pos))
                }
            }
        }
    }

    pub fn is_legal(&self, board: &Board, tile: &Tile, pos: Position) -> bool {
        self.check(board, tile, pos).is_ok()
    }

    /// Positions worth testing, row-major. An empty open board offers only the origin.
    pub fn candidate_positions(&self, board: &Board) -> Vec<Position> {
        let mut positions: Vec<Position> = match *self {
            PlacementRule::FixedGrid { size } => (0..size)
                .flat_map(|row| (0..size).map(move |col| Position::new(row, col)))
                .filter(|p| !board.contains(*p))
                .collect(),
            _ if board.is_empty() => vec![Position::ORIGIN],
            _ => board.adjacent_empty_positions().into_iter().collect(),
        };
        positions.sort();
        positions
    }

    pub fn legal_positions(&self, board: &Board, tile: &Tile) -> Vec<Position> {
        self.candidate_positions(board)
            .into_iter()
            .filter(|&p| self.is_legal(board, tile, p))
            .collect()
    }

    /// Whether any rotation of `tile` fits somewhere.
    pub fn has_placement(&self, board: &Board, tile: &Tile) -> bool {
        let candidates = self.candidate_positions(board);
        (0..4u8).any(|steps| {
            let rotated = tile.rotated_steps(steps);
            candidates.iter().any(|&p| self.is_legal(board, &rotated, p))
        })
    }

    pub fn grid_size(&self) -> Option<i32> {
        match *self {
            PlacementRule::FixedGrid { size } => Some(size),
            _ => None,
        }
    }

    /// Fixed grids are full when every cell is occupied; open boards never are.
    pub fn is_grid_full(&self, board: &Board) -> bool {
        match *self {
            PlacementRule::FixedGrid { size } => board.len() >= grid_cells(size),
            _ => false,
        }
    }
}

/// Cell count of a `size` x `size` grid; non-positive sizes have none.
pub fn grid_cells(size: i32) -> usize {
    let side = usize::try_from(size).unwrap_or(0);
    side.saturating_mul(side)
}

fn in_grid(pos: Position, size: i32) -> bool {
    (0..size).contains(&pos.row) && (0..size).contains(&pos.col)
}
