//! Sparse board: placed tiles keyed by position, bounding box, adjacency queries.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub min_row: i32,
    pub max_row: i32,
    pub min_col: i32,
    pub max_col: i32,
}

impl Bounds {
    fn at(pos: Position) -> Self {
        Self {
            min_row: pos.row,
            max_row: pos.row,
            min_col: pos.col,
            max_col: pos.col,
        }
    }

    fn include(&mut self, pos: Position) {
        self.min_row = self.min_row.min(pos.row);
        self.max_row = self.max_row.max(pos.row);
        self.min_col = self.min_col.min(pos.col);
        self.max_col = self.max_col.max(pos.col);
    }
}

/// Result of comparing a candidate's edges against its placed neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeMatch {
    pub matching: u32,
    pub total: u32,
}

impl EdgeMatch {
    /// Every existing neighbor matches, and there is at least one.
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.matching == self.total
    }
}

/// Placed tiles plus bounds maintained on insert and recomputed on removal.
/// The board does not validate placements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    tiles: HashMap<Position, Tile>,
    bounds: Bounds,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.tiles.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Position, &Tile)> {
        self.tiles.iter()
    }

    /// Occupied positions in row-major order.
    pub fn sorted_positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.tiles.keys().copied().collect();
        positions.sort();
        positions
    }

    /// Insert a tile. Returns the tile previously at `pos`, if any.
    pub fn place(&mut self, pos: Position, tile: Tile) -> Option<Tile> {
        if self.tiles.is_empty() {
            self.bounds = Bounds::at(pos);
        } else {
            self.bounds.include(pos);
        }
        self.tiles.insert(pos, tile)
    }

    pub fn remove(&mut self, pos: Position) -> Option<Tile> {
        let removed = self.tiles.remove(&pos)?;
        self.recalculate_bounds();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
        self.bounds = Bounds::default();
    }

    /// Drain every tile in row-major order, leaving the board empty.
    pub fn take_all(&mut self) -> Vec<Tile> {
        let tiles = self
            .sorted_positions()
            .into_iter()
            .filter_map(|p| self.tiles.get(&p).copied())
            .collect();
        self.clear();
        tiles
    }

    /// O(occupied) rescan; removal can shrink the box in ways not derivable locally.
    fn recalculate_bounds(&mut self) {
        let mut keys = self.tiles.keys();
        let Some(&first) = keys.next() else {
            self.bounds = Bounds::default();
            return;
        };
        let mut bounds = Bounds::at(first);
        for &pos in keys {
            bounds.include(pos);
        }
        self.bounds = bounds;
    }

    fn neighbor_tile(&self, pos: Position, dir: Direction) -> Option<&Tile> {
        self.tiles.get(&pos.checked_neighbor(dir)?)
    }

    pub fn has_occupied_neighbor(&self, pos: Position) -> bool {
        Direction::ALL.iter().any(|&dir| self.neighbor_tile(pos, dir).is_some())
    }

    /// Empty positions next to at least one occupied position.
    pub fn adjacent_empty_positions(&self) -> HashSet<Position> {
        let mut open = HashSet::new();
        for &pos in self.tiles.keys() {
            for neighbor in Direction::ALL.iter().filter_map(|&d| pos.checked_neighbor(d)) {
                if !self.tiles.contains_key(&neighbor) {
                    open.insert(neighbor);
                }
            }
        }
        open
    }

    /// Compare `tile`'s edges against the facing edges of existing neighbors of `pos`.
    ///
    /// The upward neighbor's bottom edge is compared with the candidate's top edge,
    /// and likewise for the other three directions.
    pub fn matching_edge_count(&self, tile: &Tile, pos: Position) -> EdgeMatch {
        let mut result = EdgeMatch::default();
        for dir in Direction::ALL {
            let Some(neighbor) = self.neighbor_tile(pos, dir) else {
                continue;
            };
            result.total += 1;
            if neighbor.edge(dir.opposite()) == tile.edge(dir) {
                result.matching += 1;
            }
        }
        result
    }

    /// Per-edge classification of `tile` at `pos`, in edge order.
    pub fn edge_statuses(&self, tile: &Tile, pos: Position) -> [EdgeStatus; 4] {
        Direction::ALL.map(|dir| match self.neighbor_tile(pos, dir) {
            None => EdgeStatus::NoNeighbor,
            Some(n) if n.edge(dir.opposite()) == tile.edge(dir) => EdgeStatus::Matching,
            Some(_) => EdgeStatus::Mismatched,
        })
    }

    /// ASCII picture of the bounding box, three text rows per tile row.
    pub fn render_text(&self) -> String {
        if self.tiles.is_empty() {
            return String::from("(empty board)\n");
        }
        let b = self.bounds;
        let mut out = String::new();
        for row in b.min_row..=b.max_row {
            let mut lines = [String::new(), String::new(), String::new()];
            for col in b.min_col..=b.max_col {
                match self.tiles.get(&Position::new(row, col)) {
                    Some(t) => {
                        lines[0].push_str(&format!(" {} ", t.top().code()));
                        lines[1].push_str(&format!("{}#{}", t.left().code(), t.right().code()));
                        lines[2].push_str(&format!(" {} ", t.bottom().code()));
                    }
                    None => {
                        for line in lines.iter_mut() {
                            line.push_str(" . ");
                        }
                    }
                }
            }
            for line in lines {
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }
        out
    }
}

impl Serialize for Board {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let keyed: BTreeMap<String, &Tile> = self
            .tiles
            .iter()
            .map(|(pos, tile)| (pos.to_key(), tile))
            .collect();
        keyed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keyed: HashMap<String, Tile> = HashMap::deserialize(deserializer)?;
        let mut board = Board::new();
        for (key, tile) in keyed {
            let pos = Position::from_key(&key)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid position key: {key}")))?;
            board.place(pos, tile);
        }
        Ok(board)
    }
}
