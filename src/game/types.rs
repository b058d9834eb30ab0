//! Core value types: colors, directions, tiles and grid positions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub type TileId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileColor {
    Red,
    Green,
    Blue,
    Yellow,
}

impl TileColor {
    pub const ALL: [TileColor; 4] = [
        TileColor::Red,
        TileColor::Green,
        TileColor::Blue,
        TileColor::Yellow,
    ];

    /// Single-letter code used by the build catalog ("RGBY").
    pub fn code(self) -> char {
        match self {
            TileColor::Red => 'R',
            TileColor::Green => 'G',
            TileColor::Blue => 'B',
            TileColor::Yellow => 'Y',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(TileColor::Red),
            'G' => Some(TileColor::Green),
            'B' => Some(TileColor::Blue),
            'Y' => Some(TileColor::Yellow),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TileColor::Red => "red",
            TileColor::Green => "green",
            TileColor::Blue => "blue",
            TileColor::Yellow => "yellow",
        }
    }
}

impl fmt::Display for TileColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Edge slot / neighbor direction. Index order is top, right, bottom, left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    #[inline]
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % 4]
    }

    #[inline]
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// The two directions perpendicular to this one.
    pub fn lateral(self) -> [Direction; 2] {
        [Self::from_index(self.index() + 1), Self::from_index(self.index() + 3)]
    }

    /// (row, col) offset. Rows grow downward.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Immutable four-edge tile. Rotation returns a new value with the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    edges: [TileColor; 4],
}

impl Tile {
    pub fn new(id: TileId, edges: [TileColor; 4]) -> Self {
        Self { id, edges }
    }

    /// Decode a 4-character per-edge code (top, right, bottom, left), e.g. "RRGB".
    pub fn from_code(id: TileId, code: &str) -> Option<Self> {
        let mut chars = code.trim().chars();
        let mut edges = [TileColor::Red; 4];
        for slot in edges.iter_mut() {
            *slot = TileColor::from_code(chars.next()?)?;
        }
        if chars.next().is_some() {
            return None;
        }
        Some(Self { id, edges })
    }

    pub fn edges(&self) -> [TileColor; 4] {
        self.edges
    }

    /// Color at `index mod 4`.
    #[inline]
    pub fn edge_color(&self, index: usize) -> TileColor {
        self.edges[index % 4]
    }

    #[inline]
    pub fn edge(&self, dir: Direction) -> TileColor {
        self.edges[dir.index()]
    }

    pub fn top(&self) -> TileColor {
        self.edges[0]
    }

    pub fn right(&self) -> TileColor {
        self.edges[1]
    }

    pub fn bottom(&self) -> TileColor {
        self.edges[2]
    }

    pub fn left(&self) -> TileColor {
        self.edges[3]
    }

    pub fn rotate_clockwise(&self) -> Self {
        Self {
            id: self.id,
            edges: rotate_edges(&self.edges, 1),
        }
    }

    pub fn rotate_counter_clockwise(&self) -> Self {
        Self {
            id: self.id,
            edges: rotate_edges(&self.edges, 3),
        }
    }

    pub fn rotated(&self, rotation: Rotation) -> Self {
        match rotation {
            Rotation::Clockwise => self.rotate_clockwise(),
            Rotation::CounterClockwise => self.rotate_counter_clockwise(),
        }
    }

    /// Rotate clockwise `steps` quarter turns.
    pub fn rotated_steps(&self, steps: u8) -> Self {
        Self {
            id: self.id,
            edges: rotate_edges(&self.edges, steps as usize),
        }
    }

    pub fn with_id(&self, id: TileId) -> Self {
        Self { id, edges: self.edges }
    }

    /// Edge-wise equality, ignoring ids.
    pub fn same_edges(&self, other: &Tile) -> bool {
        self.edges == other.edges
    }

    pub fn is_solid(&self) -> bool {
        self.edges.iter().all(|&c| c == self.edges[0])
    }

    pub fn unique_color_count(&self) -> usize {
        let mut seen = [false; 4];
        for c in self.edges {
            seen[color_slot(c)] = true;
        }
        seen.iter().filter(|&&s| s).count()
    }

    pub fn has_dominant_color(&self) -> bool {
        self.color_counts().iter().any(|&n| n >= 3)
    }

    /// Occurrences of each palette color, indexed like `TileColor::ALL`.
    pub fn color_counts(&self) -> [u8; 4] {
        let mut counts = [0u8; 4];
        for c in self.edges {
            counts[color_slot(c)] += 1;
        }
        counts
    }

    pub fn code(&self) -> String {
        self.edges.iter().map(|c| c.code()).collect()
    }

    /// Smallest of the four rotation codes; equal for tiles that are rotations of each other.
    pub fn canonical_key(&self) -> String {
        (0..4)
            .map(|steps| {
                rotate_edges(&self.edges, steps)
                    .iter()
                    .map(|c| c.code())
                    .collect::<String>()
            })
            .min()
            .unwrap_or_default()
    }
}

fn color_slot(c: TileColor) -> usize {
    match c {
        TileColor::Red => 0,
        TileColor::Green => 1,
        TileColor::Blue => 2,
        TileColor::Yellow => 3,
    }
}

/// Rotate edge colors clockwise by `steps` quarter turns: the left edge becomes the top.
pub fn rotate_edges(edges: &[TileColor; 4], steps: usize) -> [TileColor; 4] {
    let steps = steps % 4;
    if steps == 0 {
        return *edges;
    }
    let mut rotated = *edges;
    for (i, slot) in rotated.iter_mut().enumerate() {
        *slot = edges[(i + 4 - steps) % 4];
    }
    rotated
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { row: 0, col: 0 };

    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn to_key(self) -> String {
        format!("{},{}", self.row, self.col)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let (row, col) = key.split_once(',')?;
        Some(Self {
            row: row.trim().parse().ok()?,
            col: col.trim().parse().ok()?,
        })
    }

    #[inline]
    pub fn neighbor(self, dir: Direction) -> Self {
        let (dr, dc) = dir.offset();
        Self::new(self.row + dr, self.col + dc)
    }

    /// Neighbor in `dir`, or `None` at the edge of the coordinate space.
    #[inline]
    pub fn checked_neighbor(self, dir: Direction) -> Option<Self> {
        let (dr, dc) = dir.offset();
        Some(Self::new(self.row.checked_add(dr)?, self.col.checked_add(dc)?))
    }

    /// Whether all four neighbors are addressable.
    pub fn is_interior(self) -> bool {
        Direction::ALL.iter().all(|&d| self.checked_neighbor(d).is_some())
    }

    pub fn up(self) -> Self {
        self.neighbor(Direction::Up)
    }

    pub fn right(self) -> Self {
        self.neighbor(Direction::Right)
    }

    pub fn down(self) -> Self {
        self.neighbor(Direction::Down)
    }

    pub fn left(self) -> Self {
        self.neighbor(Direction::Left)
    }

    /// Orthogonal neighbors in edge order (up, right, down, left).
    pub fn neighbors(self) -> [Position; 4] {
        Direction::ALL.map(|d| self.neighbor(d))
    }

    pub fn neighbor_set(self) -> HashSet<Position> {
        self.neighbors().into_iter().collect()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Per-edge feedback for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStatus {
    NoNeighbor,
    Matching,
    Mismatched,
}
