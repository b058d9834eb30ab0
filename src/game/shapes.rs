//! Shape recognition over a board snapshot.
//!
//! Every call rescans from scratch. Each detector walks occupied positions in
//! row-major order and keys its findings so the same shape is reported once;
//! `detect_all` concatenates the detectors without merging overlaps.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::board::Board;
use super::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    SmallDiamond,
    LargeDiamond,
    SmallTriangle,
    LargeTriangle,
    SmallRectangle,
    LargeRectangle,
    Arrow,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::SmallDiamond,
        ShapeKind::LargeDiamond,
        ShapeKind::SmallTriangle,
        ShapeKind::LargeTriangle,
        ShapeKind::SmallRectangle,
        ShapeKind::LargeRectangle,
        ShapeKind::Arrow,
    ];

    /// Goal order for shape-goal play, easiest first.
    pub const BY_DIFFICULTY: [ShapeKind; 7] = [
        ShapeKind::SmallTriangle,
        ShapeKind::SmallDiamond,
        ShapeKind::SmallRectangle,
        ShapeKind::LargeTriangle,
        ShapeKind::LargeRectangle,
        ShapeKind::LargeDiamond,
        ShapeKind::Arrow,
    ];

    pub fn min_tiles(self) -> usize {
        match self {
            ShapeKind::SmallTriangle => 1,
            ShapeKind::SmallDiamond | ShapeKind::SmallRectangle => 2,
            ShapeKind::LargeTriangle | ShapeKind::LargeRectangle | ShapeKind::Arrow => 3,
            ShapeKind::LargeDiamond => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::SmallDiamond => "Small diamond",
            ShapeKind::LargeDiamond => "Large diamond",
            ShapeKind::SmallTriangle => "Small triangle",
            ShapeKind::LargeTriangle => "Large triangle",
            ShapeKind::SmallRectangle => "Small rectangle",
            ShapeKind::LargeRectangle => "Large rectangle",
            ShapeKind::Arrow => "Arrow",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedShape {
    pub kind: ShapeKind,
    pub positions: BTreeSet<Position>,
    pub color: TileColor,
    pub description: String,
}

impl DetectedShape {
    fn new(kind: ShapeKind, positions: impl IntoIterator<Item = Position>, color: TileColor) -> Self {
        let positions: BTreeSet<Position> = positions.into_iter().collect();
        let anchor = positions.iter().next().copied().unwrap_or(Position::ORIGIN);
        let description = format!("{} in {} at {}", kind.label(), color, anchor);
        Self {
            kind,
            positions,
            color,
            description,
        }
    }
}

pub fn detect_all(board: &Board) -> Vec<DetectedShape> {
    let mut shapes = Vec::new();
    shapes.extend(detect_small_diamonds(board));
    shapes.extend(detect_large_diamonds(board));
    shapes.extend(detect_small_triangles(board));
    shapes.extend(detect_large_triangles(board));
    shapes.extend(detect_small_rectangles(board));
    shapes.extend(detect_large_rectangles(board));
    shapes.extend(detect_arrows(board));
    shapes
}

pub fn contains_shape(board: &Board, kind: ShapeKind) -> bool {
    detect(board, kind).next().is_some()
}

pub fn detect(board: &Board, kind: ShapeKind) -> impl Iterator<Item = DetectedShape> {
    let found = match kind {
        ShapeKind::SmallDiamond => detect_small_diamonds(board),
        ShapeKind::LargeDiamond => detect_large_diamonds(board),
        ShapeKind::SmallTriangle => detect_small_triangles(board),
        ShapeKind::LargeTriangle => detect_large_triangles(board),
        ShapeKind::SmallRectangle => detect_small_rectangles(board),
        ShapeKind::LargeRectangle => detect_large_rectangles(board),
        ShapeKind::Arrow => detect_arrows(board),
    };
    found.into_iter()
}

/// Color of the seam between `pos` and its neighbor in `dir`, when both sides agree.
fn seam_color(board: &Board, pos: Position, dir: Direction) -> Option<TileColor> {
    let here = board.get(pos)?;
    let there = board.get(pos.checked_neighbor(dir)?)?;
    let color = here.edge(dir);
    (there.edge(dir.opposite()) == color).then_some(color)
}

/// The 2x2 block with `tl` as its top-left cell, in row-major order.
fn block_at(tl: Position) -> Option<[Position; 4]> {
    let tr = tl.checked_neighbor(Direction::Right)?;
    let bl = tl.checked_neighbor(Direction::Down)?;
    Some([tl, tr, bl, bl.checked_neighbor(Direction::Right)?])
}

/// `len` cells in a straight line from `start`.
fn run_from(start: Position, dir: Direction, len: usize) -> Option<Vec<Position>> {
    let cells: Vec<Position> = std::iter::successors(Some(start), |p| p.checked_neighbor(dir))
        .take(len)
        .collect();
    (cells.len() == len).then_some(cells)
}

fn sorted_key(positions: &[Position]) -> Vec<Position> {
    let mut key = positions.to_vec();
    key.sort();
    key
}

/// Two neighbors whose touching edges share a color.
pub fn detect_small_diamonds(board: &Board) -> Vec<DetectedShape> {
    let mut shapes = Vec::new();
    let mut seen = HashSet::new();
    for pos in board.sorted_positions() {
        for dir in [Direction::Right, Direction::Down] {
            let Some(color) = seam_color(board, pos, dir) else {
                continue;
            };
            let pair = [pos, pos.neighbor(dir)];
            if seen.insert(sorted_key(&pair)) {
                shapes.push(DetectedShape::new(ShapeKind::SmallDiamond, pair, color));
            }
        }
    }
    shapes
}

/// A full 2x2 block whose center seams carry one color.
///
/// Of the eight inward-facing edges at least four share a color, and at least
/// two of the four seams (top, bottom, left, right) are that color on both sides.
pub fn detect_large_diamonds(board: &Board) -> Vec<DetectedShape> {
    let mut shapes = Vec::new();
    for tl_pos in board.sorted_positions() {
        let Some(block) = block_at(tl_pos) else {
            continue;
        };
        let (Some(tl), Some(tr), Some(bl), Some(br)) = (
            board.get(block[0]),
            board.get(block[1]),
            board.get(block[2]),
            board.get(block[3]),
        ) else {
            continue;
        };

        let seams = [
            (tl.right(), tr.left()),
            (bl.right(), br.left()),
            (tl.bottom(), bl.top()),
            (tr.bottom(), br.top()),
        ];

        for color in TileColor::ALL {
            let inward = seams
                .iter()
                .map(|&(a, b)| (a == color) as usize + (b == color) as usize)
                .sum::<usize>();
            if inward < 4 {
                continue;
            }
            let solid_seams = seams.iter().filter(|&&(a, b)| a == color && b == color).count();
            if solid_seams >= 2 {
                shapes.push(DetectedShape::new(ShapeKind::LargeDiamond, block, color));
                break;
            }
        }
    }
    shapes
}

/// A single tile with a 3-1 color split.
pub fn detect_small_triangles(board: &Board) -> Vec<DetectedShape> {
    let mut shapes = Vec::new();
    for pos in board.sorted_positions() {
        let Some(tile) = board.get(pos) else {
            continue;
        };
        let counts = tile.color_counts();
        let singletons = counts.iter().filter(|&&n| n == 1).count();
        if singletons != 1 || !counts.contains(&3) {
            continue;
        }
        if let Some(i) = counts.iter().position(|&n| n == 3) {
            shapes.push(DetectedShape::new(ShapeKind::SmallTriangle, [pos], TileColor::ALL[i]));
        }
    }
    shapes
}

/// A corner tile with one horizontal and one vertical neighbor, both seams
/// carrying the same color.
pub fn detect_large_triangles(board: &Board) -> Vec<DetectedShape> {
    let mut shapes = Vec::new();
    let mut seen = HashSet::new();
    for corner in board.sorted_positions() {
        for h in [Direction::Left, Direction::Right] {
            for v in [Direction::Up, Direction::Down] {
                let (Some(hc), Some(vc)) = (seam_color(board, corner, h), seam_color(board, corner, v)) else {
                    continue;
                };
                if hc != vc {
                    continue;
                }
                let cells = [corner, corner.neighbor(h), corner.neighbor(v)];
                if seen.insert(sorted_key(&cells)) {
                    shapes.push(DetectedShape::new(ShapeKind::LargeTriangle, cells, hc));
                }
            }
        }
    }
    shapes
}

/// Color of a 2-cell stripe from `pos` toward `dir`: matching seam, and the same
/// color on both tiles along one of the parallel sides.
fn stripe_color(board: &Board, cells: &[Position], dir: Direction) -> Option<TileColor> {
    let first = *cells.first()?;
    let color = seam_color(board, first, dir)?;
    for pair in cells.windows(2) {
        if seam_color(board, pair[0], dir) != Some(color) {
            return None;
        }
    }
    let sides = dir.lateral();
    let stripe = sides.iter().any(|&side| {
        cells
            .iter()
            .all(|&p| board.get(p).map(|t| t.edge(side)) == Some(color))
    });
    stripe.then_some(color)
}

/// Two neighbors joined by a matching seam with that color running along one side.
pub fn detect_small_rectangles(board: &Board) -> Vec<DetectedShape> {
    let mut shapes = Vec::new();
    let mut seen = HashSet::new();
    for pos in board.sorted_positions() {
        for dir in [Direction::Right, Direction::Down] {
            let Some(pair) = run_from(pos, dir, 2) else {
                continue;
            };
            let Some(color) = stripe_color(board, &pair, dir) else {
                continue;
            };
            if seen.insert(sorted_key(&pair)) {
                shapes.push(DetectedShape::new(ShapeKind::SmallRectangle, pair, color));
            }
        }
    }
    shapes
}

/// Straight runs of three or four tiles with one seam color and a matching
/// stripe. Only maximal runs are reported.
pub fn detect_large_rectangles(board: &Board) -> Vec<DetectedShape> {
    let mut runs: Vec<(Direction, Vec<Position>, TileColor)> = Vec::new();
    for start in board.sorted_positions() {
        for dir in [Direction::Right, Direction::Down] {
            for len in [3usize, 4] {
                let Some(cells) = run_from(start, dir, len) else {
                    continue;
                };
                if let Some(color) = stripe_color(board, &cells, dir) {
                    runs.push((dir, cells, color));
                }
            }
        }
    }

    let mut shapes = Vec::new();
    let mut seen = HashSet::new();
    for (i, (dir, cells, color)) in runs.iter().enumerate() {
        let covered = runs.iter().enumerate().any(|(j, (other_dir, other, other_color))| {
            j != i
                && other_dir == dir
                && other_color == color
                && other.len() > cells.len()
                && cells.iter().all(|c| other.contains(c))
        });
        if covered {
            continue;
        }
        if seen.insert(sorted_key(cells)) {
            shapes.push(DetectedShape::new(ShapeKind::LargeRectangle, cells.iter().copied(), *color));
        }
    }
    shapes
}

/// Tip plus shaft joined by a seam, one or two wings on the shaft's sides and an
/// optional tail behind the shaft, all seams in the arrow color.
pub fn detect_arrows(board: &Board) -> Vec<DetectedShape> {
    let mut shapes = Vec::new();
    let mut seen = HashSet::new();
    for tip in board.sorted_positions() {
        for dir in Direction::ALL {
            let back = dir.opposite();
            let Some(color) = seam_color(board, tip, back) else {
                continue;
            };
            let shaft = tip.neighbor(back);

            let wings: Vec<Position> = dir
                .lateral()
                .into_iter()
                .filter(|&side| seam_color(board, shaft, side) == Some(color))
                .map(|side| shaft.neighbor(side))
                .collect();
            if wings.is_empty() {
                continue;
            }

            let mut cells = vec![tip, shaft];
            cells.extend(wings);
            if seam_color(board, shaft, back) == Some(color) {
                cells.push(shaft.neighbor(back));
            }

            // an arrow read from either end covers the same cells
            if seen.insert(sorted_key(&cells)) {
                shapes.push(DetectedShape::new(ShapeKind::Arrow, cells, color));
            }
        }
    }
    shapes
}
