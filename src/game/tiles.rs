//! Tile generators and the fixed build catalog.
//!
//! The catalog holds one representative per rotation class over the four-color
//! palette (70 tiles). Random generators draw from a seeded `StdRng` so a game
//! created with the same seed deals the same tiles.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use super::types::*;

/// Canonical codes of every rotation class, sorted.
pub static BUILD_CATALOG: Lazy<Vec<String>> = Lazy::new(|| {
    let mut codes = Vec::new();
    for a in TileColor::ALL {
        for b in TileColor::ALL {
            for c in TileColor::ALL {
                for d in TileColor::ALL {
                    let tile = Tile::new(0, [a, b, c, d]);
                    let code = tile.code();
                    if tile.canonical_key() == code {
                        codes.push(code);
                    }
                }
            }
        }
    }
    codes.sort();
    codes
});

/// Keep the first tile of each rotation class, preserving input order.
pub fn unique_by_rotation<I: IntoIterator<Item = Tile>>(tiles: I) -> Vec<Tile> {
    let mut seen = HashSet::new();
    tiles
        .into_iter()
        .filter(|t| seen.insert(t.canonical_key()))
        .collect()
}

/// Owns the id counter and the RNG for every tile created in one game.
#[derive(Debug, Clone)]
pub struct TileFactory {
    rng: StdRng,
    next_id: TileId,
}

impl TileFactory {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_id: 1,
        }
    }

    fn issue_id(&mut self) -> TileId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn solid(&mut self, color: TileColor) -> Tile {
        let id = self.issue_id();
        Tile::new(id, [color; 4])
    }

    /// One of the three 2-2 splits: adjacent pairs, opposite pairs, or the wrap-around pair.
    pub fn two_color(&mut self, a: TileColor, b: TileColor) -> Tile {
        let edges = match self.rng.gen_range(0..3) {
            0 => [a, a, b, b],
            1 => [a, b, a, b],
            _ => [a, b, b, a],
        };
        let id = self.issue_id();
        Tile::new(id, edges)
    }

    /// Three edges of `main`, one edge of `odd` at a random slot.
    pub fn three_color(&mut self, main: TileColor, odd: TileColor) -> Tile {
        let mut edges = [main; 4];
        edges[self.rng.gen_range(0..4)] = odd;
        let id = self.issue_id();
        Tile::new(id, edges)
    }

    pub fn four_color(&mut self) -> Tile {
        let mut edges = TileColor::ALL;
        edges.shuffle(&mut self.rng);
        let id = self.issue_id();
        Tile::new(id, edges)
    }

    /// Weighted mix: 20% solid, 30% two-color, 30% three-color, 20% four-color.
    pub fn random(&mut self) -> Tile {
        let mut palette = TileColor::ALL;
        palette.shuffle(&mut self.rng);
        let roll = self.rng.gen_range(0..100);
        if roll < 20 {
            self.solid(palette[0])
        } else if roll < 50 {
            self.two_color(palette[0], palette[1])
        } else if roll < 80 {
            self.three_color(palette[0], palette[1])
        } else {
            self.four_color()
        }
    }

    pub fn random_hand(&mut self, count: usize) -> Vec<Tile> {
        (0..count).map(|_| self.random()).collect()
    }

    pub fn from_code(&mut self, code: &str) -> Option<Tile> {
        let tile = Tile::from_code(0, code)?;
        Some(tile.with_id(self.issue_id()))
    }

    /// Fresh copies of the whole build catalog in shuffled order.
    pub fn catalog_pool(&mut self) -> Vec<Tile> {
        let mut pool: Vec<Tile> = BUILD_CATALOG
            .iter()
            .filter_map(|code| Tile::from_code(0, code))
            .collect();
        for tile in pool.iter_mut() {
            *tile = tile.with_id(self.issue_id());
        }
        pool.shuffle(&mut self.rng);
        pool
    }
}
