//! Point accumulation, stars and one-shot milestone achievements.

use serde::{Deserialize, Serialize};

/// Point values, loadable from the engine config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub base_points: u32,
    pub match_bonus: u32,
    pub perfect_bonus: u32,
    pub star_threshold: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_points: 10,
            match_bonus: 5,
            perfect_bonus: 10,
            star_threshold: 100,
        }
    }
}

const TILE_MILESTONES: [(u32, &str); 4] = [
    (1, "First Tile"),
    (5, "Getting Started"),
    (10, "Tile Layer"),
    (25, "Master Builder"),
];

const PERFECT_MILESTONES: [(u32, &str); 2] = [(1, "Perfect Fit"), (5, "Perfectionist")];

/// Telemetry for one placement. Read-only for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub points_earned: u32,
    pub total_points: u32,
    pub perfect_match: bool,
    pub matching_edges: u32,
    pub adjacent_edges: u32,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSystem {
    rules: ScoringRules,
    points: u32,
    tiles_placed: u32,
    perfect_matches: u32,
    achievements: Vec<String>,
}

impl ScoreSystem {
    pub fn new(rules: ScoringRules) -> Self {
        Self {
            rules,
            points: 0,
            tiles_placed: 0,
            perfect_matches: 0,
            achievements: Vec::new(),
        }
    }

    pub fn record_placement(&mut self, matching_edges: u32, total_adjacent: u32) -> PlacementResult {
        let perfect = total_adjacent > 0 && matching_edges == total_adjacent;
        let mut earned = self.rules.base_points + matching_edges * self.rules.match_bonus;
        if perfect {
            earned += self.rules.perfect_bonus;
            self.perfect_matches += 1;
        }
        self.points += earned;
        self.tiles_placed += 1;

        let mut unlocked = Vec::new();
        for (count, name) in TILE_MILESTONES {
            if self.tiles_placed == count {
                unlocked.push(name.to_string());
            }
        }
        if perfect {
            for (count, name) in PERFECT_MILESTONES {
                if self.perfect_matches == count {
                    unlocked.push(name.to_string());
                }
            }
        }
        for name in &unlocked {
            if !self.achievements.contains(name) {
                self.achievements.push(name.clone());
            }
        }

        PlacementResult {
            points_earned: earned,
            total_points: self.points,
            perfect_match: perfect,
            matching_edges,
            adjacent_edges: total_adjacent,
            achievements: unlocked,
        }
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn tiles_placed(&self) -> u32 {
        self.tiles_placed
    }

    pub fn perfect_matches(&self) -> u32 {
        self.perfect_matches
    }

    pub fn stars(&self) -> u32 {
        if self.rules.star_threshold == 0 {
            return 0;
        }
        self.points / self.rules.star_threshold
    }

    pub fn achievements(&self) -> &[String] {
        &self.achievements
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.rules);
    }
}
