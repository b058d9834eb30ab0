//! Mode policies: initial deal, legality rule, draw source and the
//! post-placement transition for each game family.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::board::Board;
use super::shapes::{self, ShapeKind};
use super::tiles::TileFactory;
use super::types::*;
use super::validator::{grid_cells, PlacementRule};
use crate::engine::config::*;
use crate::engine::models::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Competitive,
    Cooperative,
    Sandbox,
    Levels,
    ShapeGoal,
}

impl GameMode {
    pub const ALL: [GameMode; 5] = [
        GameMode::Competitive,
        GameMode::Cooperative,
        GameMode::Sandbox,
        GameMode::Levels,
        GameMode::ShapeGoal,
    ];

    pub fn player_range(self) -> RangeInclusive<usize> {
        match self {
            GameMode::Competitive | GameMode::Cooperative => 2..=4,
            GameMode::Sandbox => 1..=4,
            GameMode::Levels | GameMode::ShapeGoal => 1..=1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameMode::Competitive => "competitive",
            GameMode::Cooperative => "cooperative",
            GameMode::Sandbox => "sandbox",
            GameMode::Levels => "levels",
            GameMode::ShapeGoal => "shape_goal",
        }
    }

    pub fn policy(self, config: &EngineConfig) -> Box<dyn ModePolicy> {
        match self {
            GameMode::Competitive => Box::new(CompetitivePolicy::new(config.competitive)),
            GameMode::Cooperative => Box::new(CooperativePolicy::new(config.cooperative)),
            GameMode::Sandbox => Box::new(SandboxPolicy::new(config.sandbox)),
            GameMode::Levels => Box::new(LevelsPolicy::new(config.levels.clone())),
            GameMode::ShapeGoal => Box::new(ShapeGoalPolicy::new(config.shape_goal)),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "competitive" | "versus" => Ok(GameMode::Competitive),
            "cooperative" | "coop" => Ok(GameMode::Cooperative),
            "sandbox" | "learning" => Ok(GameMode::Sandbox),
            "levels" | "progression" => Ok(GameMode::Levels),
            "shape_goal" | "shapes" => Ok(GameMode::ShapeGoal),
            other => Err(format!("unknown game mode '{other}'")),
        }
    }
}

/// Board, players and the tile source a policy acts on.
#[derive(Debug, Clone)]
pub struct Table {
    pub board: Board,
    pub players: Vec<Player>,
    pub active: usize,
    pub factory: TileFactory,
}

impl Table {
    pub fn new(num_players: usize, seed: u64) -> Self {
        Self {
            board: Board::new(),
            players: (0..num_players)
                .map(|i| Player::new(i, format!("Player {}", i + 1)))
                .collect(),
            active: 0,
            factory: TileFactory::new(seed),
        }
    }

    /// Whether any rotation of any tile in `player`'s hand fits somewhere.
    pub fn has_any_move(&self, rule: PlacementRule, player: usize) -> bool {
        self.players.get(player).is_some_and(|p| {
            p.hand.tiles().iter().any(|t| rule.has_placement(&self.board, t))
        })
    }

    /// Every distinct (tile, rotation, position) the player could play.
    /// Rotations that repeat an earlier orientation are skipped.
    pub fn legal_moves(&self, rule: PlacementRule, player: usize) -> Vec<Move> {
        let Some(p) = self.players.get(player) else {
            return Vec::new();
        };
        let candidates = rule.candidate_positions(&self.board);
        let mut moves = Vec::new();
        for tile in p.hand.tiles() {
            let mut seen: Vec<[TileColor; 4]> = Vec::with_capacity(4);
            for steps in 0..4u8 {
                let rotated = tile.rotated_steps(steps);
                if seen.contains(&rotated.edges()) {
                    continue;
                }
                seen.push(rotated.edges());
                for &pos in &candidates {
                    if rule.is_legal(&self.board, &rotated, pos) {
                        moves.push(Move { tile: tile.id, rotation: steps, position: pos });
                    }
                }
            }
        }
        moves
    }

    fn pass_turn(&mut self, to: usize, events: &mut Vec<GameEvent>) {
        let from = self.active;
        self.active = to;
        if from != to {
            tracing::debug!(from, to, "turn passed");
            events.push(GameEvent::TurnPassed { from, to });
        }
    }

    /// Top up `player`'s hand to `target` from `source`. Returns the drawn ids.
    fn refill(
        &mut self,
        player: usize,
        target: usize,
        mut source: impl FnMut(&mut TileFactory) -> Option<Tile>,
        events: &mut Vec<GameEvent>,
    ) -> Vec<(usize, TileId)> {
        let mut drawn = Vec::new();
        while self.players[player].hand.len() < target {
            let Some(tile) = source(&mut self.factory) else {
                break;
            };
            drawn.push((player, tile.id));
            self.players[player].hand.push(tile);
        }
        if !drawn.is_empty() {
            events.push(GameEvent::HandRefilled { player, count: drawn.len() });
        }
        drawn
    }

    fn all_players(&self) -> Vec<usize> {
        (0..self.players.len()).collect()
    }
}

/// What the state machine must do after a policy has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// Tiles the policy drew into hands, so an undo can return them.
    pub drawn: Vec<(usize, TileId)>,
    /// The board was reset or the placement can no longer be undone.
    pub clear_history: bool,
    pub game_over: Option<GameOver>,
}

impl Transition {
    fn finished(reason: GameOverReason, winners: Vec<usize>) -> Self {
        Self {
            game_over: Some(GameOver { reason, winners }),
            ..Self::default()
        }
    }
}

/// Mode-specific progress for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeProgress {
    pub level: usize,
    pub grid_size: Option<i32>,
    pub target_shape: Option<ShapeKind>,
    pub completed_shapes: Vec<ShapeKind>,
    pub pool_remaining: Option<usize>,
    pub target_tiles: Option<usize>,
}

pub trait ModePolicy: fmt::Debug + Send + Sync {
    fn mode(&self) -> GameMode;

    /// Legality rule in force right now.
    fn rule(&self) -> PlacementRule;

    /// Withhold edge feedback until the grid is full.
    fn defers_feedback(&self) -> bool {
        false
    }

    /// One score for the whole table instead of one per player.
    fn shared_score(&self) -> bool {
        false
    }

    fn allows_pickup(&self) -> bool {
        false
    }

    /// Reset mode state and deal the opening hands into an empty table.
    fn deal(&mut self, table: &mut Table);

    /// Next tile from the mode's draw source, if it has one.
    fn draw(&mut self, _table: &mut Table) -> Option<Tile> {
        None
    }

    /// Put back a tile an undo took out of a hand.
    fn return_to_pool(&mut self, _tile: Tile) {}

    /// Runs after the tile is on the board and out of the active hand.
    fn after_placement(&mut self, table: &mut Table, placed: &Tile, events: &mut Vec<GameEvent>) -> Transition;

    fn progress(&self) -> ModeProgress {
        ModeProgress::default()
    }
}

// --- Competitive ---

/// Strict matching, turn rotation with solid-tile extra turns and auto-skip.
#[derive(Debug, Clone)]
pub struct CompetitivePolicy {
    config: CompetitiveConfig,
}

impl CompetitivePolicy {
    pub fn new(config: CompetitiveConfig) -> Self {
        Self { config }
    }
}

impl ModePolicy for CompetitivePolicy {
    fn mode(&self) -> GameMode {
        GameMode::Competitive
    }

    fn rule(&self) -> PlacementRule {
        PlacementRule::StrictMatch
    }

    fn deal(&mut self, table: &mut Table) {
        for i in 0..table.players.len() {
            let hand = table.factory.random_hand(self.config.hand_size);
            table.players[i].hand.extend(hand);
        }
    }

    fn after_placement(&mut self, table: &mut Table, placed: &Tile, events: &mut Vec<GameEvent>) -> Transition {
        let rule = self.rule();
        let player = table.active;
        if table.players[player].hand.is_empty() {
            return Transition::finished(GameOverReason::HandEmptied, vec![player]);
        }
        if placed.is_solid() && table.has_any_move(rule, player) {
            tracing::debug!(player, "extra turn");
            events.push(GameEvent::ExtraTurn { player });
            return Transition::default();
        }

        let n = table.players.len();
        for step in 1..=n {
            let candidate = (player + step) % n;
            if table.has_any_move(rule, candidate) {
                table.pass_turn(candidate, events);
                return Transition::default();
            }
            if candidate != player {
                tracing::info!(player = candidate, "no legal moves, skipping");
                events.push(GameEvent::PlayerSkipped { player: candidate });
            }
        }

        // full cycle without a move: fewest tiles left wins
        let fewest = table.players.iter().map(|p| p.hand.len()).min().unwrap_or(0);
        let winners = table
            .players
            .iter()
            .filter(|p| p.hand.len() == fewest)
            .map(|p| p.index)
            .collect();
        Transition::finished(GameOverReason::Blocked, winners)
    }
}

// --- Cooperative ---

/// Free adjacency, team score, refills from a finite shared pool.
#[derive(Debug, Clone)]
pub struct CooperativePolicy {
    config: CooperativeConfig,
    pool: Vec<Tile>,
}

impl CooperativePolicy {
    pub fn new(config: CooperativeConfig) -> Self {
        Self { config, pool: Vec::new() }
    }
}

impl ModePolicy for CooperativePolicy {
    fn mode(&self) -> GameMode {
        GameMode::Cooperative
    }

    fn rule(&self) -> PlacementRule {
        PlacementRule::FreeAdjacency
    }

    fn shared_score(&self) -> bool {
        true
    }

    fn deal(&mut self, table: &mut Table) {
        for i in 0..table.players.len() {
            let hand = table.factory.random_hand(self.config.hand_size);
            table.players[i].hand.extend(hand);
        }
        self.pool = table.factory.random_hand(self.config.pool_size);
    }

    fn draw(&mut self, _table: &mut Table) -> Option<Tile> {
        self.pool.pop()
    }

    fn return_to_pool(&mut self, tile: Tile) {
        self.pool.push(tile);
    }

    fn after_placement(&mut self, table: &mut Table, _placed: &Tile, events: &mut Vec<GameEvent>) -> Transition {
        if table.board.len() >= self.config.target_tiles {
            return Transition::finished(GameOverReason::TargetReached, table.all_players());
        }

        let player = table.active;
        let mut drawn = Vec::new();
        if table.players[player].hand.len() < self.config.refill_below {
            let pool = &mut self.pool;
            drawn = table.refill(player, self.config.hand_size, |_| pool.pop(), events);
        }

        let n = table.players.len();
        let next = (1..=n)
            .map(|step| (player + step) % n)
            .find(|&i| !table.players[i].hand.is_empty());
        match next {
            Some(next) => {
                table.pass_turn(next, events);
                Transition { drawn, ..Transition::default() }
            }
            None => Transition {
                drawn,
                ..Transition::finished(GameOverReason::PoolExhausted, Vec::new())
            },
        }
    }

    fn progress(&self) -> ModeProgress {
        ModeProgress {
            pool_remaining: Some(self.pool.len()),
            target_tiles: Some(self.config.target_tiles),
            ..ModeProgress::default()
        }
    }
}

// --- Sandbox ---

/// Open-ended free play; hands refill from the random generator.
#[derive(Debug, Clone)]
pub struct SandboxPolicy {
    config: SandboxConfig,
}

impl SandboxPolicy {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }
}

impl ModePolicy for SandboxPolicy {
    fn mode(&self) -> GameMode {
        GameMode::Sandbox
    }

    fn rule(&self) -> PlacementRule {
        PlacementRule::FreeAdjacency
    }

    fn deal(&mut self, table: &mut Table) {
        for i in 0..table.players.len() {
            let hand = table.factory.random_hand(self.config.hand_size);
            table.players[i].hand.extend(hand);
        }
    }

    fn draw(&mut self, table: &mut Table) -> Option<Tile> {
        Some(table.factory.random())
    }

    fn after_placement(&mut self, table: &mut Table, _placed: &Tile, events: &mut Vec<GameEvent>) -> Transition {
        let player = table.active;
        let mut drawn = Vec::new();
        if table.players[player].hand.len() < self.config.refill_below {
            drawn = table.refill(player, self.config.hand_size, |f| Some(f.random()), events);
        }
        let next = (player + 1) % table.players.len();
        table.pass_turn(next, events);
        Transition { drawn, ..Transition::default() }
    }
}

// --- Levels ---

/// Fill successive fixed grids from a tracked catalog pool.
#[derive(Debug, Clone)]
pub struct LevelsPolicy {
    levels: Vec<LevelSpec>,
    level: usize,
    pool: Vec<Tile>,
}

impl LevelsPolicy {
    pub fn new(levels: Vec<LevelSpec>) -> Self {
        let levels = if levels.is_empty() {
            vec![LevelSpec::new(2, false)]
        } else {
            levels.into_iter().map(LevelSpec::clamped).collect()
        };
        Self { levels, level: 0, pool: Vec::new() }
    }

    fn current(&self) -> LevelSpec {
        self.levels[self.level.min(self.levels.len() - 1)]
    }

    /// Deal exactly one grid's worth of tiles to the single player.
    fn deal_level(&mut self, table: &mut Table) {
        let spec = self.current();
        let needed = spec.cells();
        if spec.fresh_pool || self.pool.len() < needed {
            self.pool = table.factory.catalog_pool();
            while self.pool.len() < needed {
                let extra = table.factory.random();
                self.pool.push(extra);
            }
        }
        let split = self.pool.len() - needed;
        let hand = self.pool.split_off(split);
        table.players[0].hand.clear();
        table.players[0].hand.extend(hand);
        tracing::info!(level = self.level + 1, grid_size = spec.grid_size, pool = self.pool.len(), "dealt level");
    }
}

impl ModePolicy for LevelsPolicy {
    fn mode(&self) -> GameMode {
        GameMode::Levels
    }

    fn rule(&self) -> PlacementRule {
        PlacementRule::FixedGrid { size: self.current().grid_size }
    }

    fn defers_feedback(&self) -> bool {
        true
    }

    fn allows_pickup(&self) -> bool {
        true
    }

    fn deal(&mut self, table: &mut Table) {
        self.level = 0;
        self.pool.clear();
        self.deal_level(table);
    }

    fn after_placement(&mut self, table: &mut Table, _placed: &Tile, events: &mut Vec<GameEvent>) -> Transition {
        if !self.rule().is_grid_full(&table.board) {
            return Transition::default();
        }
        let grid_size = self.current().grid_size;
        tracing::info!(level = self.level + 1, grid_size, "level complete");
        events.push(GameEvent::LevelCompleted { level: self.level, grid_size });

        if self.level + 1 >= self.levels.len() {
            return Transition {
                clear_history: true,
                ..Transition::finished(GameOverReason::AllLevelsCleared, vec![0])
            };
        }
        table.board.clear();
        self.level += 1;
        self.deal_level(table);
        events.push(GameEvent::HandRefilled { player: 0, count: table.players[0].hand.len() });
        Transition { clear_history: true, ..Transition::default() }
    }

    fn progress(&self) -> ModeProgress {
        ModeProgress {
            level: self.level,
            grid_size: self.rule().grid_size(),
            pool_remaining: Some(self.pool.len()),
            ..ModeProgress::default()
        }
    }
}

// --- Shape goal ---

/// Fill a fixed grid so that the current target shape appears; targets go easiest first.
#[derive(Debug, Clone)]
pub struct ShapeGoalPolicy {
    config: ShapeGoalConfig,
    level: u32,
    target: Option<ShapeKind>,
    completed: Vec<ShapeKind>,
}

impl ShapeGoalPolicy {
    pub fn new(config: ShapeGoalConfig) -> Self {
        Self {
            config: config.clamped(),
            level: 0,
            target: ShapeKind::BY_DIFFICULTY.first().copied(),
            completed: Vec::new(),
        }
    }

    fn next_target(&self) -> Option<ShapeKind> {
        ShapeKind::BY_DIFFICULTY
            .iter()
            .copied()
            .find(|k| !self.completed.contains(k))
    }

    fn cells(&self) -> usize {
        grid_cells(self.config.grid_size)
    }
}

impl ModePolicy for ShapeGoalPolicy {
    fn mode(&self) -> GameMode {
        GameMode::ShapeGoal
    }

    fn rule(&self) -> PlacementRule {
        PlacementRule::FixedGrid { size: self.config.grid_size }
    }

    fn defers_feedback(&self) -> bool {
        true
    }

    fn allows_pickup(&self) -> bool {
        true
    }

    fn deal(&mut self, table: &mut Table) {
        self.level = 0;
        self.completed.clear();
        self.target = self.next_target();
        let mut pool = table.factory.catalog_pool();
        pool.truncate(self.cells());
        table.players[0].hand.extend(pool);
    }

    fn draw(&mut self, table: &mut Table) -> Option<Tile> {
        Some(table.factory.random())
    }

    fn after_placement(&mut self, table: &mut Table, _placed: &Tile, events: &mut Vec<GameEvent>) -> Transition {
        let Some(target) = self.target else {
            return Transition::default();
        };
        if !self.rule().is_grid_full(&table.board) {
            return Transition::default();
        }
        if !shapes::contains_shape(&table.board, target) {
            events.push(GameEvent::TargetMissing { shape: target });
            return Transition::default();
        }

        tracing::info!(shape = %target, level = self.level, "shape goal complete");
        events.push(GameEvent::ShapeCompleted { shape: target, level: self.level });
        self.completed.push(target);
        let returned = table.board.take_all();
        table.players[0].hand.extend(returned);
        self.level += 1;
        self.target = self.next_target();

        match self.target {
            Some(_) => Transition { clear_history: true, ..Transition::default() },
            None => Transition {
                clear_history: true,
                ..Transition::finished(GameOverReason::AllShapesFound, vec![0])
            },
        }
    }

    fn progress(&self) -> ModeProgress {
        ModeProgress {
            level: self.level as usize,
            grid_size: self.rule().grid_size(),
            target_shape: self.target,
            completed_shapes: self.completed.clone(),
            ..ModeProgress::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TileColor::{Blue as B, Green as G, Red as R, Yellow as Y};

    fn table_with_hands(hands: &[&[[TileColor; 4]]]) -> Table {
        let mut table = Table::new(hands.len(), 1);
        let mut id = 100;
        for (i, hand) in hands.iter().enumerate() {
            for edges in hand.iter() {
                id += 1;
                table.players[i].hand.push(Tile::new(id, *edges));
            }
        }
        table
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("shape-goal".parse::<GameMode>(), Ok(GameMode::ShapeGoal));
        assert_eq!("Coop".parse::<GameMode>(), Ok(GameMode::Cooperative));
        assert!("chess".parse::<GameMode>().is_err());
        for mode in GameMode::ALL {
            assert_eq!(mode.name().parse::<GameMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_player_ranges() {
        assert!(GameMode::Competitive.player_range().contains(&4));
        assert!(!GameMode::Competitive.player_range().contains(&1));
        assert!(GameMode::Sandbox.player_range().contains(&1));
        assert!(!GameMode::Levels.player_range().contains(&2));
    }

    #[test]
    fn test_legal_moves_dedupes_symmetric_rotations() {
        let table = table_with_hands(&[&[[R; 4]], &[]]);
        let moves = table.legal_moves(PlacementRule::StrictMatch, 0);
        // empty board: origin only, solid tile has one orientation
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].position, Position::ORIGIN);

        let table = table_with_hands(&[&[[R, G, R, G]], &[]]);
        assert_eq!(table.legal_moves(PlacementRule::StrictMatch, 0).len(), 2);
    }

    #[test]
    fn test_competitive_skips_blocked_player() {
        let mut table = table_with_hands(&[&[[R; 4], [R; 4]], &[[B; 4]], &[[R, G, B, Y]]]);
        table.board.place(Position::ORIGIN, Tile::new(1, [G, R, R, R]));
        let placed = table.players[0].hand.remove(101).unwrap();
        table.board.place(Position::new(0, 1), placed);
        let mut policy = CompetitivePolicy::new(CompetitiveConfig::default());
        let mut events = Vec::new();
        let t = policy.after_placement(&mut table, &Tile::new(9, [R, G, B, Y]), &mut events);
        assert!(t.game_over.is_none());
        // every open edge is red or green, so the all-blue hand is stuck
        assert_eq!(table.active, 2);
        assert_eq!(
            events,
            vec![GameEvent::PlayerSkipped { player: 1 }, GameEvent::TurnPassed { from: 0, to: 2 }]
        );
    }

    #[test]
    fn test_competitive_extra_turn_on_solid() {
        let mut table = table_with_hands(&[&[[R; 4]], &[[R; 4]]]);
        table.board.place(Position::ORIGIN, Tile::new(1, [R; 4]));
        let mut policy = CompetitivePolicy::new(CompetitiveConfig::default());
        let mut events = Vec::new();
        let t = policy.after_placement(&mut table, &Tile::new(1, [R; 4]), &mut events);
        assert_eq!(t, Transition::default());
        assert_eq!(table.active, 0);
        assert_eq!(events, vec![GameEvent::ExtraTurn { player: 0 }]);
    }

    #[test]
    fn test_competitive_lockout_ends_game() {
        let mut table = table_with_hands(&[&[[B; 4]], &[[Y; 4], [Y; 4]]]);
        table.board.place(Position::ORIGIN, Tile::new(1, [R; 4]));
        let mut policy = CompetitivePolicy::new(CompetitiveConfig::default());
        let mut events = Vec::new();
        let t = policy.after_placement(&mut table, &Tile::new(1, [R; 4]), &mut events);
        assert_eq!(
            t.game_over,
            Some(GameOver { reason: GameOverReason::Blocked, winners: vec![0] })
        );
        assert_eq!(events, vec![GameEvent::PlayerSkipped { player: 1 }]);
    }

    #[test]
    fn test_competitive_empty_hand_wins() {
        let mut table = table_with_hands(&[&[], &[[B; 4]]]);
        table.board.place(Position::ORIGIN, Tile::new(1, [R; 4]));
        let mut policy = CompetitivePolicy::new(CompetitiveConfig::default());
        let t = policy.after_placement(&mut table, &Tile::new(1, [R; 4]), &mut Vec::new());
        assert_eq!(t.game_over.map(|g| g.reason), Some(GameOverReason::HandEmptied));
    }

    #[test]
    fn test_cooperative_refills_from_pool() {
        let config = CooperativeConfig { hand_size: 2, refill_below: 2, target_tiles: 10, pool_size: 3 };
        let mut policy = CooperativePolicy::new(config);
        let mut table = Table::new(2, 5);
        policy.deal(&mut table);
        assert_eq!(table.players[0].hand.len(), 2);
        assert_eq!(policy.progress().pool_remaining, Some(3));

        let tile = table.players[0].hand.tiles()[0];
        table.players[0].hand.remove(tile.id);
        table.board.place(Position::ORIGIN, tile);
        let mut events = Vec::new();
        let t = policy.after_placement(&mut table, &tile, &mut events);
        assert_eq!(t.drawn.len(), 1);
        assert_eq!(table.players[0].hand.len(), 2);
        assert_eq!(policy.progress().pool_remaining, Some(2));
        assert_eq!(table.active, 1);
        assert!(events.contains(&GameEvent::HandRefilled { player: 0, count: 1 }));
    }

    #[test]
    fn test_cooperative_target_reached() {
        let config = CooperativeConfig { target_tiles: 1, ..CooperativeConfig::default() };
        let mut policy = CooperativePolicy::new(config);
        let mut table = Table::new(2, 5);
        policy.deal(&mut table);
        table.board.place(Position::ORIGIN, Tile::new(999, [R; 4]));
        let t = policy.after_placement(&mut table, &Tile::new(999, [R; 4]), &mut Vec::new());
        assert_eq!(
            t.game_over,
            Some(GameOver { reason: GameOverReason::TargetReached, winners: vec![0, 1] })
        );
    }

    #[test]
    fn test_levels_deal_grid_worth() {
        let mut policy = LevelsPolicy::new(EngineConfig::default().levels);
        let mut table = Table::new(1, 3);
        policy.deal(&mut table);
        assert_eq!(table.players[0].hand.len(), 4);
        assert_eq!(policy.rule(), PlacementRule::FixedGrid { size: 2 });
        assert_eq!(policy.progress().pool_remaining, Some(66));
    }

    #[test]
    fn test_shape_goal_starts_with_easiest_target() {
        let mut policy = ShapeGoalPolicy::new(ShapeGoalConfig::default());
        let mut table = Table::new(1, 3);
        policy.deal(&mut table);
        assert_eq!(table.players[0].hand.len(), 9);
        assert_eq!(policy.progress().target_shape, Some(ShapeKind::BY_DIFFICULTY[0]));
        assert_eq!(policy.progress().grid_size, Some(3));
    }

    #[test]
    fn test_fixed_grid_policies_clamp_grid_size() {
        let mut levels = LevelsPolicy::new(vec![LevelSpec::new(0, false), LevelSpec::new(50_000, false)]);
        let mut table = Table::new(1, 3);
        levels.deal(&mut table);
        assert_eq!(levels.rule(), PlacementRule::FixedGrid { size: 1 });
        assert_eq!(table.players[0].hand.len(), 1);
        assert_eq!(levels.progress().grid_size, Some(1));

        let mut goal = ShapeGoalPolicy::new(ShapeGoalConfig { grid_size: -5 });
        let mut table = Table::new(1, 3);
        goal.deal(&mut table);
        assert_eq!(goal.rule(), PlacementRule::FixedGrid { size: 1 });
        assert_eq!(table.players[0].hand.len(), 1);
    }

    #[test]
    fn test_policies_report_their_mode() {
        let config = EngineConfig::default();
        for mode in GameMode::ALL {
            assert_eq!(mode.policy(&config).mode(), mode);
        }
    }
}
