//! Engine configuration: point values, hand sizes and the level table.
//! Loaded from TOML at runtime by the CLI binaries; every field has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::scoring::ScoringRules;
use crate::game::validator::{grid_cells, MAX_GRID_SIZE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitiveConfig {
    pub hand_size: usize,
}

impl Default for CompetitiveConfig {
    fn default() -> Self {
        Self { hand_size: 6 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooperativeConfig {
    pub hand_size: usize,
    /// Refill the placing player's hand once it holds fewer tiles than this.
    pub refill_below: usize,
    /// Board size at which the team wins.
    pub target_tiles: usize,
    /// Tiles in the shared draw pool, dealt hands excluded.
    pub pool_size: usize,
}

impl Default for CooperativeConfig {
    fn default() -> Self {
        Self {
            hand_size: 4,
            refill_below: 2,
            target_tiles: 20,
            pool_size: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub hand_size: usize,
    pub refill_below: usize,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            hand_size: 5,
            refill_below: 2,
        }
    }
}

/// One entry of the level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub grid_size: i32,
    /// Rebuild the piece pool from the full catalog before dealing this level.
    #[serde(default)]
    pub fresh_pool: bool,
}

impl LevelSpec {
    pub fn new(grid_size: i32, fresh_pool: bool) -> Self {
        Self { grid_size, fresh_pool }
    }

    pub fn cells(&self) -> usize {
        grid_cells(self.grid_size)
    }

    /// Same level with the grid side forced into `1..=MAX_GRID_SIZE`.
    pub fn clamped(self) -> Self {
        Self { grid_size: self.grid_size.clamp(1, MAX_GRID_SIZE), ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeGoalConfig {
    pub grid_size: i32,
}

impl Default for ShapeGoalConfig {
    fn default() -> Self {
        Self { grid_size: 3 }
    }
}

impl ShapeGoalConfig {
    pub fn clamped(self) -> Self {
        Self { grid_size: self.grid_size.clamp(1, MAX_GRID_SIZE) }
    }
}

fn check_grid_size(what: &str, size: i32) -> Result<(), String> {
    if (1..=MAX_GRID_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(format!("{what} grid_size must be between 1 and {MAX_GRID_SIZE}, got {size}"))
    }
}

fn default_levels() -> Vec<LevelSpec> {
    vec![
        LevelSpec::new(2, false),
        LevelSpec::new(3, false),
        LevelSpec::new(4, true),
        LevelSpec::new(5, false),
        LevelSpec::new(6, true),
    ]
}

/// Top-level TOML file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub scoring: ScoringRules,
    #[serde(default)]
    pub competitive: CompetitiveConfig,
    #[serde(default)]
    pub cooperative: CooperativeConfig,
    #[serde(default)]
    pub sandbox: SandboxConfig,
    #[serde(default = "default_levels")]
    pub levels: Vec<LevelSpec>,
    #[serde(default)]
    pub shape_goal: ShapeGoalConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringRules::default(),
            competitive: CompetitiveConfig::default(),
            cooperative: CooperativeConfig::default(),
            sandbox: SandboxConfig::default(),
            levels: default_levels(),
            shape_goal: ShapeGoalConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Reject grid sizes the fixed-grid modes cannot play.
    pub fn validate(&self) -> Result<(), String> {
        if self.levels.is_empty() {
            return Err(String::from("the level table is empty"));
        }
        for (i, level) in self.levels.iter().enumerate() {
            check_grid_size(&format!("level {}", i + 1), level.grid_size)?;
        }
        check_grid_size("shape_goal", self.shape_goal.grid_size)
    }
}

/// Load a config from a TOML file at the given path.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: EngineConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate().map_err(|reason| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(config)
}

/// Try well-known paths, falling back to built-in defaults.
pub fn load_default_config() -> EngineConfig {
    let candidates = [
        "edge_match.toml",
        "../edge_match.toml",
        "/etc/edge-match/edge_match.toml",
    ];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_config(p) {
                Ok(config) => {
                    tracing::info!(path = %p.display(), levels = config.levels.len(), "loaded engine config");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load engine config");
                }
            }
        }
    }
    tracing::info!("no edge_match.toml found, using built-in defaults");
    EngineConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.scoring.star_threshold, 100);
        assert_eq!(config.competitive.hand_size, 6);
        assert_eq!(config.levels.iter().map(|l| l.grid_size).collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
        assert!(config.levels[2].fresh_pool);
        assert!(!config.levels[3].fresh_pool);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [scoring]
            base_points = 20

            [cooperative]
            target_tiles = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.scoring.base_points, 20);
        assert_eq!(config.scoring.match_bonus, 5);
        assert_eq!(config.cooperative.target_tiles, 8);
        assert_eq!(config.cooperative.hand_size, 4);
        assert_eq!(config.levels.len(), 5);
    }

    #[test]
    fn test_level_table_override() {
        let config: EngineConfig = toml::from_str(
            r#"
            [[levels]]
            grid_size = 2

            [[levels]]
            grid_size = 3
            fresh_pool = true
            "#,
        )
        .unwrap();
        assert_eq!(config.levels, vec![LevelSpec::new(2, false), LevelSpec::new(3, true)]);
        assert_eq!(config.levels[1].cells(), 9);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sandbox]\nhand_size = 3").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.sandbox.hand_size, 3);
        assert_eq!(config.sandbox.refill_below, 2);
    }

    #[test]
    fn test_load_config_errors() {
        let missing = load_config(Path::new("/nonexistent/edge_match.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scoring\nbase_points = ").unwrap();
        let bad = load_config(file.path());
        assert!(matches!(bad, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_config_rejects_unplayable_grids() {
        for body in [
            "[shape_goal]\ngrid_size = 0",
            "[shape_goal]\ngrid_size = 50000",
            "[[levels]]\ngrid_size = 2\n[[levels]]\ngrid_size = -3",
            "levels = []",
        ] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "{body}").unwrap();
            let result = load_config(file.path());
            assert!(matches!(result, Err(ConfigError::Invalid { .. })), "{body}");
        }
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_clamped_grid_sizes() {
        assert_eq!(LevelSpec::new(0, true).clamped(), LevelSpec::new(1, true));
        assert_eq!(LevelSpec::new(50_000, false).clamped().grid_size, MAX_GRID_SIZE);
        assert_eq!(ShapeGoalConfig { grid_size: -2 }.clamped().grid_size, 1);
        assert_eq!(LevelSpec::new(-1, false).cells(), 0);
    }
}
