use crate::error::ConfigError;
use crate::types::{CellCount, Coord, TimeMs};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    Gold,
    Silver,
    Bronze,
}

/// Ascending time boundaries used to grade a clear.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankThresholds {
    pub gold_ms: TimeMs,
    pub silver_ms: TimeMs,
    pub bronze_ms: TimeMs,
}

impl RankThresholds {
    pub const fn new(gold_ms: TimeMs, silver_ms: TimeMs, bronze_ms: TimeMs) -> Self {
        Self {
            gold_ms,
            silver_ms,
            bronze_ms,
        }
    }

    /// Best rank whose threshold the clear time is strictly below, or `None`
    /// when even bronze was missed.
    pub fn grade(&self, elapsed_ms: TimeMs) -> Option<Rank> {
        if elapsed_ms < self.gold_ms {
            Some(Rank::Gold)
        } else if elapsed_ms < self.silver_ms {
            Some(Rank::Silver)
        } else if elapsed_ms < self.bronze_ms {
            Some(Rank::Bronze)
        } else {
            None
        }
    }
}

/// Static difficulty descriptor. Read-only during a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub grid_size: Coord,
    pub mine_count: CellCount,
    pub thresholds: RankThresholds,
}

impl LevelConfig {
    pub fn new(
        name: impl Into<String>,
        grid_size: Coord,
        mine_count: CellCount,
        thresholds: RankThresholds,
    ) -> Self {
        Self {
            name: name.into(),
            grid_size,
            mine_count,
            thresholds,
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        self.grid_size as CellCount * self.grid_size as CellCount
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        if self.mine_count >= self.total_cells() {
            return Err(ConfigError::TooManyMines {
                mines: self.mine_count,
                cells: self.total_cells(),
            });
        }
        let RankThresholds {
            gold_ms,
            silver_ms,
            bronze_ms,
        } = self.thresholds;
        if gold_ms >= silver_ms || silver_ms >= bronze_ms {
            return Err(ConfigError::UnorderedThresholds);
        }
        Ok(())
    }
}

/// The stock difficulty ladder: the classic 9/16/30 boards plus the oversized
/// maniac grid.
pub fn default_levels() -> Vec<LevelConfig> {
    vec![
        LevelConfig::new("Beginner", 9, 10, RankThresholds::new(10_000, 30_000, 50_000)),
        LevelConfig::new(
            "Intermediate",
            16,
            40,
            RankThresholds::new(20_000, 60_000, 100_000),
        ),
        LevelConfig::new(
            "Expert",
            30,
            120,
            RankThresholds::new(60_000, 120_000, 180_000),
        ),
        LevelConfig::new(
            "Maniac",
            68,
            777,
            RankThresholds::new(3_600_000, 7_200_000, 10_800_000),
        ),
    ]
}

/// Cyclic selector over an ordered level list. Every entry is validated once
/// here, so configuration errors can never surface mid-game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelSelector {
    levels: Vec<LevelConfig>,
    current: usize,
}

impl LevelSelector {
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::EmptyLevelList);
        }
        for level in &levels {
            level.validate()?;
        }
        Ok(Self { levels, current: 0 })
    }

    pub fn current(&self) -> &LevelConfig {
        &self.levels[self.current]
    }

    /// Moves to the next level, wrapping back to the first after the last.
    pub fn advance(&mut self) -> &LevelConfig {
        self.current = (self.current + 1) % self.levels.len();
        self.current()
    }

    pub fn levels(&self) -> &[LevelConfig] {
        &self.levels
    }
}
