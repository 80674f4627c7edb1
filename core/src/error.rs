use crate::types::{CellCount, Coord};
use thiserror::Error;

/// Rejected game parameters. Level lists are validated once at load, so none
/// of these can surface mid-game.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid size must be at least 1")]
    ZeroGridSize,
    #[error("{mines} mines cannot fit a {cells}-cell grid")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("mine at ({0}, {1}) is outside the grid")]
    MineOutOfBounds(Coord, Coord),
    #[error("rank thresholds must ascend from gold to bronze")]
    UnorderedThresholds,
    #[error("level list is empty")]
    EmptyLevelList,
    #[error("board side {actual} does not match level grid size {expected}")]
    BoardSizeMismatch { expected: Coord, actual: Coord },
    #[error("board has no mines placed")]
    UnpreparedBoard,
}

/// An operation was invoked in a phase that forbids it. These indicate a
/// caller bug: a UI that honors the reported phase and control state never
/// triggers them.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("coordinates ({0}, {1}) are outside the grid")]
    OutOfBounds(Coord, Coord),
    #[error("mines are already placed for this board")]
    MinesAlreadyPlaced,
}
