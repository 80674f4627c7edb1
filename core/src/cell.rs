use serde::{Deserialize, Serialize};

/// Visibility of a single cell. `Revealed` is terminal for the cell;
/// `Hidden` and `Flagged` toggle into each other.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

impl CellState {
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

/// One grid position. `adjacent_mines` is meaningful only for safe cells and
/// stays 0 for mined ones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub adjacent_mines: u8,
    pub state: CellState,
}

/// What a render surface is allowed to see for one cell: mine-ness only once
/// revealed, the adjacency count only when revealed and safe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    /// Revealed safe cell with its adjacent mine count.
    Open(u8),
    /// Revealed mine.
    Mine,
}
