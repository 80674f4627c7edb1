use crate::cell::{Cell, CellState, CellView};
use crate::error::{ConfigError, StateError};
use crate::types::{CellCount, Coord, Coord2, nd, neighbors};
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// The in-memory grid of cells. The board is the single source of truth for
/// cell state; every "scan all cells" operation is direct iteration over this
/// grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub(crate) cells: Array2<Cell>,
    pub(crate) size: Coord,
    pub(crate) mine_count: CellCount,
    pub(crate) mines_placed: bool,
    pub(crate) flagged_count: CellCount,
}

impl Board {
    /// A board with all cells hidden, safe, and uncounted. Mines arrive later
    /// through [`Board::place_mines`].
    pub fn new(size: Coord, mine_count: CellCount) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        let cells = size as CellCount * size as CellCount;
        if mine_count >= cells {
            return Err(ConfigError::TooManyMines {
                mines: mine_count,
                cells,
            });
        }
        Ok(Self {
            cells: Array2::default((size as usize, size as usize)),
            size,
            mine_count,
            mines_placed: false,
            flagged_count: 0,
        })
    }

    /// Deterministic construction with an explicit mine set, bypassing the
    /// shuffle. Adjacency is computed immediately; intended for scripted
    /// scenarios and tests.
    pub fn with_mines(size: Coord, mines: &[Coord2]) -> Result<Self, ConfigError> {
        let mut board = Self::new(size, mines.len() as CellCount)?;
        for &coords in mines {
            if coords.0 >= size || coords.1 >= size {
                return Err(ConfigError::MineOutOfBounds(coords.0, coords.1));
            }
            board.cells[nd(coords)].is_mine = true;
        }
        board.mines_placed = true;
        board.compute_adjacency();
        Ok(board)
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        self.size as CellCount * self.size as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    /// The cell at in-bounds `coords`. Callers outside the crate go through
    /// [`Board::validate`] first.
    pub fn cell(&self, coords: Coord2) -> Cell {
        self.cells[nd(coords)]
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        coords.0 < self.size && coords.1 < self.size
    }

    pub fn validate(&self, coords: Coord2) -> Result<Coord2, StateError> {
        if self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(StateError::OutOfBounds(coords.0, coords.1))
        }
    }

    /// Fisher–Yates shuffle of every cell identity, then the first
    /// `mine_count` identities that are neither `excluded` nor already
    /// revealed become mines. The excluded cell is therefore always safe.
    /// Placing twice is a caller bug.
    pub fn place_mines(&mut self, seed: u64, excluded: Coord2) -> Result<(), StateError> {
        if self.mines_placed {
            return Err(StateError::MinesAlreadyPlaced);
        }

        let mut identities: Vec<Coord2> = (0..self.size)
            .flat_map(|row| (0..self.size).map(move |col| (row, col)))
            .collect();
        let mut rng = SmallRng::seed_from_u64(seed);
        identities.shuffle(&mut rng);

        let mut placed: CellCount = 0;
        for coords in identities {
            if placed == self.mine_count {
                break;
            }
            if coords == excluded || self.cells[nd(coords)].state == CellState::Revealed {
                continue;
            }
            self.cells[nd(coords)].is_mine = true;
            placed += 1;
        }
        self.mines_placed = true;

        // double check mine count
        let count = self.cells.iter().filter(|cell| cell.is_mine).count() as CellCount;
        if count != self.mine_count {
            log::warn!(
                "mine placement mismatch, actual: {}, requested: {}",
                count,
                self.mine_count
            );
        }
        Ok(())
    }

    /// Recomputes `adjacent_mines` for every safe cell: the exact number of
    /// mined cells among its up-to-8 neighbors. O(N²), deterministic.
    pub fn compute_adjacency(&mut self) {
        let n = self.size;
        for row in 0..n {
            for col in 0..n {
                let pos = (row, col);
                if self.cells[nd(pos)].is_mine {
                    continue;
                }
                let count = neighbors(pos, n)
                    .filter(|&p| self.cells[nd(p)].is_mine)
                    .count() as u8;
                self.cells[nd(pos)].adjacent_mines = count;
            }
        }
    }

    pub fn neighbors_of(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        neighbors(coords, self.size)
    }

    /// Win condition: every closed cell is a mine, i.e. every safe cell is
    /// revealed. Flags play no part; a flagged safe cell still blocks the
    /// win, while flags on mines never do.
    pub fn is_solved(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| !cell.state.is_closed() || cell.is_mine)
    }

    /// Hidden → Flagged → Hidden. Revealed cells are left alone. Returns
    /// whether anything changed.
    pub fn toggle_flag(&mut self, coords: Coord2) -> bool {
        match self.cells[nd(coords)].state {
            CellState::Hidden => {
                self.cells[nd(coords)].state = CellState::Flagged;
                self.flagged_count += 1;
                true
            }
            CellState::Flagged => {
                self.cells[nd(coords)].state = CellState::Hidden;
                self.flagged_count -= 1;
                true
            }
            CellState::Revealed => false,
        }
    }

    /// Snapshot for the render surface.
    pub fn render(&self) -> Array2<CellView> {
        self.cells.map(|cell| match (cell.state, cell.is_mine) {
            (CellState::Hidden, _) => CellView::Hidden,
            (CellState::Flagged, _) => CellView::Flagged,
            (CellState::Revealed, true) => CellView::Mine,
            (CellState::Revealed, false) => CellView::Open(cell.adjacent_mines),
        })
    }
}
