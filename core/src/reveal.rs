use crate::board::Board;
use crate::cell::CellState;
use crate::types::{Coord2, nd};
use std::collections::VecDeque;

/// What a reveal attempt did to the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Opened,
    HitMine,
}

impl Board {
    /// Opens a hidden cell. Flagged cells must be unflagged first and
    /// already-open cells are left alone, so repeated calls are no-ops.
    ///
    /// Opening a zero-count cell cascades through its connected zero region
    /// and that region's numbered border. The fill runs on an explicit work
    /// list with the state check before each open, so every cell transitions
    /// Hidden → Revealed at most once and the traversal cannot run out of
    /// stack on large grids.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        match self.cells[nd(coords)].state {
            CellState::Flagged | CellState::Revealed => return RevealOutcome::NoChange,
            CellState::Hidden => {}
        }

        if self.cells[nd(coords)].is_mine {
            self.cells[nd(coords)].state = CellState::Revealed;
            return RevealOutcome::HitMine;
        }

        let mut work = VecDeque::from([coords]);
        while let Some(pos) = work.pop_front() {
            let cell = self.cells[nd(pos)];
            if cell.state != CellState::Hidden {
                continue;
            }
            self.cells[nd(pos)].state = CellState::Revealed;

            if cell.adjacent_mines == 0 {
                work.extend(
                    self.neighbors_of(pos)
                        .filter(|&p| self.cells[nd(p)].state == CellState::Hidden),
                );
            }
        }
        RevealOutcome::Opened
    }

    /// End-of-game disclosure: opens every still-hidden cell, mines included.
    /// Flags are not touched.
    pub fn reveal_all(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.state == CellState::Hidden {
                cell.state = CellState::Revealed;
            }
        }
    }
}
