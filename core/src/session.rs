use crate::board::Board;
use crate::cell::{CellState, CellView};
use crate::error::{ConfigError, StateError};
use crate::level::{LevelConfig, Rank};
use crate::reveal::RevealOutcome;
use crate::timer::Stopwatch;
use crate::types::{CellCount, Coord2, TimeMs};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Session-level game state. Transitions are monotonic:
/// NotStarted → Running → Won | Lost, with Won and Lost terminal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    NotStarted,
    Running,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// What a single activation did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    NoChange,
    Opened,
    FlagSet,
    FlagCleared,
    Exploded,
    Cleared,
}

impl ActionOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// One game from first click to win or loss: the board, the phase machine,
/// the flag-mode switch, and the stopwatch. Mines are placed exactly once,
/// lazily, on the very first activation, excluding the activated cell.
///
/// All operations run synchronously to completion; time-dependent ones take
/// `now` (epoch milliseconds) from the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    level: LevelConfig,
    board: Board,
    phase: Phase,
    flag_mode: bool,
    stopwatch: Stopwatch,
    seed: u64,
    clear_time_ms: Option<TimeMs>,
}

impl GameSession {
    pub fn new(level: LevelConfig, seed: u64) -> Result<Self, ConfigError> {
        level.validate()?;
        let board = Board::new(level.grid_size, level.mine_count)?;
        Ok(Self {
            level,
            board,
            phase: Phase::NotStarted,
            flag_mode: false,
            stopwatch: Stopwatch::default(),
            seed,
            clear_time_ms: None,
        })
    }

    /// Scripted construction around a prepared board, bypassing random mine
    /// placement. The session starts in `Running` with the stopwatch live at
    /// `now`; intended for deterministic scenarios and tests.
    pub fn with_board(level: LevelConfig, board: Board, now: TimeMs) -> Result<Self, ConfigError> {
        level.validate()?;
        if board.size() != level.grid_size {
            return Err(ConfigError::BoardSizeMismatch {
                expected: level.grid_size,
                actual: board.size(),
            });
        }
        if !board.mines_placed() {
            return Err(ConfigError::UnpreparedBoard);
        }
        let mut stopwatch = Stopwatch::default();
        stopwatch.start(now);
        Ok(Self {
            level,
            board,
            phase: Phase::Running,
            flag_mode: false,
            stopwatch,
            seed: 0,
            clear_time_ms: None,
        })
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn flag_mode(&self) -> bool {
        self.flag_mode
    }

    pub fn elapsed_ms(&self, now: TimeMs) -> TimeMs {
        self.stopwatch.snapshot(now)
    }

    /// Clear time frozen at the moment of winning.
    pub fn clear_time_ms(&self) -> Option<TimeMs> {
        self.clear_time_ms
    }

    pub fn rank(&self) -> Option<Rank> {
        self.clear_time_ms
            .and_then(|elapsed| self.level.thresholds.grade(elapsed))
    }

    pub fn mine_count(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.board.flagged_count()
    }

    pub fn mines_left(&self) -> isize {
        self.board.mine_count() as isize - self.board.flagged_count() as isize
    }

    pub fn render(&self) -> Array2<CellView> {
        self.board.render()
    }

    /// Mode switch only: changes how subsequent activations are interpreted,
    /// never touches the board.
    pub fn toggle_flag_mode(&mut self) -> bool {
        self.flag_mode = !self.flag_mode;
        self.flag_mode
    }

    /// Player action on a cell. Out-of-grid coordinates are rejected here, at
    /// the boundary; the board internals assume validated positions.
    /// Activations in a terminal phase are ignored, not errors.
    pub fn activate(&mut self, coords: Coord2, now: TimeMs) -> Result<ActionOutcome, StateError> {
        let coords = self.board.validate(coords)?;

        match self.phase {
            Phase::Won | Phase::Lost => Ok(ActionOutcome::NoChange),
            Phase::NotStarted => self.first_activation(coords, now),
            Phase::Running => Ok(self.running_activation(coords, now)),
        }
    }

    /// The opening click: start running, place mines everywhere but here,
    /// count adjacency, open the region. Flag mode never applies to the
    /// opening click (its control is disabled before the game starts).
    fn first_activation(&mut self, coords: Coord2, now: TimeMs) -> Result<ActionOutcome, StateError> {
        self.phase = Phase::Running;
        self.stopwatch.start(now);
        self.board.place_mines(self.seed, coords)?;
        self.board.compute_adjacency();
        log::debug!(
            "session started: level {}, seed {}, first click {:?}",
            self.level.name,
            self.seed,
            coords
        );

        let outcome = self.board.reveal(coords);
        debug_assert_eq!(outcome, RevealOutcome::Opened);
        Ok(self.after_open(now))
    }

    fn running_activation(&mut self, coords: Coord2, now: TimeMs) -> ActionOutcome {
        if self.flag_mode {
            let before = self.board.cell(coords).state;
            return if self.board.toggle_flag(coords) {
                match before {
                    CellState::Hidden => ActionOutcome::FlagSet,
                    _ => ActionOutcome::FlagCleared,
                }
            } else {
                ActionOutcome::NoChange
            };
        }

        match self.board.cell(coords).state {
            // flagged cells must be unflagged first; open cells stay open
            CellState::Flagged | CellState::Revealed => ActionOutcome::NoChange,
            CellState::Hidden => match self.board.reveal(coords) {
                RevealOutcome::HitMine => {
                    self.board.reveal_all();
                    self.phase = Phase::Lost;
                    self.stopwatch.pause(now);
                    log::debug!("mine hit at {:?}", coords);
                    ActionOutcome::Exploded
                }
                RevealOutcome::Opened => self.after_open(now),
                RevealOutcome::NoChange => ActionOutcome::NoChange,
            },
        }
    }

    fn after_open(&mut self, now: TimeMs) -> ActionOutcome {
        if self.board.is_solved() {
            self.stopwatch.pause(now);
            self.clear_time_ms = Some(self.stopwatch.snapshot(now));
            self.phase = Phase::Won;
            self.board.reveal_all();
            log::debug!("board solved in {} ms", self.stopwatch.snapshot(now));
            ActionOutcome::Cleared
        } else {
            ActionOutcome::Opened
        }
    }

    /// Stopwatch control while running. The periodic display tick lives with
    /// the caller and only ever reads [`GameSession::elapsed_ms`].
    pub fn pause(&mut self, now: TimeMs) {
        if self.phase == Phase::Running {
            self.stopwatch.pause(now);
        }
    }

    pub fn resume(&mut self, now: TimeMs) {
        if self.phase == Phase::Running {
            self.stopwatch.start(now);
        }
    }

    /// Discards the board and phase for a fresh `NotStarted` session on the
    /// same level.
    pub fn reset(&mut self, seed: u64) -> Result<(), ConfigError> {
        *self = Self::new(self.level.clone(), seed)?;
        Ok(())
    }
}
