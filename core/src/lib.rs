//! Headless minesweeper core.
//!
//! The library owns the full game semantics: the board model with lazy,
//! first-click-safe mine placement, the iterative flood-fill reveal, the
//! session phase machine, the count-up stopwatch, the difficulty ladder with
//! Gold/Silver/Bronze thresholds, and per-level best-time records. Everything
//! that touches the outside world (painting, sound, dialogs, the backing
//! store, the wall clock) goes through the small traits in [`hooks`],
//! [`records`] and [`timer`], so the whole game is testable without a UI.

pub use board::*;
pub use cell::*;
pub use error::*;
pub use hooks::*;
pub use level::*;
pub use records::*;
pub use reveal::*;
pub use session::*;
pub use shell::*;
pub use timer::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod hooks;
mod level;
mod records;
mod reveal;
mod session;
mod shell;
mod timer;
mod types;
