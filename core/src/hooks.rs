use crate::cell::CellView;
use crate::session::Phase;
use crate::types::CellCount;
use ndarray::Array2;

/// Procedural audio cues. Fire-and-forget: the core raises them at
/// well-defined points and never waits on or inspects the result.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AudioCue {
    /// A cell (or region) was opened.
    Reveal,
    /// A flag was set or cleared.
    FlagToggle,
    /// A mine was hit.
    Explosion,
    /// The board was solved.
    Clear,
    /// Background loop, raised when a session starts running.
    Ambient,
}

pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Discards every cue.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Everything a renderer needs after a mutating operation. The core pushes a
/// fresh frame; it never touches presentation itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub cells: Array2<CellView>,
    pub phase: Phase,
    pub flagged_count: CellCount,
    pub mine_count: CellCount,
    /// Elapsed time, already formatted as `HH:MM:SS`.
    pub clock: String,
}

pub trait RenderSurface {
    fn paint(&mut self, frame: &Frame);
}

/// End-of-game summary handed to the confirmation collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryRequest {
    pub title: String,
    pub message: String,
    pub details: Vec<String>,
}

/// Confirmation collaborator. `ask_retry` must not block: the answer arrives
/// later through [`crate::GameShell::on_retry_decision`]. Implementations
/// usually wait a beat (~1s) after the final paint before showing the dialog.
pub trait RetryPrompt {
    fn ask_retry(&mut self, request: RetryRequest);
}
