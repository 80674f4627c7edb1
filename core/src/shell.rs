use crate::error::{ConfigError, StateError};
use crate::hooks::{AudioCue, AudioSink, Frame, RenderSurface, RetryPrompt, RetryRequest};
use crate::level::{LevelConfig, LevelSelector, Rank};
use crate::records::{BestTimeBook, KeyValueStore};
use crate::session::{ActionOutcome, GameSession, Phase};
use crate::timer::{Clock, format_clock};
use crate::types::Coord2;
use chrono::{DateTime, Utc};

/// Thin adapter between the session and its external collaborators: render
/// surface, audio, the best-time store, and the retry prompt. Entry points
/// mirror the single event queue of a document UI — each one runs
/// synchronously to completion, and the only asynchronous boundary is the
/// retry decision coming back through [`GameShell::on_retry_decision`].
pub struct GameShell {
    levels: LevelSelector,
    session: GameSession,
    book: BestTimeBook,
    clock: Box<dyn Clock>,
    store: Box<dyn KeyValueStore>,
    audio: Box<dyn AudioSink>,
    prompt: Box<dyn RetryPrompt>,
    surface: Box<dyn RenderSurface>,
}

impl GameShell {
    pub fn new(
        levels: LevelSelector,
        clock: Box<dyn Clock>,
        store: Box<dyn KeyValueStore>,
        audio: Box<dyn AudioSink>,
        prompt: Box<dyn RetryPrompt>,
        surface: Box<dyn RenderSurface>,
    ) -> Result<Self, ConfigError> {
        let book = BestTimeBook::load(store.as_ref());
        let seed = clock.now_ms();
        let session = GameSession::new(levels.current().clone(), seed)?;
        let mut shell = Self {
            levels,
            session,
            book,
            clock,
            store,
            audio,
            prompt,
            surface,
        };
        shell.paint();
        Ok(shell)
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn best_times(&self) -> &BestTimeBook {
        &self.book
    }

    /// Forwards a cell activation and drives the side-effecting hooks the
    /// outcome calls for.
    pub fn activate(&mut self, coords: Coord2) -> Result<ActionOutcome, StateError> {
        let was_waiting = self.session.phase() == Phase::NotStarted;
        let outcome = self.session.activate(coords, self.clock.now_ms())?;

        if was_waiting && self.session.phase() != Phase::NotStarted {
            self.audio.play(AudioCue::Ambient);
        }
        match outcome {
            ActionOutcome::Opened => self.audio.play(AudioCue::Reveal),
            ActionOutcome::FlagSet | ActionOutcome::FlagCleared => {
                self.audio.play(AudioCue::FlagToggle)
            }
            ActionOutcome::Exploded => {
                self.audio.play(AudioCue::Explosion);
                let request = self.loss_request();
                self.prompt.ask_retry(request);
            }
            ActionOutcome::Cleared => {
                self.audio.play(AudioCue::Clear);
                self.finish_win();
            }
            ActionOutcome::NoChange => {}
        }

        if outcome.has_update() {
            self.paint();
        }
        Ok(outcome)
    }

    fn finish_win(&mut self) {
        let Some(elapsed) = self.session.clear_time_ms() else {
            return;
        };
        let formatted = format_clock(elapsed);
        let achieved_at = DateTime::<Utc>::from_timestamp_millis(self.clock.now_ms() as i64)
            .unwrap_or_default();
        let level = self.session.level().clone();
        let is_new_record = self.book.save_best_time(
            self.store.as_mut(),
            &level.name,
            elapsed,
            &formatted,
            achieved_at,
        );
        let request = win_request(&level, &formatted, self.session.rank(), is_new_record);
        self.prompt.ask_retry(request);
    }

    fn loss_request(&self) -> RetryRequest {
        RetryRequest {
            title: "Game over".to_string(),
            message: "Retry?".to_string(),
            details: Vec::new(),
        }
    }

    /// Retry decision coming back from the confirmation collaborator.
    pub fn on_retry_decision(&mut self, retry: bool) -> Result<(), ConfigError> {
        if retry && self.session.phase().is_terminal() {
            self.session.reset(self.clock.now_ms())?;
            self.paint();
        }
        Ok(())
    }

    pub fn toggle_flag_mode(&mut self) -> bool {
        let flag_mode = self.session.toggle_flag_mode();
        self.paint();
        flag_mode
    }

    pub fn pause(&mut self) {
        self.session.pause(self.clock.now_ms());
    }

    pub fn resume(&mut self) {
        self.session.resume(self.clock.now_ms());
    }

    /// Discards the current game for a fresh one on the same level.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.session.reset(self.clock.now_ms())?;
        self.paint();
        Ok(())
    }

    /// Switches to the next level in the ladder and starts over.
    pub fn cycle_level(&mut self) -> Result<&LevelConfig, ConfigError> {
        let level = self.levels.advance().clone();
        self.session = GameSession::new(level, self.clock.now_ms())?;
        self.paint();
        Ok(self.levels.current())
    }

    /// Periodic display tick. Reads elapsed time only; safe at any rate.
    pub fn tick(&self) -> String {
        format_clock(self.session.elapsed_ms(self.clock.now_ms()))
    }

    fn paint(&mut self) {
        let frame = Frame {
            cells: self.session.render(),
            phase: self.session.phase(),
            flagged_count: self.session.flagged_count(),
            mine_count: self.session.mine_count(),
            clock: self.tick(),
        };
        self.surface.paint(&frame);
    }
}

fn win_request(
    level: &LevelConfig,
    formatted: &str,
    rank: Option<Rank>,
    is_new_record: bool,
) -> RetryRequest {
    let thresholds = &level.thresholds;
    let mut details = vec![
        match rank {
            Some(rank) => format!("Rank: {rank:?}"),
            None => "No rank this time".to_string(),
        },
        format!("Gold   [{}]", format_clock(thresholds.gold_ms)),
        format!("Silver [{}]", format_clock(thresholds.silver_ms)),
        format!("Bronze [{}]", format_clock(thresholds.bronze_ms)),
    ];
    if is_new_record {
        details.push("New record!".to_string());
    }
    RetryRequest {
        title: "Cleared!".to_string(),
        message: format!("{} in {}. Retry?", level.name, formatted),
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::cell::CellView;
    use crate::level::{LevelConfig, RankThresholds};
    use crate::records::MemoryStore;
    use crate::types::TimeMs;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct ManualClock(Rc<RefCell<TimeMs>>);

    impl ManualClock {
        fn advance(&self, delta: TimeMs) {
            *self.0.borrow_mut() += delta;
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> TimeMs {
            *self.0.borrow()
        }
    }

    #[derive(Clone, Default)]
    struct CueRecorder(Rc<RefCell<Vec<AudioCue>>>);

    impl AudioSink for CueRecorder {
        fn play(&mut self, cue: AudioCue) {
            self.0.borrow_mut().push(cue);
        }
    }

    #[derive(Clone, Default)]
    struct PromptRecorder(Rc<RefCell<Vec<RetryRequest>>>);

    impl RetryPrompt for PromptRecorder {
        fn ask_retry(&mut self, request: RetryRequest) {
            self.0.borrow_mut().push(request);
        }
    }

    #[derive(Clone, Default)]
    struct FrameRecorder(Rc<RefCell<Vec<Frame>>>);

    impl RenderSurface for FrameRecorder {
        fn paint(&mut self, frame: &Frame) {
            self.0.borrow_mut().push(frame.clone());
        }
    }

    struct Rig {
        shell: GameShell,
        clock: ManualClock,
        cues: CueRecorder,
        prompts: PromptRecorder,
        frames: FrameRecorder,
    }

    fn tiny_level() -> LevelConfig {
        LevelConfig::new("Tiny", 3, 1, RankThresholds::new(10_000, 30_000, 50_000))
    }

    fn rig() -> Rig {
        let clock = ManualClock::default();
        let cues = CueRecorder::default();
        let prompts = PromptRecorder::default();
        let frames = FrameRecorder::default();
        let shell = GameShell::new(
            LevelSelector::new(vec![tiny_level()]).unwrap(),
            Box::new(clock.clone()),
            Box::new(MemoryStore::default()),
            Box::new(cues.clone()),
            Box::new(prompts.clone()),
            Box::new(frames.clone()),
        )
        .unwrap();
        Rig {
            shell,
            clock,
            cues,
            prompts,
            frames,
        }
    }

    /// Shell around a known board: mines at the (0,0) and (2,2) corners,
    /// already running. Activating (0,2) opens the four cells in that corner
    /// and leaves the rest of the board hidden.
    fn scripted_rig() -> Rig {
        let clock = ManualClock::default();
        let cues = CueRecorder::default();
        let prompts = PromptRecorder::default();
        let frames = FrameRecorder::default();
        let level = LevelConfig::new("Tiny", 3, 2, RankThresholds::new(10_000, 30_000, 50_000));
        let board = Board::with_mines(3, &[(0, 0), (2, 2)]).unwrap();
        let session = GameSession::with_board(level.clone(), board, clock.now_ms()).unwrap();
        let shell = GameShell {
            levels: LevelSelector::new(vec![level]).unwrap(),
            session,
            book: BestTimeBook::default(),
            clock: Box::new(clock.clone()),
            store: Box::new(MemoryStore::default()),
            audio: Box::new(cues.clone()),
            prompt: Box::new(prompts.clone()),
            surface: Box::new(frames.clone()),
        };
        Rig {
            shell,
            clock,
            cues,
            prompts,
            frames,
        }
    }

    fn mine_position(shell: &GameShell) -> Coord2 {
        let board = shell.session().board();
        for row in 0..board.size() {
            for col in 0..board.size() {
                if board.cell((row, col)).is_mine {
                    return (row, col);
                }
            }
        }
        unreachable!("board has a mine after the first activation");
    }

    fn play_to_win(rig: &mut Rig) {
        rig.shell.activate((0, 0)).unwrap();
        let mine = mine_position(&rig.shell);
        for row in 0..3u8 {
            for col in 0..3u8 {
                if (row, col) != mine {
                    rig.shell.activate((row, col)).unwrap();
                }
            }
        }
    }

    #[test]
    fn winning_saves_a_record_and_raises_the_prompt() {
        let mut rig = rig();
        rig.clock.advance(25_000);
        play_to_win(&mut rig);

        assert_eq!(rig.shell.session().phase(), Phase::Won);
        assert!(rig.shell.best_times().get("Tiny").is_some());

        let cues = rig.cues.0.borrow();
        assert_eq!(cues.first(), Some(&AudioCue::Ambient));
        assert_eq!(cues.last(), Some(&AudioCue::Clear));

        let prompts = rig.prompts.0.borrow();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].title, "Cleared!");
        assert!(prompts[0].details.contains(&"New record!".to_string()));
    }

    #[test]
    fn losing_raises_explosion_and_the_loss_prompt() {
        let mut rig = scripted_rig();
        let outcome = rig.shell.activate((0, 0)).unwrap();

        assert_eq!(outcome, ActionOutcome::Exploded);
        assert_eq!(rig.shell.session().phase(), Phase::Lost);
        assert!(rig.cues.0.borrow().contains(&AudioCue::Explosion));
        assert_eq!(rig.prompts.0.borrow()[0].title, "Game over");
        assert!(rig.shell.best_times().is_empty());
    }

    #[test]
    fn retry_decision_resets_only_terminal_sessions() {
        let mut rig = scripted_rig();
        assert_eq!(rig.shell.activate((0, 2)).unwrap(), ActionOutcome::Opened);
        rig.shell.on_retry_decision(true).unwrap();
        // still running, the decision is ignored
        assert_eq!(rig.shell.session().phase(), Phase::Running);

        rig.shell.activate((0, 0)).unwrap();
        rig.shell.on_retry_decision(false).unwrap();
        assert_eq!(rig.shell.session().phase(), Phase::Lost);

        rig.shell.on_retry_decision(true).unwrap();
        assert_eq!(rig.shell.session().phase(), Phase::NotStarted);
    }

    #[test]
    fn a_failed_save_never_touches_game_state() {
        struct ReadOnlyStore;
        impl KeyValueStore for ReadOnlyStore {
            fn get(&self, _key: &str) -> Option<String> {
                None
            }
            fn put(&mut self, _key: &str, _value: String) -> bool {
                false
            }
        }

        let mut shell = GameShell::new(
            LevelSelector::new(vec![tiny_level()]).unwrap(),
            Box::new(ManualClock::default()),
            Box::new(ReadOnlyStore),
            Box::new(CueRecorder::default()),
            Box::new(PromptRecorder::default()),
            Box::new(FrameRecorder::default()),
        )
        .unwrap();

        shell.activate((0, 0)).unwrap();
        let mine = mine_position(&shell);
        for row in 0..3u8 {
            for col in 0..3u8 {
                if (row, col) != mine {
                    shell.activate((row, col)).unwrap();
                }
            }
        }
        assert_eq!(shell.session().phase(), Phase::Won);
        // the record still lands in memory even though the store refused it
        assert!(shell.best_times().get("Tiny").is_some());
    }

    #[test]
    fn every_update_pushes_a_fresh_frame() {
        let mut rig = scripted_rig();
        let initial = rig.frames.0.borrow().len();
        rig.shell.activate((0, 2)).unwrap();

        let frames = rig.frames.0.borrow();
        assert_eq!(frames.len(), initial + 1);
        let last = frames.last().unwrap();
        assert_eq!(last.phase, Phase::Running);
        assert_eq!(last.mine_count, 2);
        assert_eq!(last.cells[[0, 2]], CellView::Open(0));
        assert_eq!(last.cells[[2, 0]], CellView::Hidden);
    }

    #[test]
    fn tick_formats_the_running_stopwatch() {
        let mut rig = scripted_rig();
        rig.shell.activate((0, 2)).unwrap();
        rig.clock.advance(61_000);
        assert_eq!(rig.shell.tick(), "00:01:01");
        rig.shell.pause();
        rig.clock.advance(30_000);
        assert_eq!(rig.shell.tick(), "00:01:01");
    }

    #[test]
    fn cycling_levels_starts_a_fresh_session_on_the_next_config() {
        let levels = vec![
            tiny_level(),
            LevelConfig::new("Next", 4, 2, RankThresholds::new(1_000, 2_000, 3_000)),
        ];
        let clock = ManualClock::default();
        let mut shell = GameShell::new(
            LevelSelector::new(levels).unwrap(),
            Box::new(clock),
            Box::new(MemoryStore::default()),
            Box::new(CueRecorder::default()),
            Box::new(PromptRecorder::default()),
            Box::new(FrameRecorder::default()),
        )
        .unwrap();

        shell.activate((0, 0)).unwrap();
        let next = shell.cycle_level().unwrap();
        assert_eq!(next.name, "Next");
        assert_eq!(shell.session().phase(), Phase::NotStarted);
        assert_eq!(shell.session().level().grid_size, 4);
    }
}
