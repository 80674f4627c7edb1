use crate::types::TimeMs;
use serde::{Deserialize, Serialize};

/// Count-up stopwatch with pause/resume. Pure integer-millisecond
/// accumulation: it never reads a clock itself, callers pass `now` in. That
/// keeps the arithmetic exact (no drift from repeated polling) and the
/// component testable without sleeping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stopwatch {
    accumulated: TimeMs,
    running_since: Option<TimeMs>,
}

impl Stopwatch {
    /// Starts or resumes counting. Starting while running is a no-op, so the
    /// elapsed value stays continuous across pause/resume cycles.
    pub fn start(&mut self, now: TimeMs) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn pause(&mut self, now: TimeMs) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_sub(since);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Current elapsed milliseconds. Read-only, safe to poll at any rate.
    pub fn snapshot(&self, now: TimeMs) -> TimeMs {
        match self.running_since {
            Some(since) => self.accumulated + now.saturating_sub(since),
            None => self.accumulated,
        }
    }
}

/// Wall-clock source in epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> TimeMs;
}

/// System wall clock. `web_time` keeps this working on wasm targets as well
/// as native ones.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> TimeMs {
        use web_time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as TimeMs)
            .unwrap_or(0)
    }
}

/// Formats elapsed milliseconds as `HH:MM:SS`, flooring partial seconds.
pub fn format_clock(elapsed_ms: TimeMs) -> String {
    let total_secs = elapsed_ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
