//! Focus/break session timer.
//!
//! [`PomodoroEngine`] is a tick-driven state machine: it owns no thread and
//! no clock. An external driver calls `tick()` once per second while the
//! engine is running, and "today" comes from an injected [`DateSource`].

mod engine;
mod stats;

pub use engine::{PomodoroEngine, PomodoroState};
pub use stats::{DailyLog, DailyStats, DateKey, DateSource, SystemDate};

use serde::{Deserialize, Serialize};

/// Default work session length.
pub const WORK_DURATION_SECS: u32 = 25 * 60;
/// Default short break length.
pub const SHORT_BREAK_SECS: u32 = 5 * 60;
/// Default long break length.
pub const LONG_BREAK_SECS: u32 = 15 * 60;
/// Every Nth completed work session is followed by a long break.
pub const LONG_BREAK_EVERY: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(&self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }
}

/// Durations (seconds) and long-break cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    pub work_secs: u32,
    pub short_break_secs: u32,
    pub long_break_secs: u32,
    pub long_break_every: u32,
}

impl PomodoroConfig {
    /// Countdown length for `phase`. Idle has none.
    pub fn duration_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Idle => 0,
            Phase::Work => self.work_secs,
            Phase::ShortBreak => self.short_break_secs,
            Phase::LongBreak => self.long_break_secs,
        }
    }
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_secs: WORK_DURATION_SECS,
            short_break_secs: SHORT_BREAK_SECS,
            long_break_secs: LONG_BREAK_SECS,
            long_break_every: LONG_BREAK_EVERY,
        }
    }
}
