use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{DateKey, Phase};

/// Every timer state change produces an Event.
/// Drivers print or forward them; the engine never stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// A phase ended, by running out or by `skip()`, and the next began.
    PhaseCompleted {
        from: Phase,
        to: Phase,
        skipped: bool,
        /// Length of the phase just entered.
        duration_secs: u32,
        /// Present when a work session was credited to the daily log.
        session: Option<CompletedSession>,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
}

/// Work session credited on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub date: DateKey,
    pub minutes: u32,
    pub sessions_completed: u32,
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerResumed { at, .. }
            | Event::PhaseCompleted { at, .. }
            | Event::TimerReset { at } => *at,
        }
    }
}
