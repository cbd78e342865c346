//! Pomodoro engine implementation.
//!
//! The engine is a countdown state machine. It does not use internal
//! threads - the caller is responsible for calling `tick()` once per second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Work -> (ShortBreak | LongBreak) -> Work -> ...
//!   ^                                                  |
//!   +--------------------- reset() --------------------+
//! ```
//!
//! Work is followed by a long break after every `long_break_every`th
//! completed session, otherwise by a short break. Breaks always return to
//! work, and the cycle continues while the engine is running.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PomodoroEngine::new(PomodoroConfig::default(), SystemDate);
//! engine.start();
//! // Once per second while engine.is_running():
//! engine.tick(); // Returns Some(Event::PhaseCompleted) at phase end
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::stats::{DailyLog, DailyStats, DateKey, DateSource, SystemDate};
use super::{Phase, PomodoroConfig};
use crate::events::{CompletedSession, Event};
use crate::storage::{self, PersistenceGateway, StorageKey};

/// Serializable view of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroState {
    pub phase: Phase,
    pub time_remaining: u32,
    pub is_running: bool,
    pub sessions_completed: u32,
}

#[derive(Debug, Clone)]
pub struct PomodoroEngine<D = SystemDate> {
    config: PomodoroConfig,
    dates: D,
    phase: Phase,
    /// Seconds left in the current phase.
    time_remaining: u32,
    is_running: bool,
    /// Raw count of completed work sessions; drives the long-break cadence.
    sessions_completed: u32,
    daily_log: DailyLog,
}

impl<D: DateSource> PomodoroEngine<D> {
    /// Create an idle engine with an empty daily log.
    pub fn new(config: PomodoroConfig, dates: D) -> Self {
        Self::with_log(config, dates, DailyLog::new())
    }

    /// Create an idle engine over an existing daily log.
    ///
    /// The session counter resumes from today's recorded sessions so the
    /// long-break cadence carries over within a day.
    pub fn with_log(config: PomodoroConfig, dates: D, daily_log: DailyLog) -> Self {
        let sessions_completed = daily_log.get(dates.today()).sessions_completed;
        Self {
            config,
            dates,
            phase: Phase::Idle,
            time_remaining: 0,
            is_running: false,
            sessions_completed,
            daily_log,
        }
    }

    /// Restore the daily log from `gateway`. A missing or corrupt log yields
    /// an empty one. The countdown itself is never restored.
    pub fn load(gateway: &dyn PersistenceGateway, config: PomodoroConfig, dates: D) -> Self {
        let log: DailyLog = storage::load_or_default(gateway, StorageKey::PomodoroLog);
        Self::with_log(config, dates, log)
    }

    pub fn save(&self, gateway: &dyn PersistenceGateway) {
        storage::save_logged(gateway, StorageKey::PomodoroLog, &self.daily_log);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    pub fn config(&self) -> &PomodoroConfig {
        &self.config
    }

    pub fn daily_log(&self) -> &DailyLog {
        &self.daily_log
    }

    pub fn state(&self) -> PomodoroState {
        PomodoroState {
            phase: self.phase,
            time_remaining: self.time_remaining,
            is_running: self.is_running,
            sessions_completed: self.sessions_completed,
        }
    }

    pub fn today_stats(&self) -> DailyStats {
        self.daily_log.get(self.dates.today())
    }

    pub fn stats_for(&self, date: DateKey) -> DailyStats {
        self.daily_log.get(date)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a work session from idle. On a paused engine this resumes.
    pub fn start(&mut self) -> Option<Event> {
        match (self.phase, self.is_running) {
            (Phase::Idle, _) => {
                self.enter(Phase::Work);
                self.is_running = true;
                info!(duration_secs = self.time_remaining, "work session started");
                Some(Event::TimerStarted {
                    phase: Phase::Work,
                    duration_secs: self.time_remaining,
                    at: Utc::now(),
                })
            }
            (_, false) => self.resume(),
            (_, true) => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        debug!(phase = ?self.phase, remaining = self.time_remaining, "paused");
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.time_remaining,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.is_running || self.phase == Phase::Idle {
            return None;
        }
        self.is_running = true;
        debug!(phase = ?self.phase, remaining = self.time_remaining, "resumed");
        Some(Event::TimerResumed {
            phase: self.phase,
            remaining_secs: self.time_remaining,
            at: Utc::now(),
        })
    }

    /// End the current phase early and move to the next one.
    /// The running flag is left as it was.
    pub fn skip(&mut self) -> Option<Event> {
        if self.phase == Phase::Idle {
            return None;
        }
        Some(self.complete_phase(true))
    }

    /// Back to idle. Session counter and daily log are kept.
    pub fn reset(&mut self) -> Option<Event> {
        self.phase = Phase::Idle;
        self.time_remaining = 0;
        self.is_running = false;
        debug!("timer reset");
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Advance one second. No-op unless running.
    /// Returns `Some(Event::PhaseCompleted)` when the countdown hits zero.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running || self.phase == Phase::Idle {
            return None;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            return Some(self.complete_phase(false));
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.time_remaining = self.config.duration_for(phase);
    }

    fn complete_phase(&mut self, skipped: bool) -> Event {
        let from = self.phase;
        let session = match from {
            Phase::Work => Some(self.credit_work_session()),
            _ => None,
        };
        let to = match from {
            Phase::Work if self.is_long_break_due() => Phase::LongBreak,
            Phase::Work => Phase::ShortBreak,
            _ => Phase::Work,
        };
        self.enter(to);
        info!(?from, ?to, skipped, sessions = self.sessions_completed, "phase completed");
        Event::PhaseCompleted {
            from,
            to,
            skipped,
            duration_secs: self.time_remaining,
            session,
            at: Utc::now(),
        }
    }

    /// Count the work session and credit the focused time to today.
    /// A skipped session is credited only with the time actually elapsed.
    fn credit_work_session(&mut self) -> CompletedSession {
        let elapsed = self.config.work_secs.saturating_sub(self.time_remaining);
        let minutes = elapsed / 60;
        let date = self.dates.today();
        self.sessions_completed = self.sessions_completed.saturating_add(1);
        self.daily_log.record_session(date, minutes);
        CompletedSession {
            date,
            minutes,
            sessions_completed: self.sessions_completed,
        }
    }

    fn is_long_break_due(&self) -> bool {
        let every = self.config.long_break_every.max(1);
        self.sessions_completed % every == 0
    }
}

impl Default for PomodoroEngine<SystemDate> {
    fn default() -> Self {
        Self::new(PomodoroConfig::default(), SystemDate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn day(d: u32) -> DateKey {
        DateKey::from_ymd(2026, 5, d).unwrap()
    }

    fn engine() -> PomodoroEngine<impl Fn() -> DateKey> {
        PomodoroEngine::new(PomodoroConfig::default(), || day(1))
    }

    fn tiny_config() -> PomodoroConfig {
        PomodoroConfig {
            work_secs: 120,
            short_break_secs: 3,
            long_break_secs: 5,
            long_break_every: 4,
        }
    }

    fn run_until_phase_change<D: DateSource>(engine: &mut PomodoroEngine<D>) -> Event {
        loop {
            if let Some(event) = engine.tick() {
                return event;
            }
        }
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = engine();
        assert_eq!(engine.phase(), Phase::Idle);

        assert!(engine.start().is_some());
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.time_remaining(), 1500);
        assert!(engine.is_running());

        engine.tick();
        assert!(engine.pause().is_some());
        assert!(!engine.is_running());
        assert_eq!(engine.time_remaining(), 1499);

        assert!(engine.resume().is_some());
        assert!(engine.is_running());
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.time_remaining(), 1499);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut engine = engine();
        engine.start();
        engine.tick();
        assert!(engine.start().is_none());
        assert_eq!(engine.time_remaining(), 1499);
    }

    #[test]
    fn start_while_paused_resumes() {
        let mut engine = engine();
        engine.start();
        engine.tick();
        engine.pause();
        assert!(matches!(engine.start(), Some(Event::TimerResumed { .. })));
        assert_eq!(engine.time_remaining(), 1499);
    }

    #[test]
    fn resume_from_idle_is_noop() {
        let mut engine = engine();
        assert!(engine.resume().is_none());
        assert!(engine.pause().is_none());
        assert!(!engine.is_running());
    }

    #[test]
    fn full_work_session_goes_to_short_break() {
        let mut engine = engine();
        engine.start();
        let mut events = Vec::new();
        for _ in 0..1500 {
            if let Some(e) = engine.tick() {
                events.push(e);
            }
        }
        assert_eq!(engine.phase(), Phase::ShortBreak);
        assert_eq!(engine.sessions_completed(), 1);
        assert_eq!(engine.time_remaining(), 300);
        assert!(engine.is_running());
        assert_eq!(events.len(), 1);
        assert_eq!(
            engine.today_stats(),
            DailyStats {
                sessions_completed: 1,
                minutes: 25
            }
        );
    }

    #[test]
    fn cadence_three_short_then_long() {
        let mut engine = PomodoroEngine::new(tiny_config(), || day(1));
        engine.start();
        let mut phases = vec![engine.phase()];
        for _ in 0..7 {
            run_until_phase_change(&mut engine);
            phases.push(engine.phase());
        }
        assert_eq!(
            phases,
            vec![
                Phase::Work,
                Phase::ShortBreak,
                Phase::Work,
                Phase::ShortBreak,
                Phase::Work,
                Phase::ShortBreak,
                Phase::Work,
                Phase::LongBreak,
            ]
        );
        assert_eq!(engine.sessions_completed(), 4);
        run_until_phase_change(&mut engine);
        assert_eq!(engine.phase(), Phase::Work);
    }

    #[test]
    fn tick_when_not_running_changes_nothing() {
        let mut engine = engine();
        for _ in 0..10 {
            assert!(engine.tick().is_none());
        }
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.time_remaining(), 0);

        engine.start();
        engine.tick();
        engine.pause();
        for _ in 0..10 {
            assert!(engine.tick().is_none());
        }
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.time_remaining(), 1499);
    }

    #[test]
    fn skip_work_credits_elapsed_minutes() {
        let mut engine = PomodoroEngine::new(tiny_config(), || day(1));
        engine.start();
        for _ in 0..61 {
            engine.tick();
        }
        match engine.skip() {
            Some(Event::PhaseCompleted {
                from,
                to,
                skipped,
                session,
                ..
            }) => {
                assert_eq!(from, Phase::Work);
                assert_eq!(to, Phase::ShortBreak);
                assert!(skipped);
                assert_eq!(session.unwrap().minutes, 1);
            }
            other => panic!("Expected PhaseCompleted, got {other:?}"),
        }
        assert_eq!(engine.sessions_completed(), 1);
        assert_eq!(engine.today_stats().minutes, 1);
    }

    #[test]
    fn skip_break_returns_to_work() {
        let mut engine = engine();
        engine.start();
        engine.skip();
        assert_eq!(engine.phase(), Phase::ShortBreak);
        engine.skip();
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.time_remaining(), 1500);
        assert_eq!(engine.sessions_completed(), 1);
    }

    #[test]
    fn skip_keeps_paused_state() {
        let mut engine = engine();
        engine.start();
        engine.pause();
        engine.skip();
        assert_eq!(engine.phase(), Phase::ShortBreak);
        assert!(!engine.is_running());
    }

    #[test]
    fn skip_from_idle_is_noop() {
        let mut engine = engine();
        assert!(engine.skip().is_none());
        assert_eq!(engine.sessions_completed(), 0);
    }

    #[test]
    fn reset_keeps_counters() {
        let mut engine = engine();
        engine.start();
        engine.skip();
        engine.reset();
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.time_remaining(), 0);
        assert!(!engine.is_running());
        assert_eq!(engine.sessions_completed(), 1);
        assert_eq!(engine.today_stats().sessions_completed, 1);
    }

    #[test]
    fn sessions_logged_on_the_day_they_complete() {
        let today = Rc::new(Cell::new(day(1)));
        let source = {
            let today = Rc::clone(&today);
            move || today.get()
        };
        let mut engine = PomodoroEngine::new(tiny_config(), source);
        engine.start();
        run_until_phase_change(&mut engine);
        today.set(day(2));
        engine.skip();
        run_until_phase_change(&mut engine);

        assert_eq!(engine.stats_for(day(1)).sessions_completed, 1);
        assert_eq!(engine.stats_for(day(2)).sessions_completed, 1);
        assert_eq!(engine.today_stats().minutes, 2);
    }

    #[test]
    fn today_stats_default_to_zero() {
        let engine = engine();
        assert_eq!(engine.today_stats(), DailyStats::default());
    }

    #[test]
    fn with_log_resumes_cadence_from_today() {
        let mut log = DailyLog::new();
        for _ in 0..3 {
            log.record_session(day(1), 25);
        }
        log.record_session(day(2), 25);
        let mut engine = PomodoroEngine::with_log(tiny_config(), || day(1), log);
        assert_eq!(engine.sessions_completed(), 3);
        assert_eq!(engine.phase(), Phase::Idle);
        engine.start();
        engine.skip();
        assert_eq!(engine.phase(), Phase::LongBreak);
    }

    #[test]
    fn state_view_serializes() {
        let mut engine = engine();
        engine.start();
        let json = serde_json::to_value(engine.state()).unwrap();
        assert_eq!(json["phase"], "work");
        assert_eq!(json["time_remaining"], 1500);
        assert_eq!(json["is_running"], true);
    }
}
