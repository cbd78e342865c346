use clap::Subcommand;
use focusboard_core::{DailyLog, DateKey, DateSource, PomodoroEngine, SystemDate};
use serde::Serialize;
use std::path::Path;

use super::{open_db, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's focus minutes and completed sessions
    Today,
    /// Every recorded day, oldest first
    Log,
}

#[derive(Serialize)]
struct DayRow {
    date: DateKey,
    sessions_completed: u32,
    minutes: u32,
}

fn rows(log: &DailyLog) -> Vec<DayRow> {
    log.iter()
        .map(|(date, stats)| DayRow {
            date: *date,
            sessions_completed: stats.sessions_completed,
            minutes: stats.minutes,
        })
        .collect()
}

pub fn run(db: Option<&Path>, action: StatsAction) -> CmdResult {
    let db = open_db(db)?;
    // Stats do not depend on durations, so the config file is not read.
    let engine = PomodoroEngine::load(&db, Default::default(), SystemDate);

    match action {
        StatsAction::Today => {
            let today = engine.today_stats();
            print_json(&DayRow {
                date: SystemDate.today(),
                sessions_completed: today.sessions_completed,
                minutes: today.minutes,
            })?;
        }
        StatsAction::Log => print_json(&rows(engine.daily_log()))?,
    }
    Ok(())
}
