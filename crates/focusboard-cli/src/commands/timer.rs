use clap::Subcommand;
use focusboard_core::storage::{Config, Database};
use focusboard_core::{Event, PomodoroEngine};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::{open_db, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the focus timer in the foreground, printing one JSON event per line
    Run {
        /// Stop after this many credited work sessions
        #[arg(long)]
        sessions: Option<u32>,
        /// Tick interval in milliseconds
        #[arg(long, default_value = "1000", hide = true)]
        tick_ms: u64,
    },
    /// Print the timer state and today's stats
    Status,
}

pub fn run(db: Option<&Path>, action: TimerAction) -> CmdResult {
    let db = open_db(db)?;
    let config = Config::load()?.pomodoro()?;
    let mut engine = PomodoroEngine::load(&db, config, focusboard_core::SystemDate);

    match action {
        TimerAction::Run { sessions, tick_ms } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(drive(
                &db,
                &mut engine,
                sessions,
                Duration::from_millis(tick_ms.max(1)),
            ))?;
        }
        TimerAction::Status => {
            print_json(&serde_json::json!({
                "state": engine.state(),
                "today": engine.today_stats(),
            }))?;
        }
    }
    Ok(())
}

fn emit(event: &Event) -> CmdResult {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// Tick the engine until `limit` sessions are credited or Ctrl-C arrives.
async fn drive(
    db: &Database,
    engine: &mut PomodoroEngine,
    limit: Option<u32>,
    period: Duration,
) -> CmdResult {
    if let Some(event) = engine.start() {
        emit(&event)?;
    }

    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately.
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut credited = 0u32;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let Some(event) = engine.tick() else { continue };
                emit(&event)?;
                if let Event::PhaseCompleted { session: Some(session), .. } = &event {
                    engine.save(db);
                    credited += 1;
                    debug!(minutes = session.minutes, credited, "session credited");
                    if limit.is_some_and(|n| credited >= n) {
                        break;
                    }
                }
            }
            result = &mut ctrl_c => {
                result?;
                info!("interrupted");
                if let Some(event) = engine.reset() {
                    emit(&event)?;
                }
                break;
            }
        }
    }

    engine.save(db);
    Ok(())
}
