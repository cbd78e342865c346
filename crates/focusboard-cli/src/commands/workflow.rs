use clap::Subcommand;
use focusboard_core::WorkflowProgress;
use std::path::Path;

use super::{open_db, print_json, CmdResult};

#[derive(Subcommand)]
pub enum WorkflowAction {
    /// Toggle a step between done and not done
    Toggle { step: String },
    /// List completed steps
    List,
    /// Forget all progress
    Reset,
}

pub fn run(db: Option<&Path>, action: WorkflowAction) -> CmdResult {
    let db = open_db(db)?;
    let mut progress = WorkflowProgress::load(&db);

    match action {
        WorkflowAction::Toggle { step } => {
            let done = progress.toggle_step(&step);
            progress.save(&db);
            print_json(&serde_json::json!({ "step": step.trim(), "completed": done }))?;
        }
        WorkflowAction::List => {
            let steps: Vec<&str> = progress.completed_steps().collect();
            print_json(&steps)?;
        }
        WorkflowAction::Reset => {
            progress.reset();
            progress.save(&db);
            print_json(&serde_json::json!({ "completed": 0 }))?;
        }
    }
    Ok(())
}
