use clap::Subcommand;
use focusboard_core::{KanbanStore, LabelPatch};
use std::path::Path;

use super::{open_db, print_applied, print_json, CmdResult};

#[derive(Subcommand)]
pub enum LabelAction {
    /// Create a label
    Add {
        name: String,
        #[arg(long, default_value = "#3b82f6")]
        color: String,
    },
    /// List labels
    List,
    /// Rename or recolor a label
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a label and remove it from all tasks
    Delete { id: String },
}

pub fn run(db: Option<&Path>, action: LabelAction) -> CmdResult {
    let db = open_db(db)?;
    let mut store = KanbanStore::load(&db);

    match action {
        LabelAction::Add { name, color } => {
            let label = store.add_label(&name, &color)?;
            store.save(&db);
            print_json(&label)?;
        }
        LabelAction::List => print_json(store.labels())?,
        LabelAction::Update { id, name, color } => {
            let applied = store.update_label(&id, LabelPatch { name, color })?;
            store.save(&db);
            print_applied(applied)?;
        }
        LabelAction::Delete { id } => {
            let applied = store.delete_label(&id);
            store.save(&db);
            print_applied(applied)?;
        }
    }
    Ok(())
}
