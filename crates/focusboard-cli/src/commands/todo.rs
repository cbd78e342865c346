use clap::Subcommand;
use focusboard_core::TodoStore;
use std::path::Path;

use super::{open_db, print_applied, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TodoAction {
    /// Add a todo
    Add { text: String },
    /// List todos
    List,
    /// Toggle completion
    Toggle { id: String },
    /// Delete a todo
    Delete { id: String },
    /// Remove all completed todos
    ClearCompleted,
}

pub fn run(db: Option<&Path>, action: TodoAction) -> CmdResult {
    let db = open_db(db)?;
    let mut store = TodoStore::load(&db);

    match action {
        TodoAction::Add { text } => {
            let todo = store.add_todo(&text)?;
            store.save(&db);
            print_json(&todo)?;
        }
        TodoAction::List => print_json(store.todos())?,
        TodoAction::Toggle { id } => {
            let applied = store.toggle_todo(&id);
            store.save(&db);
            print_applied(applied)?;
        }
        TodoAction::Delete { id } => {
            let applied = store.delete_todo(&id);
            store.save(&db);
            print_applied(applied)?;
        }
        TodoAction::ClearCompleted => {
            let removed = store.clear_completed();
            store.save(&db);
            print_json(&serde_json::json!({ "removed": removed }))?;
        }
    }
    Ok(())
}
