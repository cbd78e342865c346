use clap::Subcommand;
use focusboard_core::{NotePatch, NotesStore};
use serde::Serialize;
use std::path::Path;

use super::{open_db, print_applied, print_json, CmdResult};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Create an empty note and make it active
    Add,
    /// List notes, most recently edited first
    List,
    /// Replace a note's content
    Update { id: String, content: String },
    /// Delete a note
    Delete { id: String },
    /// Make a note active
    Activate { id: String },
}

#[derive(Serialize)]
struct NoteSummary<'a> {
    id: &'a str,
    title: &'a str,
    active: bool,
    updated_at: chrono::DateTime<chrono::Utc>,
}

pub fn run(db: Option<&Path>, action: NoteAction) -> CmdResult {
    let db = open_db(db)?;
    let mut store = NotesStore::load(&db);

    match action {
        NoteAction::Add => {
            let note = store.add_note();
            store.save(&db);
            print_json(&note)?;
        }
        NoteAction::List => {
            let active = store.active_note_id();
            let summaries: Vec<NoteSummary> = store
                .notes_by_recent()
                .into_iter()
                .map(|n| NoteSummary {
                    id: &n.id,
                    title: n.title(),
                    active: active == Some(n.id.as_str()),
                    updated_at: n.updated_at,
                })
                .collect();
            print_json(&summaries)?;
        }
        NoteAction::Update { id, content } => {
            let applied = store.update_note(
                &id,
                NotePatch {
                    content: Some(content),
                },
            );
            store.save(&db);
            print_applied(applied)?;
        }
        NoteAction::Delete { id } => {
            let applied = store.delete_note(&id);
            store.save(&db);
            print_applied(applied)?;
        }
        NoteAction::Activate { id } => {
            store.set_active_note(Some(&id));
            store.save(&db);
            print_applied(store.active_note().is_some())?;
        }
    }
    Ok(())
}
