pub mod config;
pub mod label;
pub mod note;
pub mod stats;
pub mod task;
pub mod timer;
pub mod todo;
pub mod workflow;

use focusboard_core::storage::Database;
use serde::Serialize;
use std::path::Path;

pub type CmdResult = focusboard_core::error::Result<()>;

/// Open the database at `path`, or the default location.
pub fn open_db(path: Option<&Path>) -> Result<Database, focusboard_core::StorageError> {
    match path {
        Some(path) => Database::open(path),
        None => Database::open_default(),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report whether an id-addressed operation found its target.
pub fn print_applied(applied: bool) -> CmdResult {
    if !applied {
        eprintln!("nothing changed (unknown id?)");
    }
    print_json(&serde_json::json!({ "applied": applied }))
}
