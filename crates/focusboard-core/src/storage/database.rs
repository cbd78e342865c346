//! SQLite-backed key-value store.
//!
//! Implements [`PersistenceGateway`] over a single `kv` table. Each logical
//! key holds one JSON document that is replaced wholesale on save.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::info;

use super::{data_dir, PersistenceGateway, StorageKey};
use crate::error::StorageError;

/// SQLite database holding the saved state of every store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/focusboard/focusboard.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created or the
    /// database cannot be opened or migrated.
    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(&data_dir()?.join("focusboard.db"))
    }

    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        info!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at)
             VALUES (?1, ?2, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }
}

impl PersistenceGateway for Database {
    fn load_raw(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        self.kv_get(key.as_str())
    }

    fn save_raw(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.kv_set(key.as_str(), value)
    }
}
