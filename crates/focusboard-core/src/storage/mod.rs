//! Persistence gateway contract and its SQLite implementation.
//!
//! Every store persists one plain JSON snapshot under its own
//! [`StorageKey`]. Loads fall back to the default state when the key is
//! absent, unreadable or corrupt; saves overwrite the whole value and never
//! report failure to the caller.

mod config;
pub mod database;

pub use config::{Config, TimerConfig};
pub use database::Database;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::StorageError;

/// Logical keys, one per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Kanban,
    Todos,
    Notes,
    WorkflowProgress,
    PomodoroLog,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Kanban => "kanban",
            StorageKey::Todos => "todos",
            StorageKey::Notes => "notes",
            StorageKey::WorkflowProgress => "workflow_progress",
            StorageKey::PomodoroLog => "pomodoro_log",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value persistence used by every store and the timer engine.
pub trait PersistenceGateway {
    /// Previously saved payload for `key`, or `None` if never saved.
    fn load_raw(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Overwrite the payload stored under `key`.
    fn save_raw(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;
}

/// Load and decode `key`, falling back to `T::default()` on any failure.
pub fn load_or_default<T>(gateway: &dyn PersistenceGateway, key: StorageKey) -> T
where
    T: DeserializeOwned + Default,
{
    load(gateway, key).unwrap_or_default()
}

/// Load and decode `key`. Absent, unreadable and corrupt payloads all
/// yield `None`; the latter two are logged.
pub fn load<T>(gateway: &dyn PersistenceGateway, key: StorageKey) -> Option<T>
where
    T: DeserializeOwned,
{
    let raw = match gateway.load_raw(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(%key, "no saved state");
            return None;
        }
        Err(e) => {
            warn!(%key, error = %e, "failed to load state, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(%key, error = %e, "corrupt saved state, using defaults");
            None
        }
    }
}

/// Encode and save `value` under `key`. Failures are logged, not returned.
pub fn save_logged<T>(gateway: &dyn PersistenceGateway, key: StorageKey, value: &T)
where
    T: Serialize + ?Sized,
{
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!(%key, error = %e, "failed to encode state");
            return;
        }
    };
    match gateway.save_raw(key, &json) {
        Ok(()) => debug!(%key, bytes = json.len(), "saved state"),
        Err(e) => warn!(%key, error = %e, "failed to save state"),
    }
}

/// Returns `~/.config/focusboard[-dev]/` based on FOCUSBOARD_ENV.
///
/// Set FOCUSBOARD_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSBOARD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusboard-dev")
    } else {
        base_dir.join("focusboard")
    };

    std::fs::create_dir_all(&dir).map_err(StorageError::DataDir)?;
    Ok(dir)
}
