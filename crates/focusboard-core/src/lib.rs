//! # FocusBoard Core Library
//!
//! This library holds the application state of FocusBoard: a kanban board,
//! a quick todo list, a notes area and a focus-session timer. It is
//! rendering-agnostic; the CLI binary (and any other front end) is a thin
//! layer that loads the stores, applies one operation and saves them.
//!
//! ## Architecture
//!
//! - **History**: generic bounded undo/redo stack of whole-state snapshots
//! - **Stores**: [`KanbanStore`], [`TodoStore`], [`NotesStore`] and
//!   [`WorkflowProgress`], each the sole owner of its collection
//! - **Timer**: [`PomodoroEngine`], a tick-driven focus/break state machine
//!   with per-day statistics
//! - **Storage**: [`PersistenceGateway`] key-value contract, implemented by
//!   the SQLite-backed [`Database`], and TOML-based [`Config`]
//!
//! Operations on unknown ids are silent no-ops; rejected input returns a
//! [`ValidationError`] and leaves state untouched.

pub mod error;
pub mod events;
pub mod history;
pub mod kanban;
pub mod notes;
pub mod storage;
pub mod timer;
pub mod todo;
pub mod workflow;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::{CompletedSession, Event};
pub use history::{HistoryManager, MAX_HISTORY};
pub use kanban::{
    FilterPatch, KanbanSnapshot, KanbanStore, Label, LabelPatch, NewTask, Priority, Subtask, Task,
    TaskFilter, TaskPatch, TaskStatus,
};
pub use notes::{Note, NotePatch, NotesStore};
pub use storage::{Config, Database, PersistenceGateway, StorageKey};
pub use timer::{
    DailyLog, DailyStats, DateKey, DateSource, Phase, PomodoroConfig, PomodoroEngine,
    PomodoroState, SystemDate, LONG_BREAK_EVERY, LONG_BREAK_SECS, SHORT_BREAK_SECS,
    WORK_DURATION_SECS,
};
pub use todo::{Todo, TodoStore};
pub use workflow::WorkflowProgress;
