//! Notes area: free-text notes plus the id of the one being edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::storage::{self, PersistenceGateway, StorageKey};

/// Title shown for a note without any text.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// First non-blank line of the content.
    pub fn title(&self) -> &str {
        self.content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or(UNTITLED)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    pub content: Option<String>,
}

/// Persisted payload of the notes store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesSnapshot {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub active_note_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NotesStore {
    notes: Vec<Note>,
    /// Not validated against `notes`; a dangling id selects nothing.
    active_note_id: Option<String>,
}

impl NotesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(gateway: &dyn PersistenceGateway) -> Self {
        let snap: NotesSnapshot = storage::load_or_default(gateway, StorageKey::Notes);
        Self {
            notes: snap.notes,
            active_note_id: snap.active_note_id,
        }
    }

    pub fn save(&self, gateway: &dyn PersistenceGateway) {
        storage::save_logged(gateway, StorageKey::Notes, &self.snapshot());
    }

    pub fn snapshot(&self) -> NotesSnapshot {
        NotesSnapshot {
            notes: self.notes.clone(),
            active_note_id: self.active_note_id.clone(),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn active_note_id(&self) -> Option<&str> {
        self.active_note_id.as_deref()
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.active_note_id.as_deref().and_then(|id| self.get(id))
    }

    /// Most recently edited first.
    pub fn notes_by_recent(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.iter().collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        notes
    }

    /// Create an empty note and make it active.
    pub fn add_note(&mut self) -> Note {
        let note = Note {
            id: Uuid::new_v4().to_string(),
            content: String::new(),
            updated_at: Utc::now(),
        };
        self.notes.push(note.clone());
        self.active_note_id = Some(note.id.clone());
        debug!(id = %note.id, "note added");
        note
    }

    pub fn update_note(&mut self, id: &str, patch: NotePatch) -> bool {
        let Some(idx) = self.notes.iter().position(|n| n.id == id) else {
            return false;
        };
        let mut note = self.notes[idx].clone();
        if let Some(content) = patch.content {
            note.content = content;
        }
        note.updated_at = Utc::now();
        self.notes[idx] = note;
        true
    }

    /// Remove a note. If it was active, nothing is active afterwards.
    pub fn delete_note(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            return false;
        }
        if self.active_note_id.as_deref() == Some(id) {
            self.active_note_id = None;
        }
        debug!(id, "note deleted");
        true
    }

    pub fn set_active_note(&mut self, id: Option<&str>) {
        self.active_note_id = id.map(str::to_string);
    }
}
