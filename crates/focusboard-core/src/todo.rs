//! Flat quick-task list with its own undo history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{validate_text, ValidationError};
use crate::history::HistoryManager;
use crate::storage::{self, PersistenceGateway, StorageKey};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct TodoStore {
    todos: Vec<Todo>,
    history: HistoryManager<Vec<Todo>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos,
            ..Self::default()
        }
    }

    pub fn load(gateway: &dyn PersistenceGateway) -> Self {
        Self::from_todos(storage::load_or_default(gateway, StorageKey::Todos))
    }

    pub fn save(&self, gateway: &dyn PersistenceGateway) {
        storage::save_logged(gateway, StorageKey::Todos, &self.todos);
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.len() - self.active_count()
    }

    /// # Errors
    /// Returns a validation error for empty or whitespace-only text.
    pub fn add_todo(&mut self, text: &str) -> Result<Todo, ValidationError> {
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            text: validate_text("text", text, None)?,
            completed: false,
            created_at: Utc::now(),
        };
        let mut next = self.todos.clone();
        next.push(todo.clone());
        self.commit(next);
        debug!(id = %todo.id, "todo added");
        Ok(todo)
    }

    pub fn toggle_todo(&mut self, id: &str) -> bool {
        let Some(idx) = self.todos.iter().position(|t| t.id == id) else {
            return false;
        };
        let mut next = self.todos.clone();
        next[idx].completed = !next[idx].completed;
        self.commit(next);
        true
    }

    pub fn delete_todo(&mut self, id: &str) -> bool {
        let Some(idx) = self.todos.iter().position(|t| t.id == id) else {
            return false;
        };
        let mut next = self.todos.clone();
        next.remove(idx);
        self.commit(next);
        debug!(id, "todo deleted");
        true
    }

    /// Remove every completed todo as one undoable step.
    /// Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let removed = self.completed_count();
        if removed == 0 {
            return 0;
        }
        let next = self.todos.iter().filter(|t| !t.completed).cloned().collect();
        self.commit(next);
        debug!(removed, "completed todos cleared");
        removed
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.todos.clone()) {
            Some(previous) => {
                self.todos = previous;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.todos.clone()) {
            Some(next) => {
                self.todos = next;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn commit(&mut self, next: Vec<Todo>) {
        let previous = std::mem::replace(&mut self.todos, next);
        self.history.push(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_empty() {
        let mut store = TodoStore::new();
        assert!(store.add_todo("").is_err());
        assert!(store.add_todo("  \t").is_err());
        assert!(store.todos().is_empty());
        assert!(!store.can_undo());
    }

    #[test]
    fn add_appends_uncompleted() {
        let mut store = TodoStore::new();
        let todo = store.add_todo("buy milk").unwrap();
        assert_eq!(store.todos().len(), 1);
        assert!(!todo.completed);
        assert_eq!(todo.text, "buy milk");
    }

    #[test]
    fn toggle_and_delete() {
        let mut store = TodoStore::new();
        let todo = store.add_todo("a").unwrap();
        assert!(store.toggle_todo(&todo.id));
        assert!(store.get(&todo.id).unwrap().completed);
        assert!(store.toggle_todo(&todo.id));
        assert!(!store.get(&todo.id).unwrap().completed);
        assert!(store.delete_todo(&todo.id));
        assert!(!store.delete_todo(&todo.id));
        assert!(!store.toggle_todo(&todo.id));
    }

    #[test]
    fn clear_completed_is_single_step() {
        let mut store = TodoStore::new();
        let a = store.add_todo("a").unwrap();
        store.add_todo("b").unwrap();
        let c = store.add_todo("c").unwrap();
        store.toggle_todo(&a.id);
        store.toggle_todo(&c.id);

        assert_eq!(store.clear_completed(), 2);
        assert_eq!(store.todos().len(), 1);
        assert_eq!(store.active_count(), 1);

        assert!(store.undo());
        assert_eq!(store.todos().len(), 3);
        assert_eq!(store.completed_count(), 2);
    }

    #[test]
    fn clear_completed_noop_records_nothing() {
        let mut store = TodoStore::new();
        store.add_todo("a").unwrap();
        store.undo();
        assert!(store.can_redo());
        assert_eq!(store.clear_completed(), 0);
        assert!(store.can_redo());
    }

    #[test]
    fn undo_redo_roundtrip() {
        let mut store = TodoStore::new();
        let a = store.add_todo("a").unwrap();
        store.toggle_todo(&a.id);
        store.delete_todo(&a.id);
        let after = store.todos().to_vec();

        while store.undo() {}
        assert!(store.todos().is_empty());
        while store.redo() {}
        assert_eq!(store.todos(), after.as_slice());
    }
}
