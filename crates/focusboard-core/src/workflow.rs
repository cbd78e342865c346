//! Workflow progress: which onboarding/workflow steps the user has ticked.

use std::collections::BTreeSet;
use tracing::debug;

use crate::storage::{self, PersistenceGateway, StorageKey};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowProgress {
    completed: BTreeSet<String>,
}

impl WorkflowProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(gateway: &dyn PersistenceGateway) -> Self {
        Self {
            completed: storage::load_or_default(gateway, StorageKey::WorkflowProgress),
        }
    }

    /// Saved as a sorted list of step ids.
    pub fn save(&self, gateway: &dyn PersistenceGateway) {
        storage::save_logged(gateway, StorageKey::WorkflowProgress, &self.completed);
    }

    pub fn is_completed(&self, step_id: &str) -> bool {
        self.completed.contains(step_id)
    }

    pub fn completed_steps(&self) -> impl Iterator<Item = &str> {
        self.completed.iter().map(String::as_str)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Returns `false` if the step was already complete or the id is blank.
    pub fn complete_step(&mut self, step_id: &str) -> bool {
        let step_id = step_id.trim();
        if step_id.is_empty() {
            return false;
        }
        self.completed.insert(step_id.to_string())
    }

    pub fn uncomplete_step(&mut self, step_id: &str) -> bool {
        self.completed.remove(step_id.trim())
    }

    /// Flip a step and return its new completion state.
    pub fn toggle_step(&mut self, step_id: &str) -> bool {
        if self.uncomplete_step(step_id) {
            debug!(step_id, "step reopened");
            false
        } else {
            let done = self.complete_step(step_id);
            debug!(step_id, done, "step toggled");
            done
        }
    }

    pub fn reset(&mut self) {
        self.completed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_and_toggle() {
        let mut progress = WorkflowProgress::new();
        assert!(progress.complete_step("connect"));
        assert!(!progress.complete_step("connect"));
        assert!(progress.is_completed("connect"));

        assert!(!progress.toggle_step("connect"));
        assert!(!progress.is_completed("connect"));
        assert!(progress.toggle_step("connect"));
        assert_eq!(progress.completed_count(), 1);
    }

    #[test]
    fn blank_step_is_rejected() {
        let mut progress = WorkflowProgress::new();
        assert!(!progress.complete_step("  "));
        assert!(!progress.toggle_step(""));
        assert_eq!(progress.completed_count(), 0);
    }

    #[test]
    fn steps_iterate_sorted() {
        let mut progress = WorkflowProgress::new();
        progress.complete_step("b");
        progress.complete_step("a");
        assert_eq!(progress.completed_steps().collect::<Vec<_>>(), vec!["a", "b"]);
        progress.reset();
        assert_eq!(progress.completed_count(), 0);
    }
}
