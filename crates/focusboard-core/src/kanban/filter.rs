//! Board filter.
//!
//! Each field is a predicate; empty fields are neutral and match every
//! task. Active predicates are ANDed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Priority, Task};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Case-insensitive substring of title or description. Trimmed.
    pub search_query: String,
    pub priorities: BTreeSet<Priority>,
    /// Matches when the task carries at least one of these label ids.
    pub labels: BTreeSet<String>,
    /// `None` = no filter, `Some(true)` = only AI tasks, `Some(false)` = no AI tasks.
    pub show_ai_generated: Option<bool>,
}

/// Partial filter update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPatch {
    pub search_query: Option<String>,
    pub priorities: Option<BTreeSet<Priority>>,
    pub labels: Option<BTreeSet<String>>,
    /// `Some(None)` turns the AI filter off.
    pub show_ai_generated: Option<Option<bool>>,
}

impl TaskFilter {
    pub fn is_neutral(&self) -> bool {
        self.search_query.trim().is_empty()
            && self.priorities.is_empty()
            && self.labels.is_empty()
            && self.show_ai_generated.is_none()
    }

    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(q) = patch.search_query {
            self.search_query = q;
        }
        if let Some(p) = patch.priorities {
            self.priorities = p;
        }
        if let Some(l) = patch.labels {
            self.labels = l;
        }
        if let Some(ai) = patch.show_ai_generated {
            self.show_ai_generated = ai;
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.matches_query(task)
            && (self.priorities.is_empty() || self.priorities.contains(&task.priority))
            && (self.labels.is_empty() || !self.labels.is_disjoint(&task.labels))
            && self
                .show_ai_generated
                .map_or(true, |ai| task.ai_generated == ai)
    }

    fn matches_query(&self, task: &Task) -> bool {
        let query = self.search_query.trim();
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        task.title.to_lowercase().contains(&query)
            || task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query))
    }
}
