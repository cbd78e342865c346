//! Kanban store: owns tasks, labels and the transient filter.
//!
//! Every applied mutation records the pre-mutation `{tasks, labels}`
//! snapshot so it can be undone. Rejected operations and operations on
//! unknown ids change nothing and record nothing.

use chrono::Utc;
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use super::{
    FilterPatch, KanbanSnapshot, Label, LabelPatch, NewTask, Subtask, Task, TaskFilter,
    TaskPatch, TaskStatus, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN,
};
use crate::error::{validate_text, ValidationError};
use crate::history::HistoryManager;
use crate::storage::{self, PersistenceGateway, StorageKey};

#[derive(Debug, Clone, Default)]
pub struct KanbanStore {
    state: KanbanSnapshot,
    filter: TaskFilter,
    history: HistoryManager<KanbanSnapshot>,
}

impl KanbanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(state: KanbanSnapshot) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Load the board from `gateway`; missing or corrupt state yields an
    /// empty board.
    pub fn load(gateway: &dyn PersistenceGateway) -> Self {
        Self::from_snapshot(storage::load_or_default(gateway, StorageKey::Kanban))
    }

    pub fn save(&self, gateway: &dyn PersistenceGateway) {
        storage::save_logged(gateway, StorageKey::Kanban, &self.state);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn labels(&self) -> &[Label] {
        &self.state.labels
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn snapshot(&self) -> KanbanSnapshot {
        self.state.clone()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.tasks.iter().find(|t| t.id == id)
    }

    pub fn label(&self, id: &str) -> Option<&Label> {
        self.state.labels.iter().find(|l| l.id == id)
    }

    /// Tasks of one column in display order.
    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        let mut column: Vec<&Task> = self
            .state
            .tasks
            .iter()
            .filter(|t| t.status == status)
            .collect();
        column.sort_by_key(|t| t.order);
        column
    }

    /// Tasks passing the current filter, in stored order.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.state
            .tasks
            .iter()
            .filter(|t| self.filter.matches(t))
            .collect()
    }

    // ── Filter ───────────────────────────────────────────────────────

    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.filter.merge(patch);
    }

    pub fn clear_filter(&mut self) {
        self.filter = TaskFilter::default();
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Create a task at the end of its status column.
    ///
    /// # Errors
    /// Returns a validation error for an empty or over-long title or an
    /// over-long description. Nothing is changed in that case.
    pub fn add_task(&mut self, new: NewTask) -> Result<Task, ValidationError> {
        let title = validate_text("title", &new.title, Some(MAX_TITLE_LEN))?;
        let description = normalize_description(new.description)?;
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            status: new.status,
            priority: new.priority,
            labels: new.labels,
            subtasks: new
                .subtasks
                .iter()
                .filter(|s| !s.trim().is_empty())
                .map(|s| new_subtask(s.trim()))
                .collect(),
            ai_generated: new.ai_generated,
            due_date: new.due_date,
            order: self.next_order(new.status),
            created_at: now,
            updated_at: now,
        };

        let mut next = self.state.clone();
        next.tasks.push(task.clone());
        self.commit(next);
        debug!(id = %task.id, status = %task.status, "task added");
        Ok(task)
    }

    /// Merge `patch` into the task. Moving to another status appends the
    /// task to the end of that column. Returns `Ok(false)` for an unknown id.
    ///
    /// # Errors
    /// Returns a validation error for an empty or over-long title or an
    /// over-long description.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<bool, ValidationError> {
        let Some(idx) = self.index_of(id) else {
            return Ok(false);
        };
        let title = patch
            .title
            .as_deref()
            .map(|t| validate_text("title", t, Some(MAX_TITLE_LEN)))
            .transpose()?;
        let description = patch.description.map(normalize_description).transpose()?;

        let mut task = self.state.tasks[idx].clone();
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = description {
            task.description = description;
        }
        if let Some(status) = patch.status {
            if status != task.status {
                task.order = self.next_order(status);
                task.status = status;
            }
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(labels) = patch.labels {
            task.labels = labels;
        }
        if let Some(ai) = patch.ai_generated {
            task.ai_generated = ai;
        }
        if let Some(due) = patch.due_date {
            task.due_date = due;
        }
        task.updated_at = Utc::now();

        self.replace_task(idx, task);
        debug!(id, "task updated");
        Ok(true)
    }

    /// Move a task to the end of another column.
    pub fn move_task(&mut self, id: &str, status: TaskStatus) -> bool {
        let patch = TaskPatch {
            status: Some(status),
            ..Default::default()
        };
        // A status-only patch never fails validation.
        self.update_task(id, patch).unwrap_or(false)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let mut next = self.state.clone();
        next.tasks.remove(idx);
        self.commit(next);
        debug!(id, "task deleted");
        true
    }

    /// Replace the order of the `status` column with `ordered_ids`.
    ///
    /// Ids that are unknown or belong to another column are ignored, and
    /// column tasks missing from `ordered_ids` keep their relative order
    /// after the listed ones. Other columns are untouched. Returns `false`
    /// if no position changed.
    pub fn reorder_tasks<I, S>(&mut self, status: TaskStatus, ordered_ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let column: Vec<&Task> = self.tasks_by_status(status);
        let in_column: HashSet<&str> = column.iter().map(|t| t.id.as_str()).collect();

        let mut seen = HashSet::new();
        let mut sequence: Vec<String> = Vec::with_capacity(column.len());
        for id in ordered_ids {
            let id = id.as_ref();
            if in_column.contains(id) && seen.insert(id.to_string()) {
                sequence.push(id.to_string());
            }
        }
        for task in &column {
            if !seen.contains(&task.id) {
                sequence.push(task.id.clone());
            }
        }

        let mut next = self.state.clone();
        let mut changed = false;
        for (position, id) in sequence.iter().enumerate() {
            let order = position as u32;
            if let Some(task) = next.tasks.iter_mut().find(|t| &t.id == id) {
                if task.order != order {
                    task.order = order;
                    changed = true;
                }
            }
        }
        if !changed {
            return false;
        }
        self.commit(next);
        debug!(%status, count = sequence.len(), "column reordered");
        true
    }

    // ── Subtasks ─────────────────────────────────────────────────────

    /// Append a subtask. Returns `Ok(None)` for an unknown task id.
    ///
    /// # Errors
    /// Returns a validation error for empty text.
    pub fn add_subtask(
        &mut self,
        task_id: &str,
        text: &str,
    ) -> Result<Option<Subtask>, ValidationError> {
        let Some(idx) = self.index_of(task_id) else {
            return Ok(None);
        };
        let text = validate_text("subtask", text, Some(MAX_TITLE_LEN))?;
        let subtask = new_subtask(&text);
        let mut task = self.state.tasks[idx].clone();
        task.subtasks.push(subtask.clone());
        task.updated_at = Utc::now();
        self.replace_task(idx, task);
        Ok(Some(subtask))
    }

    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> bool {
        self.edit_subtasks(task_id, |subtasks| {
            match subtasks.iter_mut().find(|s| s.id == subtask_id) {
                Some(s) => {
                    s.completed = !s.completed;
                    true
                }
                None => false,
            }
        })
    }

    pub fn delete_subtask(&mut self, task_id: &str, subtask_id: &str) -> bool {
        self.edit_subtasks(task_id, |subtasks| {
            let before = subtasks.len();
            subtasks.retain(|s| s.id != subtask_id);
            subtasks.len() != before
        })
    }

    // ── Labels ───────────────────────────────────────────────────────

    /// # Errors
    /// Returns a validation error for an empty name.
    pub fn add_label(&mut self, name: &str, color: &str) -> Result<Label, ValidationError> {
        let label = Label {
            id: Uuid::new_v4().to_string(),
            name: validate_text("name", name, None)?,
            color: color.trim().to_string(),
        };
        let mut next = self.state.clone();
        next.labels.push(label.clone());
        self.commit(next);
        debug!(id = %label.id, "label added");
        Ok(label)
    }

    /// # Errors
    /// Returns a validation error for an empty name.
    pub fn update_label(&mut self, id: &str, patch: LabelPatch) -> Result<bool, ValidationError> {
        let Some(idx) = self.state.labels.iter().position(|l| l.id == id) else {
            return Ok(false);
        };
        let mut label = self.state.labels[idx].clone();
        if let Some(name) = patch.name {
            label.name = validate_text("name", &name, None)?;
        }
        if let Some(color) = patch.color {
            label.color = color.trim().to_string();
        }
        let mut next = self.state.clone();
        next.labels[idx] = label;
        self.commit(next);
        Ok(true)
    }

    /// Remove a label and drop its id from every task.
    pub fn delete_label(&mut self, id: &str) -> bool {
        let Some(idx) = self.state.labels.iter().position(|l| l.id == id) else {
            return false;
        };
        let mut next = self.state.clone();
        next.labels.remove(idx);
        for task in next.tasks.iter_mut() {
            task.labels.remove(id);
        }
        self.commit(next);
        debug!(id, "label deleted");
        true
    }

    /// Labels of `task` that still exist, in board label order.
    pub fn labels_of(&self, task: &Task) -> Vec<&Label> {
        self.state
            .labels
            .iter()
            .filter(|l| task.labels.contains(&l.id))
            .collect()
    }

    // ── History ──────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.state.clone()) {
            Some(previous) => {
                self.state = previous;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.state.clone()) {
            Some(next) => {
                self.state = next;
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

    /// Replace the whole board and forget undo history.
    pub fn import(&mut self, snapshot: KanbanSnapshot) {
        self.state = snapshot;
        self.history.clear();
        debug!(tasks = self.state.tasks.len(), "board imported");
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn commit(&mut self, next: KanbanSnapshot) {
        let previous = std::mem::replace(&mut self.state, next);
        self.history.push(previous);
    }

    fn replace_task(&mut self, idx: usize, task: Task) {
        let mut next = self.state.clone();
        next.tasks[idx] = task;
        self.commit(next);
    }

    fn edit_subtasks<F>(&mut self, task_id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut Vec<Subtask>) -> bool,
    {
        let Some(idx) = self.index_of(task_id) else {
            return false;
        };
        let mut task = self.state.tasks[idx].clone();
        if !edit(&mut task.subtasks) {
            return false;
        }
        task.updated_at = Utc::now();
        self.replace_task(idx, task);
        true
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.state.tasks.iter().position(|t| t.id == id)
    }

    fn next_order(&self, status: TaskStatus) -> u32 {
        self.state
            .tasks
            .iter()
            .filter(|t| t.status == status)
            .map(|t| t.order.saturating_add(1))
            .max()
            .unwrap_or(0)
    }
}

fn new_subtask(text: &str) -> Subtask {
    Subtask {
        id: Uuid::new_v4().to_string(),
        text: text.to_string(),
        completed: false,
    }
}

/// Trim a description; blank becomes `None`.
fn normalize_description(value: Option<String>) -> Result<Option<String>, ValidationError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(d) => validate_text("description", d, Some(MAX_DESCRIPTION_LEN)).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kanban::Priority;

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    fn board() -> KanbanStore {
        let mut store = KanbanStore::new();
        for (title, status) in [
            ("a", TaskStatus::Todo),
            ("b", TaskStatus::Todo),
            ("c", TaskStatus::InProgress),
            ("d", TaskStatus::Todo),
            ("e", TaskStatus::Complete),
        ] {
            store.add_task(NewTask::new(title).status(status)).unwrap();
        }
        store
    }

    fn id_of(store: &KanbanStore, title: &str) -> String {
        store
            .tasks()
            .iter()
            .find(|t| t.title == title)
            .map(|t| t.id.clone())
            .unwrap()
    }

    #[test]
    fn add_task_appends_to_column() {
        let store = board();
        let todo = store.tasks_by_status(TaskStatus::Todo);
        assert_eq!(titles(&todo), vec!["a", "b", "d"]);
        assert_eq!(
            todo.iter().map(|t| t.order).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(store.tasks_by_status(TaskStatus::InProgress)[0].order, 0);
    }

    #[test]
    fn add_task_rejects_blank_title() {
        let mut store = KanbanStore::new();
        assert!(store.add_task(NewTask::new("   ")).is_err());
        assert!(store.tasks().is_empty());
        assert!(!store.can_undo());
    }

    #[test]
    fn add_task_rejects_long_title() {
        let mut store = KanbanStore::new();
        let err = store.add_task(NewTask::new("x".repeat(101))).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 100, .. }));
        assert!(store.add_task(NewTask::new("x".repeat(100))).is_ok());
    }

    #[test]
    fn add_task_rejects_long_description() {
        let mut store = KanbanStore::new();
        let new = NewTask::new("ok").description("d".repeat(501));
        assert!(store.add_task(new).is_err());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn add_task_defaults() {
        let mut store = KanbanStore::new();
        let task = store.add_task(NewTask::new("  Fix bug  ")).unwrap();
        assert_eq!(task.title, "Fix bug");
        assert_eq!(task.status, TaskStatus::Todo);
        assert!(task.subtasks.is_empty());
        assert!(task.description.is_none());
    }

    #[test]
    fn add_task_with_initial_subtasks() {
        let mut store = KanbanStore::new();
        let mut new = NewTask::new("Ship");
        new.subtasks = vec!["build".into(), " ".into(), "test".into()];
        let task = store.add_task(new).unwrap();
        let texts: Vec<_> = task.subtasks.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["build", "test"]);
    }

    #[test]
    fn update_task_merges_patch() {
        let mut store = board();
        let id = id_of(&store, "a");
        let applied = store
            .update_task(
                &id,
                TaskPatch {
                    title: Some("A!".into()),
                    priority: Some(Priority::P0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(applied);
        let task = store.task(&id).unwrap();
        assert_eq!(task.title, "A!");
        assert_eq!(task.priority, Priority::P0);
        assert_eq!(task.status, TaskStatus::Todo);
    }

    #[test]
    fn update_missing_id_is_noop() {
        let mut store = board();
        let before = store.snapshot();
        assert_eq!(store.update_task("nope", TaskPatch::default()), Ok(false));
        assert_eq!(store.snapshot(), before);
        assert!(!store.delete_task("nope"));
        assert!(!store.toggle_subtask("nope", "x"));
        assert_eq!(store.add_subtask("nope", "x"), Ok(None));
    }

    #[test]
    fn update_with_blank_title_is_rejected() {
        let mut store = board();
        let id = id_of(&store, "a");
        let before = store.snapshot();
        assert!(store
            .update_task(
                &id,
                TaskPatch {
                    title: Some(" ".into()),
                    ..Default::default()
                }
            )
            .is_err());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn status_change_appends_to_new_column() {
        let mut store = board();
        let id = id_of(&store, "a");
        assert!(store.move_task(&id, TaskStatus::InProgress));
        let column = store.tasks_by_status(TaskStatus::InProgress);
        assert_eq!(titles(&column), vec!["c", "a"]);
    }

    #[test]
    fn delete_task_removes_it() {
        let mut store = board();
        let id = id_of(&store, "b");
        assert!(store.delete_task(&id));
        assert!(store.task(&id).is_none());
        assert!(!store.delete_task(&id));
    }

    #[test]
    fn reorder_only_touches_target_column() {
        let mut store = board();
        store.move_task(&id_of(&store, "e"), TaskStatus::InProgress);
        let todo_before = titles(&store.tasks_by_status(TaskStatus::Todo));

        let order = vec![id_of(&store, "e"), id_of(&store, "c")];
        assert!(store.reorder_tasks(TaskStatus::InProgress, &order));

        assert_eq!(
            titles(&store.tasks_by_status(TaskStatus::InProgress)),
            vec!["e", "c"]
        );
        assert_eq!(titles(&store.tasks_by_status(TaskStatus::Todo)), todo_before);
    }

    #[test]
    fn reorder_ignores_foreign_ids_and_keeps_unlisted() {
        let mut store = board();
        let order = vec![
            id_of(&store, "d"),
            id_of(&store, "c"),
            "ghost".to_string(),
        ];
        assert!(store.reorder_tasks(TaskStatus::Todo, &order));
        assert_eq!(
            titles(&store.tasks_by_status(TaskStatus::Todo)),
            vec!["d", "a", "b"]
        );
        assert_eq!(store.task(&id_of(&store, "c")).unwrap().status, TaskStatus::InProgress);
    }

    #[test]
    fn reorder_without_change_records_nothing() {
        let mut store = KanbanStore::new();
        let a = store.add_task(NewTask::new("a")).unwrap();
        let b = store.add_task(NewTask::new("b")).unwrap();
        store.import(store.snapshot());
        assert!(!store.reorder_tasks(TaskStatus::Todo, [a.id.as_str(), b.id.as_str()]));
        assert!(!store.can_undo());
    }

    #[test]
    fn filtered_tasks_scenario() {
        let mut store = KanbanStore::new();
        store
            .add_task(NewTask::new("Fix bug").priority(Priority::P1))
            .unwrap();

        store.set_filter(FilterPatch {
            priorities: Some([Priority::P1].into_iter().collect()),
            ..Default::default()
        });
        assert_eq!(titles(&store.filtered_tasks()), vec!["Fix bug"]);

        store.set_filter(FilterPatch {
            priorities: Some([Priority::P0].into_iter().collect()),
            ..Default::default()
        });
        assert!(store.filtered_tasks().is_empty());

        store.clear_filter();
        assert_eq!(store.filtered_tasks().len(), 1);
    }

    #[test]
    fn subtask_lifecycle() {
        let mut store = board();
        let id = id_of(&store, "a");
        let sub = store.add_subtask(&id, "write test").unwrap().unwrap();
        assert!(store.toggle_subtask(&id, &sub.id));
        assert_eq!(store.task(&id).unwrap().completed_subtasks(), 1);
        assert!(!store.toggle_subtask(&id, "missing"));
        assert!(store.delete_subtask(&id, &sub.id));
        assert!(store.task(&id).unwrap().subtasks.is_empty());
        assert!(!store.delete_subtask(&id, &sub.id));
    }

    #[test]
    fn add_subtask_rejects_blank() {
        let mut store = board();
        let id = id_of(&store, "a");
        assert!(store.add_subtask(&id, "  ").is_err());
    }

    #[test]
    fn delete_label_strips_task_references() {
        let mut store = KanbanStore::new();
        let bug = store.add_label("bug", "#f00").unwrap();
        let ui = store.add_label("ui", "#0f0").unwrap();
        let task = store
            .add_task(NewTask::new("x").label(&bug.id).label(&ui.id))
            .unwrap();

        assert!(store.delete_label(&bug.id));
        let labels = &store.task(&task.id).unwrap().labels;
        assert!(!labels.contains(&bug.id));
        assert!(labels.contains(&ui.id));
        assert!(!store.delete_label(&bug.id));
    }

    #[test]
    fn dangling_label_ids_are_tolerated() {
        let mut store = KanbanStore::new();
        let ui = store.add_label("ui", "#0f0").unwrap();
        let task = store
            .add_task(NewTask::new("x").label("gone").label(&ui.id))
            .unwrap();
        let names: Vec<_> = store.labels_of(&task).iter().map(|l| l.name.clone()).collect();
        assert_eq!(names, vec!["ui"]);
    }

    #[test]
    fn update_label() {
        let mut store = KanbanStore::new();
        let label = store.add_label("bug", "#f00").unwrap();
        let patch = LabelPatch {
            color: Some("#00f".into()),
            ..Default::default()
        };
        assert_eq!(store.update_label(&label.id, patch), Ok(true));
        assert_eq!(store.label(&label.id).unwrap().color, "#00f");
        assert_eq!(store.update_label("nope", LabelPatch::default()), Ok(false));
    }

    #[test]
    fn undo_redo_every_mutation_kind() {
        let mut store = KanbanStore::new();
        let initial = store.snapshot();

        let task = store.add_task(NewTask::new("a")).unwrap();
        store.add_task(NewTask::new("b")).unwrap();
        let sub = store.add_subtask(&task.id, "s").unwrap().unwrap();
        store.toggle_subtask(&task.id, &sub.id);
        store.move_task(&task.id, TaskStatus::Complete);
        let label = store.add_label("l", "#fff").unwrap();
        store.delete_label(&label.id);
        store.delete_task(&task.id);
        let after = store.snapshot();

        let mut steps = 0;
        while store.undo() {
            steps += 1;
        }
        assert_eq!(steps, 8);
        assert_eq!(store.snapshot(), initial);

        for _ in 0..steps {
            assert!(store.redo());
        }
        assert_eq!(store.snapshot(), after);
        assert!(!store.redo());
    }

    #[test]
    fn new_mutation_discards_redo() {
        let mut store = KanbanStore::new();
        store.add_task(NewTask::new("a")).unwrap();
        store.undo();
        assert!(store.can_redo());
        store.add_task(NewTask::new("b")).unwrap();
        assert!(!store.can_redo());
    }

    #[test]
    fn import_replaces_state_and_clears_history() {
        let mut store = board();
        assert!(store.can_undo());
        store.import(KanbanSnapshot::default());
        assert!(store.tasks().is_empty());
        assert!(!store.can_undo());
        assert!(!store.undo());
    }

    #[test]
    fn filter_is_not_part_of_history() {
        let mut store = board();
        store.set_filter(FilterPatch {
            search_query: Some("a".into()),
            ..Default::default()
        });
        store.undo();
        assert_eq!(store.filter().search_query, "a");
    }
}
