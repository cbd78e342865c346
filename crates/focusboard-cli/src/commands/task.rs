use clap::Subcommand;
use focusboard_core::{
    FilterPatch, KanbanStore, NewTask, Priority, Task, TaskPatch, TaskStatus,
};
use std::collections::BTreeSet;
use std::path::Path;

use super::{open_db, print_applied, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task at the end of its column
    Add {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// todo, in_progress or complete
        #[arg(long, default_value = "todo")]
        status: TaskStatus,
        /// p0 (most urgent) .. p3
        #[arg(long, default_value = "p2")]
        priority: Priority,
        /// Label id (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,
        /// Initial subtask (repeatable)
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
        /// Mark the task as AI generated
        #[arg(long)]
        ai: bool,
    },
    /// List tasks matching a filter, by column and position
    List {
        /// Only this column
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Case-insensitive text in title or description
        #[arg(long)]
        search: Option<String>,
        /// Priority filter (repeatable)
        #[arg(long = "priority")]
        priorities: Vec<Priority>,
        /// Label id filter (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,
        /// true = only AI tasks, false = hide AI tasks
        #[arg(long)]
        ai: Option<bool>,
    },
    /// Update task fields
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        ai: Option<bool>,
    },
    /// Move a task to the end of another column
    Move { id: String, status: TaskStatus },
    /// Delete a task
    Delete { id: String },
    /// Set the order of one column
    Reorder {
        status: TaskStatus,
        /// Task ids in their new order
        ids: Vec<String>,
    },
    /// Add a subtask
    SubtaskAdd { task_id: String, text: String },
    /// Toggle a subtask
    SubtaskToggle { task_id: String, subtask_id: String },
    /// Delete a subtask
    SubtaskDelete { task_id: String, subtask_id: String },
}

pub fn run(db: Option<&Path>, action: TaskAction) -> CmdResult {
    let db = open_db(db)?;
    let mut store = KanbanStore::load(&db);

    match action {
        TaskAction::Add {
            title,
            description,
            status,
            priority,
            labels,
            subtasks,
            ai,
        } => {
            let new = NewTask {
                title,
                description,
                status,
                priority,
                labels: labels.into_iter().collect(),
                subtasks,
                ai_generated: ai,
                due_date: None,
            };
            let task = store.add_task(new)?;
            store.save(&db);
            print_json(&task)?;
        }
        TaskAction::List {
            status,
            search,
            priorities,
            labels,
            ai,
        } => {
            store.set_filter(FilterPatch {
                search_query: search,
                priorities: Some(priorities.into_iter().collect::<BTreeSet<_>>()),
                labels: Some(labels.into_iter().collect()),
                show_ai_generated: Some(ai),
            });
            let mut tasks: Vec<&Task> = store
                .filtered_tasks()
                .into_iter()
                .filter(|t| status.map_or(true, |s| t.status == s))
                .collect();
            tasks.sort_by_key(|t| (t.status, t.order));
            print_json(&tasks)?;
        }
        TaskAction::Update {
            id,
            title,
            description,
            priority,
            ai,
        } => {
            let patch = TaskPatch {
                title,
                description: description.map(Some),
                priority,
                ai_generated: ai,
                ..Default::default()
            };
            let applied = store.update_task(&id, patch)?;
            store.save(&db);
            print_applied(applied)?;
        }
        TaskAction::Move { id, status } => {
            let applied = store.move_task(&id, status);
            store.save(&db);
            print_applied(applied)?;
        }
        TaskAction::Delete { id } => {
            let applied = store.delete_task(&id);
            store.save(&db);
            print_applied(applied)?;
        }
        TaskAction::Reorder { status, ids } => {
            store.reorder_tasks(status, &ids);
            store.save(&db);
            print_json(&store.tasks_by_status(status))?;
        }
        TaskAction::SubtaskAdd { task_id, text } => {
            let subtask = store.add_subtask(&task_id, &text)?;
            store.save(&db);
            match subtask {
                Some(subtask) => print_json(&subtask)?,
                None => print_applied(false)?,
            }
        }
        TaskAction::SubtaskToggle {
            task_id,
            subtask_id,
        } => {
            let applied = store.toggle_subtask(&task_id, &subtask_id);
            store.save(&db);
            print_applied(applied)?;
        }
        TaskAction::SubtaskDelete {
            task_id,
            subtask_id,
        } => {
            let applied = store.delete_subtask(&task_id, &subtask_id);
            store.save(&db);
            print_applied(applied)?;
        }
    }
    Ok(())
}
