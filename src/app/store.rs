// In-memory state of the task list.
// Every mutation swaps in a freshly built sequence, so snapshots handed out
// earlier keep describing the state at the time they were taken.
use std::rc::Rc;

use chrono::{DateTime, Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, info};

use crate::app::models::{Filter, Priority, Task, TaskId};

// Format accepted by the deadline field
pub const DEADLINE_INPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Deadline should be in format YYYY-MM-DD, got '{0}'")]
    InvalidDeadline(String),
}

// Transient fields of the add-task form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    pub deadline: String,
    pub priority: Priority,
}

impl Draft {
    // Empty input means "no deadline"
    pub fn parsed_deadline(&self) -> Result<Option<NaiveDate>, DraftError> {
        let raw = self.deadline.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, DEADLINE_INPUT_FORMAT)
            .map(Some)
            .map_err(|_| DraftError::InvalidDeadline(raw.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Rc<[Task]>,
    draft: Draft,
    filter: Filter,
}

impl Default for TaskStore {
    fn default() -> Self {
        TaskStore::init()
    }
}

impl TaskStore {
    // Empty list, default form, "all" filter
    pub fn init() -> TaskStore {
        TaskStore {
            tasks: Rc::from(Vec::new()),
            draft: Draft::default(),
            filter: Filter::default(),
        }
    }

    pub fn snapshot(&self) -> Rc<[Task]> {
        Rc::clone(&self.tasks)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    // Incomplete tasks across the whole list, regardless of the filter
    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        if self.filter != filter {
            debug!(from = ?self.filter, to = ?filter, "filter changed");
        }
        self.filter = filter;
    }

    // Create a task and put it in front of the list.
    // Blank text is ignored and leaves the form as it is.
    pub fn add_task(
        &mut self,
        text: &str,
        deadline: Option<NaiveDate>,
        priority: Priority,
        now: DateTime<Local>,
    ) -> Option<TaskId> {
        if text.trim().is_empty() {
            debug!("ignoring task with blank text");
            return None;
        }

        let task = Task {
            id: TaskId::generate(),
            text: text.to_string(),
            completed: false,
            deadline,
            priority,
            created_at: now,
        };
        let id = task.id;
        info!(%id, priority = ?priority, deadline = ?deadline, "task added");

        self.tasks = std::iter::once(task)
            .chain(self.tasks.iter().cloned())
            .collect();
        self.draft = Draft::default();
        Some(id)
    }

    // The "Add" action: builds a task out of the form fields
    pub fn submit_draft(&mut self, now: DateTime<Local>) -> Result<Option<TaskId>, DraftError> {
        if self.draft.text.trim().is_empty() {
            debug!("ignoring submit of a blank form");
            return Ok(None);
        }

        let deadline = self.draft.parsed_deadline()?;
        let text = self.draft.text.clone();
        let priority = self.draft.priority;
        Ok(self.add_task(&text, deadline, priority, now))
    }

    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let Some(created_at) = self.get(id).map(|task| task.created_at) else {
            debug!(%id, "delete of unknown task ignored");
            return false;
        };

        self.tasks = self
            .tasks
            .iter()
            .filter(|task| task.id != id)
            .cloned()
            .collect();
        info!(%id, %created_at, "task deleted");
        true
    }

    // Flip the completion flag, nothing else changes
    pub fn toggle_complete(&mut self, id: TaskId) -> bool {
        if self.get(id).is_none() {
            debug!(%id, "toggle of unknown task ignored");
            return false;
        }

        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id == id {
                    Task {
                        completed: !task.completed,
                        ..task.clone()
                    }
                } else {
                    task.clone()
                }
            })
            .collect();
        info!(%id, "task completion toggled");
        true
    }
}
