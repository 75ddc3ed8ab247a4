// Derivation of the displayed list: filter by status, then order by priority.
// Runs on every draw and only ever reads the stored tasks.
use chrono::{DateTime, Local, NaiveDate};

use crate::app::models::{Filter, Task};

pub fn filter_tasks(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

// Stable, so equal priorities keep their newest-first order
pub fn sort_by_priority(mut tasks: Vec<&Task>) -> Vec<&Task> {
    tasks.sort_by_key(|task| task.priority.rank());
    tasks
}

pub fn visible_tasks(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    sort_by_priority(filter_tasks(tasks, filter))
}

// A deadline is overdue once its day lies before today.
// Compared by calendar day, so a deadline of today never counts.
pub fn is_overdue(deadline: Option<NaiveDate>, now: DateTime<Local>) -> bool {
    match deadline {
        Some(deadline) => deadline < now.date_naive(),
        None => false,
    }
}
