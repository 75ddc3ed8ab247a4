// Mapping of tasks to the rows drawn in the list.
// Pure: reads tasks, returns plain values, touches nothing.
use chrono::{DateTime, Local, NaiveDate};
use ratatui::style::Color;

use crate::app::models::{Priority, Task, TaskId};
use crate::app::view::is_overdue;

// Format of deadlines in the list, e.g. "Jan 5, 2025"
pub const DEADLINE_DISPLAY_FORMAT: &str = "%b %-d, %Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityBadge {
    pub label: &'static str,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStyle {
    Neutral,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineBadge {
    pub label: String,
    pub style: DeadlineStyle,
}

impl DeadlineBadge {
    pub fn color(&self) -> Color {
        match self.style {
            DeadlineStyle::Neutral => Color::Blue,
            DeadlineStyle::Alert => Color::Red,
        }
    }

    // Calendar marker, preceded by an alert marker when overdue
    pub fn text(&self) -> String {
        match self.style {
            DeadlineStyle::Neutral => format!("[cal {}]", self.label),
            DeadlineStyle::Alert => format!("[! cal {}]", self.label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub text: String,
    // Completed rows are drawn crossed out
    pub completed: bool,
    pub priority_badge: PriorityBadge,
    pub deadline_badge: Option<DeadlineBadge>,
}

pub fn priority_badge(priority: Priority) -> PriorityBadge {
    match priority {
        Priority::High => PriorityBadge {
            label: "HIGH",
            color: Color::Red,
        },
        Priority::Medium => PriorityBadge {
            label: "MEDIUM",
            color: Color::Yellow,
        },
        Priority::Low => PriorityBadge {
            label: "LOW",
            color: Color::Green,
        },
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DEADLINE_DISPLAY_FORMAT).to_string()
}

pub fn row(task: &Task, now: DateTime<Local>) -> TaskRow {
    let deadline_badge = task.deadline.map(|deadline| DeadlineBadge {
        label: format_date(deadline),
        // Completed tasks keep their deadline but never raise the alert
        style: if is_overdue(Some(deadline), now) && !task.completed {
            DeadlineStyle::Alert
        } else {
            DeadlineStyle::Neutral
        },
    });

    TaskRow {
        id: task.id,
        text: task.text.clone(),
        completed: task.completed,
        priority_badge: priority_badge(task.priority),
        deadline_badge,
    }
}

pub fn rows(tasks: &[&Task], now: DateTime<Local>) -> Vec<TaskRow> {
    tasks.iter().map(|task| row(task, now)).collect()
}
