use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::*;

use crate::app::models::{Filter, TaskId};
use crate::app::present::TaskRow;

// Selection over the currently displayed (filtered and sorted) tasks
#[derive(Default)]
pub struct TaskList {
    pub state: ListState,
    items: Vec<TaskId>,
}

impl TaskList {
    // Replace the displayed ids after a refresh.
    // The selection follows the selected task, or stays at the same row if it is gone.
    pub fn update_items(&mut self, items: Vec<TaskId>) {
        let selected_id = self.get_selected();
        let previous_index = self.state.selected();
        self.items = items;

        let index = match selected_id.and_then(|id| self.items.iter().position(|item| *item == id)) {
            Some(i) => Some(i),
            None if self.items.is_empty() => None,
            None => previous_index.map(|i| i.min(self.items.len() - 1)),
        };
        self.state.select(index);
    }

    // Move the selection to the next item
    pub fn next(&mut self) {
        let i = match self.state.selected() {
            Some(i) => {
                if self.items.is_empty() || i >= self.items.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.select_if_any(i);
    }

    // Move the selection to the previous item
    pub fn previous(&mut self) {
        let i = match self.state.selected() {
            Some(i) => {
                if self.items.is_empty() {
                    0
                } else if i == 0 {
                    self.items.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.select_if_any(i);
    }

    pub fn unselect(&mut self) {
        self.state.select(None);
    }

    fn select_if_any(&mut self, i: usize) {
        if self.items.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(i));
        }
    }

    // Get the id of the selected task
    pub fn get_selected(&self) -> Option<TaskId> {
        self.state.selected().and_then(|i| self.items.get(i).copied())
    }
}

// Build the UI (list) for the displayed tasks
pub fn get_list_items_ui<'a>(rows: &[TaskRow]) -> Vec<ListItem<'a>> {
    rows.iter()
        .map(|row| {
            let text_style = if row.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(Color::White)
            };

            let mut badges = vec![
                Span::from("    "),
                Span::from(format!(" {} ", row.priority_badge.label))
                    .fg(Color::Black)
                    .bg(row.priority_badge.color),
            ];
            if let Some(deadline) = &row.deadline_badge {
                badges.push(Span::from(" "));
                badges.push(Span::from(deadline.text()).fg(deadline.color()).bold());
            }

            ListItem::new(vec![
                Line::from(vec![
                    Span::from(if row.completed { "[x] " } else { "[ ] " }),
                    Span::styled(row.text.clone(), text_style),
                ]),
                Line::from(badges),
            ])
        })
        .collect()
}

// Build the UI (line) for the filter bar with the count of active tasks
pub fn get_filter_bar_ui<'a>(selected: Filter, active_count: usize) -> Line<'a> {
    let mut spans = Vec::new();
    for filter in Filter::ALL {
        let label = format!(" {} ", filter.label());
        if filter == selected {
            spans.push(Span::from(label).fg(Color::White).bg(Color::Rgb(79, 70, 229)).bold());
        } else {
            spans.push(Span::from(label).fg(Color::Gray));
        }
        spans.push(Span::from(" "));
    }
    spans.push(Span::from(format!("  {active_count} active tasks")).fg(Color::Gray));
    Line::from(spans)
}

// Build the UI (lines) for instructions infobox
pub fn get_instructions_ui<'a>() -> Vec<Line<'a>> {
    vec![
        "Tab - switch form/list".into(),
        "a - add a task".into(),
        "Space/Enter - toggle done".into(),
        "x - delete a task".into(),
        "1/2/3 - all/active/completed".into(),
        "f - next filter".into(),
        "q - quit".into(),
    ]
}
