use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::app::models::Priority;
use crate::app::store::{Draft, DraftError};
use derivative::Derivative;

// Input fields of the add-task form, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    Deadline,
    Priority,
}

impl FormField {
    fn below(self) -> FormField {
        match self {
            FormField::Text => FormField::Deadline,
            FormField::Deadline | FormField::Priority => FormField::Priority,
        }
    }

    fn above(self) -> FormField {
        match self {
            FormField::Text | FormField::Deadline => FormField::Text,
            FormField::Priority => FormField::Deadline,
        }
    }
}

// Cursor and feedback of the add-task form.
// The typed values themselves live in the store's draft.
#[derive(Derivative, Debug)]
#[derivative(Default)]
pub struct TaskEditState {
    #[derivative(Default(value = "FormField::Text"))]
    field: FormField,
    // Cursor position in chars within the focused text field
    cursor: usize,
    error_message: Option<String>,
}

impl TaskEditState {
    pub fn field(&self) -> FormField {
        self.field
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    // Move to the field BELOW the current one, keeping the column if the text allows it
    pub fn move_cursor_down(&mut self, draft: &Draft) {
        self.field = self.field.below();
        self.cursor = self.cursor.min(field_len(draft, self.field));
    }

    // Move to the field ABOVE the current one, keeping the column if the text allows it
    pub fn move_cursor_up(&mut self, draft: &Draft) {
        self.field = self.field.above();
        self.cursor = self.cursor.min(field_len(draft, self.field));
    }

    // One char LEFT; on the priority field this picks the previous priority
    pub fn move_cursor_left(&mut self, draft: &mut Draft) {
        match self.field {
            FormField::Priority => draft.priority = draft.priority.previous(),
            _ => self.cursor = self.cursor.saturating_sub(1),
        }
    }

    // One char RIGHT; on the priority field this picks the next priority
    pub fn move_cursor_right(&mut self, draft: &mut Draft) {
        match self.field {
            FormField::Priority => draft.priority = draft.priority.next(),
            _ => self.cursor = (self.cursor + 1).min(field_len(draft, self.field)),
        }
    }

    // Delete the char before the cursor
    pub fn delete_char(&mut self, draft: &mut Draft) {
        if self.cursor == 0 {
            return;
        }
        let Some(value) = field_value_mut(draft, self.field) else {
            return;
        };

        let at = byte_index(value, self.cursor - 1);
        value.remove(at);
        self.cursor -= 1;
    }

    // Insert a char at the cursor of the focused field.
    // The priority field only understands h, m and l.
    pub fn input(&mut self, draft: &mut Draft, to_insert: char) {
        if self.field == FormField::Priority {
            match to_insert.to_ascii_lowercase() {
                'h' => draft.priority = Priority::High,
                'm' => draft.priority = Priority::Medium,
                'l' => draft.priority = Priority::Low,
                _ => {}
            }
            return;
        }

        let cursor = self.cursor.min(field_len(draft, self.field));
        if let Some(value) = field_value_mut(draft, self.field) {
            let at = byte_index(value, cursor);
            value.insert(at, to_insert);
            self.cursor = cursor + 1;
        }
    }

    // Outcome of submitting the form
    pub fn submitted(&mut self, result: Result<bool, DraftError>) {
        match result {
            Ok(true) => {
                self.error_message = None;
                self.field = FormField::Text;
                self.cursor = 0;
            }
            // Blank text: fields stay as typed, only a stale message goes away
            Ok(false) => self.error_message = None,
            Err(err) => self.error_message = Some(err.to_string()),
        }
    }
}

fn field_value_mut(draft: &mut Draft, field: FormField) -> Option<&mut String> {
    match field {
        FormField::Text => Some(&mut draft.text),
        FormField::Deadline => Some(&mut draft.deadline),
        FormField::Priority => None,
    }
}

fn field_len(draft: &Draft, field: FormField) -> usize {
    match field {
        FormField::Text => draft.text.chars().count(),
        FormField::Deadline => draft.deadline.chars().count(),
        FormField::Priority => 0,
    }
}

// Byte offset of the char at `char_index`, or the end of the string
fn byte_index(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map_or(value.len(), |(at, _)| at)
}

// Returns the UI content for the add-task form
pub fn get_task_edit_ui<'a>(state: &TaskEditState, draft: &Draft, focused: bool) -> Vec<Line<'a>> {
    const GRAY_TEXT: Style = Style::new().fg(Color::DarkGray);
    const WHITE_TEXT: Style = Style::new().fg(Color::White);
    const BLACK_ON_WHITE: Style = Style::new().fg(Color::Black).bg(Color::White);
    let mut text = Vec::new();

    struct FormInputLine {
        field: FormField,
        prefix: &'static str,
        placeholder: &'static str,
        value: String,
    }

    let priority_choices = Priority::ALL
        .iter()
        .map(|priority| {
            if *priority == draft.priority {
                format!("[{}]", priority.label())
            } else {
                format!(" {} ", priority.label())
            }
        })
        .collect::<Vec<String>>()
        .join(" ");

    let lines = [
        FormInputLine {
            field: FormField::Text,
            prefix: "Task:     ",
            placeholder: "Task Description",
            value: draft.text.clone(),
        },
        FormInputLine {
            field: FormField::Deadline,
            prefix: "Deadline: ",
            placeholder: "YYYY-MM-DD",
            value: draft.deadline.clone(),
        },
    ];

    for line in lines {
        let mut spans = vec![Span::styled(line.prefix, WHITE_TEXT)];
        let selected = focused && state.field() == line.field;

        if line.value.is_empty() {
            // Empty field shows its placeholder, first char highlighted when selected
            if selected {
                spans.push(Span::styled(line.placeholder.chars().take(1).collect::<String>(), BLACK_ON_WHITE));
                spans.push(Span::styled(line.placeholder.chars().skip(1).collect::<String>(), GRAY_TEXT));
            } else {
                spans.push(Span::styled(line.placeholder, GRAY_TEXT));
            }
        } else if selected {
            // The char under the cursor is highlighted
            let cursor = state.cursor().min(line.value.chars().count());
            spans.push(Span::styled(line.value.chars().take(cursor).collect::<String>(), WHITE_TEXT));
            let under_cursor = line.value.chars().skip(cursor).take(1).collect::<String>();
            if under_cursor.is_empty() {
                spans.push(Span::styled(" ", BLACK_ON_WHITE));
            } else {
                spans.push(Span::styled(under_cursor, BLACK_ON_WHITE));
            }
            spans.push(Span::styled(line.value.chars().skip(cursor + 1).collect::<String>(), WHITE_TEXT));
        } else {
            spans.push(Span::styled(line.value, WHITE_TEXT));
        }

        text.push(Line::from(spans));
    }

    let priority_style = if focused && state.field() == FormField::Priority {
        WHITE_TEXT.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        WHITE_TEXT
    };
    text.push(Line::from(vec![
        Span::styled("Priority: ", WHITE_TEXT),
        Span::styled(priority_choices, priority_style),
    ]));

    if let Some(error_message) = state.error_message() {
        text.push(Line::from(Span::styled(error_message.to_string(), Style::new().fg(Color::Red))));
    }

    let help = if focused {
        "Enter - add task, Up/Down - field, Esc - back to list"
    } else {
        "a - add a task"
    };
    text.push(Line::from(Span::styled(help, GRAY_TEXT)));

    text
}
