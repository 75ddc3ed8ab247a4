use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::{io, time::Duration};
use tracing::{debug, warn};

use crate::app::models::Filter;
use crate::app::store::TaskStore;
use crate::app::{present, view};
use crate::app::{task_edit::*, task_list::*};

// Which half of the screen receives the keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub store: TaskStore,
    pub items: TaskList,
    pub task_edit_state: TaskEditState,
    pub focus: Focus,
}

impl Default for App {
    fn default() -> Self {
        App::new()
    }
}

impl App {
    pub fn new() -> App {
        let mut app = App {
            store: TaskStore::init(),
            items: TaskList::default(),
            task_edit_state: TaskEditState::default(),
            focus: Focus::Form,
        };
        app.refresh();
        app
    }

    // Re-run the derivation so the selection matches what is drawn next
    pub fn refresh(&mut self) {
        let snapshot = self.store.snapshot();
        let ids = view::visible_tasks(&snapshot, self.store.filter())
            .iter()
            .map(|task| task.id)
            .collect();
        self.items.update_items(ids);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: DateTime<Local>) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        let control = match self.focus {
            Focus::Form => self.handle_form_key(key.code, now),
            Focus::List => self.handle_list_key(key.code),
        };
        self.refresh();
        control
    }

    // Handle input for the add-task form
    fn handle_form_key(&mut self, code: KeyCode, now: DateTime<Local>) -> Control {
        let form = &mut self.task_edit_state;
        match code {
            KeyCode::Esc | KeyCode::Tab => self.focus = Focus::List,
            KeyCode::Enter => {
                let result = self.store.submit_draft(now).map(|id| id.is_some());
                if let Err(err) = &result {
                    warn!(error = %err, "task not added");
                }
                form.submitted(result);
            }
            KeyCode::Down => form.move_cursor_down(self.store.draft()),
            KeyCode::Up => form.move_cursor_up(self.store.draft()),
            KeyCode::Left => form.move_cursor_left(self.store.draft_mut()),
            KeyCode::Right => form.move_cursor_right(self.store.draft_mut()),
            KeyCode::Backspace => form.delete_char(self.store.draft_mut()),
            KeyCode::Char(to_insert) => form.input(self.store.draft_mut(), to_insert),
            _ => {}
        }
        Control::Continue
    }

    // Handle input for the task list navigation, filtering and state change
    fn handle_list_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Char('a') | KeyCode::Tab => self.focus = Focus::Form,
            KeyCode::Down => self.items.next(),
            KeyCode::Up => self.items.previous(),
            KeyCode::Left => self.items.unselect(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.items.get_selected() {
                    self.store.toggle_complete(id);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = self.items.get_selected() {
                    self.store.delete_task(id);
                }
            }
            KeyCode::Char('1') => self.store.set_filter(Filter::All),
            KeyCode::Char('2') => self.store.set_filter(Filter::Active),
            KeyCode::Char('3') => self.store.set_filter(Filter::Completed),
            KeyCode::Char('f') => self.store.set_filter(self.store.filter().next()),
            _ => {}
        }
        Control::Continue
    }
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    tick_rate: Duration,
) -> io::Result<()> {
    loop {
        // Redrawn on every tick too, so deadlines turn overdue at midnight
        terminal.draw(|f| draw_ui(f, &mut app, Local::now()))?;

        if crossterm::event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && app.handle_key(key, Local::now()) == Control::Quit
                {
                    debug!("quit requested");
                    return Ok(());
                }
            }
        }
    }
}

fn focus_block<'a>(title: &'a str, focused: bool) -> Block<'a> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::new().fg(Color::LightGreen))
    } else {
        block
    }
}

// Draws the whole user interface
pub fn draw_ui(f: &mut Frame, app: &mut App, now: DateTime<Local>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(f.size());

    let header = Paragraph::new(Line::from("My Tasks".bold()))
        .block(Block::default().borders(Borders::ALL))
        .style(Style::new().fg(Color::White).bg(Color::Rgb(79, 70, 229)));
    f.render_widget(header, chunks[0]);

    let form = Paragraph::new(get_task_edit_ui(
        &app.task_edit_state,
        app.store.draft(),
        app.focus == Focus::Form,
    ))
    .block(focus_block("Add Task", app.focus == Focus::Form));
    f.render_widget(form, chunks[1]);

    let filter_bar = Paragraph::new(get_filter_bar_ui(app.store.filter(), app.store.active_count()))
        .block(Block::default().borders(Borders::ALL).title("Show"));
    f.render_widget(filter_bar, chunks[2]);

    // Task list on the left, key help on the right
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[3]);

    let snapshot = app.store.snapshot();
    let visible = view::visible_tasks(&snapshot, app.store.filter());
    let rows = present::rows(&visible, now);
    let list_block = focus_block("Tasks", app.focus == Focus::List);

    if rows.is_empty() {
        let empty = Paragraph::new(Line::from("No tasks yet.".fg(Color::DarkGray)))
            .alignment(Alignment::Center)
            .block(list_block);
        f.render_widget(empty, body[0]);
    } else {
        let task_list = List::new(get_list_items_ui(&rows))
            .block(list_block)
            .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)).add_modifier(Modifier::BOLD))
            .highlight_symbol(">> ");
        f.render_stateful_widget(task_list, body[0], &mut app.items.state);
    }

    let instructions = Paragraph::new(get_instructions_ui())
        .block(Block::new().title("Commands").borders(Borders::ALL))
        .style(Style::new().white());
    f.render_widget(instructions, body[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::Priority;
    use crate::app::present::DeadlineStyle;
    use chrono::{NaiveDate, TimeZone};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::{Buffer, Cell};
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 2, 20, 18, 0, 0)
            .single()
            .expect("unambiguous local time")
    }

    fn press(app: &mut App, code: KeyCode, now: DateTime<Local>) -> Control {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), now)
    }

    fn type_str(app: &mut App, value: &str, now: DateTime<Local>) {
        for c in value.chars() {
            press(app, KeyCode::Char(c), now);
        }
    }

    // Fill the form from the top and submit it
    fn add(app: &mut App, text: &str, deadline: &str, priority: char, now: DateTime<Local>) {
        app.focus = Focus::Form;
        type_str(app, text, now);
        press(app, KeyCode::Down, now);
        type_str(app, deadline, now);
        press(app, KeyCode::Down, now);
        press(app, KeyCode::Char(priority), now);
        press(app, KeyCode::Enter, now);
    }

    fn render(app: &mut App, now: DateTime<Local>) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("test terminal");
        terminal
            .draw(|f| draw_ui(f, app, now))
            .expect("draw succeeds");
        terminal.backend().buffer().clone()
    }

    // First cell of the first place where `pattern` is drawn
    fn cell_of<'b>(buffer: &'b Buffer, pattern: &str) -> Option<&'b Cell> {
        let wanted: Vec<String> = pattern.chars().map(String::from).collect();
        (0..buffer.content.len().saturating_sub(wanted.len()))
            .find(|&start| {
                buffer.content[start..start + wanted.len()]
                    .iter()
                    .zip(&wanted)
                    .all(|(cell, symbol)| cell.symbol == *symbol)
            })
            .map(|start| &buffer.content[start])
    }

    fn screen(app: &mut App, now: DateTime<Local>) -> String {
        let buffer = render(app, now);
        let width = buffer.area.width as usize;
        let mut text = String::new();
        for (i, cell) in buffer.content.iter().enumerate() {
            if i > 0 && i % width == 0 {
                text.push('\n');
            }
            text.push_str(&cell.symbol);
        }
        text
    }

    fn visible_texts(app: &App) -> Vec<String> {
        let snapshot = app.store.snapshot();
        view::visible_tasks(&snapshot, app.store.filter())
            .iter()
            .map(|task| task.text.clone())
            .collect()
    }

    #[rstest]
    fn empty_app_shows_placeholder(now: DateTime<Local>) {
        let mut app = App::new();
        let screen = screen(&mut app, now);

        assert!(screen.contains("My Tasks"));
        assert!(screen.contains("No tasks yet."));
        assert!(screen.contains("0 active tasks"));
    }

    #[rstest]
    fn buy_milk_end_to_end(now: DateTime<Local>) {
        let mut app = App::new();
        add(&mut app, "Water plants", "", 'l', now);
        add(&mut app, "Buy milk", "", 'h', now);

        let milk = app.store.snapshot()[0].clone();
        assert_eq!(milk.text, "Buy milk");
        assert_eq!(milk.priority, Priority::High);
        assert_eq!(milk.deadline, None);
        assert_eq!(app.store.draft().priority, Priority::Medium);

        assert_eq!(visible_texts(&app), ["Buy milk", "Water plants"]);
        let row = present::row(&milk, now);
        assert_eq!(row.priority_badge.label, "HIGH");
        assert_eq!(row.deadline_badge, None);

        let drawn = screen(&mut app, now);
        assert!(drawn.contains("Buy milk"));
        assert!(drawn.contains("HIGH"));
        assert!(drawn.contains("2 active tasks"));

        // Active view, then complete the top task from the list
        press(&mut app, KeyCode::Tab, now);
        press(&mut app, KeyCode::Char('2'), now);
        assert_eq!(visible_texts(&app), ["Buy milk", "Water plants"]);
        press(&mut app, KeyCode::Down, now);
        press(&mut app, KeyCode::Char(' '), now);

        assert!(app.store.get(milk.id).is_some_and(|task| task.completed));
        assert_eq!(visible_texts(&app), ["Water plants"]);

        press(&mut app, KeyCode::Char('3'), now);
        assert_eq!(visible_texts(&app), ["Buy milk"]);
        let row = present::row(app.store.get(milk.id).expect("still stored"), now);
        assert!(row.completed);
        assert_eq!(row.deadline_badge, None);
        assert!(screen(&mut app, now).contains("1 active tasks"));
    }

    #[rstest]
    fn completed_task_with_past_deadline_has_no_alert(now: DateTime<Local>) {
        let mut app = App::new();
        add(&mut app, "Send invoice", "2025-02-01", 'm', now);
        let id = app.store.snapshot()[0].id;

        let overdue = present::row(app.store.get(id).expect("stored"), now);
        assert_eq!(
            overdue.deadline_badge.as_ref().map(|badge| badge.style),
            Some(DeadlineStyle::Alert)
        );
        assert!(screen(&mut app, now).contains("Feb 1, 2025"));

        press(&mut app, KeyCode::Esc, now);
        press(&mut app, KeyCode::Down, now);
        press(&mut app, KeyCode::Enter, now);

        let task = app.store.get(id).expect("stored");
        assert!(task.completed);
        assert_eq!(task.deadline, NaiveDate::from_ymd_opt(2025, 2, 1));
        assert_eq!(
            present::row(task, now).deadline_badge.map(|badge| badge.style),
            Some(DeadlineStyle::Neutral)
        );
    }

    #[rstest]
    fn list_draws_alert_in_red_and_completed_tasks_crossed_out(now: DateTime<Local>) {
        let mut app = App::new();
        add(&mut app, "Pay rent", "2025-02-01", 'h', now);

        let buffer = render(&mut app, now);
        let alert = cell_of(&buffer, "[! cal Feb 1, 2025]").expect("alert badge drawn");
        assert_eq!(alert.fg, Color::Red);
        let text = cell_of(&buffer, "Pay rent").expect("task text drawn");
        assert!(!text.modifier.contains(Modifier::CROSSED_OUT));

        press(&mut app, KeyCode::Esc, now);
        press(&mut app, KeyCode::Down, now);
        press(&mut app, KeyCode::Char(' '), now);

        let buffer = render(&mut app, now);
        let text = cell_of(&buffer, "Pay rent").expect("task text drawn");
        assert!(text.modifier.contains(Modifier::CROSSED_OUT));
        assert_eq!(text.fg, Color::DarkGray);
        assert!(cell_of(&buffer, "[! cal").is_none());
        let badge = cell_of(&buffer, "[cal Feb 1, 2025]").expect("neutral badge drawn");
        assert_eq!(badge.fg, Color::Blue);
    }

    #[rstest]
    fn blank_submit_keeps_form(now: DateTime<Local>) {
        let mut app = App::new();
        type_str(&mut app, "   ", now);
        press(&mut app, KeyCode::Down, now);
        type_str(&mut app, "2025-03-01", now);
        press(&mut app, KeyCode::Enter, now);

        assert!(app.store.snapshot().is_empty());
        assert_eq!(app.store.draft().text, "   ");
        assert_eq!(app.store.draft().deadline, "2025-03-01");
        assert_eq!(app.task_edit_state.error_message(), None);
    }

    #[rstest]
    fn bad_deadline_shows_message(now: DateTime<Local>) {
        let mut app = App::new();
        add(&mut app, "Gym", "next week", 'm', now);

        assert!(app.store.snapshot().is_empty());
        assert!(screen(&mut app, now).contains("YYYY-MM-DD"));
    }

    #[rstest]
    fn delete_from_list(now: DateTime<Local>) {
        let mut app = App::new();
        add(&mut app, "First", "", 'm', now);
        add(&mut app, "Second", "", 'm', now);

        press(&mut app, KeyCode::Tab, now);
        press(&mut app, KeyCode::Down, now);
        press(&mut app, KeyCode::Char('x'), now);
        assert_eq!(visible_texts(&app), ["First"]);
        assert_eq!(
            app.items.get_selected(),
            app.store.snapshot().first().map(|task| task.id)
        );

        press(&mut app, KeyCode::Delete, now);
        assert!(app.store.snapshot().is_empty());
        assert_eq!(app.items.get_selected(), None);

        // Nothing selected: deleting again changes nothing
        press(&mut app, KeyCode::Char('x'), now);
        assert!(app.store.snapshot().is_empty());
    }

    #[rstest]
    fn q_quits_only_from_the_list(now: DateTime<Local>) {
        let mut app = App::new();
        assert_eq!(press(&mut app, KeyCode::Char('q'), now), Control::Continue);
        assert_eq!(app.store.draft().text, "q");

        press(&mut app, KeyCode::Esc, now);
        assert_eq!(press(&mut app, KeyCode::Char('q'), now), Control::Quit);
    }

    #[rstest]
    fn ctrl_c_quits_anywhere(now: DateTime<Local>) {
        let mut app = App::new();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(key, now), Control::Quit);
    }

    #[rstest]
    fn filter_cycles_with_f(now: DateTime<Local>) {
        let mut app = App::new();
        press(&mut app, KeyCode::Tab, now);
        for expected in [Filter::Active, Filter::Completed, Filter::All] {
            press(&mut app, KeyCode::Char('f'), now);
            assert_eq!(app.store.filter(), expected);
        }
    }
}
