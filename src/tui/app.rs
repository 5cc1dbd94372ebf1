use anyhow::Result;
use chrono::{Days, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::warn;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::db::repository::{TaskRepo, WorkLogRepo};
use crate::db::SqliteStore;
use crate::models::{Task, TaskStatus};
use crate::stats::milestone::celebration;
use crate::stats::{StatsCalculator, StatsRefresh};
use crate::tui::events::{Event, EventHandler};
use crate::tui::popup::{Popup, PopupEvent, PopupKind};
use crate::tui::theme;
use crate::tui::widgets::{centered_rect, header, popup, progress, statusbar, streak, tasks};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    AddTask,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub user_id: String,
    pub today: NaiveDate,
    pub selected: NaiveDate,
    pub focus_idx: usize,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>,
    pub last_error: Option<String>,

    pub tasks: Vec<Task>,
    pub stats: StatsRefresh,
    pub popup: Popup,
}

impl App {
    pub fn new(config: AppConfig, user_id: String, today: NaiveDate) -> Self {
        let popup = Popup::from_config(&config.popup);
        App {
            view: View::Dashboard,
            config,
            user_id,
            today,
            selected: today,
            focus_idx: 0,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            last_error: None,
            tasks: Vec::new(),
            stats: StatsRefresh::new(),
            popup,
        }
    }

    pub fn load(&mut self, conn: &Connection) -> Result<()> {
        self.tasks = WorkLogRepo::find_by_date(conn, &self.user_id, self.selected)?
            .map(|log| log.tasks)
            .unwrap_or_default();
        if self.focus_idx >= self.tasks.len() {
            self.focus_idx = self.tasks.len().saturating_sub(1);
        }
        self.refresh_stats(conn);
        Ok(())
    }

    fn refresh_stats(&mut self, conn: &Connection) {
        let ticket = self.stats.begin();
        let store = SqliteStore::new(conn);
        let result =
            StatsCalculator::new(&store).compute_at(&self.user_id, Some(self.selected), self.today);
        self.stats.finish(ticket, result);
    }

    pub fn tick(&mut self, conn: &Connection, now: Instant) {
        self.tick_at(conn, now, Local::now().date_naive());
    }

    /// Advance timers and notice midnight.
    pub fn tick_at(&mut self, conn: &Connection, now: Instant, today: NaiveDate) {
        if let Some(PopupEvent::Closed) = self.popup.tick(now) {
            log::debug!("popup closed");
        }

        if today != self.today {
            let following = self.selected == self.today;
            self.today = today;
            if following {
                self.selected = today;
            }
            self.reload(conn);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, conn: &Connection, now: Instant) {
        // Some terminals also report release and repeat events
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.input_mode {
            InputMode::AddTask => self.handle_add_input(key, conn, now),
            InputMode::Normal => match self.view {
                View::Dashboard => self.handle_dashboard_key(key, conn, now),
                View::Help => self.handle_help_key(key),
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent, conn: &Connection, now: Instant) {
        // Esc / Enter close an open popup before doing anything else
        if self.popup.is_open() && matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            self.popup.dismiss(now);
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('a') => {
                self.input_mode = InputMode::AddTask;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Up => {
                self.focus_idx = self.focus_idx.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.focus_idx + 1 < self.tasks.len() {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Left => {
                if let Some(date) = self.selected.checked_sub_days(Days::new(1)) {
                    self.select_date(conn, date);
                }
            }
            KeyCode::Right => {
                if let Some(date) = self.selected.checked_add_days(Days::new(1)) {
                    self.select_date(conn, date);
                }
            }
            KeyCode::Char('t') => self.select_date(conn, self.today),
            KeyCode::Char('r') => self.reload(conn),
            KeyCode::Char(' ') => {
                if let Some(task) = self.tasks.get(self.focus_idx) {
                    let next = task.status.next();
                    self.update_focused_status(conn, next, now);
                }
            }
            KeyCode::Char('f') => self.update_focused_status(conn, TaskStatus::Finished, now),
            KeyCode::Char('x') => self.remove_focused(conn),
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if let KeyCode::Esc | KeyCode::Char('?') = key.code {
            self.view = View::Dashboard;
        }
    }

    fn handle_add_input(&mut self, key: KeyEvent, conn: &Connection, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Enter => {
                let title = self.input_buffer.trim().to_string();
                if title.is_empty() {
                    self.input_error = Some("Type a task title first".to_string());
                    return;
                }
                match TaskRepo::add(conn, &self.user_id, self.selected, &title) {
                    Ok(_) => {
                        self.input_mode = InputMode::Normal;
                        self.input_buffer.clear();
                        self.input_error = None;
                        self.reload(conn);
                        self.focus_idx = self.tasks.len().saturating_sub(1);
                        let message = format!("\"{}\" is on the list", title);
                        self.celebrate(PopupKind::Task, message, now);
                    }
                    Err(e) => {
                        self.input_error = Some(e.to_string());
                    }
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.input_error = None;
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
                self.input_error = None;
            }
            _ => {}
        }
    }

    fn select_date(&mut self, conn: &Connection, date: NaiveDate) {
        if date != self.selected {
            self.selected = date;
            self.focus_idx = 0;
            self.reload(conn);
        }
    }

    fn reload(&mut self, conn: &Connection) {
        if let Err(e) = self.load(conn) {
            self.report(e);
        }
    }

    fn update_focused_status(&mut self, conn: &Connection, status: TaskStatus, now: Instant) {
        let Some(task) = self.tasks.get(self.focus_idx) else {
            return;
        };
        if task.status == status {
            return;
        }
        let title = task.title.clone();
        let task_id = task.id;
        let before = *self.stats.stats();

        if let Err(e) = TaskRepo::set_status(conn, &self.user_id, task_id, &status) {
            self.report(e);
            return;
        }
        self.reload(conn);

        match celebration(&before, self.stats.stats()) {
            Some(message) => self.celebrate(PopupKind::Achievement, message, now),
            None => self.celebrate(
                PopupKind::Progress,
                format!("\"{}\" is now {}", title, status),
                now,
            ),
        }
    }

    fn remove_focused(&mut self, conn: &Connection) {
        let Some(task) = self.tasks.get(self.focus_idx) else {
            return;
        };
        match TaskRepo::remove(conn, &self.user_id, task.id) {
            Ok(_) => self.reload(conn),
            Err(e) => self.report(e),
        }
    }

    fn celebrate(&mut self, kind: PopupKind, message: String, now: Instant) {
        if self.config.popup.enabled {
            self.popup.show(kind, message, now);
        }
    }

    fn report(&mut self, err: anyhow::Error) {
        warn!("{:#}", err);
        self.last_error = Some(err.to_string());
    }

    pub fn draw(&self, frame: &mut Frame, now: Instant) {
        self.draw_dashboard(frame);

        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }
        if self.input_mode == InputMode::AddTask {
            self.draw_add_input(frame);
        }
        popup::render(frame, &self.popup, now);
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();

        // Clear background
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer_chunks[0], self.selected, self.today, &self.user_id);

        let error = self.last_error.as_deref().or(self.stats.error());
        statusbar::render(frame, outer_chunks[2], error);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(outer_chunks[1]);

        tasks::render(frame, columns[0], &self.tasks, self.focus_idx);

        // Right column: progress card over streak card
        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8), // progress
                Constraint::Length(7), // streak
                Constraint::Min(0),
            ])
            .split(columns[1]);

        let stats = self.stats.stats();
        let loading = self.stats.is_loading();
        progress::render(
            frame,
            right_chunks[0],
            &stats.today_progress,
            self.selected,
            self.today,
            loading,
        );
        streak::render(frame, right_chunks[1], &stats.streak, loading);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        let popup_area = centered_rect(area, area.width / 2, (area.height / 2).max(14));

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("  [a]          ", "Add a task to the selected day"),
            ("  [Space]      ", "Cycle task status"),
            ("  [f]          ", "Mark task finished"),
            ("  [x]          ", "Delete task"),
            ("  [↑ ↓]        ", "Navigate tasks"),
            ("  [← →]        ", "Previous / next day"),
            ("  [t]          ", "Jump to today"),
            ("  [r]          ", "Reload"),
            ("  [?]          ", "Toggle help"),
            ("  [Esc]        ", "Close popup / quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::purple().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, label) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(key, theme::purple()),
                Span::styled(label, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::purple()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::purple())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_add_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let height = if self.input_error.is_some() { 7 } else { 5 };

        let popup_area = centered_rect(area, area.width / 2, height);

        frame.render_widget(Clear, popup_area);

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Task: ", theme::dim()),
                Span::styled(
                    self.input_buffer.as_str(),
                    theme::purple().add_modifier(Modifier::BOLD),
                ),
                Span::styled("█", theme::amber()), // block cursor
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  Type a title, then [Enter]  ·  [Esc] cancel",
                theme::dim(),
            )),
        ];

        if let Some(err) = &self.input_error {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::red())));
        }

        let border_style = if self.input_error.is_some() {
            theme::red()
        } else {
            theme::amber()
        };

        let block = Block::default()
            .title(Span::styled(
                format!(" New task for {} ", self.selected.format("%b %d")),
                theme::purple(),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(theme::surface());

        let paragraph = Paragraph::new(text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig, user_id: String) -> Result<()> {
    let tick_rate = Duration::from_millis(config.tui.tick_rate_ms.max(16));
    let mut app = App::new(config, user_id, Local::now().date_naive());
    app.load(&conn)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(tick_rate);

    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| app.draw(frame, Instant::now()))?;

            match events.next()? {
                Event::Key(key) => {
                    app.handle_key(key, &conn, Instant::now());
                    if app.should_quit {
                        break;
                    }
                }
                Event::Resize => {}
                Event::Tick(now) => {
                    app.tick(&conn, now);
                }
            }
        }
        Ok(())
    })();

    ratatui::restore();
    result
}
