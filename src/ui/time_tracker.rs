use chrono::NaiveDateTime;
use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::clock::{WorkClock, WorkDay};
use crate::models::Task;
use crate::ui::components::popup::help_bar;

pub struct TimeTrackerState {
    pub clock: WorkClock,
    pub summary: String,
    tasks: Vec<Task>,
    selected_task: Option<usize>,
    now: NaiveDateTime,
}

#[derive(Debug, PartialEq)]
pub enum TimeTrackerAction {
    Back,
    Start(Option<i64>),
    End,
}

impl TimeTrackerState {
    /// `tasks` are the ones the employee can book the work day against.
    pub fn new(clock: WorkClock, summary: String, tasks: Vec<Task>, now: NaiveDateTime) -> Self {
        Self {
            clock,
            summary,
            tasks,
            selected_task: None,
            now,
        }
    }

    /// Called once a second by the main loop.
    pub fn tick(&mut self, now: NaiveDateTime) {
        self.now = now;
    }

    pub fn elapsed_text(&self) -> String {
        self.clock.elapsed_text(self.now)
    }

    /// Cycle through "no task" and each available task.
    pub fn cycle_task(&mut self) {
        self.selected_task = match self.selected_task {
            None if !self.tasks.is_empty() => Some(0),
            Some(i) if i + 1 < self.tasks.len() => Some(i + 1),
            _ => None,
        };
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_task.and_then(|i| self.tasks.get(i))
    }
}

pub fn render_time_tracker<B: Backend>(frame: &mut Frame<B>, state: &mut TimeTrackerState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let status_color = if state.clock.is_running() {
        Color::Green
    } else {
        Color::Gray
    };
    let mut status_line = vec![Span::styled(
        state.clock.status_text(),
        Style::default().fg(status_color).add_modifier(Modifier::BOLD),
    )];
    if let WorkDay::Running { started_at, .. } = state.clock.state() {
        status_line.push(Span::raw(format!(" (since {})", started_at.format("%H:%M"))));
    }
    let status = Paragraph::new(Spans::from(status_line))
        .alignment(Alignment::Center)
        .block(Block::default().title("Work day").borders(Borders::ALL));
    frame.render_widget(status, chunks[0]);

    let elapsed = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(Span::styled(
            state.elapsed_text(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().title("Elapsed").borders(Borders::ALL));
    frame.render_widget(elapsed, chunks[1]);

    let task_label = state
        .selected_task()
        .map(|t| t.title.clone())
        .unwrap_or_else(|| "General work".to_string());
    let task = Paragraph::new(task_label)
        .block(Block::default().title("Book time on").borders(Borders::ALL));
    frame.render_widget(task, chunks[2]);

    let summary = Paragraph::new(state.summary.clone())
        .block(Block::default().title("Today").borders(Borders::ALL));
    frame.render_widget(summary, chunks[3]);

    let help = if state.clock.is_running() {
        "<E> End work day | <Esc> Back"
    } else {
        "<S> Start work day | <T> Choose task | <Esc> Back"
    };
    frame.render_widget(help_bar(help), chunks[4]);
}

pub fn handle_key(state: &mut TimeTrackerState, key: KeyCode) -> Option<TimeTrackerAction> {
    let running = state.clock.is_running();
    match key {
        KeyCode::Esc | KeyCode::Char('q') => Some(TimeTrackerAction::Back),
        KeyCode::Char('s') if !running => {
            Some(TimeTrackerAction::Start(state.selected_task().map(|t| t.id)))
        }
        KeyCode::Char('e') if running => Some(TimeTrackerAction::End),
        KeyCode::Char('t') if !running => {
            state.cycle_task();
            None
        }
        _ => None,
    }
}
