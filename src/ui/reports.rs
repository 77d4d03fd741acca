use chrono::{Duration, NaiveDate};
use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::Report;
use crate::ui::components::{date_input::DateInputState, popup::help_bar};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PeriodField {
    From,
    To,
}

pub struct ReportsState {
    pub from: DateInputState,
    pub to: DateInputState,
    pub current_field: PeriodField,
    pub report: Option<Report>,
    history: Vec<Report>,
    scroll: u16,
}

#[derive(Debug)]
pub enum ReportsAction {
    Back,
    Generate { from: NaiveDate, to: NaiveDate },
    Export(Report),
}

impl ReportsState {
    /// The period defaults to the last seven days.
    pub fn new(today: NaiveDate, history: Vec<Report>) -> Self {
        Self {
            from: DateInputState::new(today - Duration::days(7)),
            to: DateInputState::new(today),
            current_field: PeriodField::From,
            report: None,
            history,
            scroll: 0,
        }
    }

    /// Show a freshly generated report and remember it.
    pub fn show(&mut self, report: Report) {
        self.history.insert(0, report.clone());
        self.report = Some(report);
        self.scroll = 0;
    }

    fn field_mut(&mut self) -> &mut DateInputState {
        match self.current_field {
            PeriodField::From => &mut self.from,
            PeriodField::To => &mut self.to,
        }
    }

    fn is_editing(&self) -> bool {
        self.from.editing || self.to.editing
    }
}

pub fn render_reports<B: Backend>(frame: &mut Frame<B>, state: &mut ReportsState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let field_style = |field: PeriodField| {
        if state.current_field == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };
    let period = Paragraph::new(Spans::from(vec![
        Span::styled("From: ", field_style(PeriodField::From)),
        Span::raw(state.from.get_display_string()),
        Span::raw("    "),
        Span::styled("To: ", field_style(PeriodField::To)),
        Span::raw(state.to.get_display_string()),
    ]))
    .block(Block::default().title("Period").borders(Borders::ALL));
    frame.render_widget(period, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
        .split(rows[1]);

    let text = state
        .report
        .as_ref()
        .map(|r| r.report_data.clone())
        .unwrap_or_else(|| "Choose a period and press <G> to generate a report".to_string());
    let report = Paragraph::new(text)
        .scroll((state.scroll, 0))
        .block(Block::default().title("Report").borders(Borders::ALL));
    frame.render_widget(report, columns[0]);

    let history: Vec<ListItem> = state
        .history
        .iter()
        .map(|r| ListItem::new(r.title.clone()))
        .collect();
    let history = List::new(history).block(Block::default().title("Saved reports").borders(Borders::ALL));
    frame.render_widget(history, columns[1]);

    let help = if state.is_editing() {
        "Enter - Done | Left/Right - Date part | Up/Down - Change value"
    } else {
        "<Tab> Switch date | <Enter> Edit date | <G> Generate | <X> Export | <PgUp/PgDn> Scroll | <Esc> Back"
    };
    frame.render_widget(help_bar(help), rows[2]);
}

pub fn handle_key(state: &mut ReportsState, key: KeyCode) -> Option<ReportsAction> {
    if state.is_editing() {
        match key {
            KeyCode::Enter | KeyCode::Esc => state.field_mut().toggle_editing(),
            _ => state.field_mut().handle_input(key),
        }
        return None;
    }

    match key {
        KeyCode::Esc | KeyCode::Char('q') => return Some(ReportsAction::Back),
        KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
            state.current_field = match state.current_field {
                PeriodField::From => PeriodField::To,
                PeriodField::To => PeriodField::From,
            };
        }
        KeyCode::Enter => state.field_mut().toggle_editing(),
        KeyCode::Char('g') => {
            return Some(ReportsAction::Generate {
                from: state.from.date,
                to: state.to.date,
            });
        }
        KeyCode::Char('x') => return state.report.clone().map(ReportsAction::Export),
        KeyCode::PageDown | KeyCode::Down => state.scroll = state.scroll.saturating_add(1),
        KeyCode::PageUp | KeyCode::Up => state.scroll = state.scroll.saturating_sub(1),
        _ => {}
    }
    None
}
