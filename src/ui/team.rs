use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::team::TeamMember;
use crate::ui::components::{popup::help_bar, step_index};

pub struct TeamState {
    members: Vec<TeamMember>,
    list_state: ListState,
}

impl TeamState {
    pub fn new(members: Vec<TeamMember>) -> Self {
        let mut list_state = ListState::default();
        if !members.is_empty() {
            list_state.select(Some(0));
        }
        Self { members, list_state }
    }

    pub fn selected_member(&self) -> Option<&TeamMember> {
        self.list_state.selected().and_then(|i| self.members.get(i))
    }
}

pub fn render_team<B: Backend>(frame: &mut Frame<B>, state: &mut TeamState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)].as_ref())
        .split(frame.size());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(rows[0]);

    let items: Vec<ListItem> = state
        .members
        .iter()
        .map(|m| ListItem::new(m.employee.full_name()))
        .collect();
    let title = if items.is_empty() {
        "My team (no other members)"
    } else {
        "My team"
    };
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, columns[0], &mut state.list_state);

    let details = match state.selected_member() {
        Some(member) => {
            let employee = &member.employee;
            vec![
                Spans::from(Span::styled(
                    format!("[{}] {}", employee.initials(), employee.full_name()),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
                Spans::from(""),
                Spans::from(format!("Position: {}", employee.position)),
                Spans::from(format!("Email:    {}", employee.email)),
                Spans::from(""),
                Spans::from(member.workload.clone()),
            ]
        }
        None => vec![Spans::from("Select a team member")],
    };
    let details = Paragraph::new(details).block(Block::default().title("Details").borders(Borders::ALL));
    frame.render_widget(details, columns[1]);

    frame.render_widget(help_bar("<Up/Down> Navigate | <Esc> Back"), rows[1]);
}

/// Returns true when the user leaves the screen.
pub fn handle_key(state: &mut TeamState, key: KeyCode) -> bool {
    let len = state.members.len();
    match key {
        KeyCode::Esc | KeyCode::Char('q') => return true,
        KeyCode::Down => state.list_state.select(step_index(state.list_state.selected(), len, true)),
        KeyCode::Up => state.list_state.select(step_index(state.list_state.selected(), len, false)),
        _ => {}
    }
    false
}
