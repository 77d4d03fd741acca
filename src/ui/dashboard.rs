use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::Employee;
use crate::ui::components::{popup::help_bar, step_index};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuItem {
    TimeTracker,
    MyTasks,
    TaskManager,
    Projects,
    Team,
    Reports,
    Register,
    SignOut,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::TimeTracker => "Time tracker",
            MenuItem::MyTasks => "My tasks",
            MenuItem::TaskManager => "Task manager",
            MenuItem::Projects => "Projects",
            MenuItem::Team => "My team",
            MenuItem::Reports => "Reports",
            MenuItem::Register => "Register employee",
            MenuItem::SignOut => "Sign out",
        }
    }
}

/// Menu entries visible to the employee's role.
pub fn menu_for(employee: &Employee) -> Vec<MenuItem> {
    let role = employee.role;
    let mut items = vec![MenuItem::TimeTracker, MenuItem::MyTasks];
    if role.can_manage_tasks() {
        items.push(MenuItem::TaskManager);
        items.push(MenuItem::Projects);
    }
    if role.can_view_team() {
        items.push(MenuItem::Team);
    }
    items.push(MenuItem::Reports);
    if role.can_register() {
        items.push(MenuItem::Register);
    }
    items.push(MenuItem::SignOut);
    items
}

pub struct DashboardState {
    employee: Employee,
    items: Vec<MenuItem>,
    list_state: ListState,
}

impl DashboardState {
    pub fn new(employee: Employee) -> Self {
        let items = menu_for(&employee);
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            employee,
            items,
            list_state,
        }
    }

    pub fn selected_item(&self) -> Option<MenuItem> {
        self.list_state.selected().and_then(|i| self.items.get(i).copied())
    }
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, state: &mut DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(6),
                Constraint::Min(1),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let employee = &state.employee;
    let header = Paragraph::new(vec![
        Spans::from(Span::styled(
            format!("Welcome, {}!", employee.first_name),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Spans::from(employee.full_name()),
        Spans::from(employee.position.clone()),
        Spans::from(Span::styled(
            employee.role.label(),
            Style::default().fg(Color::Gray),
        )),
    ])
    .block(Block::default().title("Time Tracker").borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = state
        .items
        .iter()
        .map(|item| ListItem::new(item.label()))
        .collect();
    let menu = List::new(items)
        .block(Block::default().title("Menu").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(menu, chunks[1], &mut state.list_state);

    frame.render_widget(
        help_bar("<Up/Down> Navigate | <Enter> Open | <Q> Sign out"),
        chunks[2],
    );
}

pub fn handle_key(state: &mut DashboardState, key: KeyCode) -> Option<MenuItem> {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(MenuItem::SignOut),
        KeyCode::Down => {
            let next = step_index(state.list_state.selected(), state.items.len(), true);
            state.list_state.select(next);
        }
        KeyCode::Up => {
            let previous = step_index(state.list_state.selected(), state.items.len(), false);
            state.list_state.select(previous);
        }
        KeyCode::Enter => return state.selected_item(),
        _ => {}
    }
    None
}
