use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::models::Project;
use crate::ui::components::{
    popup::{help_bar, render_confirmation},
    step_index,
};

// Represents the state of the department projects screen
pub struct ProjectsState {
    projects: Vec<Project>,
    list_state: ListState,
    show_delete_confirmation: bool,
}

impl ProjectsState {
    pub fn new(projects: Vec<Project>) -> Self {
        let mut list_state = ListState::default();
        if !projects.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            projects,
            list_state,
            show_delete_confirmation: false,
        }
    }

    pub fn next(&mut self) {
        let next = step_index(self.list_state.selected(), self.projects.len(), true);
        self.list_state.select(next);
    }

    pub fn previous(&mut self) {
        let previous = step_index(self.list_state.selected(), self.projects.len(), false);
        self.list_state.select(previous);
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.list_state.selected().and_then(|i| self.projects.get(i))
    }
}

#[derive(Debug)]
pub enum ProjectAction {
    Back,
    NewProject,
    EditProject(Project),
    DeleteProject(i64),
}

pub fn render_projects<B: Backend>(frame: &mut Frame<B>, state: &mut ProjectsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)].as_ref())
        .split(frame.size());

    let items: Vec<ListItem> = state
        .projects
        .iter()
        .map(|project| {
            let dates = match project.end_date {
                Some(end_date) => format!(
                    "{} - {}",
                    project.start_date.format("%d.%m.%Y"),
                    end_date.format("%d.%m.%Y")
                ),
                None => format!("{} - open", project.start_date.format("%d.%m.%Y")),
            };

            ListItem::new(Spans::from(vec![
                Span::raw(project.name.clone()),
                Span::raw(" ("),
                Span::raw(dates),
                Span::raw(") "),
                Span::styled(
                    format!("[{}]", project.status.label()),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let projects_list = List::new(items)
        .block(Block::default().title("Department projects").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(projects_list, chunks[0], &mut state.list_state);

    let buttons_text = if state.selected_project().is_some() {
        "<N> New Project | <E> Edit Project | <D> Delete Project | <Esc> Back"
    } else {
        "<N> New Project | <Esc> Back"
    };
    frame.render_widget(help_bar(buttons_text), chunks[1]);

    if state.show_delete_confirmation {
        render_confirmation(frame, "Delete this project and all of its tasks?");
    }
}

pub fn handle_key(state: &mut ProjectsState, key: KeyCode) -> Option<ProjectAction> {
    if state.show_delete_confirmation {
        state.toggle_delete_confirmation();
        if key == KeyCode::Char('y') {
            return state.selected_project().map(|p| ProjectAction::DeleteProject(p.id));
        }
        return None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ProjectAction::Back),
        KeyCode::Char('n') => return Some(ProjectAction::NewProject),
        KeyCode::Char('e') | KeyCode::Enter => {
            return state.selected_project().cloned().map(ProjectAction::EditProject);
        }
        KeyCode::Char('d') => {
            if state.selected_project().is_some() {
                state.toggle_delete_confirmation();
            }
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::date;
    use crate::models::ProjectStatus;

    fn project(id: i64, name: &str) -> Project {
        Project {
            id,
            name: name.to_string(),
            start_date: date(2026, 1, 1),
            end_date: None,
            status: ProjectStatus::Active,
            manager_id: 1,
            department_id: 1,
        }
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut state = ProjectsState::new(vec![project(1, "Alpha"), project(2, "Beta")]);
        handle_key(&mut state, KeyCode::Down);
        assert!(handle_key(&mut state, KeyCode::Char('d')).is_none());
        assert!(matches!(
            handle_key(&mut state, KeyCode::Char('y')),
            Some(ProjectAction::DeleteProject(2))
        ));

        handle_key(&mut state, KeyCode::Char('d'));
        assert!(handle_key(&mut state, KeyCode::Char('n')).is_none());
        assert!(matches!(handle_key(&mut state, KeyCode::Esc), Some(ProjectAction::Back)));
    }

    #[test]
    fn empty_list_only_offers_new() {
        let mut state = ProjectsState::new(Vec::new());
        assert!(handle_key(&mut state, KeyCode::Char('e')).is_none());
        assert!(handle_key(&mut state, KeyCode::Char('d')).is_none());
        assert!(matches!(handle_key(&mut state, KeyCode::Char('n')), Some(ProjectAction::NewProject)));
    }
}
