use chrono::NaiveDate;
use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::Project;
use crate::projects::ProjectDraft;
use crate::ui::components::{date_input::DateInputState, edit_text, popup::help_bar};

pub enum ProjectWizardAction {
    Cancel,
    Save(ProjectDraft),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum ProjectField {
    Name,
    StartDate,
    EndDate,
    Status,
}

pub struct ProjectWizardState {
    pub draft: ProjectDraft,
    pub current_field: ProjectField,
    pub editing: bool,
    pub error: Option<String>,
    pub start_date_state: DateInputState,
    pub end_date_state: DateInputState,
}

impl ProjectWizardState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            draft: ProjectDraft::new(today),
            current_field: ProjectField::Name,
            editing: false,
            error: None,
            start_date_state: DateInputState::new(today),
            end_date_state: DateInputState::new(today),
        }
    }

    pub fn from_existing(project: &Project) -> Self {
        let end_date = project.end_date.unwrap_or(project.start_date);
        Self {
            draft: ProjectDraft::from_project(project),
            current_field: ProjectField::Name,
            editing: false,
            error: None,
            start_date_state: DateInputState::new(project.start_date),
            end_date_state: DateInputState::new(end_date),
        }
    }

    pub fn toggle_editing(&mut self) {
        if self.current_field == ProjectField::Status {
            return;
        }
        self.editing = !self.editing;
        if self.editing {
            match self.current_field {
                ProjectField::StartDate => self.start_date_state.toggle_editing(),
                ProjectField::EndDate => self.end_date_state.toggle_editing(),
                _ => {}
            }
        } else {
            self.start_date_state.editing = false;
            self.end_date_state.editing = false;
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ProjectField::Name => ProjectField::StartDate,
            ProjectField::StartDate => ProjectField::EndDate,
            ProjectField::EndDate => ProjectField::Status,
            ProjectField::Status => ProjectField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            ProjectField::Name => ProjectField::Status,
            ProjectField::StartDate => ProjectField::Name,
            ProjectField::EndDate => ProjectField::StartDate,
            ProjectField::Status => ProjectField::EndDate,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            ProjectField::Name => edit_text(&mut self.draft.name, key),
            ProjectField::StartDate => {
                self.start_date_state.handle_input(key);
                self.draft.start_date = self.start_date_state.date;
            }
            ProjectField::EndDate => {
                self.end_date_state.handle_input(key);
                self.draft.end_date = Some(self.end_date_state.date);
            }
            ProjectField::Status => {}
        }
    }
}

pub fn render_project_wizard<B: Backend>(f: &mut Frame<B>, state: &mut ProjectWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title_text = if state.draft.id == 0 {
        "New project"
    } else {
        "Edit project"
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let help_text = if state.editing {
        match state.current_field {
            ProjectField::StartDate | ProjectField::EndDate => {
                "Enter - Save field | Left/Right - Switch date part | Up/Down - Change value"
            }
            _ => "Enter - Save field",
        }
    } else {
        "Enter - Edit field | Up/Down - Navigate | Left/Right - Status | C - Clear end date | S - Save | Esc - Cancel"
    };
    f.render_widget(help_bar(help_text), chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &ProjectWizardState, area: Rect) {
    let end_date = match (state.current_field, state.editing, state.draft.end_date) {
        (ProjectField::EndDate, true, _) => state.end_date_state.get_display_string(),
        (_, _, Some(date)) => date.format("%d.%m.%Y").to_string(),
        (_, _, None) => "Not set".to_string(),
    };
    let start_date = if state.current_field == ProjectField::StartDate && state.editing {
        state.start_date_state.get_display_string()
    } else {
        state.draft.start_date.format("%d.%m.%Y").to_string()
    };
    let name = if state.current_field == ProjectField::Name && state.editing {
        format!("{}|", state.draft.name)
    } else {
        state.draft.name.clone()
    };

    let fields = [
        (ProjectField::Name, "Name", name),
        (ProjectField::StartDate, "Start date", start_date),
        (ProjectField::EndDate, "End date", end_date),
        (ProjectField::Status, "Status", state.draft.status.label().to_string()),
    ];

    let mut items: Vec<ListItem> = fields
        .into_iter()
        .map(|(field, label, value)| {
            let selected = field == state.current_field;
            let label_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let value_style = if selected && state.editing {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{}: ", label), label_style),
                Span::styled(value, value_style),
            ]))
        })
        .collect();

    if let Some(error) = &state.error {
        items.push(ListItem::new(""));
        items.push(ListItem::new(Spans::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ))));
    }

    let form_list = List::new(items).block(Block::default().borders(Borders::ALL).title("Project details"));
    f.render_widget(form_list, area);
}

pub fn handle_key(state: &mut ProjectWizardState, key: KeyCode) -> Option<ProjectWizardAction> {
    if state.editing {
        match key {
            KeyCode::Enter | KeyCode::Esc => state.toggle_editing(),
            _ => state.edit_current_field(key),
        }
        return None;
    }

    match key {
        KeyCode::Esc => return Some(ProjectWizardAction::Cancel),
        KeyCode::Enter => state.toggle_editing(),
        KeyCode::Up => state.previous_field(),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Left | KeyCode::Right if state.current_field == ProjectField::Status => {
            state.draft.status = state.draft.status.next();
        }
        KeyCode::Char('c') if state.current_field == ProjectField::EndDate => {
            state.draft.end_date = None;
        }
        KeyCode::Char('s') => match state.draft.validate() {
            Ok(()) => {
                state.error = None;
                return Some(ProjectWizardAction::Save(state.draft.clone()));
            }
            Err(e) => state.error = Some(e.to_string()),
        },
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::date;
    use crate::models::ProjectStatus;

    fn type_name(state: &mut ProjectWizardState, name: &str) {
        handle_key(state, KeyCode::Enter);
        for c in name.chars() {
            handle_key(state, KeyCode::Char(c));
        }
        handle_key(state, KeyCode::Enter);
    }

    #[test]
    fn save_validates_name_and_dates() {
        let mut state = ProjectWizardState::new(date(2026, 5, 10));
        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.error.as_deref(), Some("Please enter the project name"));

        type_name(&mut state, "Billing");

        // End date one day before the start.
        handle_key(&mut state, KeyCode::Down);
        handle_key(&mut state, KeyCode::Down);
        handle_key(&mut state, KeyCode::Enter);
        handle_key(&mut state, KeyCode::Down);
        handle_key(&mut state, KeyCode::Enter);
        assert_eq!(state.draft.end_date, Some(date(2026, 5, 9)));
        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(
            state.error.as_deref(),
            Some("start date cannot be later than end date")
        );

        handle_key(&mut state, KeyCode::Char('c'));
        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(ProjectWizardAction::Save(draft)) => {
                assert_eq!(draft.name, "Billing");
                assert_eq!(draft.end_date, None);
            }
            _ => panic!("expected save"),
        }
        assert!(state.error.is_none());
    }

    #[test]
    fn status_cycles_on_its_field() {
        let mut state = ProjectWizardState::new(date(2026, 5, 10));
        state.current_field = ProjectField::Status;
        handle_key(&mut state, KeyCode::Enter);
        assert!(!state.editing);
        handle_key(&mut state, KeyCode::Right);
        assert_eq!(state.draft.status, ProjectStatus::Active);
    }

    #[test]
    fn existing_project_prefills_dates() {
        let project = Project {
            id: 3,
            name: "Audit".to_string(),
            start_date: date(2026, 2, 1),
            end_date: None,
            status: ProjectStatus::OnHold,
            manager_id: 1,
            department_id: 1,
        };
        let state = ProjectWizardState::from_existing(&project);
        assert_eq!(state.end_date_state.date, date(2026, 2, 1));
        assert_eq!(state.draft.status, ProjectStatus::OnHold);
        assert_eq!(state.draft.id, 3);
    }
}
