use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{Task, TaskStatus};
use crate::tasks::TaskDraft;
use crate::ui::components::{edit_text, popup::help_bar, step_index};

pub enum TaskWizardAction {
    Cancel,
    Save(TaskDraft),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum TaskField {
    Title,
    Description,
    Project,
    Assignee,
    Status,
}

impl TaskField {
    const ALL: [TaskField; 5] = [
        TaskField::Title,
        TaskField::Description,
        TaskField::Project,
        TaskField::Assignee,
        TaskField::Status,
    ];

    fn label(self) -> &'static str {
        match self {
            TaskField::Title => "Title",
            TaskField::Description => "Description",
            TaskField::Project => "Project",
            TaskField::Assignee => "Assignee",
            TaskField::Status => "Status",
        }
    }

    fn is_text(self) -> bool {
        matches!(self, TaskField::Title | TaskField::Description)
    }
}

/// `(id, display name)` pairs offered for a choice field.
pub type Choices = Vec<(i64, String)>;

pub struct TaskWizardState {
    pub draft: TaskDraft,
    pub current_field: TaskField,
    pub editing: bool,
    pub error: Option<String>,
    projects: Choices,
    employees: Choices,
}

impl TaskWizardState {
    pub fn new(projects: Choices, employees: Choices) -> Self {
        Self {
            draft: TaskDraft::default(),
            current_field: TaskField::Title,
            editing: false,
            error: None,
            projects,
            employees,
        }
    }

    pub fn from_existing(task: &Task, projects: Choices, employees: Choices) -> Self {
        Self {
            draft: TaskDraft::from_task(task),
            ..Self::new(projects, employees)
        }
    }

    pub fn is_new(&self) -> bool {
        self.draft.id == 0
    }

    pub fn next_field(&mut self) {
        let index = TaskField::ALL.iter().position(|f| *f == self.current_field);
        if let Some(next) = step_index(index, TaskField::ALL.len(), true) {
            self.current_field = TaskField::ALL[next];
        }
    }

    pub fn previous_field(&mut self) {
        let index = TaskField::ALL.iter().position(|f| *f == self.current_field);
        if let Some(previous) = step_index(index, TaskField::ALL.len(), false) {
            self.current_field = TaskField::ALL[previous];
        }
    }

    /// Left/Right on a choice field.
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.current_field {
            TaskField::Project => {
                self.draft.project_id = step_choice(&self.projects, self.draft.project_id, forward)
            }
            TaskField::Assignee => {
                self.draft.assigned_to = step_choice(&self.employees, self.draft.assigned_to, forward)
            }
            TaskField::Status => {
                let index = self
                    .draft
                    .status
                    .and_then(|s| TaskStatus::ALL.iter().position(|x| *x == s));
                self.draft.status = step_index(index, TaskStatus::ALL.len(), forward)
                    .map(|i| TaskStatus::ALL[i]);
            }
            TaskField::Title | TaskField::Description => {}
        }
    }

    fn value(&self, field: TaskField) -> String {
        let name_of = |choices: &Choices, id: Option<i64>| {
            id.and_then(|id| choices.iter().find(|(c, _)| *c == id))
                .map(|(_, name)| name.clone())
                .unwrap_or_else(|| "Not selected".to_string())
        };
        match field {
            TaskField::Title => self.draft.title.clone(),
            TaskField::Description => self.draft.description.clone(),
            TaskField::Project => name_of(&self.projects, self.draft.project_id),
            TaskField::Assignee => name_of(&self.employees, self.draft.assigned_to),
            TaskField::Status => self
                .draft
                .status
                .unwrap_or(TaskStatus::New)
                .label()
                .to_string(),
        }
    }
}

fn step_choice(choices: &Choices, current: Option<i64>, forward: bool) -> Option<i64> {
    let index = current.and_then(|id| choices.iter().position(|(c, _)| *c == id));
    step_index(index, choices.len(), forward).map(|i| choices[i].0)
}

pub fn render_task_wizard<B: Backend>(f: &mut Frame<B>, state: &mut TaskWizardState) {
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

    let title_text = if state.is_new() { "New task" } else { "Edit task" };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let help_text = if state.editing {
        "Type text | Enter - Done"
    } else {
        "Up/Down - Navigate | Enter - Edit text | Left/Right - Change choice | S - Save | Esc - Cancel"
    };
    f.render_widget(help_bar(help_text), chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &TaskWizardState, area: Rect) {
    let mut items: Vec<ListItem> = TaskField::ALL
        .iter()
        .map(|field| {
            let selected = *field == state.current_field;
            let label_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let mut value = state.value(*field);
            if selected && state.editing {
                value.push('|');
            } else if selected && !field.is_text() {
                value = format!("< {} >", value);
            }
            let value_style = if selected && state.editing {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{}: ", field.label()), label_style),
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

    let form = List::new(items).block(Block::default().borders(Borders::ALL).title("Task details"));
    f.render_widget(form, area);
}

pub fn handle_key(state: &mut TaskWizardState, key: KeyCode) -> Option<TaskWizardAction> {
    if state.editing {
        match key {
            KeyCode::Enter | KeyCode::Esc => state.editing = false,
            _ => match state.current_field {
                TaskField::Title => edit_text(&mut state.draft.title, key),
                TaskField::Description => edit_text(&mut state.draft.description, key),
                _ => {}
            },
        }
        return None;
    }

    match key {
        KeyCode::Esc => return Some(TaskWizardAction::Cancel),
        KeyCode::Enter if state.current_field.is_text() => state.editing = true,
        KeyCode::Up => state.previous_field(),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Left => state.cycle_choice(false),
        KeyCode::Right => state.cycle_choice(true),
        KeyCode::Char('s') => match state.draft.to_task() {
            Ok(_) => {
                state.error = None;
                return Some(TaskWizardAction::Save(state.draft.clone()));
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

    fn wizard() -> TaskWizardState {
        TaskWizardState::new(
            vec![(3, "Core".to_string()), (8, "Web".to_string())],
            vec![(1, "Ada Lovelace".to_string())],
        )
    }

    #[test]
    fn save_reports_first_missing_field() {
        let mut state = wizard();
        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.error.as_deref(), Some("Please enter the task title"));

        handle_key(&mut state, KeyCode::Enter);
        for c in "Fix tests".chars() {
            handle_key(&mut state, KeyCode::Char(c));
        }
        handle_key(&mut state, KeyCode::Enter);
        assert!(!state.editing);
        handle_key(&mut state, KeyCode::Char('s'));
        assert_eq!(state.error.as_deref(), Some("Please choose an assignee"));
    }

    #[test]
    fn choices_cycle_and_save() {
        let mut state = wizard();
        state.draft.title = "Fix tests".to_string();
        handle_key(&mut state, KeyCode::Down);
        handle_key(&mut state, KeyCode::Down);
        handle_key(&mut state, KeyCode::Left);
        assert_eq!(state.draft.project_id, Some(3));
        handle_key(&mut state, KeyCode::Left);
        assert_eq!(state.draft.project_id, Some(8));
        handle_key(&mut state, KeyCode::Down);
        handle_key(&mut state, KeyCode::Right);
        assert_eq!(state.draft.assigned_to, Some(1));

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(TaskWizardAction::Save(draft)) => {
                assert_eq!(draft.project_id, Some(8));
                assert_eq!(draft.title, "Fix tests");
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn editing_existing_keeps_id_and_status() {
        let task = Task {
            id: 12,
            title: "Review".to_string(),
            description: Some("PR 4".to_string()),
            status: TaskStatus::InReview,
            project_id: 3,
            assigned_to: 1,
        };
        let mut state = TaskWizardState::from_existing(&task, Vec::new(), Vec::new());
        assert!(!state.is_new());
        state.current_field = TaskField::Status;
        handle_key(&mut state, KeyCode::Right);
        assert_eq!(state.draft.status, Some(TaskStatus::Done));
        assert_eq!(state.value(TaskField::Description), "PR 4");
    }
}
