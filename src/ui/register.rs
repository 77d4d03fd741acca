use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::auth::RegistrationForm;
use crate::models::{Department, Role};
use crate::ui::components::{edit_text, popup::help_bar, step_index};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum RegisterField {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    Position,
    Department,
    Role,
}

impl RegisterField {
    fn label(self) -> &'static str {
        match self {
            RegisterField::FirstName => "First name",
            RegisterField::LastName => "Last name",
            RegisterField::Email => "Email",
            RegisterField::Password => "Password",
            RegisterField::ConfirmPassword => "Confirm password",
            RegisterField::Position => "Position",
            RegisterField::Department => "Department",
            RegisterField::Role => "Role",
        }
    }
}

pub struct RegisterState {
    pub form: RegistrationForm,
    pub current_field: RegisterField,
    pub error: Option<String>,
    departments: Vec<Department>,
    fields: Vec<RegisterField>,
}

pub enum RegisterAction {
    Cancel,
    Submit(RegistrationForm),
}

impl RegisterState {
    /// The role field is only offered when `can_assign_roles`.
    pub fn new(departments: Vec<Department>, can_assign_roles: bool) -> Self {
        let mut fields = vec![
            RegisterField::FirstName,
            RegisterField::LastName,
            RegisterField::Email,
            RegisterField::Password,
            RegisterField::ConfirmPassword,
            RegisterField::Position,
            RegisterField::Department,
        ];
        if can_assign_roles {
            fields.push(RegisterField::Role);
        }
        Self {
            form: RegistrationForm::default(),
            current_field: RegisterField::FirstName,
            error: None,
            departments,
            fields,
        }
    }

    fn step_field(&mut self, forward: bool) {
        let index = self.fields.iter().position(|f| *f == self.current_field);
        if let Some(i) = step_index(index, self.fields.len(), forward) {
            self.current_field = self.fields[i];
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        let form = &mut self.form;
        match self.current_field {
            RegisterField::FirstName => Some(&mut form.first_name),
            RegisterField::LastName => Some(&mut form.last_name),
            RegisterField::Email => Some(&mut form.email),
            RegisterField::Password => Some(&mut form.password),
            RegisterField::ConfirmPassword => Some(&mut form.confirm_password),
            RegisterField::Position => Some(&mut form.position),
            RegisterField::Department | RegisterField::Role => None,
        }
    }

    fn cycle_choice(&mut self, forward: bool) {
        match self.current_field {
            RegisterField::Department => {
                let index = self
                    .form
                    .department_id
                    .and_then(|id| self.departments.iter().position(|d| d.id == id));
                self.form.department_id =
                    step_index(index, self.departments.len(), forward).map(|i| self.departments[i].id);
            }
            RegisterField::Role => {
                let current = self.form.role.unwrap_or(Role::Employee);
                let index = Role::ALL.iter().position(|r| *r == current);
                self.form.role = step_index(index, Role::ALL.len(), forward).map(|i| Role::ALL[i]);
            }
            _ => {}
        }
    }

    fn value(&self, field: RegisterField) -> String {
        let form = &self.form;
        match field {
            RegisterField::FirstName => form.first_name.clone(),
            RegisterField::LastName => form.last_name.clone(),
            RegisterField::Email => form.email.clone(),
            RegisterField::Password => "*".repeat(form.password.chars().count()),
            RegisterField::ConfirmPassword => "*".repeat(form.confirm_password.chars().count()),
            RegisterField::Position => form.position.clone(),
            RegisterField::Department => form
                .department_id
                .and_then(|id| self.departments.iter().find(|d| d.id == id))
                .map(|d| d.name.clone())
                .unwrap_or_else(|| "Not selected".to_string()),
            RegisterField::Role => form.role.unwrap_or(Role::Employee).label().to_string(),
        }
    }
}

pub fn render_register<B: Backend>(frame: &mut Frame<B>, state: &mut RegisterState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(10), Constraint::Length(2)].as_ref())
        .split(frame.size());

    let mut items: Vec<ListItem> = state
        .fields
        .iter()
        .map(|field| {
            let selected = *field == state.current_field;
            let label_style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut value = state.value(*field);
            if selected {
                match field {
                    RegisterField::Department | RegisterField::Role => value = format!("< {} >", value),
                    _ => value.push('|'),
                }
            }
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{:<18}", format!("{}:", field.label())), label_style),
                Span::raw(value),
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

    let form = List::new(items).block(Block::default().title("Register employee").borders(Borders::ALL));
    frame.render_widget(form, chunks[0]);

    frame.render_widget(
        help_bar("<Tab/Up/Down> Navigate | <Left/Right> Change choice | <Enter> Register | <Esc> Cancel"),
        chunks[1],
    );
}

pub fn handle_key(state: &mut RegisterState, key: KeyCode) -> Option<RegisterAction> {
    match key {
        KeyCode::Esc => return Some(RegisterAction::Cancel),
        KeyCode::Tab | KeyCode::Down => state.step_field(true),
        KeyCode::BackTab | KeyCode::Up => state.step_field(false),
        KeyCode::Left => state.cycle_choice(false),
        KeyCode::Right => state.cycle_choice(true),
        KeyCode::Enter => match state.form.validate() {
            Ok(()) => {
                state.error = None;
                return Some(RegisterAction::Submit(state.form.clone()));
            }
            Err(e) => state.error = Some(e.to_string()),
        },
        _ => {
            if let Some(text) = state.text_mut() {
                edit_text(text, key);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{at, date};

    fn departments() -> Vec<Department> {
        let created_at = at(date(2026, 1, 1), 0, 0);
        vec![
            Department { id: 1, name: "Finance".to_string(), created_at },
            Department { id: 2, name: "IT".to_string(), created_at },
        ]
    }

    fn type_text(state: &mut RegisterState, text: &str) {
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
    }

    #[test]
    fn fills_the_form_and_submits() {
        let mut state = RegisterState::new(departments(), false);
        for value in ["Ada", "Lovelace", "ada@example.com", "pw", "pw", "Analyst"] {
            type_text(&mut state, value);
            handle_key(&mut state, KeyCode::Tab);
        }
        assert_eq!(state.current_field, RegisterField::Department);
        assert!(handle_key(&mut state, KeyCode::Enter).is_none());
        assert_eq!(state.error.as_deref(), Some("Please select a department"));

        handle_key(&mut state, KeyCode::Right);
        handle_key(&mut state, KeyCode::Right);
        assert_eq!(state.value(RegisterField::Department), "IT");
        match handle_key(&mut state, KeyCode::Enter) {
            Some(RegisterAction::Submit(form)) => {
                assert_eq!(form.department_id, Some(2));
                assert_eq!(form.role, None);
                assert_eq!(form.last_name, "Lovelace");
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn role_field_only_for_administrators() {
        let mut manager_view = RegisterState::new(departments(), false);
        handle_key(&mut manager_view, KeyCode::Up);
        assert_eq!(manager_view.current_field, RegisterField::Department);

        let mut admin_view = RegisterState::new(departments(), true);
        handle_key(&mut admin_view, KeyCode::Up);
        assert_eq!(admin_view.current_field, RegisterField::Role);
        handle_key(&mut admin_view, KeyCode::Right);
        assert_eq!(admin_view.form.role, Some(Role::Manager));
    }

    #[test]
    fn password_is_masked() {
        let mut state = RegisterState::new(departments(), false);
        state.current_field = RegisterField::Password;
        type_text(&mut state, "secret");
        assert_eq!(state.form.password, "secret");
        assert_eq!(state.value(RegisterField::Password), "******");
    }
}
