use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::components::{edit_text, popup::{centered_rect, help_bar}};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LoginField {
    Email,
    Password,
}

pub struct LoginState {
    pub email: String,
    pub password: String,
    pub current_field: LoginField,
    pub error: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum LoginAction {
    Submit { email: String, password: String },
    Quit,
}

impl LoginState {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            current_field: LoginField::Email,
            error: None,
        }
    }

    pub fn switch_field(&mut self) {
        self.current_field = match self.current_field {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    /// Keep the typed email but clear the password after a failed attempt.
    pub fn reject(&mut self, message: &str) {
        self.password.clear();
        self.current_field = LoginField::Password;
        self.error = Some(message.to_string());
    }
}

pub fn render_login<B: Backend>(frame: &mut Frame<B>, state: &mut LoginState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)].as_ref())
        .split(size);

    let area = centered_rect(50, 50, chunks[0]);
    let field_style = |field: LoginField| {
        if state.current_field == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };
    let masked: String = "*".repeat(state.password.chars().count());

    let mut lines = vec![
        Spans::from(""),
        Spans::from(vec![
            Span::styled("Email:    ", field_style(LoginField::Email)),
            Span::raw(state.email.clone()),
        ]),
        Spans::from(""),
        Spans::from(vec![
            Span::styled("Password: ", field_style(LoginField::Password)),
            Span::raw(masked),
        ]),
        Spans::from(""),
    ];
    if let Some(error) = &state.error {
        lines.push(Spans::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let form = Paragraph::new(lines)
        .block(Block::default().title("Time Tracker - Sign in").borders(Borders::ALL))
        .alignment(Alignment::Left);
    frame.render_widget(form, area);

    frame.render_widget(
        help_bar("<Tab> Switch field | <Enter> Sign in | <Esc> Quit"),
        chunks[1],
    );
}

pub fn handle_key(state: &mut LoginState, key: KeyCode) -> Option<LoginAction> {
    match key {
        KeyCode::Esc => return Some(LoginAction::Quit),
        KeyCode::Tab | KeyCode::Up | KeyCode::Down => state.switch_field(),
        KeyCode::Enter => {
            if state.email.trim().is_empty() || state.password.is_empty() {
                state.error = Some("Enter email and password".to_string());
            } else {
                state.error = None;
                return Some(LoginAction::Submit {
                    email: state.email.clone(),
                    password: state.password.clone(),
                });
            }
        }
        _ => match state.current_field {
            LoginField::Email => edit_text(&mut state.email, key),
            LoginField::Password => edit_text(&mut state.password, key),
        },
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(state: &mut LoginState, text: &str) {
        for c in text.chars() {
            assert_eq!(handle_key(state, KeyCode::Char(c)), None);
        }
    }

    #[test]
    fn submit_requires_both_fields() {
        let mut state = LoginState::new();
        type_text(&mut state, "ada@example.com");
        assert_eq!(handle_key(&mut state, KeyCode::Enter), None);
        assert!(state.error.is_some());

        handle_key(&mut state, KeyCode::Tab);
        type_text(&mut state, "secret");
        assert_eq!(
            handle_key(&mut state, KeyCode::Enter),
            Some(LoginAction::Submit {
                email: "ada@example.com".to_string(),
                password: "secret".to_string(),
            })
        );
        assert!(state.error.is_none());
    }

    #[test]
    fn reject_clears_password_only() {
        let mut state = LoginState::new();
        type_text(&mut state, "ada@example.com");
        state.switch_field();
        type_text(&mut state, "wrong");
        state.reject("invalid email or password");
        assert_eq!(state.email, "ada@example.com");
        assert!(state.password.is_empty());
        assert_eq!(state.current_field, LoginField::Password);
    }

    #[test]
    fn escape_quits() {
        assert_eq!(handle_key(&mut LoginState::new(), KeyCode::Esc), Some(LoginAction::Quit));
    }
}
