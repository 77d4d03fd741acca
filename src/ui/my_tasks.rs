use std::collections::HashMap;

use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::Task;
use crate::tasks::{can_complete, can_start};
use crate::ui::components::{
    popup::{help_bar, render_confirmation},
    task_list::TaskListView,
};

pub struct MyTasksState {
    pub list: TaskListView,
    confirm_complete: bool,
}

#[derive(Debug)]
pub enum MyTasksAction {
    Back,
    Start(Task),
    Complete(Task),
}

impl MyTasksState {
    /// `tasks` are the employee's own, newest first.
    pub fn new(tasks: Vec<Task>, project_names: HashMap<i64, String>) -> Self {
        Self {
            list: TaskListView::new(tasks, project_names),
            confirm_complete: false,
        }
    }

    pub fn is_confirming(&self) -> bool {
        self.confirm_complete
    }
}

pub fn render_my_tasks<B: Backend>(frame: &mut Frame<B>, state: &mut MyTasksState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(5),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(frame.size());

    state.list.render(frame, chunks[0], chunks[1], "My tasks");

    let details = state
        .list
        .selected()
        .map(|task| {
            task.description
                .clone()
                .unwrap_or_else(|| "No description".to_string())
        })
        .unwrap_or_default();
    let details = Paragraph::new(details)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Description").borders(Borders::ALL));
    frame.render_widget(details, chunks[2]);

    let help = if state.list.searching {
        "Type to search | <Enter> Done"
    } else {
        "</> Search | <F> Status filter | <S> Start | <C> Complete | <Esc> Back"
    };
    frame.render_widget(help_bar(help), chunks[3]);

    if state.confirm_complete {
        render_confirmation(frame, "Mark this task as done?");
    }
}

pub fn handle_key(state: &mut MyTasksState, key: KeyCode) -> Option<MyTasksAction> {
    if state.confirm_complete {
        state.confirm_complete = false;
        if key == KeyCode::Char('y') {
            return state.list.selected().cloned().map(MyTasksAction::Complete);
        }
        return None;
    }

    if state.list.handle_key(key) {
        return None;
    }

    match key {
        KeyCode::Esc | KeyCode::Char('q') => Some(MyTasksAction::Back),
        KeyCode::Char('s') => state
            .list
            .selected()
            .filter(|task| can_start(task))
            .cloned()
            .map(MyTasksAction::Start),
        KeyCode::Char('c') => {
            if state.list.selected().is_some_and(can_complete) {
                state.confirm_complete = true;
            }
            None
        }
        _ => None,
    }
}
