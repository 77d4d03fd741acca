use std::collections::HashMap;

use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    text::Spans,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::Task;
use crate::ui::components::{
    popup::{help_bar, render_confirmation},
    task_list::TaskListView,
};

pub struct TaskManagerState {
    pub list: TaskListView,
    assignee_names: HashMap<i64, String>,
    confirm_delete: bool,
}

#[derive(Debug)]
pub enum TaskManagerAction {
    Back,
    NewTask,
    EditTask(Task),
    DeleteTask(i64),
    CycleStatus(Task),
    Reload,
}

impl TaskManagerState {
    pub fn new(
        tasks: Vec<Task>,
        project_names: HashMap<i64, String>,
        assignee_names: HashMap<i64, String>,
    ) -> Self {
        Self {
            list: TaskListView::new(tasks, project_names),
            assignee_names,
            confirm_delete: false,
        }
    }

    pub fn is_confirming(&self) -> bool {
        self.confirm_delete
    }

    fn assignee_name(&self, id: i64) -> &str {
        self.assignee_names
            .get(&id)
            .map(String::as_str)
            .unwrap_or("Unassigned")
    }
}

pub fn render_task_manager<B: Backend>(frame: &mut Frame<B>, state: &mut TaskManagerState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(6),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(frame.size());

    state.list.render(frame, chunks[0], chunks[1], "All tasks");

    let details: Vec<Spans> = match state.list.selected() {
        Some(task) => vec![
            Spans::from(format!("Assignee: {}", state.assignee_name(task.assigned_to))),
            Spans::from(format!("Project:  {}", state.list.project_name(task.project_id))),
            Spans::from(
                task.description
                    .clone()
                    .unwrap_or_else(|| "No description".to_string()),
            ),
        ],
        None => vec![Spans::from("No tasks match the filter")],
    };
    let details = Paragraph::new(details)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Details").borders(Borders::ALL));
    frame.render_widget(details, chunks[2]);

    let help = if state.list.searching {
        "Type to search | <Enter> Done"
    } else {
        "</> Search | <F> Status | <P> Project | <N> New | <E> Edit | <D> Delete | <C> Next status | <R> Reload | <Esc> Back"
    };
    frame.render_widget(help_bar(help), chunks[3]);

    if state.confirm_delete {
        render_confirmation(frame, "Delete this task?");
    }
}

pub fn handle_key(state: &mut TaskManagerState, key: KeyCode) -> Option<TaskManagerAction> {
    if state.confirm_delete {
        state.confirm_delete = false;
        if key == KeyCode::Char('y') {
            return state.list.selected().map(|t| TaskManagerAction::DeleteTask(t.id));
        }
        return None;
    }

    if state.list.handle_key(key) {
        return None;
    }

    match key {
        KeyCode::Esc | KeyCode::Char('q') => Some(TaskManagerAction::Back),
        KeyCode::Char('n') => Some(TaskManagerAction::NewTask),
        KeyCode::Char('r') => Some(TaskManagerAction::Reload),
        KeyCode::Char('p') => {
            state.list.cycle_project();
            None
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            state.list.selected().cloned().map(TaskManagerAction::EditTask)
        }
        KeyCode::Char('c') => state.list.selected().cloned().map(TaskManagerAction::CycleStatus),
        KeyCode::Char('d') => {
            if state.list.selected().is_some() {
                state.confirm_delete = true;
            }
            None
        }
        _ => None,
    }
}
