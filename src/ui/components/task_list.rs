use std::collections::HashMap;

use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{Task, TaskStatus};
use crate::tasks::TaskFilter;
use crate::ui::components::{edit_text, step_index};

/// A filtered, selectable list of tasks shared by the task screens.
pub struct TaskListView {
    tasks: Vec<Task>,
    project_names: HashMap<i64, String>,
    pub filter: TaskFilter,
    pub searching: bool,
    list_state: ListState,
}

impl TaskListView {
    pub fn new(tasks: Vec<Task>, project_names: HashMap<i64, String>) -> Self {
        let mut view = Self {
            tasks,
            project_names,
            filter: TaskFilter::default(),
            searching: false,
            list_state: ListState::default(),
        };
        view.reset_selection();
        view
    }

    /// Swap in freshly loaded tasks, keeping the filter and the selected task.
    /// If that task is gone the cursor stays on the same row.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        let selected_id = self.selected().map(|t| t.id);
        let previous = self.list_state.selected();
        self.tasks = tasks;

        let visible = self.visible();
        let index = if visible.is_empty() {
            None
        } else {
            Some(
                selected_id
                    .and_then(|id| visible.iter().position(|t| t.id == id))
                    .unwrap_or_else(|| previous.unwrap_or(0).min(visible.len() - 1)),
            )
        };
        self.list_state.select(index);
    }

    /// Put the cursor on a task if it is visible under the current filter.
    pub fn select_task(&mut self, id: i64) {
        let index = self.visible().iter().position(|t| t.id == id);
        if index.is_some() {
            self.list_state.select(index);
        }
    }

    pub fn visible(&self) -> Vec<&Task> {
        self.filter.apply(&self.tasks)
    }

    pub fn selected(&self) -> Option<&Task> {
        let index = self.list_state.selected()?;
        self.visible().into_iter().nth(index)
    }

    pub fn project_name(&self, project_id: i64) -> &str {
        self.project_names
            .get(&project_id)
            .map(String::as_str)
            .unwrap_or("Unknown project")
    }

    pub fn project_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.project_names.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn reset_selection(&mut self) {
        let len = self.visible().len();
        self.list_state.select(if len == 0 { None } else { Some(0) });
    }

    /// Navigation, search and status-filter keys. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        if self.searching {
            match key {
                KeyCode::Enter | KeyCode::Esc => self.searching = false,
                _ => edit_text(&mut self.filter.search, key),
            }
            self.reset_selection();
            return true;
        }

        let len = self.visible().len();
        match key {
            KeyCode::Down => self.list_state.select(step_index(self.list_state.selected(), len, true)),
            KeyCode::Up => self.list_state.select(step_index(self.list_state.selected(), len, false)),
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('f') => {
                self.filter.cycle_status();
                self.reset_selection();
            }
            _ => return false,
        }
        true
    }

    pub fn cycle_project(&mut self) {
        let ids = self.project_ids();
        self.filter.cycle_project(&ids);
        self.reset_selection();
    }

    pub fn render<B: Backend>(&mut self, frame: &mut Frame<B>, filter_area: Rect, list_area: Rect, title: &str) {
        let project = match self.filter.project_id {
            Some(id) => self.project_name(id).to_string(),
            None => "All".to_string(),
        };
        let search_style = if self.searching {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let filter_line = Paragraph::new(Spans::from(vec![
            Span::styled(format!("Search: {}", self.filter.search), search_style),
            Span::raw(format!("   Status: {}", self.filter.status_label())),
            Span::raw(format!("   Project: {}", project)),
        ]))
        .block(Block::default().title("Filter").borders(Borders::ALL));
        frame.render_widget(filter_line, filter_area);

        let items: Vec<ListItem> = self
            .visible()
            .into_iter()
            .map(|task| {
                ListItem::new(Spans::from(vec![
                    Span::styled(
                        format!("[{}] ", task.status.label()),
                        Style::default().fg(status_color(task.status)),
                    ),
                    Span::raw(task.title.clone()),
                    Span::styled(
                        format!("  ({})", self.project_name(task.project_id)),
                        Style::default().fg(Color::Gray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title(title.to_string()).borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(list, list_area, &mut self.list_state);
    }
}

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::New => Color::White,
        TaskStatus::InProgress => Color::Yellow,
        TaskStatus::InReview => Color::Magenta,
        TaskStatus::Done => Color::Green,
    }
}

#[cfg(test)]
pub(crate) fn sample_task(id: i64, title: &str, status: TaskStatus, project_id: i64) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: None,
        status,
        project_id,
        assigned_to: 1,
    }
}
