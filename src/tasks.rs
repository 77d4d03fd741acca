use anyhow::Result;
use tracing::info;

use crate::db::Database;
use crate::error::TrackerError;
use crate::models::{Task, TaskStatus};

/// In-memory filter over a loaded task list. `None` means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub search: String,
    pub project_id: Option<i64>,
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() {
            let in_title = task.title.to_lowercase().contains(&needle);
            let in_description = task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }

        if self.project_id.is_some_and(|id| id != task.project_id) {
            return false;
        }

        if self.status.is_some_and(|status| status != task.status) {
            return false;
        }

        true
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }

    /// Step the status filter through All -> New -> ... -> Done -> All.
    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(TaskStatus::New),
            Some(TaskStatus::Done) => None,
            Some(status) => Some(status.next()),
        };
    }

    /// Step the project filter through All and each of `project_ids`.
    pub fn cycle_project(&mut self, project_ids: &[i64]) {
        self.project_id = match self.project_id {
            None => project_ids.first().copied(),
            Some(current) => {
                let position = project_ids.iter().position(|id| *id == current);
                position.and_then(|i| project_ids.get(i + 1).copied())
            }
        };
    }

    pub fn status_label(&self) -> &'static str {
        self.status.map(TaskStatus::label).unwrap_or("All")
    }
}

/// Fields entered on the task form.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub project_id: Option<i64>,
    pub assigned_to: Option<i64>,
    pub status: Option<TaskStatus>,
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            project_id: Some(task.project_id),
            assigned_to: Some(task.assigned_to),
            status: Some(task.status),
        }
    }

    /// Check the form and produce the row to persist.
    pub fn to_task(&self) -> Result<Task, TrackerError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TrackerError::validation("Please enter the task title"));
        }
        let assigned_to = self
            .assigned_to
            .ok_or_else(|| TrackerError::validation("Please choose an assignee"))?;
        let project_id = self
            .project_id
            .ok_or_else(|| TrackerError::validation("Please choose a project"))?;
        let description = self.description.trim();

        Ok(Task {
            id: self.id,
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            status: self.status.unwrap_or(TaskStatus::New),
            project_id,
            assigned_to,
        })
    }
}

/// Insert a new task or update the existing one in place.
pub async fn save_task(db: &Database, draft: &TaskDraft) -> Result<i64> {
    let task = draft.to_task()?;
    if task.id == 0 {
        let id = db.create_task(&task).await?;
        info!(task_id = id, project_id = task.project_id, assignee = task.assigned_to, "task created");
        Ok(id)
    } else {
        db.update_task(&task).await?;
        info!(task_id = task.id, "task updated");
        Ok(task.id)
    }
}

/// Move the task to the next status in the cycle.
pub async fn cycle_status(db: &Database, task: &Task) -> Result<TaskStatus> {
    let next = task.status.next();
    db.update_task_status(task.id, next).await?;
    info!(task_id = task.id, from = %task.status, to = %next, "task status changed");
    Ok(next)
}

pub fn can_start(task: &Task) -> bool {
    task.status == TaskStatus::New
}

pub fn can_complete(task: &Task) -> bool {
    matches!(task.status, TaskStatus::InProgress | TaskStatus::InReview)
}

/// New -> InProgress for the assignee.
pub async fn start_task(db: &Database, task: &Task) -> Result<()> {
    if !can_start(task) {
        return Err(TrackerError::validation(format!(
            "Task '{}' is already {}",
            task.title,
            task.status.label().to_lowercase()
        ))
        .into());
    }
    db.update_task_status(task.id, TaskStatus::InProgress).await?;
    info!(task_id = task.id, "task started");
    Ok(())
}

/// InProgress or InReview -> Done for the assignee.
pub async fn complete_task(db: &Database, task: &Task) -> Result<()> {
    if !can_complete(task) {
        return Err(TrackerError::validation(format!(
            "Task '{}' must be in progress or in review to complete it",
            task.title
        ))
        .into());
    }
    db.update_task_status(task.id, TaskStatus::Done).await?;
    info!(task_id = task.id, "task completed");
    Ok(())
}

/// Total, active and completed counts for a set of tasks.
pub fn workload_summary(tasks: &[Task]) -> String {
    let completed = tasks.iter().filter(|t| t.status == TaskStatus::Done).count();
    format!(
        "Tasks total: {} • Active: {} • Completed: {}",
        tasks.len(),
        tasks.len() - completed,
        completed
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{department, employee, project, task};
    use crate::models::Role;

    fn sample(id: i64, title: &str, description: Option<&str>, status: TaskStatus, project_id: i64) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: description.map(str::to_string),
            status,
            project_id,
            assigned_to: 1,
        }
    }

    fn tasks() -> Vec<Task> {
        vec![
            sample(1, "Fix login bug", None, TaskStatus::New, 10),
            sample(2, "Write docs", Some("Describe the LOGIN flow"), TaskStatus::InProgress, 10),
            sample(3, "Deploy", Some("staging first"), TaskStatus::Done, 20),
        ]
    }

    fn ids(filtered: Vec<&Task>) -> Vec<i64> {
        filtered.into_iter().map(|t| t.id).collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let all = tasks();
        assert_eq!(ids(TaskFilter::default().apply(&all)), vec![1, 2, 3]);

        let blank = TaskFilter { search: "   ".to_string(), ..TaskFilter::default() };
        assert_eq!(ids(blank.apply(&all)), vec![1, 2, 3]);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let all = tasks();
        let filter = TaskFilter { search: "Login".to_string(), ..TaskFilter::default() };
        assert_eq!(ids(filter.apply(&all)), vec![1, 2]);
    }

    #[test]
    fn filters_combine() {
        let all = tasks();
        let filter = TaskFilter {
            search: "login".to_string(),
            project_id: Some(10),
            status: Some(TaskStatus::InProgress),
        };
        assert_eq!(ids(filter.apply(&all)), vec![2]);

        let by_project = TaskFilter { project_id: Some(20), ..TaskFilter::default() };
        assert_eq!(ids(by_project.apply(&all)), vec![3]);
    }

    #[test]
    fn status_filter_cycles_through_all() {
        let mut filter = TaskFilter::default();
        let mut labels = vec![filter.status_label()];
        for _ in 0..5 {
            filter.cycle_status();
            labels.push(filter.status_label());
        }
        assert_eq!(labels, vec!["All", "New", "In progress", "In review", "Done", "All"]);
    }

    #[test]
    fn project_filter_cycles_through_all() {
        let mut filter = TaskFilter::default();
        filter.cycle_project(&[10, 20]);
        assert_eq!(filter.project_id, Some(10));
        filter.cycle_project(&[10, 20]);
        assert_eq!(filter.project_id, Some(20));
        filter.cycle_project(&[10, 20]);
        assert_eq!(filter.project_id, None);
        filter.cycle_project(&[]);
        assert_eq!(filter.project_id, None);
    }

    #[test]
    fn draft_validation_and_trimming() {
        let mut draft = TaskDraft::default();
        assert_eq!(draft.to_task().unwrap_err(), TrackerError::validation("Please enter the task title"));

        draft.title = "  Ship it ".to_string();
        assert_eq!(draft.to_task().unwrap_err(), TrackerError::validation("Please choose an assignee"));

        draft.assigned_to = Some(4);
        assert_eq!(draft.to_task().unwrap_err(), TrackerError::validation("Please choose a project"));

        draft.project_id = Some(7);
        draft.description = "   ".to_string();
        let task = draft.to_task().unwrap();
        assert_eq!(task.title, "Ship it");
        assert_eq!(task.description, None);
        assert_eq!(task.status, TaskStatus::New);
    }

    #[test]
    fn start_and_complete_guards() {
        let new = sample(1, "a", None, TaskStatus::New, 1);
        let review = sample(2, "b", None, TaskStatus::InReview, 1);
        let done = sample(3, "c", None, TaskStatus::Done, 1);
        assert!(can_start(&new) && !can_start(&review));
        assert!(can_complete(&review) && !can_complete(&new) && !can_complete(&done));
    }

    #[test]
    fn workload_counts() {
        assert_eq!(workload_summary(&tasks()), "Tasks total: 3 • Active: 2 • Completed: 1");
        assert_eq!(workload_summary(&[]), "Tasks total: 0 • Active: 0 • Completed: 0");
    }

    #[tokio::test]
    async fn save_creates_then_updates_in_place() {
        let db = Database::in_memory().await.unwrap();
        let dept = department(&db, "QA").await;
        let emp = employee(&db, dept, "Kent", "Beck", Role::Manager).await;
        let proj = project(&db, dept, emp, "Suite").await;

        let mut draft = TaskDraft {
            title: "Add tests".to_string(),
            project_id: Some(proj),
            assigned_to: Some(emp),
            ..TaskDraft::default()
        };
        let id = save_task(&db, &draft).await.unwrap();

        draft.id = id;
        draft.title = "Add more tests".to_string();
        assert_eq!(save_task(&db, &draft).await.unwrap(), id);

        let all = db.get_tasks().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Add more tests");
    }

    #[tokio::test]
    async fn lifecycle_transitions_persist() {
        let db = Database::in_memory().await.unwrap();
        let dept = department(&db, "QA").await;
        let emp = employee(&db, dept, "Kent", "Beck", Role::Employee).await;
        let proj = project(&db, dept, emp, "Suite").await;
        let id = task(&db, proj, emp, "Refactor", TaskStatus::New).await;

        let loaded = db.get_task(id).await.unwrap();
        assert!(complete_task(&db, &loaded).await.is_err());
        start_task(&db, &loaded).await.unwrap();

        let loaded = db.get_task(id).await.unwrap();
        assert_eq!(loaded.status, TaskStatus::InProgress);
        assert!(start_task(&db, &loaded).await.is_err());
        complete_task(&db, &loaded).await.unwrap();
        assert_eq!(db.get_task(id).await.unwrap().status, TaskStatus::Done);

        let loaded = db.get_task(id).await.unwrap();
        assert_eq!(cycle_status(&db, &loaded).await.unwrap(), TaskStatus::New);
        assert_eq!(db.get_task(id).await.unwrap().status, TaskStatus::New);
    }
}
