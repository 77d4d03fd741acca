use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use crate::db::Database;
use crate::error::TrackerError;
use crate::models::{Employee, Project, ProjectStatus};

/// Fields entered on the project form.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
}

impl ProjectDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            id: 0,
            name: String::new(),
            start_date: today,
            end_date: None,
            status: ProjectStatus::Planned,
        }
    }

    pub fn from_project(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            start_date: project.start_date,
            end_date: project.end_date,
            status: project.status,
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.name.trim().is_empty() {
            return Err(TrackerError::validation("Please enter the project name"));
        }
        if self.end_date.is_some_and(|end| end < self.start_date) {
            return Err(TrackerError::InvalidDateRange);
        }
        Ok(())
    }

    /// The row to persist; new projects belong to `manager` and their department.
    pub fn to_project(&self, manager: &Employee) -> Result<Project, TrackerError> {
        self.validate()?;
        Ok(Project {
            id: self.id,
            name: self.name.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            manager_id: manager.id,
            department_id: manager.department_id,
        })
    }
}

pub async fn save_project(db: &Database, draft: &ProjectDraft, manager: &Employee) -> Result<i64> {
    let project = draft.to_project(manager)?;
    if project.id == 0 {
        let id = db.create_project(&project).await?;
        info!(project_id = id, department_id = project.department_id, "project created");
        Ok(id)
    } else {
        db.update_project(&project).await?;
        info!(project_id = project.id, "project updated");
        Ok(project.id)
    }
}

/// Removes the project together with its tasks.
pub async fn delete_project(db: &Database, id: i64) -> Result<()> {
    db.delete_project(id).await?;
    info!(project_id = id, "project deleted");
    Ok(())
}
