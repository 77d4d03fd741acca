use chrono::NaiveDate;

#[derive(sqlx::Type, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "PascalCase")]
pub enum ProjectStatus {
    Planned,
    Active,
    OnHold,
    Completed,
}

impl ProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Planned => "Planned",
            ProjectStatus::Active => "Active",
            ProjectStatus::OnHold => "On hold",
            ProjectStatus::Completed => "Completed",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ProjectStatus::Planned => ProjectStatus::Active,
            ProjectStatus::Active => ProjectStatus::OnHold,
            ProjectStatus::OnHold => ProjectStatus::Completed,
            ProjectStatus::Completed => ProjectStatus::Planned,
        }
    }
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub manager_id: i64,
    pub department_id: i64,
}
