use std::fmt;

#[derive(sqlx::Type, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "PascalCase")]
pub enum TaskStatus {
    New,
    InProgress,
    InReview,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::New,
        TaskStatus::InProgress,
        TaskStatus::InReview,
        TaskStatus::Done,
    ];

    /// Next status in the cycle New -> InProgress -> InReview -> Done -> New.
    pub fn next(self) -> Self {
        match self {
            TaskStatus::New => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::InReview,
            TaskStatus::InReview => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::New,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::New => "New",
            TaskStatus::InProgress => "In progress",
            TaskStatus::InReview => "In review",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub project_id: i64,
    pub assigned_to: i64,
}
