use chrono::NaiveDateTime;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct TimeEntry {
    pub id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub duration_minutes: Option<i64>,
    pub employee_id: i64,
    pub task_id: Option<i64>,
}
