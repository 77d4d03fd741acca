use chrono::{NaiveDate, NaiveDateTime};

pub const TIME_SHEET: &str = "TimeSheet";

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Report {
    pub id: i64,
    pub title: String,
    pub report_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_minutes: i64,
    pub report_data: String,
    pub created_by: i64,
    pub created_at: NaiveDateTime,
}
