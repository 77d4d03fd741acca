use chrono::NaiveDateTime;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub created_at: NaiveDateTime,
}
