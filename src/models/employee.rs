use chrono::NaiveDateTime;

use super::Role;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub position: String,
    pub department_id: i64,
    #[sqlx(rename = "role_id")]
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Upper-cased first letters of first and last name, `??` when either is missing.
    pub fn initials(&self) -> String {
        match (self.first_name.chars().next(), self.last_name.chars().next()) {
            (Some(first), Some(last)) => format!("{}{}", first, last).to_uppercase(),
            _ => "??".to_string(),
        }
    }
}

/// Row data for inserting an employee; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub position: String,
    pub department_id: i64,
    pub role: Role,
}
