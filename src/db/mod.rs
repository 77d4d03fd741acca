use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::Config;
use crate::error::TrackerError;
use crate::models::{
    Department, Employee, NewEmployee, Project, Report, Task, TaskStatus, TimeEntry,
};

const EMPLOYEE_COLUMNS: &str = "id, first_name, last_name, email, password_hash, position, department_id, role_id, created_at, updated_at";
const PROJECT_COLUMNS: &str = "id, name, start_date, end_date, status, manager_id, department_id";
const TASK_COLUMNS: &str = "id, title, description, status, project_id, assigned_to";
const TIME_ENTRY_COLUMNS: &str = "id, start_time, end_time, duration_minutes, employee_id, task_id";
const REPORT_COLUMNS: &str = "id, title, report_type, start_date, end_date, total_minutes, report_data, created_by, created_at";

/// Database connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(config.database_url())
            .await?;

        Ok(Self { pool })
    }

    /// Fresh private database for tests. A single connection that never
    /// expires, since every SQLite memory connection is its own database.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(self.get_pool()).await?;
        Ok(())
    }

    // Department operations
    pub async fn get_departments(&self) -> Result<Vec<Department>> {
        let departments = sqlx::query_as::<_, Department>(
            "SELECT id, name, created_at FROM departments ORDER BY name ASC",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(departments)
    }

    pub async fn get_department(&self, id: i64) -> Result<Department> {
        sqlx::query_as::<_, Department>("SELECT id, name, created_at FROM departments WHERE id = ?")
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?
            .ok_or_else(|| TrackerError::NotFound { entity: "department", id }.into())
    }

    pub async fn find_department_by_name(&self, name: &str) -> Result<Option<Department>> {
        let department = sqlx::query_as::<_, Department>(
            "SELECT id, name, created_at FROM departments WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(department)
    }

    pub async fn create_department(&self, name: &str, created_at: NaiveDateTime) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO departments (name, created_at) VALUES (?, ?) RETURNING id",
        )
        .bind(name)
        .bind(created_at)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn update_department(&self, id: i64, name: &str) -> Result<()> {
        let result = sqlx::query("UPDATE departments SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(self.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(TrackerError::NotFound { entity: "department", id }.into());
        }

        Ok(())
    }

    /// Fails while employees or projects still reference the department.
    pub async fn delete_department(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM departments WHERE id = ?")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(TrackerError::NotFound { entity: "department", id }.into());
        }

        Ok(())
    }

    // Employee operations
    pub async fn get_employees(&self) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY last_name ASC, first_name ASC"
        ))
        .fetch_all(self.get_pool())
        .await?;

        Ok(employees)
    }

    pub async fn get_employee(&self, id: i64) -> Result<Employee> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?
        .ok_or_else(|| TrackerError::NotFound { entity: "employee", id }.into())
    }

    pub async fn find_employee_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(employee)
    }

    /// Colleagues in a department, excluding one employee (usually the viewer).
    pub async fn get_department_members(
        &self,
        department_id: i64,
        exclude_id: i64,
    ) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            r#"
            SELECT {EMPLOYEE_COLUMNS}
            FROM employees
            WHERE department_id = ? AND id <> ?
            ORDER BY last_name ASC, first_name ASC
            "#
        ))
        .bind(department_id)
        .bind(exclude_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(employees)
    }

    pub async fn create_employee(
        &self,
        employee: &NewEmployee,
        created_at: NaiveDateTime,
    ) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO employees (first_name, last_name, email, password_hash, position, department_id, role_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.password_hash)
        .bind(&employee.position)
        .bind(employee.department_id)
        .bind(employee.role)
        .bind(created_at)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    /// Write the profile fields back and stamp `updated_at`.
    /// The password hash is left alone.
    pub async fn update_employee(&self, employee: &Employee, updated_at: NaiveDateTime) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET first_name = ?, last_name = ?, email = ?, position = ?, department_id = ?, role_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.position)
        .bind(employee.department_id)
        .bind(employee.role)
        .bind(updated_at)
        .bind(employee.id)
        .execute(self.get_pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(TrackerError::NotFound { entity: "employee", id: employee.id }.into());
        }

        Ok(())
    }

    pub async fn delete_employee(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(TrackerError::NotFound { entity: "employee", id }.into());
        }

        Ok(())
    }

    // Project operations
    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY name ASC"
        ))
        .fetch_all(self.get_pool())
        .await?;

        Ok(projects)
    }

    pub async fn get_projects_by_department(&self, department_id: i64) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE department_id = ? ORDER BY name ASC"
        ))
        .bind(department_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(projects)
    }

    pub async fn get_project(&self, id: i64) -> Result<Project> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?
        .ok_or_else(|| TrackerError::NotFound { entity: "project", id }.into())
    }

    pub async fn create_project(&self, project: &Project) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO projects (name, start_date, end_date, status, manager_id, department_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&project.name)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.status)
        .bind(project.manager_id)
        .bind(project.department_id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn update_project(&self, project: &Project) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE projects
            SET name = ?, start_date = ?, end_date = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.name)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.status)
        .bind(project.id)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    pub async fn delete_project(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Time entries keep their rows; the schema nulls their task link
        sqlx::query("DELETE FROM tasks WHERE project_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    // Task operations
    pub async fn get_tasks(&self) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY id ASC"
        ))
        .fetch_all(self.get_pool())
        .await?;

        Ok(tasks)
    }

    /// Tasks assigned to an employee, newest first.
    pub async fn get_tasks_by_assignee(&self, employee_id: i64) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE assigned_to = ? ORDER BY id DESC"
        ))
        .bind(employee_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(tasks)
    }

    pub async fn get_tasks_by_assignee_and_status(
        &self,
        employee_id: i64,
        status: TaskStatus,
    ) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE assigned_to = ? AND status = ? ORDER BY id ASC"
        ))
        .bind(employee_id)
        .bind(status)
        .fetch_all(self.get_pool())
        .await?;

        Ok(tasks)
    }

    pub async fn get_task(&self, id: i64) -> Result<Task> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?
            .ok_or_else(|| TrackerError::NotFound { entity: "task", id }.into())
    }

    pub async fn create_task(&self, task: &Task) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO tasks (title, description, status, project_id, assigned_to)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.project_id)
        .bind(task.assigned_to)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn update_task(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, status = ?, project_id = ?, assigned_to = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.project_id)
        .bind(task.assigned_to)
        .bind(task.id)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    pub async fn update_task_status(&self, id: i64, status: TaskStatus) -> Result<()> {
        let result = sqlx::query("UPDATE tasks SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(self.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(TrackerError::NotFound { entity: "task", id }.into());
        }

        Ok(())
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    // Time entry operations

    /// The open entry an employee started within `[day_start, day_end)`, if any.
    pub async fn find_open_time_entry(
        &self,
        employee_id: i64,
        day_start: NaiveDateTime,
        day_end: NaiveDateTime,
    ) -> Result<Option<TimeEntry>> {
        let entry = sqlx::query_as::<_, TimeEntry>(&format!(
            r#"
            SELECT {TIME_ENTRY_COLUMNS}
            FROM time_entries
            WHERE employee_id = ? AND start_time >= ? AND start_time < ? AND end_time IS NULL
            ORDER BY start_time DESC
            LIMIT 1
            "#
        ))
        .bind(employee_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(entry)
    }

    pub async fn create_time_entry(
        &self,
        employee_id: i64,
        task_id: Option<i64>,
        start_time: NaiveDateTime,
    ) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO time_entries (start_time, end_time, duration_minutes, employee_id, task_id)
            VALUES (?, NULL, NULL, ?, ?)
            RETURNING id
            "#,
        )
        .bind(start_time)
        .bind(employee_id)
        .bind(task_id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn close_time_entry(
        &self,
        id: i64,
        end_time: NaiveDateTime,
        duration_minutes: i64,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE time_entries SET end_time = ?, duration_minutes = ? WHERE id = ? AND end_time IS NULL",
        )
        .bind(end_time)
        .bind(duration_minutes)
        .bind(id)
        .execute(self.get_pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(TrackerError::NotFound { entity: "open time entry", id }.into());
        }

        Ok(())
    }

    /// Closed entries of an employee started within `[from, to)`, oldest first.
    pub async fn get_closed_time_entries(
        &self,
        employee_id: i64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<TimeEntry>> {
        let entries = sqlx::query_as::<_, TimeEntry>(&format!(
            r#"
            SELECT {TIME_ENTRY_COLUMNS}
            FROM time_entries
            WHERE employee_id = ? AND start_time >= ? AND start_time < ? AND end_time IS NOT NULL
            ORDER BY start_time ASC
            "#
        ))
        .bind(employee_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.get_pool())
        .await?;

        Ok(entries)
    }

    // Report operations
    pub async fn create_report(&self, report: &Report) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO reports (title, report_type, start_date, end_date, total_minutes, report_data, created_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&report.title)
        .bind(&report.report_type)
        .bind(report.start_date)
        .bind(report.end_date)
        .bind(report.total_minutes)
        .bind(&report.report_data)
        .bind(report.created_by)
        .bind(report.created_at)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn get_reports_by_creator(&self, employee_id: i64) -> Result<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE created_by = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(employee_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(reports)
    }
}

/// Initialize the database connection pool and bring the schema up to date
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;

    db.migrate().await?;
    tracing::info!(url = %config.database_url(), "database ready");

    Ok(db)
}

/// Midnight at the start of `day` and of the day after it.
pub fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(chrono::NaiveTime::MIN);
    (start, start + chrono::Duration::days(1))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::Database;
    use crate::models::{Employee, NewEmployee, Project, ProjectStatus, Role, Task, TaskStatus};

    pub fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
        day.and_hms_opt(hour, minute, 0).unwrap()
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Employee value for screen tests that never touch the database.
    pub fn sample_employee(id: i64, role: Role) -> Employee {
        Employee {
            id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: String::new(),
            position: "Analyst".to_string(),
            department_id: 1,
            role,
            created_at: at(date(2026, 1, 1), 0, 0),
            updated_at: None,
        }
    }

    pub async fn department(db: &Database, name: &str) -> i64 {
        db.create_department(name, at(date(2026, 1, 1), 9, 0)).await.unwrap()
    }

    pub async fn employee(db: &Database, department_id: i64, first: &str, last: &str, role: Role) -> i64 {
        db.create_employee(
            &NewEmployee {
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
                password_hash: "not-a-hash".to_string(),
                position: "Engineer".to_string(),
                department_id,
                role,
            },
            at(date(2026, 1, 1), 9, 0),
        )
        .await
        .unwrap()
    }

    pub async fn project(db: &Database, department_id: i64, manager_id: i64, name: &str) -> i64 {
        db.create_project(&Project {
            id: 0,
            name: name.to_string(),
            start_date: date(2026, 1, 1),
            end_date: None,
            status: ProjectStatus::Active,
            manager_id,
            department_id,
        })
        .await
        .unwrap()
    }

    pub async fn task(db: &Database, project_id: i64, assignee: i64, title: &str, status: TaskStatus) -> i64 {
        db.create_task(&Task {
            id: 0,
            title: title.to_string(),
            description: None,
            status,
            project_id,
            assigned_to: assignee,
        })
        .await
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::models::{ProjectStatus, Role};

    #[tokio::test]
    async fn employee_round_trip_keeps_role_and_department() {
        let db = Database::in_memory().await.unwrap();
        let dept = department(&db, "Engineering").await;
        let id = employee(&db, dept, "Ada", "Lovelace", Role::Manager).await;

        let loaded = db.get_employee(id).await.unwrap();
        assert_eq!(loaded.role, Role::Manager);
        assert_eq!(loaded.department_id, dept);
        assert!(loaded.updated_at.is_none());

        let by_email = db.find_employee_by_email("ada.lovelace@example.com").await.unwrap();
        assert_eq!(by_email.map(|e| e.id), Some(id));
    }

    #[tokio::test]
    async fn employee_update_stamps_updated_at() {
        let db = Database::in_memory().await.unwrap();
        let eng = department(&db, "Engineering").await;
        let ops = department(&db, "Ops").await;
        let id = employee(&db, eng, "Ada", "Lovelace", Role::Employee).await;

        let mut ada = db.get_employee(id).await.unwrap();
        let hash = ada.password_hash.clone();
        ada.position = "Lead".to_string();
        ada.department_id = ops;
        ada.role = Role::Manager;
        let stamp = at(date(2026, 2, 3), 10, 15);
        db.update_employee(&ada, stamp).await.unwrap();

        let loaded = db.get_employee(id).await.unwrap();
        assert_eq!(loaded.position, "Lead");
        assert_eq!(loaded.department_id, ops);
        assert_eq!(loaded.role, Role::Manager);
        assert_eq!(loaded.password_hash, hash);
        assert_eq!(loaded.updated_at, Some(stamp));

        ada.id = 999;
        assert!(db.update_employee(&ada, stamp).await.is_err());
    }

    #[tokio::test]
    async fn employees_and_departments_can_be_removed() {
        let db = Database::in_memory().await.unwrap();
        let eng = department(&db, "Engineering").await;
        let id = employee(&db, eng, "Ada", "Lovelace", Role::Employee).await;

        // still referenced by an employee
        assert!(db.delete_department(eng).await.is_err());

        db.delete_employee(id).await.unwrap();
        assert!(db.find_employee_by_email("ada.lovelace@example.com").await.unwrap().is_none());
        let err = db.delete_employee(id).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<TrackerError>(),
            Some(&TrackerError::NotFound { entity: "employee", id })
        );

        db.update_department(eng, "R&D").await.unwrap();
        assert_eq!(db.get_department(eng).await.unwrap().name, "R&D");
        db.delete_department(eng).await.unwrap();
        assert!(db.get_departments().await.unwrap().is_empty());
        assert!(db.update_department(eng, "Gone").await.is_err());
    }

    #[tokio::test]
    async fn missing_rows_are_reported_as_not_found() {
        let db = Database::in_memory().await.unwrap();
        let err = db.get_task(42).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<TrackerError>(),
            Some(&TrackerError::NotFound { entity: "task", id: 42 })
        );
    }

    #[tokio::test]
    async fn creating_a_task_makes_it_appear_in_the_task_list() {
        let db = Database::in_memory().await.unwrap();
        let dept = department(&db, "Engineering").await;
        let boss = employee(&db, dept, "Grace", "Hopper", Role::Manager).await;
        let dev = employee(&db, dept, "Alan", "Turing", Role::Employee).await;
        let project = project(&db, dept, boss, "Compiler").await;

        let id = task(&db, project, dev, "Write parser", TaskStatus::New).await;

        let all = db.get_tasks().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].status, TaskStatus::New);

        let mine = db.get_tasks_by_assignee(dev).await.unwrap();
        assert_eq!(mine.len(), 1);
    }

    #[tokio::test]
    async fn task_with_unknown_project_is_rejected() {
        let db = Database::in_memory().await.unwrap();
        let dept = department(&db, "Engineering").await;
        let dev = employee(&db, dept, "Alan", "Turing", Role::Employee).await;

        let result = db
            .create_task(&Task {
                id: 0,
                title: "Orphan".to_string(),
                description: None,
                status: TaskStatus::New,
                project_id: 999,
                assigned_to: dev,
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn assignee_tasks_are_newest_first() {
        let db = Database::in_memory().await.unwrap();
        let dept = department(&db, "Engineering").await;
        let dev = employee(&db, dept, "Alan", "Turing", Role::Employee).await;
        let project = project(&db, dept, dev, "Compiler").await;
        let first = task(&db, project, dev, "First", TaskStatus::New).await;
        let second = task(&db, project, dev, "Second", TaskStatus::Done).await;

        let ids: Vec<i64> = db
            .get_tasks_by_assignee(dev)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![second, first]);

        let done = db.get_tasks_by_assignee_and_status(dev, TaskStatus::Done).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, second);
    }

    #[tokio::test]
    async fn update_task_changes_fields_in_place() {
        let db = Database::in_memory().await.unwrap();
        let dept = department(&db, "Engineering").await;
        let dev = employee(&db, dept, "Alan", "Turing", Role::Employee).await;
        let project = project(&db, dept, dev, "Compiler").await;
        let id = task(&db, project, dev, "Draft", TaskStatus::New).await;

        let mut loaded = db.get_task(id).await.unwrap();
        loaded.title = "Final".to_string();
        loaded.description = Some("Polished".to_string());
        db.update_task(&loaded).await.unwrap();
        db.update_task_status(id, TaskStatus::InReview).await.unwrap();

        let reloaded = db.get_task(id).await.unwrap();
        assert_eq!(reloaded.title, "Final");
        assert_eq!(reloaded.description.as_deref(), Some("Polished"));
        assert_eq!(reloaded.status, TaskStatus::InReview);
        assert_eq!(db.get_tasks().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_project_removes_tasks_and_detaches_time_entries() {
        let db = Database::in_memory().await.unwrap();
        let dept = department(&db, "Engineering").await;
        let dev = employee(&db, dept, "Alan", "Turing", Role::Manager).await;
        let project = project(&db, dept, dev, "Compiler").await;
        let task_id = task(&db, project, dev, "Parser", TaskStatus::InProgress).await;
        let day = date(2026, 3, 2);
        let entry = db.create_time_entry(dev, Some(task_id), at(day, 9, 0)).await.unwrap();
        db.close_time_entry(entry, at(day, 10, 0), 60).await.unwrap();

        db.delete_project(project).await.unwrap();

        assert!(db.get_tasks().await.unwrap().is_empty());
        assert!(db.get_projects().await.unwrap().is_empty());
        let (from, to) = day_bounds(day);
        let entries = db.get_closed_time_entries(dev, from, to).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].task_id, None);
    }

    #[tokio::test]
    async fn project_update_round_trip() {
        let db = Database::in_memory().await.unwrap();
        let dept = department(&db, "Engineering").await;
        let other = department(&db, "Sales").await;
        let boss = employee(&db, dept, "Grace", "Hopper", Role::Manager).await;
        let id = project(&db, dept, boss, "Compiler").await;
        project(&db, other, boss, "Leads").await;

        let mut loaded = db.get_project(id).await.unwrap();
        loaded.status = ProjectStatus::Completed;
        loaded.end_date = Some(date(2026, 6, 30));
        db.update_project(&loaded).await.unwrap();

        let mine = db.get_projects_by_department(dept).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].status, ProjectStatus::Completed);
        assert_eq!(mine[0].end_date, Some(date(2026, 6, 30)));
    }

    #[tokio::test]
    async fn open_entries_are_scoped_to_the_day() {
        let db = Database::in_memory().await.unwrap();
        let dept = department(&db, "Engineering").await;
        let dev = employee(&db, dept, "Alan", "Turing", Role::Employee).await;
        let yesterday = date(2026, 3, 1);
        let today = date(2026, 3, 2);
        db.create_time_entry(dev, None, at(yesterday, 22, 0)).await.unwrap();

        let (from, to) = day_bounds(today);
        assert!(db.find_open_time_entry(dev, from, to).await.unwrap().is_none());

        let id = db.create_time_entry(dev, None, at(today, 8, 30)).await.unwrap();
        let open = db.find_open_time_entry(dev, from, to).await.unwrap().unwrap();
        assert_eq!(open.id, id);
        assert!(open.end_time.is_none());

        db.close_time_entry(id, at(today, 12, 0), 210).await.unwrap();
        assert!(db.find_open_time_entry(dev, from, to).await.unwrap().is_none());
        assert!(db.close_time_entry(id, at(today, 13, 0), 270).await.is_err());
    }

    #[tokio::test]
    async fn department_members_exclude_the_viewer_and_sort_by_name() {
        let db = Database::in_memory().await.unwrap();
        let dept = department(&db, "Engineering").await;
        let other = department(&db, "Sales").await;
        let boss = employee(&db, dept, "Grace", "Hopper", Role::Manager).await;
        employee(&db, dept, "Zed", "Adams", Role::Employee).await;
        employee(&db, dept, "Amy", "Adams", Role::Employee).await;
        employee(&db, other, "Bob", "Brown", Role::Employee).await;

        let names: Vec<String> = db
            .get_department_members(dept, boss)
            .await
            .unwrap()
            .iter()
            .map(|e| e.full_name())
            .collect();
        assert_eq!(names, vec!["Amy Adams", "Zed Adams"]);
    }

    #[tokio::test]
    async fn departments_are_listed_by_name() {
        let db = Database::in_memory().await.unwrap();
        department(&db, "Sales").await;
        let eng = department(&db, "Engineering").await;

        let names: Vec<String> = db.get_departments().await.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Engineering", "Sales"]);
        assert_eq!(db.find_department_by_name("Engineering").await.unwrap().map(|d| d.id), Some(eng));
        assert_eq!(db.get_department(eng).await.unwrap().name, "Engineering");
        assert!(db.create_department("Sales", at(date(2026, 1, 2), 9, 0)).await.is_err());
    }
}
