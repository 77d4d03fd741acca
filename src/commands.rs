use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::auth::{create_account, RegistrationForm};
use crate::db::Database;
use crate::error::TrackerError;
use crate::models::{Department, Employee, Role};
use crate::report::ReportGenerator;

/// Details for bootstrapping the first administrator.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub position: String,
}

pub async fn add_department(db: &Database, name: &str, now: NaiveDateTime) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TrackerError::validation("Please enter the department name").into());
    }
    if db.find_department_by_name(name).await?.is_some() {
        return Err(TrackerError::validation(format!("Department '{}' already exists", name)).into());
    }

    let id = db.create_department(name, now).await?;
    info!(department_id = id, name, "department created");
    Ok(id)
}

/// Create an administrator, creating the department first when it is missing.
pub async fn add_admin(db: &Database, account: &AdminAccount, now: NaiveDateTime) -> Result<i64> {
    let department_id = match db.find_department_by_name(account.department.trim()).await? {
        Some(department) => department.id,
        None => add_department(db, &account.department, now).await?,
    };

    let form = RegistrationForm {
        first_name: account.first_name.clone(),
        last_name: account.last_name.clone(),
        email: account.email.clone(),
        password: account.password.clone(),
        confirm_password: account.password.clone(),
        position: account.position.clone(),
        department_id: Some(department_id),
        role: Some(Role::Administrator),
    };
    let id = create_account(db, &form, Role::Administrator, now).await?;
    info!(employee_id = id, department_id, "administrator created");
    Ok(id)
}

pub async fn rename_department(db: &Database, name: &str, new_name: &str) -> Result<i64> {
    let department = find_department(db, name).await?;
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(TrackerError::validation("Please enter the department name").into());
    }
    if db.find_department_by_name(new_name).await?.is_some() {
        return Err(TrackerError::validation(format!("Department '{}' already exists", new_name)).into());
    }

    db.update_department(department.id, new_name).await?;
    info!(department_id = department.id, name = new_name, "department renamed");
    Ok(department.id)
}

/// Only an empty department can go; employees and projects keep it alive.
pub async fn remove_department(db: &Database, name: &str) -> Result<()> {
    let department = find_department(db, name).await?;
    db.delete_department(department.id)
        .await
        .with_context(|| format!("Department '{}' is still in use", department.name))?;
    info!(department_id = department.id, "department removed");
    Ok(())
}

pub async fn set_role(db: &Database, email: &str, role: Role, now: NaiveDateTime) -> Result<Employee> {
    let mut employee = find_employee(db, email).await?;
    employee.role = role;
    db.update_employee(&employee, now).await?;
    info!(employee_id = employee.id, role = role.label(), "role changed");
    db.get_employee(employee.id).await
}

pub async fn remove_employee(db: &Database, email: &str) -> Result<()> {
    let employee = find_employee(db, email).await?;
    db.delete_employee(employee.id)
        .await
        .with_context(|| format!("{} still owns projects, tasks or time records", employee.email))?;
    info!(employee_id = employee.id, "employee removed");
    Ok(())
}

async fn find_department(db: &Database, name: &str) -> Result<Department> {
    let name = name.trim();
    db.find_department_by_name(name)
        .await?
        .ok_or_else(|| TrackerError::validation(format!("No department named '{}'", name)).into())
}

async fn find_employee(db: &Database, email: &str) -> Result<Employee> {
    let email = email.trim();
    db.find_employee_by_email(email)
        .await?
        .ok_or_else(|| TrackerError::validation(format!("No employee with email {}", email)).into())
}

/// Generate, store and export a report for the employee with `email`.
pub async fn report(
    db: &Database,
    generator: &ReportGenerator,
    email: &str,
    from: NaiveDate,
    to: NaiveDate,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    let employee = find_employee(db, email).await?;
    let report = generator.generate(db, &employee, from, to, now).await?;
    generator.export(&report, &employee, now.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::authenticate;
    use crate::db::fixtures::{at, date};

    fn now() -> NaiveDateTime {
        at(date(2026, 3, 2), 8, 30)
    }

    fn account(email: &str) -> AdminAccount {
        AdminAccount {
            email: email.to_string(),
            password: "s3cret".to_string(),
            first_name: "Root".to_string(),
            last_name: "Admin".to_string(),
            department: "Head office".to_string(),
            position: "Administrator".to_string(),
        }
    }

    #[tokio::test]
    async fn departments_are_unique() {
        let db = Database::in_memory().await.unwrap();
        add_department(&db, "Finance", now()).await.unwrap();

        let err = add_department(&db, " Finance ", now()).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<TrackerError>(), Some(TrackerError::Validation(_))));
        assert!(add_department(&db, "  ", now()).await.is_err());
    }

    #[tokio::test]
    async fn admin_bootstrap_creates_and_reuses_department() {
        let db = Database::in_memory().await.unwrap();
        let first = add_admin(&db, &account("root@example.com"), now()).await.unwrap();
        let second = add_admin(&db, &account("ops@example.com"), now()).await.unwrap();

        assert_eq!(db.get_departments().await.unwrap().len(), 1);
        let admin = authenticate(&db, "root@example.com", "s3cret").await.unwrap();
        assert_eq!(admin.id, first);
        assert_eq!(admin.role, Role::Administrator);
        assert_eq!(
            db.get_employee(second).await.unwrap().department_id,
            admin.department_id
        );
    }

    #[tokio::test]
    async fn role_change_is_stamped() {
        let db = Database::in_memory().await.unwrap();
        add_admin(&db, &account("root@example.com"), now()).await.unwrap();

        let later = at(date(2026, 3, 5), 14, 0);
        let demoted = set_role(&db, " root@example.com ", Role::Manager, later).await.unwrap();
        assert_eq!(demoted.role, Role::Manager);
        assert_eq!(demoted.updated_at, Some(later));
        assert!(set_role(&db, "nobody@example.com", Role::Manager, later).await.is_err());
    }

    #[tokio::test]
    async fn departments_in_use_are_kept() {
        let db = Database::in_memory().await.unwrap();
        add_admin(&db, &account("root@example.com"), now()).await.unwrap();
        add_department(&db, "Finance", now()).await.unwrap();

        let err = remove_department(&db, "Head office").await.unwrap_err();
        assert!(err.to_string().contains("still in use"));
        assert!(rename_department(&db, "Head office", "Finance").await.is_err());

        rename_department(&db, "Finance", "Accounting").await.unwrap();
        remove_department(&db, "Accounting").await.unwrap();
        assert!(remove_department(&db, "Accounting").await.is_err());

        remove_employee(&db, "root@example.com").await.unwrap();
        remove_department(&db, "Head office").await.unwrap();
        assert!(db.get_departments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn report_command_exports_a_file() {
        let db = Database::in_memory().await.unwrap();
        add_admin(&db, &account("root@example.com"), now()).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path());

        let path = report(&db, &generator, "root@example.com", date(2026, 3, 1), date(2026, 3, 2), now())
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("Report_Admin_20260302.txt"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("WORK TIME REPORT"));

        let err = report(&db, &generator, "nobody@example.com", date(2026, 3, 1), date(2026, 3, 2), now())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nobody@example.com"));
    }
}
