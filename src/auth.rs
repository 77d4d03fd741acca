use anyhow::Result;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::NaiveDateTime;
use rand::rngs::OsRng;
use tracing::{error, info, warn};

use crate::db::Database;
use crate::error::TrackerError;
use crate::models::{Employee, NewEmployee, Role};

pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Look up an employee by email and check the password.
pub async fn authenticate(db: &Database, email: &str, password: &str) -> Result<Employee> {
    let email = email.trim();
    let Some(employee) = db.find_employee_by_email(email).await? else {
        warn!(email, "login with unknown email");
        return Err(TrackerError::InvalidCredentials.into());
    };

    // A stored hash that fails to parse is treated like a wrong password
    if !verify_password(password, &employee.password_hash).unwrap_or(false) {
        warn!(email, "login with wrong password");
        return Err(TrackerError::InvalidCredentials.into());
    }

    info!(employee_id = employee.id, "employee signed in");
    Ok(employee)
}

/// Everything the registration screen collects.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub position: String,
    pub department_id: Option<i64>,
    pub role: Option<Role>,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), TrackerError> {
        let required = [
            (&self.first_name, "first name"),
            (&self.last_name, "last name"),
            (&self.email, "email"),
            (&self.password, "password"),
            (&self.confirm_password, "password confirmation"),
            (&self.position, "position"),
        ];
        for (value, name) in required {
            if value.trim().is_empty() {
                return Err(TrackerError::validation(format!("Please enter the {}", name)));
            }
        }
        if self.department_id.is_none() {
            return Err(TrackerError::validation("Please select a department"));
        }
        if self.password != self.confirm_password {
            return Err(TrackerError::validation("Passwords do not match"));
        }
        Ok(())
    }
}

/// Create a new employee account on behalf of `registrar`.
///
/// Only administrators may hand out a role other than Employee.
pub async fn register(
    db: &Database,
    form: &RegistrationForm,
    registrar: Option<&Employee>,
    now: NaiveDateTime,
) -> Result<i64> {
    let role = match form.role.unwrap_or(Role::Employee) {
        Role::Employee => Role::Employee,
        other => match registrar {
            Some(admin) if admin.role == Role::Administrator => other,
            _ => return Err(TrackerError::Forbidden("Assigning roles").into()),
        },
    };

    create_account(db, form, role, now).await
}

/// Validate the form and store the account with `role`, no permission checks.
pub async fn create_account(
    db: &Database,
    form: &RegistrationForm,
    role: Role,
    now: NaiveDateTime,
) -> Result<i64> {
    form.validate()?;

    let email = form.email.trim().to_string();
    if db.find_employee_by_email(&email).await?.is_some() {
        return Err(TrackerError::DuplicateEmail(email).into());
    }

    let department_id = form
        .department_id
        .ok_or_else(|| TrackerError::validation("Please select a department"))?;
    db.get_department(department_id).await?;

    let employee = NewEmployee {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email,
        password_hash: hash_password(&form.password)?,
        position: form.position.trim().to_string(),
        department_id,
        role,
    };
    let id = db.create_employee(&employee, now).await?;

    info!(employee_id = id, role = ?role, "employee registered");
    Ok(id)
}
