use thiserror::Error;

/// Domain failures surfaced to the user as messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("an employee with email {0} already exists")]
    DuplicateEmail(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("the work day has already been started")]
    WorkDayAlreadyStarted,

    #[error("the work day has not been started yet")]
    WorkDayNotStarted,

    #[error("start date cannot be later than end date")]
    InvalidDateRange,

    #[error("{0} is not available for your role")]
    Forbidden(&'static str),
}

impl TrackerError {
    pub fn validation(message: impl Into<String>) -> Self {
        TrackerError::Validation(message.into())
    }
}
