// Centralized error handling for the attendance tracker

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Form input that failed validation before reaching the store
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required!")]
    MissingField(&'static str),

    #[error("Passwords do not match!")]
    PasswordMismatch,

    #[error("Invalid day '{0}', expected a weekday name such as Monday")]
    InvalidDay(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid attendance status '{0}', expected present or absent")]
    InvalidStatus(String),
}

/// Uniqueness constraints enforced by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// username is unique across users
    UniqueUsername,
    /// (user_id, day, time) is unique across timetable entries
    UniqueSlot,
    /// (user_id, date) is unique across attendance records
    UniqueAttendanceDate,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Constraint violated: {0:?}")]
    ConstraintViolation(Constraint),

    #[error("Unknown user id {0}")]
    UnknownUser(u32),

    #[error("Failed to persist record: {0}")]
    Persist(#[from] anyhow::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum ReportError {
    #[error("No attendance has been recorded for any scheduled subject")]
    NoAttendanceData,
}

/// Errors surfaced at the request boundary
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("This time slot is already taken for the selected day. Please choose a different time.")]
    DuplicateSlot,

    #[error("Attendance for this date has already been recorded.")]
    DuplicateAttendance,

    #[error("must provide {0}")]
    MissingCredential(&'static str),

    #[error("invalid username and/or password")]
    InvalidCredentials,

    #[error("Username has already been registered!")]
    UsernameTaken,

    #[error("Too many login attempts, try again in a minute")]
    RateLimited,

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation(Constraint::UniqueUsername) => AppError::UsernameTaken,
            StoreError::ConstraintViolation(Constraint::UniqueSlot) => AppError::DuplicateSlot,
            StoreError::ConstraintViolation(Constraint::UniqueAttendanceDate) => {
                AppError::DuplicateAttendance
            }
            StoreError::UnknownUser(id) => {
                AppError::InternalError(anyhow::anyhow!("session refers to unknown user {}", id))
            }
            StoreError::Persist(e) => AppError::InternalError(e),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateSlot => StatusCode::BAD_REQUEST,
            AppError::DuplicateAttendance => StatusCode::BAD_REQUEST,
            AppError::UsernameTaken => StatusCode::BAD_REQUEST,
            AppError::MissingCredential(_) => StatusCode::FORBIDDEN,
            AppError::InvalidCredentials => StatusCode::FORBIDDEN,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AppError::InternalError(e) = &self {
            error!(error = %e, "Request failed with internal error");
        }

        let page = crate::views::pages::apology(status.as_u16(), &self.to_string());

        (status, Html(page)).into_response()
    }
}

#[derive(Error, Debug)]
pub enum MonitoringError {
    #[error("Invalid API key")]
    InvalidApiKey,
}

impl IntoResponse for MonitoringError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            MonitoringError::InvalidApiKey => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        };

        (status, message).into_response()
    }
}
