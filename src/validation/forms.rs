use crate::core::error::{AppError, ValidationError};
use crate::models::attendance::AttendanceStatus;
use crate::tracking::weekday::parse_weekday;
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::Deserialize;

/// POST /register body
///
/// Missing fields deserialize as empty strings so they are reported
/// through validation rather than as an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmation: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SlotForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub time: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AttendanceForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, PartialEq)]
pub struct NewSlot {
    pub subject: String,
    pub day: Weekday,
    pub time: NaiveTime,
}

#[derive(Debug, PartialEq)]
pub struct NewAttendance {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl RegisterForm {
    pub fn validate(self) -> Result<Registration, ValidationError> {
        let username = self.username.trim();

        if username.is_empty() {
            return Err(ValidationError::MissingField("Username"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("Password"));
        }
        if self.confirmation.is_empty() {
            return Err(ValidationError::MissingField("Password confirmation"));
        }
        if self.password != self.confirmation {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(Registration {
            username: username.to_string(),
            password: self.password,
        })
    }
}

impl LoginForm {
    /// Missing login fields are an authentication failure, not a bad request
    pub fn validate(self) -> Result<Credentials, AppError> {
        let username = self.username.trim();

        if username.is_empty() {
            return Err(AppError::MissingCredential("username"));
        }
        if self.password.is_empty() {
            return Err(AppError::MissingCredential("password"));
        }

        Ok(Credentials {
            username: username.to_string(),
            password: self.password,
        })
    }
}

impl SlotForm {
    pub fn validate(self) -> Result<NewSlot, ValidationError> {
        let subject = self.subject.trim();

        if subject.is_empty() {
            return Err(ValidationError::MissingField("Subject"));
        }
        if self.day.trim().is_empty() {
            return Err(ValidationError::MissingField("Day"));
        }
        if self.time.trim().is_empty() {
            return Err(ValidationError::MissingField("Time"));
        }

        let day = parse_weekday(&self.day).ok_or_else(|| ValidationError::InvalidDay(self.day.clone()))?;
        let time = parse_time(&self.time)?;

        Ok(NewSlot {
            subject: subject.to_string(),
            day,
            time,
        })
    }
}

impl AttendanceForm {
    pub fn validate(self) -> Result<NewAttendance, ValidationError> {
        if self.date.trim().is_empty() {
            return Err(ValidationError::MissingField("Date"));
        }
        if self.status.trim().is_empty() {
            return Err(ValidationError::MissingField("Status"));
        }

        let date = parse_date(&self.date)?;
        let status = self
            .status
            .parse::<AttendanceStatus>()
            .map_err(ValidationError::InvalidStatus)?;

        Ok(NewAttendance { date, status })
    }
}

/// Parse a 24-hour `HH:MM` start time
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}

/// Parse an ISO `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}
