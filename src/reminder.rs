use std::{fmt, str::FromStr};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("text must not be empty")]
    EmptyText,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(String);

impl ReminderId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ReminderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ReminderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const DUE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S%.f"];

/// Due date as the user typed it. Kept verbatim so that records read from
/// storage or an import file are written back unchanged, even when they do
/// not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderDueTime(String);

impl ReminderDueTime {
    pub fn new(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self(datetime.format("%Y-%m-%dT%H:%M").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local wall-clock time, or `None` if the value is not a date. A bare
    /// date means midnight.
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        let raw = self.0.trim();
        DUE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|datetime| datetime.with_timezone(&Local).naive_local())
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub text: String,
    pub when: Option<ReminderDueTime>,
    pub done: bool,
}

impl Reminder {
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        is_overdue(self, now)
    }
}

pub fn is_overdue(reminder: &Reminder, now: NaiveDateTime) -> bool {
    if reminder.done {
        return false;
    }

    reminder
        .when
        .as_ref()
        .and_then(ReminderDueTime::datetime)
        .is_some_and(|when| when < now)
}

/// Trims the text and rejects it if nothing is left.
pub fn validate_text(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyText);
    }

    Ok(trimmed.to_string())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Done,
}

impl FilterMode {
    pub fn matches(self, reminder: &Reminder) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !reminder.done,
            FilterMode::Done => reminder.done,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterMode::All => "all",
            FilterMode::Active => "active",
            FilterMode::Done => "done",
        };
        f.write_str(name)
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "active" => Ok(FilterMode::Active),
            "done" | "finished" => Ok(FilterMode::Done),
            other => Err(format!("unknown filter '{other}'")),
        }
    }
}

pub fn filter(reminders: &[Reminder], mode: FilterMode) -> Vec<&Reminder> {
    reminders
        .iter()
        .filter(|reminder| mode.matches(reminder))
        .collect()
}
