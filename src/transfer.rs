use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::reminder::{Reminder, ReminderDueTime, ReminderId};

#[derive(Debug, Error)]
pub enum ImportFormatError {
    #[error("file is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("JSON must be an array")]
    NotAnArray,
    #[error("item {index} is invalid: {reason}")]
    InvalidItem { index: usize, reason: String },
    #[error("id '{0}' appears more than once")]
    DuplicateId(ReminderId),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid format: {0}")]
    Format(#[from] ImportFormatError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize reminders: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

impl ExportFile {
    pub async fn write_to(&self, directory: &Path) -> Result<PathBuf, ExportError> {
        let path = directory.join(&self.file_name);
        let write = async {
            tokio::fs::create_dir_all(directory).await?;
            tokio::fs::write(&path, &self.contents).await
        };

        write
            .await
            .map(|()| path.clone())
            .map_err(|source| ExportError::Write { path, source })
    }
}

pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!(
        "reminders-{}.json",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Pretty-printed snapshot of the list, named after the moment of export.
pub fn export(reminders: &[Reminder], now: DateTime<Utc>) -> Result<ExportFile, ExportError> {
    let contents = serde_json::to_string_pretty(reminders)?;
    Ok(ExportFile {
        file_name: export_file_name(now),
        contents,
    })
}

fn imported_id(value: Option<Value>) -> ReminderId {
    match value {
        None | Some(Value::Null) => ReminderId::generate(),
        Some(Value::String(text)) => ReminderId::from(text),
        Some(other) => ReminderId::from(other.to_string()),
    }
}

fn imported_when(value: Option<Value>) -> Option<ReminderDueTime> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(Value::String(text)) => Some(ReminderDueTime::new(text)),
        Some(other) => Some(ReminderDueTime::new(other.to_string())),
    }
}

/// Truthiness of a JSON value the way a browser would judge it.
fn imported_done(value: Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(done)) => done,
        Some(Value::Number(number)) => number
            .as_f64()
            .is_some_and(|number| number != 0.0 && !number.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Parses an exported file. Only the presence of a string `text` is checked;
/// everything else is taken from the file as is. Missing ids are generated,
/// repeated ids are rejected.
pub fn parse_import(contents: &str) -> Result<Vec<Reminder>, ImportFormatError> {
    let parsed: Value = serde_json::from_str(contents).map_err(ImportFormatError::Json)?;
    let Value::Array(elements) = parsed else {
        return Err(ImportFormatError::NotAnArray);
    };

    let mut seen = HashSet::new();
    let mut reminders = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        let Value::Object(mut fields) = element else {
            return Err(ImportFormatError::InvalidItem {
                index,
                reason: "not an object".to_string(),
            });
        };
        let Some(Value::String(text)) = fields.remove("text") else {
            return Err(ImportFormatError::InvalidItem {
                index,
                reason: "missing string field 'text'".to_string(),
            });
        };

        let id = imported_id(fields.remove("id"));
        if !seen.insert(id.clone()) {
            return Err(ImportFormatError::DuplicateId(id));
        }

        reminders.push(Reminder {
            id,
            text,
            when: imported_when(fields.remove("when")),
            done: imported_done(fields.remove("done")),
        });
    }

    Ok(reminders)
}

#[async_trait]
pub trait ImportSource: Send + Sync {
    async fn read_contents(&self) -> std::io::Result<String>;
}

pub struct FileImportSource {
    path: PathBuf,
}

impl FileImportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ImportSource for FileImportSource {
    async fn read_contents(&self) -> std::io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }
}

pub async fn import_from(source: &dyn ImportSource) -> Result<Vec<Reminder>, ImportError> {
    let contents = source.read_contents().await?;
    let reminders = parse_import(&contents)?;
    log::info!("Parsed {} reminders from import file", reminders.len());
    Ok(reminders)
}
