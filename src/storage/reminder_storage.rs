use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use thiserror::Error;

use crate::reminder::Reminder;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("stored reminders are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage is unavailable")]
    Unavailable,
}

/// Persistent home of the reminder list. Implementations read and write the
/// whole list at once under a single key.
pub trait ReminderStorage: Send + Sync {
    /// An absent record is an empty list, not an error.
    fn load(&self) -> Result<Vec<Reminder>, StorageError>;
    fn save(&self, reminders: &[Reminder]) -> Result<(), StorageError>;
}

/// Keeps the serialized record in memory, the same way the file storage
/// keeps it on disk.
#[derive(Default)]
pub struct InMemoryReminderStorage {
    record: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl InMemoryReminderStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(record.into())),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn record(&self) -> Option<String> {
        self.record
            .lock()
            .map(|record| record.clone())
            .unwrap_or_default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }
}

impl ReminderStorage for InMemoryReminderStorage {
    fn load(&self) -> Result<Vec<Reminder>, StorageError> {
        let record = self.record.lock().map_err(|_| StorageError::Unavailable)?;
        match record.as_deref() {
            Some(raw) => Ok(serde_json::from_str(raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, reminders: &[Reminder]) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StorageError::Unavailable);
        }

        let serialized = serde_json::to_string(reminders)?;
        let mut record = self.record.lock().map_err(|_| StorageError::Unavailable)?;
        *record = Some(serialized);
        Ok(())
    }
}
