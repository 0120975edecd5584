use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::reminder::Reminder;

use super::{ReminderStorage, StorageError};

/// Stores the list as `<directory>/<key>.json`.
pub struct FileReminderStorage {
    directory: PathBuf,
    key: String,
}

impl FileReminderStorage {
    pub fn new(directory: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(format!("{}.json", self.key))
    }

    fn write_atomically(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::create_dir_all(&self.directory)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, path)
    }
}

impl ReminderStorage for FileReminderStorage {
    fn load(&self) -> Result<Vec<Reminder>, StorageError> {
        let raw = match fs::read_to_string(self.path()) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, reminders: &[Reminder]) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(reminders)?;
        let path = self.path();
        self.write_atomically(&path, &serialized)?;
        log::debug!("Saved {} reminders to {}", reminders.len(), path.display());
        Ok(())
    }
}
