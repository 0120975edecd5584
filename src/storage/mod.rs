mod file_storage;
mod reminder_storage;

pub use file_storage::FileReminderStorage;
pub use reminder_storage::{InMemoryReminderStorage, ReminderStorage, StorageError};
