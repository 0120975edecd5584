use std::sync::Arc;

use crate::{
    reminder::{Reminder, ReminderDueTime, ReminderId, ValidationError, validate_text},
    storage::ReminderStorage,
};

/// The in-memory reminder list. It is the source of truth; storage receives a
/// copy after every mutation.
pub struct ReminderStore {
    reminders: Vec<Reminder>,
    storage: Arc<dyn ReminderStorage>,
}

impl ReminderStore {
    pub fn open(storage: Arc<dyn ReminderStorage>) -> Self {
        let reminders = match storage.load() {
            Ok(reminders) => reminders,
            Err(err) => {
                log::error!("Failed to load reminders from storage: {err}");
                Vec::new()
            }
        };
        log::info!("Loaded {} reminders", reminders.len());

        Self { reminders, storage }
    }

    pub fn items(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn get(&self, id: &ReminderId) -> Option<&Reminder> {
        self.reminders.iter().find(|reminder| &reminder.id == id)
    }

    pub fn add(
        &mut self,
        text: &str,
        when: Option<ReminderDueTime>,
    ) -> Result<&Reminder, ValidationError> {
        let text = validate_text(text)?;
        let reminder = Reminder {
            id: ReminderId::generate(),
            text,
            when,
            done: false,
        };

        log::info!("Adding reminder {}", reminder.id);
        self.reminders.insert(0, reminder);
        self.persist();
        Ok(&self.reminders[0])
    }

    /// Replaces text and due time, keeping id, completion and position.
    /// Returns `Ok(false)` if there is no such reminder.
    pub fn commit_edit(
        &mut self,
        id: &ReminderId,
        text: &str,
        when: Option<ReminderDueTime>,
    ) -> Result<bool, ValidationError> {
        let text = validate_text(text)?;
        let Some(reminder) = self.reminders.iter_mut().find(|it| &it.id == id) else {
            return Ok(false);
        };

        reminder.text = text;
        reminder.when = when;
        self.persist();
        Ok(true)
    }

    pub fn remove(&mut self, id: &ReminderId) -> bool {
        let before = self.reminders.len();
        self.reminders.retain(|reminder| &reminder.id != id);
        let removed = self.reminders.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn toggle_done(&mut self, id: &ReminderId) -> bool {
        let Some(reminder) = self.reminders.iter_mut().find(|it| &it.id == id) else {
            return false;
        };

        reminder.done = !reminder.done;
        self.persist();
        true
    }

    pub fn replace_all(&mut self, reminders: Vec<Reminder>) {
        log::info!("Replacing reminder list with {} items", reminders.len());
        self.reminders = reminders;
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.storage.save(&self.reminders) {
            log::error!("Failed to save reminders to storage: {err}");
        }
    }
}
