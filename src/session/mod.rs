mod command;
mod render;

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime, Utc};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub use command::{CommandParseError, EditCommand, ItemRef, SessionCommand};

use crate::{
    reminder::{FilterMode, Reminder, ReminderDueTime, ReminderId, ValidationError, filter},
    store::ReminderStore,
    transfer::{self, ExportError, FileImportSource, ImportError},
};

/// Draft of the one reminder being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub id: ReminderId,
    pub draft_text: String,
    pub draft_when: Option<ReminderDueTime>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Editing(PendingEdit),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub filter: FilterMode,
    pub state: SessionState,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Error)]
enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("could not import: {0}")]
    Import(#[from] ImportError),
    #[error("could not export: {0}")]
    Export(#[from] ExportError),
    #[error(transparent)]
    Command(#[from] CommandParseError),
    #[error("there is no reminder {0}")]
    UnknownItem(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    store: ReminderStore,
    view: ViewState,
    export_directory: PathBuf,
}

impl Session {
    pub fn new(store: ReminderStore, export_directory: impl Into<PathBuf>) -> Self {
        Self {
            store,
            view: ViewState::default(),
            export_directory: export_directory.into(),
        }
    }

    pub fn store(&self) -> &ReminderStore {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn visible(&self) -> Vec<&Reminder> {
        filter(self.store.items(), self.view.filter)
    }

    pub fn render(&self, now: NaiveDateTime) -> String {
        render::render(&self.visible(), self.store.items().len(), &self.view, now)
    }

    /// Reads commands until `quit` or end of input, redrawing the list after
    /// each one.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        self.write_screen(&mut output).await?;

        while let Some(line) = lines.next_line().await? {
            if self.handle_line(&line).await == Flow::Quit {
                break;
            }
            self.write_screen(&mut output).await?;
        }

        Ok(())
    }

    async fn write_screen<W: AsyncWrite + Unpin>(&self, output: &mut W) -> std::io::Result<()> {
        let screen = self.render(Local::now().naive_local());
        output.write_all(screen.as_bytes()).await?;
        output.write_all(b"> ").await?;
        output.flush().await
    }

    /// Runs one command line. A failure lands in the error slot; a success
    /// clears it.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        self.view.notice = None;

        let result = match self.view.state {
            SessionState::Idle => match SessionCommand::parse(line) {
                Ok(command) => self.handle(command).await,
                Err(err) => Err(err.into()),
            },
            SessionState::Editing(_) => match EditCommand::parse(line) {
                Ok(command) => self.handle_edit(command),
                Err(err) => Err(err.into()),
            },
        };

        match result {
            Ok(flow) => {
                self.view.error = None;
                flow
            }
            Err(err) => {
                log::debug!("Command '{line}' failed: {err}");
                self.view.error = Some(err.to_string());
                Flow::Continue
            }
        }
    }

    async fn handle(&mut self, command: SessionCommand) -> Result<Flow, ActionError> {
        match command {
            SessionCommand::Add { text, when } => {
                self.store.add(&text, when)?;
            }
            SessionCommand::ToggleDone(item) => {
                let id = self.resolve(&item)?;
                self.store.toggle_done(&id);
            }
            SessionCommand::StartEdit(item) => {
                let id = self.resolve(&item)?;
                let reminder = self
                    .store
                    .get(&id)
                    .ok_or_else(|| ActionError::UnknownItem(format!("#{id}")))?;
                self.view.state = SessionState::Editing(PendingEdit {
                    id: reminder.id.clone(),
                    draft_text: reminder.text.clone(),
                    draft_when: reminder.when.clone(),
                });
            }
            SessionCommand::Remove(item) => {
                let id = self.resolve(&item)?;
                self.store.remove(&id);
            }
            SessionCommand::Filter(mode) => self.view.filter = mode,
            SessionCommand::Export => self.export().await?,
            SessionCommand::Import(path) => self.import(path).await?,
            SessionCommand::List => {}
            SessionCommand::Help => self.view.notice = Some(render::HELP.to_string()),
            SessionCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn handle_edit(&mut self, command: EditCommand) -> Result<Flow, ActionError> {
        let SessionState::Editing(edit) = &mut self.view.state else {
            return Ok(Flow::Continue);
        };

        match command {
            EditCommand::Text(text) => edit.draft_text = text,
            EditCommand::When(when) => edit.draft_when = when,
            EditCommand::Save => {
                let found =
                    self.store
                        .commit_edit(&edit.id, &edit.draft_text, edit.draft_when.clone())?;
                let id = edit.id.clone();
                self.view.state = SessionState::Idle;
                if !found {
                    return Err(ActionError::UnknownItem(format!("#{id}")));
                }
            }
            EditCommand::Cancel => self.view.state = SessionState::Idle,
            EditCommand::List => {}
            EditCommand::Help => self.view.notice = Some(render::HELP.to_string()),
            EditCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn resolve(&self, item: &ItemRef) -> Result<ReminderId, ActionError> {
        match item {
            ItemRef::Id(id) => Ok(id.clone()),
            ItemRef::Position(position) => self
                .visible()
                .get(position - 1)
                .map(|reminder| reminder.id.clone())
                .ok_or_else(|| ActionError::UnknownItem(position.to_string())),
        }
    }

    async fn export(&mut self) -> Result<(), ExportError> {
        let file = transfer::export(self.store.items(), Utc::now())?;
        let path = file.write_to(&self.export_directory).await?;
        log::info!("Exported {} reminders to {}", self.store.items().len(), path.display());
        self.view.notice = Some(format!("Exported to {}", path.display()));
        Ok(())
    }

    async fn import(&mut self, path: PathBuf) -> Result<(), ImportError> {
        let source = FileImportSource::new(&path);
        let reminders = transfer::import_from(&source).await?;
        let count = reminders.len();
        self.store.replace_all(reminders);
        log::info!("Imported {count} reminders from {}", path.display());
        self.view.notice = Some(format!("Imported {count} reminders"));
        Ok(())
    }
}

#[cfg(test)]
mod tests;
