use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::reminder::{FilterMode, ReminderDueTime, ReminderId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unknown command '{0}', type 'help' for the list of commands")]
    Unknown(String),
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("'{0}' is not a date, expected YYYY-MM-DD HH:MM")]
    InvalidDate(String),
    #[error("'{0}' is not a reminder number or #id")]
    InvalidItem(String),
    #[error("{0}")]
    InvalidFilter(String),
}

/// A reminder as the user points at it: its number in the list on screen or
/// its id written as `#id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Position(usize),
    Id(ReminderId),
}

impl ItemRef {
    fn parse(input: &str) -> Result<Self, CommandParseError> {
        if let Some(id) = input.strip_prefix('#').filter(|id| !id.is_empty()) {
            return Ok(ItemRef::Id(ReminderId::from(id)));
        }

        match input.parse::<usize>() {
            Ok(position) if position > 0 => Ok(ItemRef::Position(position)),
            _ => Err(CommandParseError::InvalidItem(input.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Add {
        text: String,
        when: Option<ReminderDueTime>,
    },
    ToggleDone(ItemRef),
    StartEdit(ItemRef),
    Remove(ItemRef),
    Filter(FilterMode),
    Export,
    Import(PathBuf),
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Text(String),
    When(Option<ReminderDueTime>),
    Save,
    Cancel,
    List,
    Help,
    Quit,
}

const DUE_TIME_INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%d.%m.%Y %H:%M"];

pub fn parse_due_time(input: &str) -> Option<ReminderDueTime> {
    let input = input.trim();
    DUE_TIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(ReminderDueTime::from_datetime)
}

fn split_command(line: &str) -> (String, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.to_lowercase(), rest.trim()),
        None => (line.to_lowercase(), ""),
    }
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandParseError> {
    if rest.is_empty() {
        Err(CommandParseError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

/// `add <text> [@ <date>]`. Only an `@` with whitespace on both sides starts
/// a due date, so `mail bob@example.com` stays text.
fn parse_add(rest: &str) -> Result<SessionCommand, CommandParseError> {
    if let Some((text, date)) = rest.rsplit_once('@') {
        if text.ends_with(char::is_whitespace) && date.starts_with(char::is_whitespace) {
            let date = date.trim();
            let when = parse_due_time(date)
                .ok_or_else(|| CommandParseError::InvalidDate(date.to_string()))?;
            return Ok(SessionCommand::Add {
                text: text.trim().to_string(),
                when: Some(when),
            });
        }
    }

    Ok(SessionCommand::Add {
        text: rest.to_string(),
        when: None,
    })
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self, CommandParseError> {
        let (name, rest) = split_command(line);
        let command = match name.as_str() {
            "add" | "new" => parse_add(rest)?,
            "done" | "toggle" => {
                SessionCommand::ToggleDone(ItemRef::parse(required(rest, "done", "a reminder")?)?)
            }
            "edit" => SessionCommand::StartEdit(ItemRef::parse(required(rest, "edit", "a reminder")?)?),
            "rm" | "delete" => {
                SessionCommand::Remove(ItemRef::parse(required(rest, "rm", "a reminder")?)?)
            }
            "all" => SessionCommand::Filter(FilterMode::All),
            "active" => SessionCommand::Filter(FilterMode::Active),
            "finished" => SessionCommand::Filter(FilterMode::Done),
            "show" => SessionCommand::Filter(
                required(rest, "show", "a filter")?
                    .parse()
                    .map_err(CommandParseError::InvalidFilter)?,
            ),
            "export" => SessionCommand::Export,
            "import" => SessionCommand::Import(PathBuf::from(required(rest, "import", "a file path")?)),
            "list" | "ls" | "" => SessionCommand::List,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

impl EditCommand {
    pub fn parse(line: &str) -> Result<Self, CommandParseError> {
        let (name, rest) = split_command(line);
        let command = match name.as_str() {
            "text" => EditCommand::Text(rest.to_string()),
            "when" => match rest {
                "" | "-" => EditCommand::When(None),
                date => EditCommand::When(Some(
                    parse_due_time(date)
                        .ok_or_else(|| CommandParseError::InvalidDate(date.to_string()))?,
                )),
            },
            "save" => EditCommand::Save,
            "cancel" => EditCommand::Cancel,
            "list" | "ls" | "" => EditCommand::List,
            "help" | "?" => EditCommand::Help,
            "quit" | "exit" => EditCommand::Quit,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}
