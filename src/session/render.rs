use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::reminder::{FilterMode, Reminder, ReminderDueTime};

use super::{PendingEdit, SessionState, ViewState};

pub(super) const HELP: &str = "\
Commands:
  add <text> [@ YYYY-MM-DD HH:MM]   add a reminder
  done <n|#id>                      mark done / not done
  edit <n|#id>                      edit text and due date
  rm <n|#id>                        delete a reminder
  all | active | finished           choose which reminders to show
  export                            save all reminders to a JSON file
  import <path>                     replace all reminders with a JSON file
  help | quit
While editing:
  text <text> | when <date|-> | save | cancel";

const FILTERS: [FilterMode; 3] = [FilterMode::All, FilterMode::Active, FilterMode::Done];

fn display_due_time(when: Option<&ReminderDueTime>) -> String {
    match when {
        None => "-".to_string(),
        Some(when) if when.as_str().trim().is_empty() => "-".to_string(),
        Some(when) => match when.datetime() {
            Some(datetime) => datetime.format("%d.%m.%Y %H:%M").to_string(),
            None => when.as_str().to_string(),
        },
    }
}

fn display_reminder(order: usize, reminder: &Reminder, now: NaiveDateTime) -> String {
    let check = if reminder.done { "[x]" } else { "[ ]" };
    let mut line = format!(
        "{order:>3}. {check} {} ({})",
        reminder.text,
        display_due_time(reminder.when.as_ref())
    );
    if reminder.is_overdue(now) {
        line.push_str(" overdue");
    }
    line
}

fn display_pending_edit(order: usize, edit: &PendingEdit) -> String {
    format!(
        "{order:>3}. editing: text = \"{}\", when = {}",
        edit.draft_text,
        display_due_time(edit.draft_when.as_ref())
    )
}

fn display_filters(active: FilterMode) -> String {
    FILTERS
        .iter()
        .map(|mode| {
            if *mode == active {
                format!("[{mode}]")
            } else {
                mode.to_string()
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// One screen of the reminder list as seen through the current filter.
pub(super) fn render(
    reminders: &[&Reminder],
    total: usize,
    view: &ViewState,
    now: NaiveDateTime,
) -> String {
    let mut screen = String::new();
    let _ = writeln!(screen, "Show: {}", display_filters(view.filter));

    if total == 0 {
        let _ = writeln!(screen, "No reminders yet. Add the first one.");
    }

    let editing = match &view.state {
        SessionState::Editing(edit) => Some(edit),
        SessionState::Idle => None,
    };

    for (i, reminder) in reminders.iter().enumerate() {
        let line = match editing {
            Some(edit) if edit.id == reminder.id => display_pending_edit(i + 1, edit),
            _ => display_reminder(i + 1, reminder, now),
        };
        let _ = writeln!(screen, "{line}");
    }

    if editing.is_some() {
        let _ = writeln!(screen, "Editing: text <text> | when <date|-> | save | cancel");
    }

    if let Some(notice) = &view.notice {
        let _ = writeln!(screen, "{notice}");
    }

    if let Some(error) = &view.error {
        let _ = writeln!(screen, "Error: {error}");
    }

    screen
}
