use std::sync::Arc;

use super::*;
use crate::storage::{InMemoryReminderStorage, ReminderStorage};

struct TestContext {
    storage: Arc<InMemoryReminderStorage>,
    session: Session,
    export_dir: tempfile::TempDir,
}

impl TestContext {
    fn new() -> Self {
        let export_dir = tempfile::tempdir().unwrap();
        let export_path = export_dir.path().to_path_buf();
        Self::with_export_directory(export_dir, export_path)
    }

    fn with_export_directory(export_dir: tempfile::TempDir, export_path: PathBuf) -> Self {
        let storage = Arc::new(InMemoryReminderStorage::new());
        let store = ReminderStore::open(storage.clone());
        let session = Session::new(store, export_path);

        Self {
            storage,
            session,
            export_dir,
        }
    }

    async fn send(&mut self, lines: &[&str]) {
        for line in lines {
            self.session.handle_line(line).await;
        }
    }

    fn texts(&self) -> Vec<String> {
        self.session
            .visible()
            .iter()
            .map(|it| it.text.clone())
            .collect()
    }

    fn error(&self) -> Option<&str> {
        self.session.view().error.as_deref()
    }

    fn exported_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.export_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }
}

#[tokio::test]
async fn add_toggle_and_filter() {
    let mut ctx = TestContext::new();

    ctx.send(&["add Buy milk", "add Call mom @ 2025-06-01 18:30", "done 2"])
        .await;

    assert_eq!(ctx.texts(), vec!["Call mom", "Buy milk"]);
    ctx.send(&["finished"]).await;
    assert_eq!(ctx.texts(), vec!["Buy milk"]);
    ctx.send(&["active"]).await;
    assert_eq!(ctx.texts(), vec!["Call mom"]);
    ctx.send(&["all"]).await;
    assert_eq!(ctx.texts().len(), 2);
    assert_eq!(ctx.storage.load().unwrap(), ctx.session.store().items());
}

#[tokio::test]
async fn positions_follow_the_filtered_list() {
    let mut ctx = TestContext::new();
    ctx.send(&["add first", "add second", "done 1", "active", "rm 1"])
        .await;

    let remaining: Vec<&str> = ctx
        .session
        .store()
        .items()
        .iter()
        .map(|it| it.text.as_str())
        .collect();
    assert_eq!(remaining, vec!["second"]);
}

#[tokio::test]
async fn empty_text_sets_error_until_next_success() {
    let mut ctx = TestContext::new();

    ctx.send(&["add    "]).await;
    assert_eq!(ctx.error(), Some("text must not be empty"));
    assert!(ctx.session.store().items().is_empty());

    ctx.send(&["add Walk the dog"]).await;
    assert_eq!(ctx.error(), None);
    assert_eq!(ctx.texts(), vec!["Walk the dog"]);
}

#[tokio::test]
async fn unknown_position_is_reported() {
    let mut ctx = TestContext::new();

    ctx.send(&["done 3"]).await;

    assert_eq!(ctx.error(), Some("there is no reminder 3"));
}

#[tokio::test]
async fn removing_unknown_id_is_silent() {
    let mut ctx = TestContext::new();
    ctx.send(&["add keep", "rm #missing"]).await;

    assert_eq!(ctx.error(), None);
    assert_eq!(ctx.texts(), vec!["keep"]);
}

#[tokio::test]
async fn edit_and_save() {
    let mut ctx = TestContext::new();
    ctx.send(&["add Pay rent", "done 1", "edit 1"]).await;

    let id = ctx.session.store().items()[0].id.clone();
    assert_eq!(
        ctx.session.view().state,
        SessionState::Editing(PendingEdit {
            id: id.clone(),
            draft_text: "Pay rent".to_string(),
            draft_when: None,
        })
    );

    ctx.send(&["text  Pay rent today ", "when 2025-06-01 09:00", "save"])
        .await;

    let item = ctx.session.store().get(&id).unwrap();
    assert_eq!(item.text, "Pay rent today");
    assert_eq!(item.when, Some(ReminderDueTime::new("2025-06-01T09:00")));
    assert!(item.done);
    assert_eq!(ctx.session.view().state, SessionState::Idle);
}

#[tokio::test]
async fn saving_blank_draft_keeps_editing() {
    let mut ctx = TestContext::new();
    ctx.send(&["add Pay rent", "edit 1", "text", "save"]).await;

    assert_eq!(ctx.error(), Some("text must not be empty"));
    assert!(matches!(ctx.session.view().state, SessionState::Editing(_)));
    assert_eq!(ctx.texts(), vec!["Pay rent"]);

    ctx.send(&["cancel"]).await;
    assert_eq!(ctx.error(), None);
    assert_eq!(ctx.session.view().state, SessionState::Idle);
    assert_eq!(ctx.texts(), vec!["Pay rent"]);
}

#[tokio::test]
async fn list_commands_are_rejected_while_editing() {
    let mut ctx = TestContext::new();
    ctx.send(&["add Pay rent", "edit 1", "rm 1"]).await;

    assert!(ctx.error().unwrap().starts_with("unknown command 'rm'"));
    assert_eq!(ctx.texts(), vec!["Pay rent"]);
}

#[tokio::test]
async fn export_then_import_restores_the_list() {
    let mut ctx = TestContext::new();
    ctx.send(&["add one", "add two @ 2025-06-01", "done 1", "export"])
        .await;
    let before = ctx.session.store().items().to_vec();

    let exported = ctx.exported_files();
    assert_eq!(exported.len(), 1);
    let file_name = exported[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("reminders-") && file_name.ends_with("Z.json"));

    let import_line = format!("import {}", exported[0].display());
    ctx.send(&["rm 1", "rm 1", import_line.as_str()]).await;

    assert_eq!(ctx.error(), None);
    assert_eq!(ctx.session.store().items(), before.as_slice());
    assert_eq!(ctx.storage.load().unwrap(), before);
}

#[tokio::test]
async fn bad_import_leaves_list_unchanged() {
    let mut ctx = TestContext::new();
    ctx.send(&["add keep"]).await;
    let path = ctx.export_dir.path().join("bad.json");
    std::fs::write(&path, r#"{"text":"x"}"#).unwrap();

    ctx.send(&[format!("import {}", path.display()).as_str()])
        .await;

    assert_eq!(
        ctx.error(),
        Some("could not import: invalid format: JSON must be an array")
    );
    assert_eq!(ctx.texts(), vec!["keep"]);
}

#[tokio::test]
async fn import_of_missing_file_reports_read_error() {
    let mut ctx = TestContext::new();
    let path = ctx.export_dir.path().join("missing.json");

    ctx.send(&[format!("import {}", path.display()).as_str()])
        .await;

    assert!(ctx.error().unwrap().starts_with("could not import: failed to read file"));
}

#[tokio::test]
async fn run_renders_after_each_command_and_stops_on_quit() {
    let mut ctx = TestContext::new();
    let input: &[u8] = b"add Buy milk\nquit\nadd never\n";
    let mut output = Vec::new();

    ctx.session.run(input, &mut output).await.unwrap();

    let screen = String::from_utf8(output).unwrap();
    assert!(screen.starts_with("Show: [all] active done\nNo reminders yet. Add the first one.\n> "));
    assert!(screen.contains("  1. [ ] Buy milk (-)\n> "));
    assert_eq!(ctx.texts(), vec!["Buy milk"]);
}

#[tokio::test]
async fn failed_export_is_reported_and_changes_nothing() {
    let export_dir = tempfile::tempdir().unwrap();
    let blocker = export_dir.path().join("not-a-directory");
    std::fs::write(&blocker, "").unwrap();
    let mut ctx = TestContext::with_export_directory(export_dir, blocker);
    ctx.send(&["add keep"]).await;
    let before = ctx.session.store().items().to_vec();

    ctx.send(&["export"]).await;

    assert!(ctx.error().unwrap().starts_with("could not export: failed to write"));
    assert_eq!(ctx.session.store().items(), before.as_slice());
    assert_eq!(ctx.storage.load().unwrap(), before);
}

#[tokio::test]
async fn add_with_unreadable_date_is_reported() {
    let mut ctx = TestContext::new();

    ctx.send(&["add Call mom @ tomorrow"]).await;

    assert_eq!(
        ctx.error(),
        Some("'tomorrow' is not a date, expected YYYY-MM-DD HH:MM")
    );
    assert!(ctx.session.store().items().is_empty());
}
