use std::sync::Arc;

use reminders::{
    appsettings::AppSettings, session::Session, storage::FileReminderStorage,
    store::ReminderStore,
};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::new()?;
    log::debug!("Using settings {settings:?}");

    let storage = Arc::new(FileReminderStorage::new(
        settings.storage.directory,
        settings.storage.key,
    ));
    log::info!("Keeping reminders in {}", storage.path().display());

    let store = ReminderStore::open(storage);
    let mut session = Session::new(store, settings.export.directory);

    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
