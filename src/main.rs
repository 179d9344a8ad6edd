mod appsettings;
mod console;
mod notifier;

use std::{sync::Arc, time::Duration};

use log::LevelFilter;
use memoria_models::reminder::Reminder;
use memoria_scheduler::{SystemClock, TriggerScheduler};
use memoria_storage::{FileBlobStore, ReminderRepository};
use tokio::io::BufReader;

use console::Console;
use notifier::ConsoleNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::formatted_timed_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let settings = appsettings::load()?;
    log::info!(
        "Starting memoria. [data_dir = {}, timezone = {}]",
        settings.storage.data_dir.display(),
        settings.scheduler.timezone
    );

    let store = Arc::new(FileBlobStore::new(&settings.storage.data_dir));
    let repository = Arc::new(ReminderRepository::open(store).await);

    let summary = repository
        .subscribe(|snapshot: Vec<Reminder>| {
            let enabled = snapshot.iter().filter(|r| r.enabled).count();
            log::info!("{} reminders set, {enabled} enabled", snapshot.len());
        })
        .await;

    let scheduler = TriggerScheduler::new(
        Arc::clone(&repository),
        Arc::new(ConsoleNotifier),
        Arc::new(SystemClock::new(settings.scheduler.timezone)),
    )
    .with_poll_interval(Duration::from_secs(settings.scheduler.poll_interval_secs))
    .start();

    let mut console = Console::new(Arc::clone(&repository), tokio::io::stdout());
    console
        .run(BufReader::new(tokio::io::stdin()), ctrl_c())
        .await?;

    summary.unsubscribe();
    scheduler.shutdown().await;
    Ok(())
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}
