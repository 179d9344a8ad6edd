mod command;

use std::sync::Arc;

use chrono::Utc;
use memoria_models::reminder::{Reminder, ReminderIdGenerator};
use memoria_storage::{NewReminder, ReminderRepository, UpdateReminder};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use command::{ConsoleCommand, HELP};

/// Line-oriented front end over the reminder repository.
pub struct Console<W> {
    repository: Arc<ReminderRepository>,
    ids: ReminderIdGenerator,
    output: W,
}

impl<W: AsyncWrite + Unpin> Console<W> {
    pub fn new(repository: Arc<ReminderRepository>, output: W) -> Self {
        Self {
            repository,
            ids: ReminderIdGenerator::new(),
            output,
        }
    }

    /// Reads commands until `quit`, end of input or `shutdown` completes.
    ///
    /// `shutdown` is only checked between commands, so a command that has
    /// started always finishes its write and broadcast.
    pub async fn run<R, S>(&mut self, input: R, shutdown: S) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        self.write_line("Type `help` for the list of commands.").await?;

        tokio::pin!(shutdown);
        let mut lines = input.lines();
        loop {
            let line = tokio::select! {
                biased;

                () = &mut shutdown => {
                    log::info!("Console interrupted, shutting down");
                    break;
                }
                line = lines.next_line() => line?,
            };
            let Some(line) = line else {
                break;
            };

            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<ConsoleCommand>() {
                Ok(ConsoleCommand::Quit) => break,
                Ok(command) => self.execute(command).await?,
                Err(err) => self.write_line(&format!("Error: {err}")).await?,
            }
        }

        Ok(())
    }

    async fn execute(&mut self, command: ConsoleCommand) -> anyhow::Result<()> {
        log::debug!("Executing console command {command:?}");

        match command {
            ConsoleCommand::List => {
                let reminders = self.repository.list().await;
                self.write_line(&render_list(&reminders)).await?;
            }
            ConsoleCommand::Add {
                time,
                title,
                description,
            } => {
                let new_reminder = NewReminder {
                    id: self.ids.next_id(Utc::now()),
                    title,
                    description,
                    time: Some(time),
                    enabled: true,
                };
                let message = match self.repository.add(new_reminder).await {
                    Ok(()) => "Reminder added successfully".to_owned(),
                    Err(err) => format!("Error: {err}"),
                };
                self.write_line(&message).await?;
            }
            ConsoleCommand::Edit { id, update } => {
                let message = if self.repository.update(&id, update).await {
                    "Reminder updated successfully".to_owned()
                } else {
                    format!("No reminder with id {id}")
                };
                self.write_line(&message).await?;
            }
            ConsoleCommand::SetEnabled { id, enabled } => {
                let message = if self
                    .repository
                    .update(&id, UpdateReminder::enabled(enabled))
                    .await
                {
                    format!("Reminder {id} {}", if enabled { "enabled" } else { "disabled" })
                } else {
                    format!("No reminder with id {id}")
                };
                self.write_line(&message).await?;
            }
            ConsoleCommand::Delete { id } => {
                let message = if self.repository.delete(&id).await {
                    "Reminder deleted".to_owned()
                } else {
                    format!("No reminder with id {id}")
                };
                self.write_line(&message).await?;
            }
            ConsoleCommand::Help => self.write_line(HELP).await?,
            ConsoleCommand::Quit => {}
        }

        Ok(())
    }

    async fn write_line(&mut self, text: &str) -> std::io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }
}

fn render_list(reminders: &[Reminder]) -> String {
    let mut text = format!("{} reminders set", reminders.len());
    for reminder in reminders {
        let marker = if reminder.enabled { 'x' } else { ' ' };
        text.push_str(&format!(
            "\n[{marker}] {:<14} {:>8}  {}",
            reminder.id.as_str(),
            reminder.display_time(),
            reminder.title
        ));
        if !reminder.description.is_empty() {
            text.push_str(&format!(" - {}", reminder.description));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use memoria_storage::{
        BlobStore, BlobStoreError, InMemoryBlobStore, REMINDERS_KEY, StoredReminder,
    };
    use tokio::sync::{Notify, oneshot};

    /// Blob store that parks writes until released once `hold_writes` is set.
    #[derive(Default)]
    struct GatedBlobStore {
        inner: InMemoryBlobStore,
        hold_writes: AtomicBool,
        write_started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl BlobStore for GatedBlobStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), BlobStoreError> {
            if self.hold_writes.load(Ordering::SeqCst) {
                self.write_started.notify_one();
                self.release.notified().await;
            }
            self.inner.set(key, value).await
        }
    }

    async fn run(script: &str) -> (Arc<ReminderRepository>, String) {
        let repository =
            Arc::new(ReminderRepository::open(Arc::new(InMemoryBlobStore::new())).await);
        let mut console = Console::new(Arc::clone(&repository), Vec::new());

        console
            .run(script.as_bytes(), std::future::pending())
            .await
            .unwrap();

        let output = String::from_utf8(console.output).unwrap();
        (repository, output)
    }

    #[tokio::test]
    async fn list_shows_default_reminders() {
        let (_, output) = run("list\n").await;

        assert!(output.contains("2 reminders set"), "{output}");
        assert!(
            output.lines().any(|line| line.starts_with("[x] 1 ")
                && line.ends_with(" 8:00 AM  Take morning medication - Blood pressure medication")),
            "{output}"
        );
        assert!(
            output.lines().any(|line| line.starts_with("[ ] 2 ")
                && line.ends_with(" 3:00 PM  Call doctor - Schedule follow-up appointment")),
            "{output}"
        );
    }

    #[tokio::test]
    async fn add_edit_toggle_and_delete() {
        let (repository, output) = run(
            "add 19:45 Evening pills | with dinner\n\
             edit 1 title=Morning pills; time=07:30\n\
             enable 2\n\
             delete 2\n\
             delete 2\n",
        )
        .await;

        assert!(output.contains("Reminder added successfully"), "{output}");
        assert!(output.contains("Reminder updated successfully"), "{output}");
        assert!(output.contains("Reminder 2 enabled"), "{output}");
        assert!(output.contains("Reminder deleted"), "{output}");
        assert!(output.contains("No reminder with id 2"), "{output}");

        let reminders = repository.list().await;
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].title, "Morning pills");
        assert_eq!(reminders[0].canonical_time(), "07:30");
        assert_eq!(reminders[1].title, "Evening pills");
        assert_eq!(reminders[1].description, "with dinner");
        assert_eq!(reminders[1].display_time(), "7:45 PM");
        assert!(reminders[1].enabled);
    }

    #[tokio::test]
    async fn invalid_input_is_reported_without_touching_the_store() {
        let (repository, output) = run("add 7:45 pm Pills\nfrobnicate\nadd 07:45\n").await;

        assert!(output.contains("Error: Time must be in HH:MM"), "{output}");
        assert!(output.contains("Error: Unknown command `frobnicate`"), "{output}");
        assert!(output.contains("Error: Please enter a title."), "{output}");
        assert_eq!(repository.list().await.len(), 2);
    }

    #[tokio::test]
    async fn quit_stops_reading() {
        let (repository, _) = run("quit\ndelete 1\n").await;

        assert_eq!(repository.list().await.len(), 2);
    }

    #[tokio::test]
    async fn shutdown_waits_for_the_running_command() {
        let store = Arc::new(GatedBlobStore::default());
        let repository = Arc::new(ReminderRepository::open(store.clone()).await);
        store.hold_writes.store(true, Ordering::SeqCst);

        let mut console = Console::new(Arc::clone(&repository), Vec::new());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let gate = &store;

        let (result, ()) = tokio::join!(
            console.run("delete 1\nlist\n".as_bytes(), async move {
                shutdown_rx.await.ok();
            }),
            async move {
                gate.write_started.notified().await;
                shutdown_tx.send(()).unwrap();
                for _ in 0..10 {
                    tokio::task::yield_now().await;
                }
                gate.release.notify_one();
            }
        );
        result.unwrap();

        let output = String::from_utf8(console.output).unwrap();
        assert!(output.contains("Reminder deleted"), "{output}");
        assert!(!output.contains("reminders set"), "{output}");

        let bytes = store.inner.get(REMINDERS_KEY).await.unwrap().unwrap();
        let stored: Vec<StoredReminder> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            stored.into_iter().map(|r| r.id).collect::<Vec<_>>(),
            ["2"]
        );
    }
}
