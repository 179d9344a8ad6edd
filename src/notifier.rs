use async_trait::async_trait;
use memoria_models::reminder::Reminder;
use memoria_scheduler::ReminderNotifier;
use tokio::io::AsyncWriteExt;

/// Rings the terminal bell and prints the reminder.
pub struct ConsoleNotifier;

#[async_trait]
impl ReminderNotifier for ConsoleNotifier {
    async fn alert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(alert_text(reminder).as_bytes())
            .await?;
        stdout.flush().await?;
        Ok(())
    }
}

fn alert_text(reminder: &Reminder) -> String {
    if reminder.description.is_empty() {
        format!("\x07🔔 {}: {}\n", reminder.display_time(), reminder.title)
    } else {
        format!(
            "\x07🔔 {}: {} ({})\n",
            reminder.display_time(),
            reminder.title,
            reminder.description
        )
    }
}
