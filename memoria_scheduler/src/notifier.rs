use async_trait::async_trait;
use memoria_models::reminder::Reminder;

/// Local alert raised when a reminder comes due (sound, vibration, banner).
///
/// Calls are fire-and-forget: the scheduler logs and drops any error.
#[async_trait]
pub trait ReminderNotifier: Send + Sync + 'static {
    async fn alert(&self, reminder: &Reminder) -> anyhow::Result<()>;
}
