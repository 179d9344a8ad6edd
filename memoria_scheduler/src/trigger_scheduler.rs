use std::{sync::Arc, time::Duration};

use memoria_models::reminder::Reminder;
use memoria_storage::ReminderRepository;
use tokio::{
    task::{self, JoinHandle},
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;

use crate::{clock::Clock, daily_trigger::DailyTriggerState, notifier::ReminderNotifier};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Periodically scans the repository and alerts every enabled reminder whose
/// time matches the current minute, at most once per reminder per day.
pub struct TriggerScheduler {
    repository: Arc<ReminderRepository>,
    notifier: Arc<dyn ReminderNotifier>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

impl TriggerScheduler {
    pub fn new(
        repository: Arc<ReminderRepository>,
        notifier: Arc<dyn ReminderNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            notifier,
            clock,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets how often the repository is scanned. Intervals below one second
    /// are raised to one second.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        if poll_interval < MIN_POLL_INTERVAL {
            log::warn!(
                "Poll interval {poll_interval:?} is too short, using {MIN_POLL_INTERVAL:?}"
            );
        }
        self.poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Spawns the polling task. The first poll happens immediately.
    pub fn start(self) -> TriggerSchedulerHandle {
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();

        log::info!(
            "Starting trigger scheduler with {:?} poll interval",
            self.poll_interval
        );
        let task = task::spawn(async move { self.run(task_cancellation_token).await });

        TriggerSchedulerHandle {
            task: Some(task),
            cancellation_token,
        }
    }

    async fn run(self, cancellation_token: CancellationToken) {
        let mut state = DailyTriggerState::new(self.clock.now().date());
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = cancellation_token.cancelled() => {
                    log::info!("Trigger scheduler stopped");
                    break;
                }
                _ = interval.tick() => {
                    self.poll(&mut state).await;
                }
            }
        }
    }

    async fn poll(&self, state: &mut DailyTriggerState) {
        let now = self.clock.now();
        let snapshot = self.repository.list().await;
        let due = state.due(now, &snapshot);
        log::debug!("[POLL] {} reminders due at {now}", due.len());

        for reminder in due {
            self.fire(reminder);
        }
    }

    fn fire(&self, reminder: Reminder) {
        log::info!(
            "[FIRE] Reminder {} ({}) is due at {}",
            reminder.id,
            reminder.title,
            reminder.display_time()
        );

        let notifier = Arc::clone(&self.notifier);
        task::spawn(async move {
            if let Err(err) = notifier.alert(&reminder).await {
                log::warn!("Failed to alert reminder {}: {err:#}", reminder.id);
            }
        });
    }
}

/// Owns the polling task. Dropping the handle stops the loop.
pub struct TriggerSchedulerHandle {
    task: Option<JoinHandle<()>>,
    cancellation_token: CancellationToken,
}

impl TriggerSchedulerHandle {
    /// Stops polling. Safe to call any number of times.
    pub fn stop(&self) {
        self.cancellation_token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Stops polling and waits for the task to finish.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                log::warn!("Trigger scheduler task ended abnormally: {err}");
            }
        }
    }
}

impl Drop for TriggerSchedulerHandle {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

#[cfg(test)]
mod tests;
