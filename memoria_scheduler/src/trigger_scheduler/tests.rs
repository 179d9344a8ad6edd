use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use memoria_models::reminder::{Reminder, ReminderId};
use memoria_storage::{InMemoryBlobStore, NewReminder, ReminderRepository, UpdateReminder};

use crate::clock::ManualClock;

use super::*;

type ReceivedAlerts = Arc<Mutex<Vec<ReminderId>>>;

struct TestNotifier {
    received_alerts: ReceivedAlerts,
}

#[async_trait]
impl ReminderNotifier for TestNotifier {
    async fn alert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        self.received_alerts.lock().unwrap().push(reminder.id.clone());
        Ok(())
    }
}

struct FailingNotifier {
    attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl ReminderNotifier for FailingNotifier {
    async fn alert(&self, _reminder: &Reminder) -> anyhow::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("vibration motor unavailable")
    }
}

struct TestContext {
    received_alerts: ReceivedAlerts,
    clock: Arc<ManualClock>,
    repository: Arc<ReminderRepository>,
}

impl TestContext {
    /// Repository holding the default reminders: "1" at 08:00 (enabled) and
    /// "2" at 15:00 (disabled).
    async fn new(now: NaiveDateTime) -> Self {
        let repository =
            Arc::new(ReminderRepository::open(Arc::new(InMemoryBlobStore::new())).await);

        Self {
            received_alerts: Arc::new(Mutex::new(Vec::new())),
            clock: Arc::new(ManualClock::new(now)),
            repository,
        }
    }

    fn start(&self) -> TriggerSchedulerHandle {
        let notifier = TestNotifier {
            received_alerts: Arc::clone(&self.received_alerts),
        };
        self.scheduler(Arc::new(notifier)).start()
    }

    fn scheduler(&self, notifier: Arc<dyn ReminderNotifier>) -> TriggerScheduler {
        TriggerScheduler::new(Arc::clone(&self.repository), notifier, self.clock.clone())
            .with_poll_interval(POLL_INTERVAL)
    }

    fn alerts(&self) -> Vec<String> {
        self.received_alerts
            .lock()
            .unwrap()
            .iter()
            .map(|id| id.as_str().to_owned())
            .collect()
    }
}

const POLL_INTERVAL: Duration = Duration::from_secs(30);

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

async fn wait_polls(polls: u32) {
    tokio::time::sleep(POLL_INTERVAL * polls + Duration::from_secs(1)).await;
}

#[tokio::test(start_paused = true)]
async fn due_reminder_fires_once_across_repeated_polls() {
    let ctx = TestContext::new(at(1, 8, 0)).await;
    let _handle = ctx.start();

    wait_polls(3).await;

    assert_eq!(ctx.alerts(), ["1"]);
}

#[tokio::test(start_paused = true)]
async fn reminder_fires_again_on_the_next_day() {
    let ctx = TestContext::new(at(1, 8, 0)).await;
    let _handle = ctx.start();
    wait_polls(1).await;

    ctx.clock.set(at(2, 7, 59));
    wait_polls(1).await;
    assert_eq!(ctx.alerts(), ["1"], "new day without a match fires nothing");

    ctx.clock.set(at(2, 8, 0));
    wait_polls(2).await;
    assert_eq!(ctx.alerts(), ["1", "1"]);
}

#[tokio::test(start_paused = true)]
async fn disabled_reminder_does_not_fire() {
    let ctx = TestContext::new(at(1, 15, 0)).await;
    let _handle = ctx.start();

    wait_polls(2).await;

    assert!(ctx.alerts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn reminders_added_while_running_are_picked_up() {
    let ctx = TestContext::new(at(1, 10, 0)).await;
    let _handle = ctx.start();
    wait_polls(1).await;

    ctx.repository
        .add(NewReminder {
            id: "walk".into(),
            title: "Evening walk".to_owned(),
            description: String::new(),
            time: Some("6:30 pm".to_owned()),
            enabled: true,
        })
        .await
        .unwrap();
    ctx.clock.set(at(1, 18, 30));
    wait_polls(1).await;

    assert_eq!(ctx.alerts(), ["walk"]);
}

#[tokio::test(start_paused = true)]
async fn re_enabling_after_firing_does_not_refire_the_same_day() {
    let ctx = TestContext::new(at(1, 8, 0)).await;
    let _handle = ctx.start();
    wait_polls(1).await;

    ctx.repository
        .update(&"1".into(), UpdateReminder::enabled(false))
        .await;
    wait_polls(1).await;
    ctx.repository
        .update(&"1".into(), UpdateReminder::enabled(true))
        .await;
    wait_polls(1).await;

    assert_eq!(ctx.alerts(), ["1"]);
}

#[tokio::test(start_paused = true)]
async fn notifier_errors_do_not_stop_polling() {
    let ctx = TestContext::new(at(1, 8, 0)).await;
    let attempts = Arc::new(AtomicUsize::new(0));
    let _handle = ctx
        .scheduler(Arc::new(FailingNotifier {
            attempts: Arc::clone(&attempts),
        }))
        .start();
    wait_polls(1).await;

    ctx.clock.advance(TimeDelta::days(1));
    wait_polls(1).await;

    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn stopped_scheduler_no_longer_fires() {
    let ctx = TestContext::new(at(1, 7, 0)).await;
    let handle = ctx.start();
    wait_polls(1).await;

    handle.stop();
    handle.stop();
    assert!(handle.is_stopped());

    ctx.clock.set(at(1, 8, 0));
    wait_polls(2).await;

    assert!(ctx.alerts().is_empty());
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_the_scheduler() {
    let ctx = TestContext::new(at(1, 7, 0)).await;
    drop(ctx.start());

    ctx.clock.set(at(1, 8, 0));
    wait_polls(2).await;

    assert!(ctx.alerts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn zero_poll_interval_is_raised_to_the_minimum() {
    let ctx = TestContext::new(at(1, 8, 0)).await;
    let notifier = TestNotifier {
        received_alerts: Arc::clone(&ctx.received_alerts),
    };
    let scheduler = ctx
        .scheduler(Arc::new(notifier))
        .with_poll_interval(Duration::ZERO);
    assert_eq!(scheduler.poll_interval, MIN_POLL_INTERVAL);

    let handle = scheduler.start();
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(ctx.alerts(), ["1"]);
    assert!(!handle.task.as_ref().unwrap().is_finished());
    handle.shutdown().await;
}
