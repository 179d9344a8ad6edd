use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use memoria_models::reminder::Reminder;

/// Receives a full copy of the reminder list after every change.
pub trait ReminderObserver: Send + Sync + 'static {
    fn on_reminders_changed(&self, snapshot: Vec<Reminder>);
}

impl<F> ReminderObserver for F
where
    F: Fn(Vec<Reminder>) + Send + Sync + 'static,
{
    fn on_reminders_changed(&self, snapshot: Vec<Reminder>) {
        self(snapshot)
    }
}

type SubscriptionId = u64;
type ObserverRegistry = HashMap<SubscriptionId, Arc<dyn ReminderObserver>>;

#[derive(Default)]
struct HubInner {
    next_id: AtomicU64,
    observers: Mutex<ObserverRegistry>,
}

impl HubInner {
    fn observers(&self) -> MutexGuard<'_, ObserverRegistry> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone, Default)]
pub struct SubscriptionHub {
    inner: Arc<HubInner>,
}

impl SubscriptionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, observer: Arc<dyn ReminderObserver>) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.observers().insert(id, observer);
        log::debug!("Registered reminder observer {id}");

        Subscription {
            id,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Calls every registered observer with its own copy of `snapshot`.
    ///
    /// Observers are collected before any of them runs, so an observer may
    /// unsubscribe itself (or others) from inside its callback.
    pub fn broadcast(&self, snapshot: &[Reminder]) {
        let observers: Vec<Arc<dyn ReminderObserver>> =
            self.inner.observers().values().cloned().collect();

        for observer in observers {
            observer.on_reminders_changed(snapshot.to_vec());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.observers().len()
    }
}

/// Handle returned by a subscription. The observer stays registered until
/// [`Subscription::unsubscribe`] is called.
#[must_use = "keep the subscription to be able to unsubscribe later"]
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    hub: Weak<HubInner>,
}

impl Subscription {
    /// Removes the observer. Safe to call repeatedly or after the hub is gone.
    pub fn unsubscribe(&self) {
        let Some(inner) = self.hub.upgrade() else {
            return;
        };

        if inner.observers().remove(&self.id).is_some() {
            log::debug!("Removed reminder observer {}", self.id);
        }
    }
}
