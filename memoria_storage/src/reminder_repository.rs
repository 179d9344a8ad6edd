mod model;

use std::{collections::HashSet, sync::Arc};

use memoria_models::reminder::{Reminder, ReminderId};
use thiserror::Error;
use tokio::sync::RwLock;

pub use model::StoredReminder;

use crate::{
    blob_store::{BlobStore, BlobStoreError},
    model::{NewReminder, UpdateReminder},
    subscription::{ReminderObserver, Subscription, SubscriptionHub},
};

pub const REMINDERS_KEY: &str = "reminders_v1";

#[derive(Debug, Error)]
pub enum ReminderRepositoryError {
    #[error("Reminder id {0} is already in use")]
    DuplicateId(ReminderId),
}

#[derive(Debug, Error)]
enum HydrateError {
    #[error("no reminders have been stored yet")]
    Missing,

    #[error(transparent)]
    Storage(#[from] BlobStoreError),

    #[error("stored reminders are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Default)]
struct RepositoryState {
    reminders: Vec<Reminder>,
    retired_ids: HashSet<ReminderId>,
}

impl RepositoryState {
    fn id_taken(&self, id: &ReminderId) -> bool {
        self.retired_ids.contains(id) || self.reminders.iter().any(|r| &r.id == id)
    }
}

/// Authoritative list of reminders for the running process.
///
/// Every mutation updates memory first, then writes the whole list through to
/// the blob store and finally broadcasts a snapshot to subscribers, all under
/// the write lock. A failed
/// write is logged and otherwise ignored; memory stays authoritative and the
/// next successful write heals the stored copy.
pub struct ReminderRepository {
    store: Arc<dyn BlobStore>,
    state: RwLock<RepositoryState>,
    hub: SubscriptionHub,
}

impl ReminderRepository {
    /// Creates a repository holding the default reminders. Call
    /// [`ReminderRepository::hydrate`] to replace them with stored state.
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            state: RwLock::new(RepositoryState {
                reminders: default_reminders(),
                retired_ids: HashSet::new(),
            }),
            hub: SubscriptionHub::new(),
        }
    }

    pub async fn open(store: Arc<dyn BlobStore>) -> Self {
        let repository = Self::new(store);
        repository.hydrate().await;
        repository
    }

    pub async fn list(&self) -> Vec<Reminder> {
        self.state.read().await.reminders.clone()
    }

    pub async fn get(&self, id: &ReminderId) -> Option<Reminder> {
        let state = self.state.read().await;
        state.reminders.iter().find(|r| &r.id == id).cloned()
    }

    pub async fn add(&self, new_reminder: NewReminder) -> Result<(), ReminderRepositoryError> {
        let mut state = self.state.write().await;
        if state.id_taken(&new_reminder.id) {
            return Err(ReminderRepositoryError::DuplicateId(new_reminder.id));
        }

        let reminder = new_reminder.into_reminder();
        log::info!(
            "Adding reminder {} at {}",
            reminder.id,
            reminder.canonical_time()
        );
        state.reminders.push(reminder);

        self.commit(&state.reminders).await;
        Ok(())
    }

    /// Merges `update` onto the reminder with `id`. Returns `false` and does
    /// nothing when no such reminder exists.
    pub async fn update(&self, id: &ReminderId, update: UpdateReminder) -> bool {
        let mut state = self.state.write().await;
        let Some(reminder) = state.reminders.iter_mut().find(|r| &r.id == id) else {
            log::debug!("Ignoring update of unknown reminder {id}");
            return false;
        };

        update.apply_to(reminder);
        log::info!("Updated reminder {id}");

        self.commit(&state.reminders).await;
        true
    }

    /// Removes the reminder with `id`. Returns `false` and does nothing when
    /// no such reminder exists.
    pub async fn delete(&self, id: &ReminderId) -> bool {
        let mut state = self.state.write().await;
        let before = state.reminders.len();
        state.reminders.retain(|r| &r.id != id);
        if state.reminders.len() == before {
            log::debug!("Ignoring delete of unknown reminder {id}");
            return false;
        }

        state.retired_ids.insert(id.clone());
        log::info!("Deleted reminder {id}");

        self.commit(&state.reminders).await;
        true
    }

    /// Replaces the in-memory list with the stored one.
    ///
    /// Every stored time is re-normalised. A missing, unreadable or malformed
    /// blob is replaced by the default reminders, which are written back
    /// immediately.
    pub async fn hydrate(&self) {
        let loaded = self.load().await;
        let mut state = self.state.write().await;
        match loaded {
            Ok(reminders) => {
                log::info!("Hydrated {} reminders from storage", reminders.len());
                state.reminders = reminders;
                self.hub.broadcast(&state.reminders);
            }
            Err(err) => {
                match &err {
                    HydrateError::Missing => log::info!("{err}, seeding default reminders"),
                    _ => log::warn!("Failed to load reminders, seeding defaults: {err}"),
                }

                state.reminders = default_reminders();
                self.commit(&state.reminders).await;
            }
        }
    }

    /// Registers `observer` and immediately hands it the current list.
    pub async fn subscribe(&self, observer: impl ReminderObserver) -> Subscription {
        let observer: Arc<dyn ReminderObserver> = Arc::new(observer);
        let state = self.state.read().await;
        let subscription = self.hub.register(Arc::clone(&observer));
        observer.on_reminders_changed(state.reminders.clone());
        subscription
    }

    pub fn subscriber_count(&self) -> usize {
        self.hub.subscriber_count()
    }

    async fn load(&self) -> Result<Vec<Reminder>, HydrateError> {
        let bytes = self
            .store
            .get(REMINDERS_KEY)
            .await?
            .ok_or(HydrateError::Missing)?;
        let records: Vec<StoredReminder> = serde_json::from_slice(&bytes)?;

        let mut seen = HashSet::new();
        let mut reminders = Vec::with_capacity(records.len());
        for reminder in records.into_iter().map(Reminder::from) {
            if seen.insert(reminder.id.clone()) {
                reminders.push(reminder);
            } else {
                log::warn!("Dropping stored reminder with duplicate id {}", reminder.id);
            }
        }

        Ok(reminders)
    }

    /// Writes `reminders` through and broadcasts them. Callers hold the write
    /// lock, so writes and broadcasts follow mutation order.
    async fn commit(&self, reminders: &[Reminder]) {
        self.persist(reminders).await;
        self.hub.broadcast(reminders);
    }

    async fn persist(&self, snapshot: &[Reminder]) {
        let records: Vec<StoredReminder> = snapshot.iter().map(StoredReminder::from).collect();
        let bytes = match serde_json::to_vec(&records) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("Failed to serialize reminders: {err}");
                return;
            }
        };

        if let Err(err) = self.store.set(REMINDERS_KEY, bytes).await {
            log::warn!("Failed to persist reminders: {err}");
        }
    }
}

/// Reminders shown on first launch or when stored state cannot be read.
pub fn default_reminders() -> Vec<Reminder> {
    [
        NewReminder {
            id: ReminderId::new("1"),
            title: "Take morning medication".to_owned(),
            description: "Blood pressure medication".to_owned(),
            time: Some("08:00".to_owned()),
            enabled: true,
        },
        NewReminder {
            id: ReminderId::new("2"),
            title: "Call doctor".to_owned(),
            description: "Schedule follow-up appointment".to_owned(),
            time: Some("15:00".to_owned()),
            enabled: false,
        },
    ]
    .into_iter()
    .map(NewReminder::into_reminder)
    .collect()
}
