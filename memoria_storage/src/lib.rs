pub mod blob_store;
mod model;
pub mod reminder_repository;
pub mod subscription;

pub use blob_store::{BlobStore, BlobStoreError, InMemoryBlobStore, file::FileBlobStore};
pub use model::{NewReminder, UpdateReminder};
pub use reminder_repository::{
    REMINDERS_KEY, ReminderRepository, ReminderRepositoryError, StoredReminder, default_reminders,
};
pub use subscription::{ReminderObserver, Subscription, SubscriptionHub};
