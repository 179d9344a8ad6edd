pub mod file;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Blob key {0:?} is not a valid key")]
    InvalidKey(String),
}

/// Durable key-value storage for opaque blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStoreError>;
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), BlobStoreError>;
}

#[derive(Default)]
pub struct InMemoryBlobStore {
    store: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStoreError> {
        let store = self.store.read().await;
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), BlobStoreError> {
        let mut store = self.store.write().await;
        store.insert(key.to_owned(), value);
        Ok(())
    }
}
