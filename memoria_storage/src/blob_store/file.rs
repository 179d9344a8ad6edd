use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;

use super::{BlobStore, BlobStoreError};

/// Stores every key as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling first and are renamed over the target,
/// so readers only ever see a complete blob.
pub struct FileBlobStore {
    dir: PathBuf,
    write_counter: AtomicU64,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_counter: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobStoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

        if !valid {
            return Err(BlobStoreError::InvalidKey(key.to_owned()));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), BlobStoreError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let write_id = self.write_counter.fetch_add(1, Ordering::Relaxed);
        let tmp_path = self.dir.join(format!(".{key}.{write_id}.tmp"));

        tokio::fs::write(&tmp_path, value).await?;
        if let Err(err) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }

        log::debug!("Wrote blob {key} to {}", path.display());
        Ok(())
    }
}
