//! File-based durable-store backend.
//!
//! Each slot maps to `<base_dir>/<slot>.json`. Writes go through a temporary
//! file followed by a rename, so a reader never observes a torn slot.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::durable::{DurableStore, DurableStoreError};

/// Durable slot storage on the local filesystem.
pub struct FileDurableStore {
    base_dir: PathBuf,
}

impl FileDurableStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.base_dir.join(format!("{slot}.json"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl DurableStore for FileDurableStore {
    async fn read(&self, slot: &str) -> Result<Option<String>, DurableStoreError> {
        match tokio::fs::read_to_string(self.slot_path(slot)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, slot: &str, contents: &str) -> Result<(), DurableStoreError> {
        tokio::fs::create_dir_all(&self.base_dir).await?;

        let path = self.slot_path(slot);
        let tmp = self.base_dir.join(format!(".{slot}.json.tmp"));
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(slot = %slot, path = %path.display(), bytes = contents.len(), "Slot written");
        Ok(())
    }

    async fn clear(&self, slot: &str) -> Result<(), DurableStoreError> {
        match tokio::fs::remove_file(self.slot_path(slot)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_slot() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileDurableStore::new(dir.path());
        assert!(backend.read("notifications").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileDurableStore::new(dir.path());

        backend.write("notifications", "[\"a\"]").await.unwrap();
        let contents = backend.read("notifications").await.unwrap();
        assert_eq!(contents.as_deref(), Some("[\"a\"]"));
        assert!(dir.path().join("notifications.json").exists());
    }

    #[tokio::test]
    async fn test_write_creates_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state").join("notify");
        let backend = FileDurableStore::new(&nested);

        backend.write("notifications", "[]").await.unwrap();
        assert_eq!(
            backend.read("notifications").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileDurableStore::new(dir.path());

        backend.write("notifications", "[]").await.unwrap();
        backend.clear("notifications").await.unwrap();
        backend.clear("notifications").await.unwrap();

        assert!(backend.read("notifications").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileDurableStore::new(dir.path());

        backend.write("notifications", "[1,2,3]").await.unwrap();
        assert!(!dir.path().join(".notifications.json.tmp").exists());
    }
}
