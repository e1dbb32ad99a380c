//! Filesystem Photo Store: `<dir>/<name>.jpg` plus an upload index.

use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use poiedit_core::error::{PoiError, Result};
use poiedit_core::photo::PhotoStore;
use std::collections::BTreeMap;
use std::path::PathBuf;

const INDEX_FILE: &str = "uploads.toml";

/// Upload id -> stored photo name.
type UploadIndex = BTreeMap<String, String>;

pub struct FsPhotoStore {
    dir: PathBuf,
    index: AtomicTomlFile<UploadIndex>,
}

impl FsPhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let index = AtomicTomlFile::new(dir.join(INDEX_FILE));
        Self { dir, index }
    }

    /// Path of the file holding photo `name`.
    pub fn photo_path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PoiError::storage(format!("Invalid photo name: {:?}", name)));
        }
        Ok(self.dir.join(format!("{}.jpg", name)))
    }
}

#[async_trait]
impl PhotoStore for FsPhotoStore {
    async fn exists(&self, name: &str) -> bool {
        match self.photo_path(name) {
            Ok(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn save(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.photo_path(name)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Stored photo {} ({} bytes)", name, bytes.len());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        let path = self.photo_path(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_upload(&self, upload_id: &str) -> Result<Option<String>> {
        let index = self.index.load()?.unwrap_or_default();
        Ok(index.get(upload_id).cloned())
    }

    async fn remember_upload(&self, name: &str, upload_id: &str) -> Result<()> {
        self.index.update(UploadIndex::new(), |index| {
            index.insert(upload_id.to_string(), name.to_string());
            Ok(())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_exists_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsPhotoStore::new(temp_dir.path().join("photos"));

        assert!(!store.exists("abcd250101120000").await);
        store.save("abcd250101120000", b"jpeg").await.unwrap();
        assert!(store.exists("abcd250101120000").await);
        assert!(temp_dir.path().join("photos/abcd250101120000.jpg").exists());

        store.remove("abcd250101120000").await.unwrap();
        assert!(!store.exists("abcd250101120000").await);
        // Removing twice is fine
        store.remove("abcd250101120000").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_path_like_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsPhotoStore::new(temp_dir.path());
        assert!(store.save("../escape", b"x").await.is_err());
        assert!(!store.exists("../escape").await);
    }

    #[tokio::test]
    async fn test_upload_index() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsPhotoStore::new(temp_dir.path());
        assert_eq!(store.find_by_upload("u1").await.unwrap(), None);

        store.remember_upload("abcd250101120000", "u1").await.unwrap();
        assert_eq!(
            store.find_by_upload("u1").await.unwrap().as_deref(),
            Some("abcd250101120000")
        );
    }
}
