//! Local filesystem object store
//!
//! Objects are written under `{root}/{key}` and served back by the
//! `/api/files/{*key}` route.

use async_trait::async_trait;
use axum::body::Bytes;
use std::path::PathBuf;

use super::{ObjectStore, StorageResult, StoredObject, validate_key};

#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, content_type: &str, bytes: Bytes) -> StorageResult<StoredObject> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!(key = %key, size = bytes.len(), "Object stored");

        Ok(StoredObject {
            key: key.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len(),
        })
    }

    fn public_url(&self, object: &StoredObject) -> String {
        format!("{}/api/files/{}", self.public_base_url, object.key)
    }

    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(content) => Ok(Some(content.into())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[tokio::test]
    async fn test_put_get_and_url() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(tmp.path(), "http://localhost:3000/");

        let object = store
            .put(
                "hotel_menus/cafe-1-abc123.pdf",
                "application/pdf",
                Bytes::from_static(b"%PDF-1.4"),
            )
            .await
            .unwrap();
        assert_eq!(object.size, 8);
        assert_eq!(
            store.public_url(&object),
            "http://localhost:3000/api/files/hotel_menus/cafe-1-abc123.pdf"
        );

        let content = store.get("hotel_menus/cafe-1-abc123.pdf").await.unwrap();
        assert_eq!(content.as_deref(), Some(&b"%PDF-1.4"[..]));
        assert!(tmp.path().join("hotel_menus/cafe-1-abc123.pdf").exists());
    }

    #[tokio::test]
    async fn test_missing_object_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(tmp.path(), "http://x");
        assert!(store.get("hotel_menus/none.pdf").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(tmp.path().join("uploads"), "http://x");
        let result = store
            .put("../escape.txt", "text/plain", Bytes::from_static(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
        assert!(!tmp.path().join("escape.txt").exists());
    }
}
