//! Object storage
//!
//! Binary blobs (listing images, menu PDFs) live behind [`ObjectStore`].
//! The server ships a local-filesystem implementation; keys are
//! `/`-separated relative paths such as `hotel_menus/blue-fin-1700000000000-a1b2c3.pdf`.

pub mod keys;
pub mod local;

pub use keys::{FileKind, storage_key};
pub use local::LocalObjectStore;

use async_trait::async_trait;
use axum::body::Bytes;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Handle to an object that was written successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(key) => {
                AppError::with_message(ErrorCode::InvalidRequest, "Invalid file key")
                    .with_detail("key", key)
            }
            StorageError::Io(e) => AppError::storage(e.to_string()),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` under `key`, replacing any existing object
    async fn put(&self, key: &str, content_type: &str, bytes: Bytes) -> StorageResult<StoredObject>;

    /// Public retrieval URL for a stored object
    fn public_url(&self, object: &StoredObject) -> String;

    /// Read an object back. `Ok(None)` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>>;
}

/// Reject keys that could escape the storage root
pub fn validate_key(key: &str) -> StorageResult<()> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.contains('\0')
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
