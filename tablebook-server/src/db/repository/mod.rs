//! Repository Module
//!
//! Document-store seams used by the workflows, and their SurrealDB
//! implementations.
//!
//! Record keys are plain strings (uuid v4 for new records). Reads project
//! `meta::id(id) AS key` and `OMIT id`, since the native record id does not
//! deserialize into `serde_json::Value`. Writes that need to report a miss
//! return the same projection instead of the whole document.

pub mod listing;
pub mod reservation;
pub mod user;

// Re-exports
pub use listing::ListingRepository;
pub use reservation::ReservationRepository;
pub use user::UserRepository;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{Listing, ListingDetails, Reservation, ReservationDetails, ReservationStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Database(format!("Malformed record: {}", err))
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => AppError::not_found(what),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Restaurant collection
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Insert a new document under a generated id
    async fn create(&self, details: ListingDetails) -> RepoResult<Listing>;
    async fn get(&self, id: &str) -> RepoResult<Option<Listing>>;
    /// Replace the whole document. Fails with `NotFound` for unknown ids.
    async fn overwrite(&self, id: &str, details: ListingDetails) -> RepoResult<Listing>;
    async fn find_by_owner(&self, owner_id: &str) -> RepoResult<Vec<Listing>>;
    async fn list(&self) -> RepoResult<Vec<Listing>>;
}

/// Reservation collection
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<Reservation>>;
    async fn get(&self, id: &str) -> RepoResult<Option<Reservation>>;
    async fn create(&self, details: ReservationDetails) -> RepoResult<Reservation>;
    /// Single-field status write. Does not check the current status.
    async fn update_status(&self, id: &str, status: ReservationStatus) -> RepoResult<()>;
}

/// User display-name lookups
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn display_name(&self, user_id: &str) -> RepoResult<Option<String>>;
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Split a projected row into its record key and document body
pub(crate) fn decode_row<T: DeserializeOwned>(mut row: Value) -> RepoResult<(String, T)> {
    let object = row
        .as_object_mut()
        .ok_or_else(|| RepoError::Database("Record is not an object".to_string()))?;
    object.remove("id");
    let key = match object.remove("key") {
        Some(Value::String(key)) => key,
        Some(other) => other.to_string(),
        None => return Err(RepoError::Database("Record without key".to_string())),
    };
    let body = serde_json::from_value(row)?;
    Ok((key, body))
}

pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> RepoResult<Vec<(String, T)>> {
    rows.into_iter().map(decode_row).collect()
}

/// New record key
pub(crate) fn new_key() -> String {
    uuid::Uuid::new_v4().to_string()
}
