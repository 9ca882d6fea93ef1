//! Database Module
//!
//! Embedded SurrealDB: RocksDB on disk, or in memory for tests and
//! `DATABASE_PATH=mem://`.

pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

pub const NAMESPACE: &str = "tablebook";
pub const DATABASE: &str = "main";

/// Collections
pub const RESTAURANT_TABLE: &str = "restaurant";
pub const RESERVATION_TABLE: &str = "reservation";
pub const USER_TABLE: &str = "user";

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!(path = %db_path, "Database connection established (RocksDB)");
        Self::prepare(db).await
    }

    /// In-memory database
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        tracing::info!("Database connection established (in-memory)");
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(
            "DEFINE TABLE IF NOT EXISTS restaurant SCHEMALESS;
             DEFINE INDEX IF NOT EXISTS restaurant_owner ON restaurant FIELDS userId;
             DEFINE TABLE IF NOT EXISTS reservation SCHEMALESS;
             DEFINE TABLE IF NOT EXISTS user SCHEMALESS;",
        )
        .await
        .and_then(|response| response.check())
        .map_err(|e| AppError::database(format!("Failed to define tables: {e}")))?;

        Ok(Self { db })
    }
}
