//! Listing Repository

use async_trait::async_trait;
use serde_json::Value;
use shared::models::{Listing, ListingDetails};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, ListingStore, RepoError, RepoResult, decode_rows, new_key};
use crate::db::RESTAURANT_TABLE;

#[derive(Clone)]
pub struct ListingRepository {
    base: BaseRepository,
}

impl ListingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn into_listings(rows: Vec<Value>) -> RepoResult<Vec<Listing>> {
        Ok(decode_rows::<ListingDetails>(rows)?
            .into_iter()
            .map(|(id, details)| Listing { id, details })
            .collect())
    }
}

#[async_trait]
impl ListingStore for ListingRepository {
    async fn create(&self, details: ListingDetails) -> RepoResult<Listing> {
        let key = new_key();
        self.base
            .db()
            .query("CREATE type::thing($table, $key) CONTENT $data")
            .bind(("table", RESTAURANT_TABLE))
            .bind(("key", key.clone()))
            .bind(("data", details.clone()))
            .await?
            .check()?;
        Ok(Listing { id: key, details })
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Listing>> {
        let rows: Vec<Value> = self
            .base
            .db()
            .query("SELECT *, meta::id(id) AS key OMIT id FROM type::thing($table, $key)")
            .bind(("table", RESTAURANT_TABLE))
            .bind(("key", id.to_string()))
            .await?
            .take(0)?;
        Ok(Self::into_listings(rows)?.into_iter().next())
    }

    async fn overwrite(&self, id: &str, details: ListingDetails) -> RepoResult<Listing> {
        let updated: Vec<Value> = self
            .base
            .db()
            .query("UPDATE type::thing($table, $key) CONTENT $data RETURN meta::id(id) AS key")
            .bind(("table", RESTAURANT_TABLE))
            .bind(("key", id.to_string()))
            .bind(("data", details.clone()))
            .await?
            .take(0)?;
        if updated.is_empty() {
            return Err(RepoError::NotFound(format!("Restaurant {}", id)));
        }
        Ok(Listing {
            id: id.to_string(),
            details,
        })
    }

    async fn find_by_owner(&self, owner_id: &str) -> RepoResult<Vec<Listing>> {
        let rows: Vec<Value> = self
            .base
            .db()
            .query(
                "SELECT *, meta::id(id) AS key OMIT id FROM type::table($table) \
                 WHERE userId = $owner ORDER BY createdAt DESC",
            )
            .bind(("table", RESTAURANT_TABLE))
            .bind(("owner", owner_id.to_string()))
            .await?
            .take(0)?;
        Self::into_listings(rows)
    }

    async fn list(&self) -> RepoResult<Vec<Listing>> {
        let rows: Vec<Value> = self
            .base
            .db()
            .query("SELECT *, meta::id(id) AS key OMIT id FROM type::table($table) ORDER BY createdAt DESC")
            .bind(("table", RESTAURANT_TABLE))
            .await?
            .take(0)?;
        Self::into_listings(rows)
    }
}
