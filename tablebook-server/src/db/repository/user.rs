//! User Repository

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::UserProfile;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoResult, UserDirectory, decode_rows};
use crate::db::USER_TABLE;

/// Stored user document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    display_name: String,
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create or replace a profile under its user id
    pub async fn upsert(&self, profile: UserProfile) -> RepoResult<()> {
        self.base
            .db()
            .query("UPSERT type::thing($table, $key) CONTENT $data")
            .bind(("table", USER_TABLE))
            .bind(("key", profile.id))
            .bind((
                "data",
                UserDocument {
                    display_name: profile.display_name,
                },
            ))
            .await?
            .check()?;
        Ok(())
    }

    pub async fn find_by_id(&self, user_id: &str) -> RepoResult<Option<UserProfile>> {
        let rows: Vec<Value> = self
            .base
            .db()
            .query("SELECT *, meta::id(id) AS key OMIT id FROM type::thing($table, $key)")
            .bind(("table", USER_TABLE))
            .bind(("key", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(decode_rows::<UserDocument>(rows)?
            .into_iter()
            .next()
            .map(|(id, doc)| UserProfile {
                id,
                display_name: doc.display_name,
            }))
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn display_name(&self, user_id: &str) -> RepoResult<Option<String>> {
        Ok(self
            .find_by_id(user_id)
            .await?
            .map(|profile| profile.display_name))
    }
}
