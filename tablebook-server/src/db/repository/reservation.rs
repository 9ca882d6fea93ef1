//! Reservation Repository

use async_trait::async_trait;
use serde_json::Value;
use shared::models::{Reservation, ReservationDetails, ReservationStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, ReservationStore, decode_rows, new_key};
use crate::db::RESERVATION_TABLE;

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn into_reservations(rows: Vec<Value>) -> RepoResult<Vec<Reservation>> {
        Ok(decode_rows::<ReservationDetails>(rows)?
            .into_iter()
            .map(|(id, details)| Reservation { id, details })
            .collect())
    }
}

#[async_trait]
impl ReservationStore for ReservationRepository {
    /// All reservations, earliest booking first
    async fn list(&self) -> RepoResult<Vec<Reservation>> {
        let rows: Vec<Value> = self
            .base
            .db()
            .query("SELECT *, meta::id(id) AS key OMIT id FROM type::table($table)")
            .bind(("table", RESERVATION_TABLE))
            .await?
            .take(0)?;
        let mut reservations = Self::into_reservations(rows)?;
        reservations.sort_by(|a, b| {
            a.details
                .time
                .cmp(&b.details.time)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(reservations)
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let rows: Vec<Value> = self
            .base
            .db()
            .query("SELECT *, meta::id(id) AS key OMIT id FROM type::thing($table, $key)")
            .bind(("table", RESERVATION_TABLE))
            .bind(("key", id.to_string()))
            .await?
            .take(0)?;
        Ok(Self::into_reservations(rows)?.into_iter().next())
    }

    async fn create(&self, details: ReservationDetails) -> RepoResult<Reservation> {
        let key = new_key();
        self.base
            .db()
            .query("CREATE type::thing($table, $key) CONTENT $data")
            .bind(("table", RESERVATION_TABLE))
            .bind(("key", key.clone()))
            .bind(("data", details.clone()))
            .await?
            .check()?;
        Ok(Reservation { id: key, details })
    }

    async fn update_status(&self, id: &str, status: ReservationStatus) -> RepoResult<()> {
        let updated: Vec<Value> = self
            .base
            .db()
            .query("UPDATE type::thing($table, $key) SET status = $status RETURN meta::id(id) AS key")
            .bind(("table", RESERVATION_TABLE))
            .bind(("key", id.to_string()))
            .bind(("status", status.as_str()))
            .await?
            .take(0)?;
        if updated.is_empty() {
            return Err(RepoError::NotFound(format!("Reservation {}", id)));
        }
        Ok(())
    }
}
