//! Reservation board
//!
//! Server-held review state: the last loaded reservations, a per-record
//! in-flight marker and two counters. `load` advances the generation so an
//! older load never replaces a newer one; `close` advances the epoch so
//! transitions started before teardown leave the board alone.
//!
//! A completed write is terminal. It patches the current board whenever the
//! row is present, and is remembered until the next load that certainly saw
//! it, so a reload racing the write cannot bring the row back as pending.
//!
//! The pending check and the in-flight marker are taken under the entries
//! mutex, which is never held across an `.await`.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Decision, Reservation, ReservationStatus};
use thiserror::Error;

use super::samples::{is_sample_id, sample_reservations};
use crate::db::repository::{RepoError, ReservationStore, UserDirectory};

/// One row on the board
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    #[serde(flatten)]
    pub reservation: Reservation,
    /// Resolved requester name, falling back to the name stored with the booking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// An accept/reject for this row is in flight
    pub updating: bool,
}

impl ReservationView {
    fn new(reservation: Reservation, resolved: Option<&String>) -> Self {
        let display_name = resolved
            .cloned()
            .or_else(|| reservation.details.user_name.clone());
        Self {
            reservation,
            display_name,
            updating: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.reservation.id
    }

    pub fn status(&self) -> ReservationStatus {
        self.reservation.details.status
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub reservations: Vec<ReservationView>,
    /// Nothing to review
    pub empty: bool,
    /// Rows are placeholders, not store records
    pub samples: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutcome {
    pub id: String,
    pub status: ReservationStatus,
    /// Whether local board state was patched
    pub applied: bool,
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Reservation {0} not found")]
    NotFound(String),

    #[error("Reservation {id} is already {status}")]
    NotPending {
        id: String,
        status: ReservationStatus,
    },

    #[error("Reservation {0} is already being updated")]
    Busy(String),

    #[error("Sample reservations cannot be changed")]
    Sample(String),

    #[error("Failed to load reservations")]
    Load(#[source] RepoError),

    #[error("Failed to update reservation. Please try again.")]
    Update {
        id: String,
        #[source]
        source: RepoError,
    },
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound(id) => {
                AppError::new(ErrorCode::ReservationNotFound).with_detail("id", id)
            }
            ReviewError::NotPending { id, status } => AppError::new(ErrorCode::ReservationNotPending)
                .with_detail("id", id)
                .with_detail("status", status.as_str()),
            ReviewError::Busy(id) => AppError::new(ErrorCode::ReservationBusy).with_detail("id", id),
            ReviewError::Sample(id) => {
                AppError::invalid_request("Sample reservations cannot be changed")
                    .with_detail("id", id)
            }
            ReviewError::Load(e) => {
                AppError::with_message(ErrorCode::DatabaseError, "Failed to load reservations")
                    .with_detail("cause", e.to_string())
            }
            ReviewError::Update { id, .. } => {
                AppError::new(ErrorCode::ReservationUpdateFailed).with_detail("id", id)
            }
        }
    }
}

#[derive(Debug, Default)]
struct BoardEntries {
    items: Vec<ReservationView>,
    samples: bool,
    loaded: bool,
    /// Writes that landed, keyed by id, with the generation current when they did
    settled: HashMap<String, (u64, ReservationStatus)>,
}

impl BoardEntries {
    /// Overlay writes a load started at `generation` may have missed
    fn overlay_settled(&self, items: &mut [ReservationView], generation: u64) {
        for item in items.iter_mut() {
            match self.settled.get(item.id()) {
                Some((seen_at, status)) if *seen_at >= generation => {
                    item.reservation.details.status = *status;
                }
                _ => {}
            }
        }
    }
}

/// Removes the in-flight marker when the transition ends or is dropped
struct InFlightGuard<'a> {
    map: &'a DashMap<String, Decision>,
    id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.map.remove(&self.id);
    }
}

pub struct ReservationBoard {
    store: Arc<dyn ReservationStore>,
    users: Arc<dyn UserDirectory>,
    demo_samples: bool,
    entries: Mutex<BoardEntries>,
    in_flight: DashMap<String, Decision>,
    generation: AtomicU64,
    epoch: AtomicU64,
}

impl ReservationBoard {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        users: Arc<dyn UserDirectory>,
        demo_samples: bool,
    ) -> Self {
        Self {
            store,
            users,
            demo_samples,
            entries: Mutex::new(BoardEntries::default()),
            in_flight: DashMap::new(),
            generation: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.lock().loaded
    }

    /// Fetch every reservation and replace the board.
    ///
    /// With `resolve_names`, each distinct requester id is looked up once;
    /// failed lookups fall back to the stored name.
    pub async fn load(&self, resolve_names: bool) -> Result<BoardSnapshot, ReviewError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let reservations = self.store.list().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to load reservations");
            ReviewError::Load(e)
        })?;

        let names = if resolve_names {
            self.resolve_names(&reservations).await
        } else {
            HashMap::new()
        };

        let (rows, samples) = if reservations.is_empty() && self.demo_samples {
            (sample_reservations(), true)
        } else {
            (reservations, false)
        };
        let mut items: Vec<ReservationView> = rows
            .into_iter()
            .map(|r| {
                let resolved = names.get(&r.details.user_id);
                ReservationView::new(r, resolved)
            })
            .collect();

        tracing::debug!(count = items.len(), samples, generation, "Reservations loaded");

        let mut entries = self.entries.lock();
        entries.overlay_settled(&mut items, generation);
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Board changed during load, keeping newer state");
            drop(entries);
            return Ok(self.snapshot_of(items, samples));
        }
        // Loads from here on start after every older write landed
        entries.settled.retain(|_, (seen_at, _)| *seen_at >= generation);
        entries.items = items;
        entries.samples = samples;
        entries.loaded = true;
        let snapshot = self.snapshot_of(entries.items.clone(), samples);
        drop(entries);
        Ok(snapshot)
    }

    /// Current board without touching the store
    pub fn snapshot(&self) -> BoardSnapshot {
        let entries = self.entries.lock();
        let (items, samples) = (entries.items.clone(), entries.samples);
        drop(entries);
        self.snapshot_of(items, samples)
    }

    /// Tear down: forget loaded rows; transitions still in flight will not
    /// patch the board
    pub fn close(&self) {
        let mut entries = self.entries.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        *entries = BoardEntries::default();
    }

    /// Move a pending reservation to accepted or rejected.
    ///
    /// The store write happens first; local state is patched afterwards,
    /// unless the board was closed meanwhile. On failure local state is
    /// left as it was.
    pub async fn transition(
        &self,
        id: &str,
        decision: Decision,
    ) -> Result<TransitionOutcome, ReviewError> {
        let (epoch, _guard) = {
            let entries = self.entries.lock();
            let view = entries
                .items
                .iter()
                .find(|v| v.id() == id)
                .ok_or_else(|| ReviewError::NotFound(id.to_string()))?;
            if entries.samples || is_sample_id(id) {
                return Err(ReviewError::Sample(id.to_string()));
            }
            if view.status() != ReservationStatus::Pending {
                return Err(ReviewError::NotPending {
                    id: id.to_string(),
                    status: view.status(),
                });
            }
            let guard = match self.in_flight.entry(id.to_string()) {
                Entry::Occupied(_) => return Err(ReviewError::Busy(id.to_string())),
                Entry::Vacant(slot) => {
                    slot.insert(decision);
                    InFlightGuard {
                        map: &self.in_flight,
                        id: id.to_string(),
                    }
                }
            };
            (self.epoch.load(Ordering::SeqCst), guard)
        };

        let target = decision.target_status();
        if let Err(source) = self.store.update_status(id, target).await {
            tracing::warn!(reservation_id = %id, error = %source, "Reservation update failed");
            return Err(ReviewError::Update {
                id: id.to_string(),
                source,
            });
        }

        let applied = {
            let mut entries = self.entries.lock();
            let seen_at = self.generation.load(Ordering::SeqCst);
            entries.settled.insert(id.to_string(), (seen_at, target));
            if self.epoch.load(Ordering::SeqCst) == epoch {
                match entries.items.iter_mut().find(|v| v.id() == id) {
                    Some(view) => {
                        view.reservation.details.status = target;
                        true
                    }
                    None => false,
                }
            } else {
                false
            }
        };

        tracing::info!(reservation_id = %id, status = %target, applied, "Reservation reviewed");
        Ok(TransitionOutcome {
            id: id.to_string(),
            status: target,
            applied,
        })
    }

    async fn resolve_names(&self, reservations: &[Reservation]) -> HashMap<String, String> {
        let ids: BTreeSet<&str> = reservations
            .iter()
            .map(|r| r.details.user_id.as_str())
            .collect();

        let lookups = ids.into_iter().map(|id| async move {
            (id, self.users.display_name(id).await)
        });

        join_all(lookups)
            .await
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(Some(name)) => Some((id.to_string(), name)),
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!(user_id = %id, error = %e, "Display name lookup failed");
                    None
                }
            })
            .collect()
    }

    fn snapshot_of(&self, mut items: Vec<ReservationView>, samples: bool) -> BoardSnapshot {
        for item in &mut items {
            item.updating = self.in_flight.contains_key(item.id());
        }
        BoardSnapshot {
            empty: items.is_empty(),
            reservations: items,
            samples,
        }
    }
}
