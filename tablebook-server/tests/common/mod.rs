//! Recording fakes for the collaborator traits
//!
//! Every store call is appended to one shared [`CallLog`] so tests can
//! assert ordering across stores.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use shared::models::{
    Listing, ListingDetails, ListingDraft, Reservation, ReservationDetails, ReservationStatus,
};
use tablebook_server::CurrentUser;
use tablebook_server::auth::Identity;
use tablebook_server::db::repository::{
    ListingStore, RepoError, RepoResult, ReservationStore, UserDirectory,
};
use tablebook_server::listings::{FileUpload, ListingForm};
use tablebook_server::storage::{ObjectStore, StorageError, StorageResult, StoredObject};
use tokio::sync::Semaphore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Put(String),
    Create(String),
    Overwrite(String),
    UpdateStatus(String, ReservationStatus),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

// ========== Listings ==========

pub struct FakeListings {
    log: CallLog,
    pub rows: Mutex<Vec<Listing>>,
    pub fail_create: bool,
}

impl FakeListings {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            rows: Mutex::new(Vec::new()),
            fail_create: false,
        }
    }

    pub fn failing(log: CallLog) -> Self {
        Self {
            fail_create: true,
            ..Self::new(log)
        }
    }
}

#[async_trait]
impl ListingStore for FakeListings {
    async fn create(&self, details: ListingDetails) -> RepoResult<Listing> {
        self.log.lock().push(Call::Create(details.name.clone()));
        if self.fail_create {
            return Err(RepoError::Database("write rejected".to_string()));
        }
        let mut rows = self.rows.lock();
        let listing = Listing {
            id: format!("listing-{}", rows.len() + 1),
            details,
        };
        rows.push(listing.clone());
        Ok(listing)
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Listing>> {
        Ok(self.rows.lock().iter().find(|l| l.id == id).cloned())
    }

    async fn overwrite(&self, id: &str, details: ListingDetails) -> RepoResult<Listing> {
        self.log.lock().push(Call::Overwrite(id.to_string()));
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        row.details = details;
        Ok(row.clone())
    }

    async fn find_by_owner(&self, owner_id: &str) -> RepoResult<Vec<Listing>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|l| l.details.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn list(&self) -> RepoResult<Vec<Listing>> {
        Ok(self.rows.lock().clone())
    }
}

// ========== Objects ==========

pub struct FakeObjects {
    log: CallLog,
    /// Zero-based index of the put call that fails
    pub fail_on_put: Option<usize>,
    puts: Mutex<usize>,
}

impl FakeObjects {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail_on_put: None,
            puts: Mutex::new(0),
        }
    }

    pub fn failing_at(log: CallLog, index: usize) -> Self {
        Self {
            fail_on_put: Some(index),
            ..Self::new(log)
        }
    }
}

#[async_trait]
impl ObjectStore for FakeObjects {
    async fn put(&self, key: &str, content_type: &str, bytes: Bytes) -> StorageResult<StoredObject> {
        self.log.lock().push(Call::Put(key.to_string()));
        let index = {
            let mut puts = self.puts.lock();
            let index = *puts;
            *puts += 1;
            index
        };
        if self.fail_on_put == Some(index) {
            return Err(StorageError::Io(std::io::Error::other("bucket unavailable")));
        }
        Ok(StoredObject {
            key: key.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len(),
        })
    }

    fn public_url(&self, object: &StoredObject) -> String {
        format!("https://files.test/{}", object.key)
    }

    async fn get(&self, _key: &str) -> StorageResult<Option<Bytes>> {
        Ok(None)
    }
}

// ========== Reservations ==========

pub struct FakeReservations {
    log: CallLog,
    pub rows: Mutex<Vec<Reservation>>,
    pub fail_updates: bool,
    /// When set, `update_status` waits for a permit before writing
    pub gate: Option<Arc<Semaphore>>,
    /// One permit per `update_status` call that has started
    pub started: Arc<Semaphore>,
    /// When set, `list` waits for a permit after reading the rows
    pub list_gate: Option<Arc<Semaphore>>,
    /// One permit per `list` call that has read the rows
    pub listed: Arc<Semaphore>,
}

impl FakeReservations {
    pub fn new(log: CallLog, rows: Vec<Reservation>) -> Self {
        Self {
            log,
            rows: Mutex::new(rows),
            fail_updates: false,
            gate: None,
            started: Arc::new(Semaphore::new(0)),
            list_gate: None,
            listed: Arc::new(Semaphore::new(0)),
        }
    }

    pub fn gated(log: CallLog, rows: Vec<Reservation>) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let store = Self {
            gate: Some(gate.clone()),
            ..Self::new(log, rows)
        };
        (store, gate)
    }

    /// Gate both status writes and list reads
    pub fn gated_reads(
        log: CallLog,
        rows: Vec<Reservation>,
    ) -> (Self, Arc<Semaphore>, Arc<Semaphore>) {
        let (mut store, gate) = Self::gated(log, rows);
        let list_gate = Arc::new(Semaphore::new(0));
        store.list_gate = Some(list_gate.clone());
        (store, gate, list_gate)
    }

    /// Wait until `n` list reads have taken their rows
    pub async fn wait_listed(&self, n: u32) {
        self.listed.acquire_many(n).await.unwrap().forget();
    }

    /// Wait until `n` status writes are in progress
    pub async fn wait_started(&self, n: u32) {
        self.started.acquire_many(n).await.unwrap().forget();
    }

    pub fn status_of(&self, id: &str) -> Option<ReservationStatus> {
        self.rows
            .lock()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.details.status)
    }
}

#[async_trait]
impl ReservationStore for FakeReservations {
    async fn list(&self) -> RepoResult<Vec<Reservation>> {
        let rows = self.rows.lock().clone();
        self.listed.add_permits(1);
        if let Some(gate) = &self.list_gate {
            gate.acquire().await.unwrap().forget();
        }
        Ok(rows)
    }

    async fn get(&self, id: &str) -> RepoResult<Option<Reservation>> {
        Ok(self.rows.lock().iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, details: ReservationDetails) -> RepoResult<Reservation> {
        let mut rows = self.rows.lock();
        let reservation = Reservation {
            id: format!("r{}", rows.len() + 1),
            details,
        };
        rows.push(reservation.clone());
        Ok(reservation)
    }

    async fn update_status(&self, id: &str, status: ReservationStatus) -> RepoResult<()> {
        self.started.add_permits(1);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.log
            .lock()
            .push(Call::UpdateStatus(id.to_string(), status));
        if self.fail_updates {
            return Err(RepoError::Database("write rejected".to_string()));
        }
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        row.details.status = status;
        Ok(())
    }
}

// ========== Users ==========

#[derive(Default)]
pub struct FakeUsers {
    pub names: HashMap<String, String>,
}

impl FakeUsers {
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        Self {
            names: pairs
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for FakeUsers {
    async fn display_name(&self, user_id: &str) -> RepoResult<Option<String>> {
        Ok(self.names.get(user_id).cloned())
    }
}

// ========== Fixtures ==========

pub fn owner() -> CurrentUser {
    CurrentUser {
        id: "owner-1".to_string(),
        display_name: Some("Olivia Owner".to_string()),
    }
}

pub fn signed_in() -> Identity {
    Identity::SignedIn(owner())
}

pub fn image(name: &str) -> FileUpload {
    FileUpload::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
}

pub fn pdf_menu() -> FileUpload {
    FileUpload::new("menu.pdf", "application/pdf", b"%PDF-1.4 menu".to_vec())
}

pub fn valid_form(images: usize) -> ListingForm {
    ListingForm {
        draft: ListingDraft {
            name: "Blue Fin".to_string(),
            address: "1 Harbor Rd".to_string(),
            latitude: "40.7128".to_string(),
            longitude: "-74.0060".to_string(),
            capacity: 40,
            description: "Seafood by the water".to_string(),
            ..ListingDraft::default()
        },
        images: (0..images).map(|i| image(&format!("photo-{i}.jpg"))).collect(),
        menu: Some(pdf_menu()),
    }
}

pub fn reservation(id: &str, user_id: &str, status: ReservationStatus) -> Reservation {
    Reservation {
        id: id.to_string(),
        details: ReservationDetails {
            user_id: user_id.to_string(),
            user_name: None,
            restaurant_id: "listing-1".to_string(),
            restaurant_name: "Blue Fin".to_string(),
            time: Utc.with_ymd_and_hms(2024, 7, 1, 18, 30, 0).unwrap(),
            status,
        },
    }
}
