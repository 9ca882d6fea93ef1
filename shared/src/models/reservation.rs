//! Reservation models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reservation lifecycle status
///
/// `Pending` is the only initial state; `Accepted` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staff decision on a pending reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    /// Status the reservation ends up in
    pub fn target_status(&self) -> ReservationStatus {
        match self {
            Self::Accept => ReservationStatus::Accepted,
            Self::Reject => ReservationStatus::Rejected,
        }
    }
}

/// Stored reservation document (everything except the document id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDetails {
    pub user_id: String,
    /// Name captured at booking time, if the booking side stored one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub restaurant_id: String,
    #[serde(default)]
    pub restaurant_name: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub status: ReservationStatus,
}

/// Reservation document with its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    #[serde(flatten)]
    pub details: ReservationDetails,
}
