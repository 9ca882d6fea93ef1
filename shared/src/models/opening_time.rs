//! Opening time models
//!
//! The edit form keeps one [`OpeningTimeDraft`] per weekday, indexed by
//! position in [`WEEKDAYS`]. Stored listings carry the rendered
//! [`OpeningWindow`] list instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weekday labels, in the order the per-weekday drafts are indexed
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// One draft per weekday, aligned with [`WEEKDAYS`]
pub type WeeklyDraft = [OpeningTimeDraft; 7];

/// AM / PM marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meridiem {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl Meridiem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw edit state for one weekday
///
/// Hour and minute are kept as the strings the owner typed so the rendered
/// window reproduces them verbatim (`"05"` stays `"05"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningTimeDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_hour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_minute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_am_pm: Option<Meridiem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_hour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_minute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_am_pm: Option<Meridiem>,
    #[serde(default)]
    pub closed: bool,
}

/// Stored opening window for one weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningWindow {
    pub day: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub closed: bool,
}
