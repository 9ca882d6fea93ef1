//! Placeholder reservations
//!
//! Shown instead of the empty state only when `RESERVATION_DEMO_SAMPLES`
//! is enabled.

use chrono::{TimeZone, Utc};
use shared::models::{Reservation, ReservationDetails, ReservationStatus};

/// Id prefix of placeholder rows; they never exist in the store
pub const SAMPLE_ID_PREFIX: &str = "sample-";

pub fn sample_reservations() -> Vec<Reservation> {
    let rows = [
        ("1", "user1", "John Doe", "restaurant1", "The Great Restaurant", (1, 18, 30), ReservationStatus::Pending),
        ("2", "user2", "Jane Smith", "restaurant2", "Delicious Dishes", (2, 19, 0), ReservationStatus::Accepted),
        ("3", "user3", "Alice Johnson", "restaurant3", "Tasty Treats", (3, 20, 0), ReservationStatus::Rejected),
    ];

    rows.into_iter()
        .filter_map(|(id, user_id, user_name, restaurant_id, restaurant_name, (day, hour, minute), status)| {
            let time = Utc.with_ymd_and_hms(2024, 7, day, hour, minute, 0).single()?;
            Some(Reservation {
                id: format!("{SAMPLE_ID_PREFIX}{id}"),
                details: ReservationDetails {
                    user_id: user_id.to_string(),
                    user_name: Some(user_name.to_string()),
                    restaurant_id: restaurant_id.to_string(),
                    restaurant_name: restaurant_name.to_string(),
                    time,
                    status,
                },
            })
        })
        .collect()
}

pub fn is_sample_id(id: &str) -> bool {
    id.starts_with(SAMPLE_ID_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_cover_every_status() {
        let samples = sample_reservations();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|r| is_sample_id(&r.id)));
        assert_eq!(samples[0].details.status, ReservationStatus::Pending);
        assert_eq!(samples[2].details.user_name.as_deref(), Some("Alice Johnson"));
    }
}
