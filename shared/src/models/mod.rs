//! Domain models shared between the server and its clients

pub mod listing;
pub mod opening_time;
pub mod reservation;
pub mod user;

pub use listing::{Category, Discount, Listing, ListingDetailView, ListingDetails, ListingDraft};
pub use opening_time::{Meridiem, OpeningTimeDraft, OpeningWindow, WEEKDAYS, WeeklyDraft};
pub use reservation::{Decision, Reservation, ReservationDetails, ReservationStatus};
pub use user::UserProfile;
