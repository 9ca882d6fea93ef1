//! Reservation review
//!
//! Staff-facing list of reservations with accept/reject transitions.

pub mod board;
pub mod samples;

pub use board::{BoardSnapshot, ReservationBoard, ReservationView, ReviewError, TransitionOutcome};
pub use samples::{SAMPLE_ID_PREFIX, is_sample_id, sample_reservations};
