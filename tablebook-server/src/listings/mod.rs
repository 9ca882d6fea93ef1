//! Restaurant listings
//!
//! - [`form`] - form value and whole-form validation
//! - [`opening_hours`] - weekday edit state → stored windows
//! - [`submission`] - upload files and create the listing
//! - [`edit`] - owner full overwrite

pub mod edit;
pub mod form;
pub mod opening_hours;
pub mod submission;

pub use edit::{EditError, ListingEdit, overwrite_listing};
pub use form::{FileUpload, ListingForm};
pub use submission::{LISTINGS_PATH, SubmissionError, SubmissionFlow, SubmissionOutcome};
