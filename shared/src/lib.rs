//! Shared types for TableBook
//!
//! Domain models, error codes and response envelopes used by the server
//! and by anything that talks to its HTTP API.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
