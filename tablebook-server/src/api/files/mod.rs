//! File download route
//!
//! Serves objects written by the listing submission flow.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    routing::get,
};
use http::header;
use shared::error::ErrorCode;

use crate::core::ServerState;
use crate::storage::validate_key;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/files/{*key}", get(serve_file))
}

/// GET /api/files/{*key}
async fn serve_file(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> AppResult<([(header::HeaderName, String); 1], Bytes)> {
    validate_key(&key)?;

    let content = state.objects.get(&key).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::NotFound, "File not found").with_detail("key", key.clone())
    })?;

    let content_type = mime_guess::from_path(&key)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    tracing::debug!(key = %key, size = content.len(), "Serving stored file");

    Ok(([(header::CONTENT_TYPE, content_type)], content))
}
