//! Reservation API Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::models::Decision;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::reservations::{BoardSnapshot, TransitionOutcome};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct LoadQuery {
    /// Resolve requester display names (default true)
    pub names: Option<bool>,
}

/// GET /api/reservations - 加载预约
pub async fn load(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<LoadQuery>,
) -> AppResult<Json<BoardSnapshot>> {
    tracing::debug!(user_id = %current_user.id, "Loading reservation board");
    let snapshot = state.board.load(query.names.unwrap_or(true)).await?;
    Ok(Json(snapshot))
}

/// POST /api/reservations/{id}/accept
pub async fn accept(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<TransitionOutcome>> {
    review(&state, &current_user, &id, Decision::Accept).await
}

/// POST /api/reservations/{id}/reject
pub async fn reject(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<TransitionOutcome>> {
    review(&state, &current_user, &id, Decision::Reject).await
}

async fn review(
    state: &ServerState,
    current_user: &CurrentUser,
    id: &str,
    decision: Decision,
) -> AppResult<Json<TransitionOutcome>> {
    // A restarted server has no board yet
    if !state.board.is_loaded() {
        state.board.load(false).await?;
    }
    tracing::info!(user_id = %current_user.id, reservation_id = %id, ?decision, "Reviewing reservation");
    let outcome = state.board.transition(id, decision).await?;
    Ok(Json(outcome))
}
