//! Reservation API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/reservations | GET | 加载预约列表 | Bearer |
//! | /api/reservations/{id}/accept | POST | 接受 | Bearer |
//! | /api/reservations/{id}/reject | POST | 拒绝 | Bearer |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::load))
        .route("/{id}/accept", post(handler::accept))
        .route("/{id}/reject", post(handler::reject))
}
