//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`restaurants`] - 餐厅上架、列表、详情、覆盖编辑
//! - [`reservations`] - 预约审核
//! - [`files`] - 上传文件下载

pub mod files;
pub mod health;
pub mod reservations;
pub mod restaurants;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        .merge(restaurants::router())
        .merge(reservations::router())
        // File download - public route
        .merge(files::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: ServerState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    build_router()
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        // CORS - browser frontend on another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Request logging - outermost, executed first
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
