//! Restaurant API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/restaurants | POST | multipart 上架 | Bearer |
//! | /api/restaurants | GET | 我的餐厅 | Bearer |
//! | /api/restaurants/all | GET | 全部餐厅 | 无 |
//! | /api/restaurants/{id} | GET | 详情 | 无 |
//! | /api/restaurants/{id} | PUT | 店主覆盖编辑 | Bearer |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_mine).post(handler::submit))
        .route("/all", get(handler::list_all))
        .route("/{id}", get(handler::get_by_id).put(handler::overwrite))
}
