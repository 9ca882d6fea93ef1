//! TableBook Server - 餐厅上架与预约审核后端
//!
//! # 架构概述
//!
//! - **上架** (`listings`): 表单校验、文件上传、新建与覆盖餐厅文档
//! - **预约** (`reservations`): 预约列表与接受/拒绝状态流转
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **文件存储** (`storage`): 本地对象存储与公开 URL
//! - **认证** (`auth`): JWT 身份解析
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! tablebook-server/src/
//! ├── core/          # 配置、状态、错误
//! ├── auth/          # JWT 认证、身份
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! ├── listings/      # 上架工作流
//! ├── reservations/  # 预约审核
//! ├── storage/       # 对象存储
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod listings;
pub mod reservations;
pub mod storage;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, Identity, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: `.env`、工作目录、日志
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
    std::fs::create_dir_all(&work_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ______      __    __     ____              __
 /_  __/___ _/ /_  / /__  / __ )____  ____  / /__
  / / / __ `/ __ \/ / _ \/ __  / __ \/ __ \/ //_/
 / / / /_/ / /_/ / /  __/ /_/ / /_/ / /_/ / ,<
/_/  \__,_/_.___/_/\___/_____/\____/\____/_/|_|
    "#
    );
}
