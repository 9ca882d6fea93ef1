use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// In-memory database marker for `DATABASE_PATH`
pub const MEMORY_DATABASE: &str = "mem://";

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、上传文件) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | {WORK_DIR}/database | RocksDB 目录，`mem://` 为内存库 |
/// | PUBLIC_BASE_URL | http://localhost:3000 | 上传文件公开 URL 前缀 |
/// | RESERVATION_DEMO_SAMPLES | false | 预约为空时显示示例数据 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志目录，存在时按天滚动写文件 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | MAX_UPLOAD_BYTES | 64 MiB | multipart 请求体上限 |
///
/// JWT 相关变量见 [`JwtConfig::from_env`].
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/tablebook HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 数据库目录或 `mem://`
    pub database_path: String,
    /// Public URL prefix for stored objects, without trailing slash
    pub public_base_url: String,
    /// Show placeholder reservations when the store is empty
    pub reservation_demo_samples: bool,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// Request body limit for listing submissions
    pub max_upload_bytes: usize,
}

impl Config {
    /// Defaults for everything except the work directory and JWT settings.
    /// Reads no environment variables.
    pub fn new(work_dir: impl Into<String>, jwt: JwtConfig) -> Self {
        let work_dir = work_dir.into();
        Self {
            database_path: default_database_path(&work_dir),
            work_dir,
            http_port: 3000,
            public_base_url: "http://localhost:3000".into(),
            reservation_demo_samples: false,
            jwt,
            environment: "development".into(),
            log_level: "info".into(),
            log_dir: None,
            request_timeout_ms: 30_000,
            max_upload_bytes: 64 * 1024 * 1024,
        }
    }

    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Result<Self, ServerError> {
        let jwt = JwtConfig::from_env().map_err(|e| ServerError::Config(e.to_string()))?;
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let mut config = Self::new(work_dir, jwt);

        if let Some(port) = env_parse("HTTP_PORT") {
            config.http_port = port;
        }
        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.database_path = path;
        }
        if let Ok(url) = std::env::var("PUBLIC_BASE_URL") {
            config.public_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(flag) = env_flag("RESERVATION_DEMO_SAMPLES") {
            config.reservation_demo_samples = flag;
        }
        if let Ok(env) = std::env::var("ENVIRONMENT") {
            config.environment = env;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_dir = std::env::var("LOG_DIR").ok();
        if let Some(ms) = env_parse("REQUEST_TIMEOUT_MS") {
            config.request_timeout_ms = ms;
        }
        if let Some(bytes) = env_parse("MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = bytes;
        }

        Ok(config)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_memory_database(&self) -> bool {
        self.database_path == MEMORY_DATABASE
    }

    /// Root directory of the local object store
    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        std::fs::create_dir_all(self.uploads_dir())?;
        if !self.is_memory_database() {
            std::fs::create_dir_all(&self.database_path)?;
        }
        Ok(())
    }
}

fn default_database_path(work_dir: &str) -> String {
    PathBuf::from(work_dir)
        .join("database")
        .to_string_lossy()
        .into_owned()
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
