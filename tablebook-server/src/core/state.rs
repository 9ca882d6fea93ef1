use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::{Config, ServerError};
use crate::db::DbService;
use crate::db::repository::{
    ListingRepository, ListingStore, ReservationRepository, ReservationStore, UserDirectory,
    UserRepository,
};
use crate::listings::SubmissionFlow;
use crate::reservations::ReservationBoard;
use crate::storage::{LocalObjectStore, ObjectStore};

/// 服务器状态 - 持有所有服务的共享引用
///
/// Collaborators are held as trait objects so tests can swap in fakes
/// via [`ServerState::with_services`]. Cloning is cheap.
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | jwt_service | JWT 校验 |
/// | listings | restaurant 集合 |
/// | reservations | reservation 集合 |
/// | users | display-name lookups |
/// | objects | 上传文件存储 |
/// | submission | new-listing workflow |
/// | board | reservation review state |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub jwt_service: Arc<JwtService>,
    pub listings: Arc<dyn ListingStore>,
    pub reservations: Arc<dyn ReservationStore>,
    pub users: Arc<dyn UserDirectory>,
    pub objects: Arc<dyn ObjectStore>,
    pub submission: SubmissionFlow,
    pub board: Arc<ReservationBoard>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("work_dir", &self.config.work_dir)
            .field("jwt_service", &self.jwt_service)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 用给定的协作者组装状态
    pub fn with_services(
        config: Config,
        listings: Arc<dyn ListingStore>,
        reservations: Arc<dyn ReservationStore>,
        users: Arc<dyn UserDirectory>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let submission = SubmissionFlow::new(listings.clone(), objects.clone());
        let board = Arc::new(ReservationBoard::new(
            reservations.clone(),
            users.clone(),
            config.reservation_demo_samples,
        ));

        Self {
            config,
            jwt_service,
            listings,
            reservations,
            users,
            objects,
            submission,
            board,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (`DATABASE_PATH`, or in memory for `mem://`)
    /// 3. 仓库与本地文件存储
    pub async fn initialize(config: &Config) -> Result<Self, ServerError> {
        config.ensure_work_dir_structure()?;

        let db_service = if config.is_memory_database() {
            DbService::memory().await
        } else {
            DbService::new(&config.database_path).await
        }
        .map_err(|e| ServerError::Database(e.to_string()))?;
        let db = db_service.db;

        let objects = LocalObjectStore::new(config.uploads_dir(), config.public_base_url.clone());
        tracing::info!(root = %objects.root().display(), "Object store ready");

        Ok(Self::with_services(
            config.clone(),
            Arc::new(ListingRepository::new(db.clone())),
            Arc::new(ReservationRepository::new(db.clone())),
            Arc::new(UserRepository::new(db)),
            Arc::new(objects),
        ))
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn work_dir(&self) -> &str {
        &self.config.work_dir
    }
}
