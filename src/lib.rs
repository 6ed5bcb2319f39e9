//! LeetCode 刷题进度追踪内核
//! 统计聚合、连续打卡与题目管理：界面层之下的命令、存储与统计引擎

pub mod commands;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use error::{AuthError, StorageError};
pub use models::{
    Difficulty, DifficultyProgress, Problem, ProblemStatus, UserIdentity, UserProfile, UserStats,
};
pub use services::{
    AuthService, DatabaseService, DemoService, ProblemFilter, ProblemStore, ProfileStore,
    StatsPatch, StatsStore, TrackerStore,
};

/// 应用状态：SQLite 存储、演示存储与认证门面，由界面层持有
pub struct AppState {
    pub db: DatabaseService,
    pub demo: DemoService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(db: DatabaseService) -> Self {
        Self {
            db,
            demo: DemoService::new(),
            auth: AuthService::new(),
        }
    }

    /// 打开指定路径的数据库并组装应用状态
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, StorageError> {
        Ok(Self::new(DatabaseService::open(path)?))
    }

    /// 按默认数据目录打开
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::new(DatabaseService::open_default()?))
    }
}
