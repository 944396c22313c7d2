// ==========================================
// 管道库存系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{ImportApi, PipeApi};
use crate::config::ConfigManager;
use crate::repository::PipeRepositoryImpl;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "PIPE_INVENTORY_DB_PATH";

/// 应用状态
///
/// 仓储、配置与各 API 共用同一数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 管道API
    pub pipe_api: Arc<PipeApi<PipeRepositoryImpl>>,

    /// 管道导入API
    pub import_api: Arc<ImportApi<PipeRepositoryImpl, ConfigManager>>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 流程
    /// 1. 打开数据库并建表
    /// 2. 基于共享连接创建配置管理器
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let repo = Arc::new(
            PipeRepositoryImpl::new(&db_path)
                .map_err(|e| format!("无法创建PipeRepository: {}", e))?,
        );
        let config = Arc::new(
            ConfigManager::from_connection(repo.connection())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        let pipe_api = Arc::new(PipeApi::new(Arc::clone(&repo)));
        let import_api = Arc::new(ImportApi::new(Arc::clone(&repo), Arc::clone(&config)));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config,
            pipe_api,
            import_api,
        })
    }
}

/// 获取默认数据库路径
///
/// # 优先级
/// 1. 环境变量 PIPE_INVENTORY_DB_PATH
/// 2. 用户数据目录 / pipe-inventory / pipe_inventory.db
/// 3. 当前目录 ./pipe_inventory.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./pipe_inventory.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("pipe-inventory");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("pipe_inventory.db");
        }
    }

    path.to_string_lossy().to_string()
}
