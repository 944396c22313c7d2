// ==========================================
// 管道库存系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + calamine
// 系统定位: 管道台账导入与管理（逐行容错，批次汇总）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::PipeStatus;

// 领域实体
pub use domain::{BatchReport, Pipe, PipeDraft, RowOutcome, RowStatus};

// 导入
pub use importer::{PipeImporter, PipeImporterImpl};

// API
pub use api::{ApiError, ApiResult, ImportApi, PipeApi, UploadedFile};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "pipe-inventory";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
