// ==========================================
// 管道库存系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、导入结果模型
// 红线: 不含数据访问逻辑
// ==========================================

pub mod import;
pub mod pipe;
pub mod types;

// 重导出核心类型
pub use import::{BatchReport, RowOutcome, RowStatus};
pub use pipe::{Pipe, PipeDraft};
pub use types::PipeStatus;
