// ==========================================
// 管道库存系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行入口调用
// ==========================================

pub mod error;
pub mod import_api;
pub mod pipe_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, UploadedFile};
pub use pipe_api::PipeApi;
