// ==========================================
// 管道库存系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod pipe_repo;
pub mod pipe_repo_impl;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use pipe_repo::PipeRepository;
pub use pipe_repo_impl::PipeRepositoryImpl;
