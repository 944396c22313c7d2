// ==========================================
// 管道库存系统 - 管道台账 Repository Trait
// ==========================================
// 职责: 定义管道台账数据访问接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::pipe::{Pipe, PipeDraft};
use crate::domain::types::PipeStatus;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// PipeRepository Trait
// ==========================================
// 实现者: PipeRepositoryImpl（rusqlite）
#[async_trait]
pub trait PipeRepository: Send + Sync {
    // ===== 写入 =====

    /// 插入新记录，返回带系统字段（id / created_at / updated_at）的完整记录
    ///
    /// # 说明
    /// - 不做存在性检查（由调用方的重复检测负责）
    /// - pipe_number 冲突时返回 UniqueConstraintViolation
    async fn create(&self, draft: PipeDraft) -> RepositoryResult<Pipe>;

    /// 全字段覆盖更新，刷新 updated_at
    ///
    /// # 返回
    /// - Err(NotFound): id 不存在
    async fn update(&self, pipe: Pipe) -> RepositoryResult<Pipe>;

    /// 按 id 删除
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 记录不存在
    async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool>;

    // ===== 查询与校验 =====

    /// 检查管道编号是否已存在（唯一索引查询）
    async fn exists_by_pipe_number(&self, pipe_number: &str) -> RepositoryResult<bool>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Pipe>>;

    async fn find_by_pipe_number(&self, pipe_number: &str) -> RepositoryResult<Option<Pipe>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Pipe>>;

    async fn find_by_status(&self, status: PipeStatus) -> RepositoryResult<Vec<Pipe>>;

    async fn find_by_material(&self, material: &str) -> RepositoryResult<Vec<Pipe>>;

    async fn find_by_location(&self, location: &str) -> RepositoryResult<Vec<Pipe>>;

    async fn find_by_manufacturer(&self, manufacturer: &str) -> RepositoryResult<Vec<Pipe>>;

    /// 外径区间查询（闭区间）
    async fn find_by_diameter_range(&self, min: f64, max: f64) -> RepositoryResult<Vec<Pipe>>;

    async fn find_by_batch_number(&self, batch_number: &str) -> RepositoryResult<Vec<Pipe>>;

    async fn count_by_status(&self, status: PipeStatus) -> RepositoryResult<i64>;
}
