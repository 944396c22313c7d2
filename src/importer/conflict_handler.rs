// ==========================================
// 管道库存系统 - 重复检测（Duplicate Guard）
// ==========================================
// 职责: 按业务主键 pipe_number 查询是否已存在
// 说明: 先查后插不具备原子性，最终由唯一索引兜底
// ==========================================

use crate::repository::error::RepositoryResult;
use crate::repository::pipe_repo::PipeRepository;
use std::sync::Arc;

pub struct DuplicateGuard<R>
where
    R: PipeRepository,
{
    repo: Arc<R>,
}

impl<R> Clone for DuplicateGuard<R>
where
    R: PipeRepository,
{
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R> DuplicateGuard<R>
where
    R: PipeRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 管道编号是否已存在（按 TRIM 后比较）
    pub async fn exists(&self, pipe_number: &str) -> RepositoryResult<bool> {
        self.repo.exists_by_pipe_number(pipe_number.trim()).await
    }
}
