// ==========================================
// 管道库存系统 - 管道 API
// ==========================================
// 职责: 单条创建（导入与手工共用）、部分更新、查询、删除
// 红线: 每次写入前执行重复检测，唯一索引兜底
// ==========================================

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::pipe::{Pipe, PipeDraft};
use crate::domain::types::PipeStatus;
use crate::importer::conflict_handler::DuplicateGuard;
use crate::repository::error::RepositoryError;
use crate::repository::pipe_repo::PipeRepository;

// ==========================================
// PipeApi - 管道 API
// ==========================================

/// 管道API
///
/// 职责：
/// 1. 单条创建（重复检测 + 业务校验 + 落库）
/// 2. 部分更新（禁止改名为已存在的管道编号）
/// 3. 按编号/状态/材质/库位/厂家/外径区间/批次查询
pub struct PipeApi<R>
where
    R: PipeRepository,
{
    repo: Arc<R>,
    guard: DuplicateGuard<R>,
}

impl<R> PipeApi<R>
where
    R: PipeRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        let guard = DuplicateGuard::new(Arc::clone(&repo));
        Self { repo, guard }
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 创建管道记录
    ///
    /// # 返回
    /// - Err(DuplicateKey): 管道编号已存在（含并发插入被唯一索引拦截）
    /// - Err(ValidationError): 编号缺失 / 数值为负
    pub async fn create_pipe(&self, draft: PipeDraft) -> ApiResult<Pipe> {
        if let Some(number) = draft.normalized_number() {
            if self.guard.exists(number).await? {
                return Err(ApiError::DuplicateKey(number.to_string()));
            }
        }

        draft.validate().map_err(ApiError::ValidationError)?;

        let number = draft.normalized_number().unwrap_or_default().to_string();
        match self.repo.create(draft).await {
            Ok(pipe) => {
                debug!(pipe_id = pipe.id, pipe_number = %pipe.pipe_number, "管道已创建");
                Ok(pipe)
            }
            Err(RepositoryError::UniqueConstraintViolation(msg)) => {
                warn!(pipe_number = %number, reason = %msg, "唯一索引拦截重复编号");
                Err(ApiError::DuplicateKey(number))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 部分更新（补丁中非 None 的字段覆盖原值）
    ///
    /// # 返回
    /// - Err(NotFound): id 不存在
    /// - Err(DuplicateKey): 新编号已被其他记录占用
    pub async fn update_pipe(&self, id: i64, patch: PipeDraft) -> ApiResult<Pipe> {
        let mut pipe = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("pipe (id={})", id)))?;

        if let Some(new_number) = patch.normalized_number() {
            if new_number != pipe.pipe_number && self.guard.exists(new_number).await? {
                return Err(ApiError::DuplicateKey(new_number.to_string()));
            }
        }

        pipe.apply_patch(patch);
        pipe.validate().map_err(ApiError::ValidationError)?;

        let number = pipe.pipe_number.clone();
        match self.repo.update(pipe).await {
            Ok(updated) => {
                info!(pipe_id = id, pipe_number = %updated.pipe_number, "管道已更新");
                Ok(updated)
            }
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                Err(ApiError::DuplicateKey(number))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 删除管道
    ///
    /// # 返回
    /// - Err(NotFound): id 不存在
    pub async fn delete_pipe(&self, id: i64) -> ApiResult<()> {
        if self.repo.delete_by_id(id).await? {
            info!(pipe_id = id, "管道已删除");
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("pipe (id={})", id)))
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    pub async fn get_pipe_by_id(&self, id: i64) -> ApiResult<Option<Pipe>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn get_pipe_by_number(&self, pipe_number: &str) -> ApiResult<Option<Pipe>> {
        let number = pipe_number.trim();
        if number.is_empty() {
            return Err(ApiError::InvalidInput("Pipe number must not be empty".to_string()));
        }
        Ok(self.repo.find_by_pipe_number(number).await?)
    }

    pub async fn list_pipes(&self) -> ApiResult<Vec<Pipe>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn list_by_status(&self, status: PipeStatus) -> ApiResult<Vec<Pipe>> {
        Ok(self.repo.find_by_status(status).await?)
    }

    pub async fn list_by_material(&self, material: &str) -> ApiResult<Vec<Pipe>> {
        Ok(self.repo.find_by_material(material.trim()).await?)
    }

    pub async fn list_by_location(&self, location: &str) -> ApiResult<Vec<Pipe>> {
        Ok(self.repo.find_by_location(location.trim()).await?)
    }

    pub async fn list_by_manufacturer(&self, manufacturer: &str) -> ApiResult<Vec<Pipe>> {
        Ok(self.repo.find_by_manufacturer(manufacturer.trim()).await?)
    }

    /// 外径区间查询（闭区间，min ≤ max）
    pub async fn list_by_diameter_range(&self, min: f64, max: f64) -> ApiResult<Vec<Pipe>> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ApiError::InvalidInput(format!(
                "Invalid diameter range: {} .. {}",
                min, max
            )));
        }
        Ok(self.repo.find_by_diameter_range(min, max).await?)
    }

    pub async fn list_by_batch(&self, batch_number: &str) -> ApiResult<Vec<Pipe>> {
        Ok(self.repo.find_by_batch_number(batch_number.trim()).await?)
    }

    pub async fn count_by_status(&self, status: PipeStatus) -> ApiResult<i64> {
        Ok(self.repo.count_by_status(status).await?)
    }

    pub async fn pipe_number_exists(&self, pipe_number: &str) -> ApiResult<bool> {
        Ok(self.guard.exists(pipe_number).await?)
    }
}
