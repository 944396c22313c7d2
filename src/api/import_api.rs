// ==========================================
// 管道库存系统 - 导入API
// ==========================================
// 职责: 上传校验（空文件/格式/大小）→ 导入管道 → 批次报告
// 说明: 文件级解析失败转换为零行失败报告，不作为 Err 返回
// ==========================================

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::domain::import::BatchReport;
use crate::importer::{
    parser_for_file_name, BatchReporter, PipeImporter, PipeImporterImpl, PositionalFieldMapper,
};
use crate::repository::{PipeRepository, PipeRepositoryImpl};

/// 上传文件（内存字节流）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// 导入API
pub struct ImportApi<R, C>
where
    R: PipeRepository,
    C: ImportConfigReader,
{
    repo: Arc<R>,
    config: Arc<C>,
}

impl ImportApi<PipeRepositoryImpl, ConfigManager> {
    /// 按数据库路径打开（仓储与配置共用同一连接）
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let repo = PipeRepositoryImpl::new(db_path)?;
        let config = ConfigManager::from_connection(repo.connection()).map_err(|e| {
            ApiError::InternalError(format!("配置管理器初始化失败: {}", e))
        })?;
        Ok(Self::new(Arc::new(repo), Arc::new(config)))
    }
}

impl<R, C> ImportApi<R, C>
where
    R: PipeRepository + 'static,
    C: ImportConfigReader,
{
    pub fn new(repo: Arc<R>, config: Arc<C>) -> Self {
        Self { repo, config }
    }

    /// 导入单个上传文件
    ///
    /// # 返回
    /// - Ok(BatchReport): 导入报告（文件无法解析时为零行失败报告）
    /// - Err(InvalidInput): 空文件 / 不支持的格式 / 超出大小上限
    pub async fn upload_file(&self, file_name: &str, bytes: &[u8]) -> ApiResult<BatchReport> {
        if bytes.is_empty() {
            return Err(ApiError::InvalidInput("File is empty".to_string()));
        }

        let max_bytes = self
            .config
            .get_max_upload_bytes()
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        if bytes.len() as u64 > max_bytes {
            warn!(file_name, size = bytes.len(), max_bytes, "上传文件超出大小上限");
            return Err(ApiError::InvalidInput(format!(
                "File is too large: {} bytes (limit {} bytes)",
                bytes.len(),
                max_bytes
            )));
        }

        let sheet_name = self
            .config
            .get_sheet_name()
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        let parser = parser_for_file_name(file_name, sheet_name).ok_or_else(|| {
            ApiError::InvalidInput(
                "Invalid file format. Please upload Excel file (.xlsx) or CSV file (.csv)"
                    .to_string(),
            )
        })?;

        // 每次调用创建独立导入器
        let importer = PipeImporterImpl::new(
            Arc::clone(&self.repo),
            parser,
            Box::new(PositionalFieldMapper),
        );

        info!(file_name, size = bytes.len(), "开始处理上传文件");
        match importer.import_from_bytes(bytes).await {
            Ok(report) => Ok(report),
            Err(e) if e.is_container() => {
                error!(file_name, error = %e, "上传文件无法解析");
                Ok(BatchReporter.container_failure(Uuid::new_v4().to_string(), &e))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 并发导入多个上传文件（各文件互不影响）
    ///
    /// # 说明
    /// - 文件之间不做协调，重复编号由唯一索引兜底
    /// - 返回顺序与输入顺序一致
    pub async fn upload_many(&self, files: Vec<UploadedFile>) -> Vec<ApiResult<BatchReport>> {
        info!(files = files.len(), "开始批量导入");
        join_all(
            files
                .iter()
                .map(|file| self.upload_file(&file.file_name, &file.bytes)),
        )
        .await
    }
}
