// ==========================================
// 管道库存系统 - 管道导入器实现（批次编排）
// ==========================================
// 职责: 整合导入流程，从上传字节流到逐行落库
// 流程: 解析 → 跳过表头 → 逐行 {映射 → 重复检测 → 单条创建} → 汇总
// ==========================================
// 红线: 单行失败不中断批次；仅文件级错误向上传播
// 顺序: 行严格按源表顺序串行处理，结果顺序 = 行顺序
// ==========================================

use crate::api::error::ApiError;
use crate::api::pipe_api::PipeApi;
use crate::domain::import::{BatchReport, RowOutcome, RowStatus};
use crate::domain::pipe::Pipe;
use crate::importer::batch_reporter::BatchReporter;
use crate::importer::conflict_handler::DuplicateGuard;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::ExcelParser;
use crate::importer::field_mapper::PositionalFieldMapper;
use crate::importer::pipe_importer_trait::{FieldMapper, FileParser, PipeImporter, SheetRow};
use crate::repository::pipe_repo::PipeRepository;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// PipeImporterImpl - 管道导入器实现
// ==========================================
pub struct PipeImporterImpl<R>
where
    R: PipeRepository,
{
    // 单条创建路径（与手工创建共用校验）
    pipe_api: Arc<PipeApi<R>>,

    // 导入组件
    guard: DuplicateGuard<R>,
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    reporter: BatchReporter,
}

impl<R> PipeImporterImpl<R>
where
    R: PipeRepository,
{
    /// 创建新的 PipeImporter 实例
    ///
    /// # 参数
    /// - repo: 管道仓储（重复检测与创建共用）
    /// - file_parser: 文件解析器
    /// - field_mapper: 字段映射器
    pub fn new(
        repo: Arc<R>,
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
    ) -> Self {
        Self {
            pipe_api: Arc::new(PipeApi::new(Arc::clone(&repo))),
            guard: DuplicateGuard::new(repo),
            file_parser,
            field_mapper,
            reporter: BatchReporter,
        }
    }

    /// 默认组件：Excel 首个工作表 + 标准列布局
    pub fn with_defaults(repo: Arc<R>) -> Self {
        Self::new(
            repo,
            Box::new(ExcelParser::new()),
            Box::new(PositionalFieldMapper),
        )
    }

    /// 逐行处理（首行为表头）
    async fn process_rows(
        &self,
        batch_id: String,
        rows: Vec<SheetRow>,
        started: Instant,
    ) -> BatchReport {
        let mut outcomes = Vec::with_capacity(rows.len());
        let mut processed: Vec<Pipe> = Vec::new();

        // 表头行无条件跳过
        for row in rows.into_iter().skip(1) {
            let (outcome, pipe) = self.process_row(row).await;
            if !outcome.is_success() {
                warn!(
                    batch_id = %batch_id,
                    row = outcome.row_number,
                    status = ?outcome.status,
                    error = outcome.error.as_deref().unwrap_or(""),
                    "行导入未成功"
                );
            }
            if let Some(pipe) = pipe {
                processed.push(pipe);
            }
            outcomes.push(outcome);
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let report = self
            .reporter
            .summarize(batch_id, outcomes, processed, elapsed_ms);

        info!(
            batch_id = %report.batch_id,
            total = report.total_records,
            successful = report.successful_records,
            failed = report.failed_records,
            warnings = report.warnings.len(),
            elapsed_ms = report.elapsed_ms,
            "管道导入完成"
        );

        report
    }

    /// 单行处理，返回终态（及成功时的记录）
    async fn process_row(&self, row: SheetRow) -> (RowOutcome, Option<Pipe>) {
        let row_number = row.row_number;

        // === 步骤 1: 映射 ===
        let mapped = match self.field_mapper.map_row(&row.cells, row_number) {
            Ok(mapped) => mapped,
            Err(e) => {
                return (
                    RowOutcome::failed(row_number, RowStatus::FailedParse, e.to_string(), None),
                    None,
                )
            }
        };
        let warning = mapped.warning;
        if let Some(w) = &warning {
            warn!(row = row_number, warning = %w, "状态回退为默认值");
        }

        // === 步骤 2: 重复检测 ===
        if let Some(number) = mapped.draft.normalized_number() {
            match self.guard.exists(number).await {
                Ok(true) => {
                    let err = ImportError::DuplicateKey {
                        row: row_number,
                        pipe_number: number.to_string(),
                    };
                    return (
                        RowOutcome::failed(
                            row_number,
                            RowStatus::SkippedDuplicate,
                            err.to_string(),
                            warning,
                        ),
                        None,
                    );
                }
                Ok(false) => {}
                Err(e) => {
                    let err = ImportError::Store {
                        row: row_number,
                        message: e.to_string(),
                    };
                    return (
                        RowOutcome::failed(
                            row_number,
                            RowStatus::FailedOther,
                            err.to_string(),
                            warning,
                        ),
                        None,
                    );
                }
            }
        }

        // === 步骤 3: 单条创建（含二次重复检测 + 校验）===
        match self.pipe_api.create_pipe(mapped.draft).await {
            Ok(pipe) => {
                debug!(row = row_number, pipe_id = pipe.id, "行导入成功");
                (RowOutcome::succeeded(row_number, pipe.id, warning), Some(pipe))
            }
            Err(ApiError::DuplicateKey(pipe_number)) => {
                let err = ImportError::DuplicateKey {
                    row: row_number,
                    pipe_number,
                };
                (
                    RowOutcome::failed(
                        row_number,
                        RowStatus::SkippedDuplicate,
                        err.to_string(),
                        warning,
                    ),
                    None,
                )
            }
            Err(e) => {
                let err = ImportError::Store {
                    row: row_number,
                    message: e.to_string(),
                };
                (
                    RowOutcome::failed(
                        row_number,
                        RowStatus::FailedOther,
                        err.to_string(),
                        warning,
                    ),
                    None,
                )
            }
        }
    }
}

#[async_trait::async_trait]
impl<R> PipeImporter for PipeImporterImpl<R>
where
    R: PipeRepository + 'static,
{
    #[instrument(skip(self, bytes), fields(batch_id, size = bytes.len()))]
    async fn import_from_bytes(&self, bytes: &[u8]) -> ImportResult<BatchReport> {
        let started = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        info!(batch_id = %batch_id, "开始导入管道数据");

        // === 解析文件（工作簿在此调用内释放）===
        let rows = self.file_parser.parse_to_rows(bytes).map_err(|e| {
            error!(batch_id = %batch_id, error = %e, "文件解析失败");
            e
        })?;
        debug!(rows = rows.len(), "文件解析完成（含表头）");

        Ok(self.process_rows(batch_id, rows, started).await)
    }

    async fn import_rows(&self, rows: Vec<SheetRow>) -> BatchReport {
        let batch_id = Uuid::new_v4().to_string();
        info!(batch_id = %batch_id, rows = rows.len(), "开始导入已解析行");
        self.process_rows(batch_id, rows, Instant::now()).await
    }
}
