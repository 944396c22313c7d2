// ==========================================
// 管道库存系统 - 批次报告生成器
// ==========================================
// 职责: 逐行结果 → BatchReport（纯函数，无 IO）
// 约定: successful + failed == total
// ==========================================

use crate::domain::import::{BatchReport, RowOutcome};
use crate::domain::pipe::Pipe;
use crate::importer::error::ImportError;

pub const SUCCESS_MESSAGE: &str = "Excel file processed successfully";

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchReporter;

impl BatchReporter {
    /// 汇总逐行结果
    ///
    /// # 参数
    /// - outcomes: 逐行结果（按行序）
    /// - processed: 成功创建的记录（按行序）
    pub fn summarize(
        &self,
        batch_id: String,
        outcomes: Vec<RowOutcome>,
        processed: Vec<Pipe>,
        elapsed_ms: u64,
    ) -> BatchReport {
        let total = outcomes.len();
        let successful = outcomes.iter().filter(|o| o.is_success()).count();
        let failed = total - successful;

        let errors: Vec<String> = outcomes.iter().filter_map(|o| o.error.clone()).collect();
        let warnings: Vec<String> = outcomes.iter().filter_map(|o| o.warning.clone()).collect();

        // 可读文件统一使用成功消息，部分失败由 success/errors 表达
        BatchReport {
            batch_id,
            success: failed == 0,
            message: SUCCESS_MESSAGE.to_string(),
            total_records: total,
            successful_records: successful,
            failed_records: failed,
            errors,
            warnings,
            processed_pipes: processed,
            outcomes,
            elapsed_ms,
        }
    }

    /// 文件级失败报告（零行）
    pub fn container_failure(&self, batch_id: String, err: &ImportError) -> BatchReport {
        let cause = err.to_string();
        BatchReport {
            batch_id,
            success: false,
            message: format!("Error reading Excel file: {}", cause),
            total_records: 0,
            successful_records: 0,
            failed_records: 0,
            errors: vec![cause],
            warnings: Vec::new(),
            processed_pipes: Vec::new(),
            outcomes: Vec::new(),
            elapsed_ms: 0,
        }
    }
}
