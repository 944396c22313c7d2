// ==========================================
// 管道库存系统 - 导入结果模型
// ==========================================
// 职责: 行级导入结果 / 批次汇总报告
// 生命周期: 仅存在于单次导入调用，不落库
// ==========================================

use crate::domain::pipe::Pipe;
use serde::{Deserialize, Serialize};

// ==========================================
// RowStatus - 行级终态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowStatus {
    Succeeded,        // 成功落库
    SkippedDuplicate, // 管道编号已存在，跳过
    FailedParse,      // 单元格类型转换失败
    FailedOther,      // 校验/仓储失败
}

// ==========================================
// RowOutcome - 单行导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowOutcome {
    pub row_number: usize,       // 源表行号（从 1 开始，含表头行）
    pub status: RowStatus,
    pub pipe_id: Option<i64>,    // 成功时的记录 ID
    pub error: Option<String>,   // 非成功时的原因
    pub warning: Option<String>, // 软告警（如状态值无法识别而回退为 NEW）
}

impl RowOutcome {
    pub fn succeeded(row_number: usize, pipe_id: i64, warning: Option<String>) -> Self {
        Self {
            row_number,
            status: RowStatus::Succeeded,
            pipe_id: Some(pipe_id),
            error: None,
            warning,
        }
    }

    pub fn failed(
        row_number: usize,
        status: RowStatus,
        error: String,
        warning: Option<String>,
    ) -> Self {
        Self {
            row_number,
            status,
            pipe_id: None,
            error: Some(error),
            warning,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RowStatus::Succeeded
    }
}

// ==========================================
// BatchReport - 批次导入报告
// ==========================================
// 用途: 导入接口返回值
// 约定: successful_records + failed_records == total_records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: String,
    pub success: bool, // 仅当 failed_records == 0 时为 true
    pub message: String,
    pub total_records: usize,
    pub successful_records: usize,
    pub failed_records: usize,
    pub errors: Vec<String>,       // 按行序排列
    pub warnings: Vec<String>,     // 按行序排列
    pub processed_pipes: Vec<Pipe>, // 成功创建的记录（按行序）
    pub outcomes: Vec<RowOutcome>, // 逐行结果（按行序）
    pub elapsed_ms: u64,
}

impl BatchReport {
    /// 是否部分成功（存在失败行，但文件本身可读）
    pub fn is_partial(&self) -> bool {
        self.failed_records > 0 && self.total_records > 0
    }

    /// 按行号查找结果
    pub fn outcome_for_row(&self, row_number: usize) -> Option<&RowOutcome> {
        self.outcomes.iter().find(|o| o.row_number == row_number)
    }
}
