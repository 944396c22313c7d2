// ==========================================
// 管道库存系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 传播策略: 仅 Container 逃逸出批次边界，其余均收敛为行级结果
// ==========================================

use thiserror::Error;

// ==========================================
// CoercionError - 单元格类型转换错误
// ==========================================
// column: 列字母（A/B/...）；field: 字段标签
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("Invalid numeric value in column {column} ({field}): {value}")]
    InvalidDecimal {
        column: String,
        field: &'static str,
        value: String,
    },

    #[error("Invalid date value in column {column} ({field}): {value} (expected YYYY-MM-DD)")]
    InvalidDate {
        column: String,
        field: &'static str,
        value: String,
    },
}

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件级错误（整批失败）=====
    #[error("{0}")]
    Container(String),

    // ===== 行级错误（仅影响本行）=====
    #[error("Row {row}: {source}")]
    RowParse { row: usize, source: CoercionError },

    #[error("Row {row}: Pipe number already exists: {pipe_number}")]
    DuplicateKey { row: usize, pipe_number: String },

    #[error("Row {row}: {message}")]
    Store { row: usize, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为整批致命错误
    pub fn is_container(&self) -> bool {
        matches!(self, ImportError::Container(_))
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::Container(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::Container(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Container(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
