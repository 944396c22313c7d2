// ==========================================
// 管道库存系统 - 管道导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 阶段: 文件解析 → 行映射 → 重复检测 → 单条创建 → 批次汇总
// ==========================================

use crate::domain::import::BatchReport;
use crate::domain::pipe::PipeDraft;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use calamine::Data;

// ==========================================
// SheetRow - 解析后的原始行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub row_number: usize, // 源表行号（从 1 开始，表头为第 1 行）
    pub cells: Vec<Data>,  // 按列位置排列（A 列在下标 0）
}

impl SheetRow {
    pub fn new(row_number: usize, cells: Vec<Data>) -> Self {
        Self { row_number, cells }
    }

    /// 是否整行为空（所有单元格为空或仅含空白）
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| match cell {
            Data::Empty => true,
            Data::String(s) => s.trim().is_empty(),
            _ => false,
        })
    }
}

// ==========================================
// MappedRow - 行映射产物
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub draft: PipeDraft,
    pub warning: Option<String>, // 软告警（状态回退等）
}

// ==========================================
// PipeImporter Trait
// ==========================================
// 用途: 管道导入主接口
// 实现者: PipeImporterImpl
#[async_trait]
pub trait PipeImporter: Send + Sync {
    /// 从上传字节流导入
    ///
    /// # 返回
    /// - Ok(BatchReport): 逐行结果 + 汇总（行级失败不会中断批次）
    /// - Err(ImportError::Container): 字节流无法解析为工作簿
    async fn import_from_bytes(&self, bytes: &[u8]) -> ImportResult<BatchReport>;

    /// 导入已解析的行（首行视为表头并跳过）
    async fn import_rows(&self, rows: Vec<SheetRow>) -> BatchReport;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析字节流为有序行（已剔除整行空白）
    ///
    /// # 返回
    /// - Err(ImportError::Container): 容器格式错误
    fn parse_to_rows(&self, bytes: &[u8]) -> ImportResult<Vec<SheetRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 行映射接口（位置 → 字段 + 类型转换）
// 实现者: PositionalFieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将一行单元格映射为候选记录
    ///
    /// # 返回
    /// - Err(ImportError::RowParse): 某个单元格类型转换失败
    fn map_row(&self, cells: &[Data], row_number: usize) -> ImportResult<MappedRow>;
}
