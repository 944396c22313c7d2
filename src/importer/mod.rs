// ==========================================
// 管道库存系统 - 导入层
// ==========================================
// 职责: 上传表格 → 校验后的管道记录 + 逐行结果报告
// 支持: Excel (.xlsx), CSV
// ==========================================

// 模块声明
pub mod batch_reporter;
pub mod cell_coercer;
pub mod conflict_handler;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod pipe_importer_impl;
pub mod pipe_importer_trait;
pub mod row_layout;

// 重导出核心类型
pub use batch_reporter::BatchReporter;
pub use conflict_handler::DuplicateGuard;
pub use error::{CoercionError, ImportError, ImportResult};
pub use field_mapper::PositionalFieldMapper;
pub use file_parser::{parser_for_file_name, CsvParser, ExcelParser};
pub use pipe_importer_impl::PipeImporterImpl;
pub use row_layout::{CellKind, ColumnSpec, PipeField, PIPE_ROW_LAYOUT};

// 重导出 Trait 接口
pub use pipe_importer_trait::{FieldMapper, FileParser, MappedRow, PipeImporter, SheetRow};
