// ==========================================
// 管道库存系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx) / CSV (.csv)
// 输入: 上传的内存字节流（不落盘）
// 输出: 有序 SheetRow，整行空白已剔除
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::pipe_importer_trait::{FileParser, SheetRow};
use calamine::{Data, Reader, Xlsx};
use csv::ReaderBuilder;
use std::io::Cursor;
use tracing::debug;

// ==========================================
// Excel Parser 实现
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ExcelParser {
    sheet_name: Option<String>, // None → 第一个工作表
}

impl ExcelParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定工作表名称
    pub fn with_sheet(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: Some(sheet_name.into()),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_to_rows(&self, bytes: &[u8]) -> ImportResult<Vec<SheetRow>> {
        // 工作簿仅存活于本次调用
        let mut workbook = Xlsx::new(Cursor::new(bytes))?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match &self.sheet_name {
            Some(name) => {
                if !sheet_names.iter().any(|n| n == name) {
                    return Err(ImportError::Container(format!(
                        "Worksheet not found: {}",
                        name
                    )));
                }
                name.clone()
            }
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::Container("Workbook has no worksheets".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        // Range 从首个非空单元格开始，需换算回源表坐标
        let Some((start_row, start_col)) = range.start() else {
            debug!(sheet = %sheet_name, "工作表为空");
            return Ok(Vec::new());
        };

        let mut rows = Vec::new();
        for (offset, cells) in range.rows().enumerate() {
            let mut padded = vec![Data::Empty; start_col as usize];
            padded.extend(cells.iter().cloned());

            let row = SheetRow::new(start_row as usize + offset + 1, padded);
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        debug!(sheet = %sheet_name, rows = rows.len(), "Excel 解析完成");
        Ok(rows)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_rows(&self, bytes: &[u8]) -> ImportResult<Vec<SheetRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头由编排器统一跳过
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result?;
            let cells = record
                .iter()
                .map(|value| {
                    let trimmed = value.trim();
                    if trimmed.is_empty() {
                        Data::Empty
                    } else {
                        Data::String(trimmed.to_string())
                    }
                })
                .collect();

            let row = SheetRow::new(index + 1, cells);
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        debug!(rows = rows.len(), "CSV 解析完成");
        Ok(rows)
    }
}

// ==========================================
// 按文件名选择解析器
// ==========================================

/// 根据文件扩展名选择解析器（大小写不敏感）
///
/// # 返回
/// - None: 不支持的扩展名
pub fn parser_for_file_name(
    file_name: &str,
    sheet_name: Option<String>,
) -> Option<Box<dyn FileParser>> {
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_lowercase();

    match ext.as_str() {
        "xlsx" => Some(Box::new(ExcelParser { sheet_name })),
        "csv" => Some(Box::new(CsvParser)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_parser_keeps_row_numbers() {
        let bytes = b"Pipe Number,Diameter\nP-001,219.1\n,\nP-002, 100 \n";
        let rows = CsvParser.parse_to_rows(bytes).unwrap();

        // 表头 + 2 行数据，空行被剔除
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].row_number, 1);
        assert_eq!(rows[1].row_number, 2);
        assert_eq!(rows[2].row_number, 4);
        assert_eq!(rows[2].cells[1], Data::String("100".to_string()));
    }

    #[test]
    fn test_csv_parser_empty_input() {
        let rows = CsvParser.parse_to_rows(b"").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_excel_parser_rejects_garbage() {
        let err = ExcelParser::new()
            .parse_to_rows(b"definitely not a zip archive")
            .unwrap_err();
        assert!(err.is_container());
    }

    #[test]
    fn test_parser_for_file_name() {
        assert!(parser_for_file_name("pipes.xlsx", None).is_some());
        assert!(parser_for_file_name("PIPES.XLSX", None).is_some());
        assert!(parser_for_file_name("pipes.csv", None).is_some());
        assert!(parser_for_file_name("pipes.xls", None).is_none());
        assert!(parser_for_file_name("pipes", None).is_none());
    }
}
