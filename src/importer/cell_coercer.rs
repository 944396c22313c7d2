// ==========================================
// 管道库存系统 - 单元格类型转换器
// ==========================================
// 职责: 原始单元格 (calamine::Data) → 文本 / 数值 / 日期 / 状态
// 红线: 转换失败必须指明列字母与字段，不允许静默吞掉非空垃圾值
// ==========================================
// 例外: 状态列无法识别时回退为 NEW，仅产生软告警
// ==========================================

use crate::domain::types::PipeStatus;
use crate::importer::error::CoercionError;
use crate::importer::row_layout::{column_letter, CellKind, ColumnSpec};
use calamine::Data;
use chrono::NaiveDate;

/// 文本日期唯一格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// CoercedValue - 转换结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    Text(Option<String>),
    Decimal(Option<f64>),
    Date(Option<NaiveDate>),
    /// (最终状态, 无法识别时的原始文本)
    Status(PipeStatus, Option<String>),
}

impl CoercedValue {
    pub fn into_text(self) -> Option<String> {
        match self {
            CoercedValue::Text(v) => v,
            _ => None,
        }
    }

    pub fn into_decimal(self) -> Option<f64> {
        match self {
            CoercedValue::Decimal(v) => v,
            _ => None,
        }
    }

    pub fn into_date(self) -> Option<NaiveDate> {
        match self {
            CoercedValue::Date(v) => v,
            _ => None,
        }
    }
}

/// 按列定义转换单元格
///
/// # 参数
/// - cell: 原始单元格（越界/缺失为 None）
/// - spec: 列定义
/// - column_index: 列序号（从 0 开始，仅用于错误信息）
pub fn coerce(
    cell: Option<&Data>,
    spec: &ColumnSpec,
    column_index: usize,
) -> Result<CoercedValue, CoercionError> {
    match spec.kind {
        CellKind::Text => Ok(CoercedValue::Text(coerce_text(cell))),
        CellKind::Decimal => {
            coerce_decimal(cell, spec.label, column_index).map(CoercedValue::Decimal)
        }
        CellKind::Date => coerce_date(cell, spec.label, column_index).map(CoercedValue::Date),
        CellKind::Status => {
            let (status, unrecognized) = coerce_status(cell);
            Ok(CoercedValue::Status(status, unrecognized))
        }
    }
}

// ==========================================
// 文本
// ==========================================

/// 文本转换
///
/// # 规则
/// - 字符串: TRIM，空串视为缺失
/// - 整数值数字: 不带小数部分（12345.0 → "12345"）
/// - 日期格式数字: ISO YYYY-MM-DD
/// - 错误值/空单元格: 缺失
pub fn coerce_text(cell: Option<&Data>) -> Option<String> {
    let text = match cell? {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => ndt.date().format(DATE_FORMAT).to_string(),
            None => format_number(dt.as_f64()),
        },
        Data::Error(_) | Data::Empty => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// ==========================================
// 数值
// ==========================================

/// 数值转换
///
/// # 规则
/// - 数字单元格直接取值（日期格式数字取其序列值）
/// - 文本按区域无关格式解析，不接受逗号小数与 NaN/inf
/// - 其他类型视为缺失
pub fn coerce_decimal(
    cell: Option<&Data>,
    field: &'static str,
    column_index: usize,
) -> Result<Option<f64>, CoercionError> {
    match cell {
        Some(Data::Int(i)) => Ok(Some(*i as f64)),
        Some(Data::Float(f)) => Ok(Some(*f)),
        Some(Data::DateTime(dt)) => Ok(Some(dt.as_f64())),
        Some(Data::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(CoercionError::InvalidDecimal {
                    column: column_letter(column_index),
                    field,
                    value: trimmed.to_string(),
                }),
            }
        }
        _ => Ok(None),
    }
}

// ==========================================
// 日期
// ==========================================

/// 日期转换
///
/// # 规则
/// - 日期格式数字: 按 Excel 日期序列换算
/// - ISO 日期类型单元格: 取日期部分
/// - 文本: 仅接受 YYYY-MM-DD（10 位，补零）
/// - 普通数字及其他类型: 缺失
pub fn coerce_date(
    cell: Option<&Data>,
    field: &'static str,
    column_index: usize,
) -> Result<Option<NaiveDate>, CoercionError> {
    match cell {
        Some(Data::DateTime(dt)) => match dt.as_datetime() {
            Some(ndt) => Ok(Some(ndt.date())),
            None => Err(CoercionError::InvalidDate {
                column: column_letter(column_index),
                field,
                value: format_number(dt.as_f64()),
            }),
        },
        Some(Data::DateTimeIso(s)) => {
            let trimmed = s.trim();
            let date_part = trimmed.split('T').next().unwrap_or(trimmed);
            parse_iso_date(date_part).map(Some).ok_or_else(|| CoercionError::InvalidDate {
                column: column_letter(column_index),
                field,
                value: trimmed.to_string(),
            })
        }
        Some(Data::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            parse_iso_date(trimmed).map(Some).ok_or_else(|| CoercionError::InvalidDate {
                column: column_letter(column_index),
                field,
                value: trimmed.to_string(),
            })
        }
        _ => Ok(None),
    }
}

fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

// ==========================================
// 状态
// ==========================================

// 同义词表（小写，英文 / 俄文）
const STATUS_SYNONYMS: &[(&str, PipeStatus)] = &[
    ("new", PipeStatus::New),
    ("новый", PipeStatus::New),
    ("новая", PipeStatus::New),
    ("in stock", PipeStatus::InStock),
    ("на складе", PipeStatus::InStock),
    ("in use", PipeStatus::InUse),
    ("в использовании", PipeStatus::InUse),
    ("в эксплуатации", PipeStatus::InUse),
    ("damaged", PipeStatus::Damaged),
    ("поврежден", PipeStatus::Damaged),
    ("повреждена", PipeStatus::Damaged),
    ("scrapped", PipeStatus::Scrapped),
    ("списан", PipeStatus::Scrapped),
    ("списана", PipeStatus::Scrapped),
    ("under inspection", PipeStatus::UnderInspection),
    ("на проверке", PipeStatus::UnderInspection),
];

/// 状态转换
///
/// # 返回
/// - (状态, None): 识别成功或单元格为空（空 → NEW）
/// - (NEW, Some(原始文本)): 非空但无法识别
pub fn coerce_status(cell: Option<&Data>) -> (PipeStatus, Option<String>) {
    let Some(raw) = coerce_text(cell) else {
        return (PipeStatus::New, None);
    };

    if let Some(status) = PipeStatus::from_canonical(&raw) {
        return (status, None);
    }

    match lookup_synonym(&raw) {
        Some(status) => (status, None),
        None => (PipeStatus::New, Some(raw)),
    }
}

fn lookup_synonym(raw: &str) -> Option<PipeStatus> {
    let normalized = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    STATUS_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == normalized)
        .map(|(_, status)| *status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::row_layout::PIPE_ROW_LAYOUT;

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    // ===== 文本 =====

    #[test]
    fn test_text_trims_and_drops_empty() {
        assert_eq!(coerce_text(Some(&text("  P-001 "))), Some("P-001".to_string()));
        assert_eq!(coerce_text(Some(&text("   "))), None);
        assert_eq!(coerce_text(Some(&Data::Empty)), None);
        assert_eq!(coerce_text(None), None);
    }

    #[test]
    fn test_text_from_numbers() {
        assert_eq!(coerce_text(Some(&Data::Float(12345.0))), Some("12345".to_string()));
        assert_eq!(coerce_text(Some(&Data::Float(12.5))), Some("12.5".to_string()));
        assert_eq!(coerce_text(Some(&Data::Int(42))), Some("42".to_string()));
        assert_eq!(coerce_text(Some(&Data::Bool(true))), Some("true".to_string()));
    }

    // ===== 数值 =====

    #[test]
    fn test_decimal_accepts_numbers_and_text() {
        assert_eq!(coerce_decimal(Some(&Data::Float(219.1)), "Diameter", 1), Ok(Some(219.1)));
        assert_eq!(coerce_decimal(Some(&Data::Int(12)), "Length", 2), Ok(Some(12.0)));
        assert_eq!(coerce_decimal(Some(&text(" 8.5 ")), "Wall Thickness", 3), Ok(Some(8.5)));
        assert_eq!(coerce_decimal(Some(&text("")), "Weight", 8), Ok(None));
        assert_eq!(coerce_decimal(Some(&Data::Bool(true)), "Weight", 8), Ok(None));
        assert_eq!(coerce_decimal(None, "Weight", 8), Ok(None));
    }

    #[test]
    fn test_decimal_rejects_garbage() {
        let err = coerce_decimal(Some(&text("abc")), "Diameter", 1).unwrap_err();
        assert_eq!(
            err,
            CoercionError::InvalidDecimal {
                column: "B".to_string(),
                field: "Diameter",
                value: "abc".to_string(),
            }
        );

        assert!(coerce_decimal(Some(&text("12abc")), "Diameter", 1).is_err());
        assert!(coerce_decimal(Some(&text("12,5")), "Diameter", 1).is_err());
        assert!(coerce_decimal(Some(&text("NaN")), "Diameter", 1).is_err());
        assert!(coerce_decimal(Some(&text("inf")), "Diameter", 1).is_err());
    }

    // ===== 日期 =====

    #[test]
    fn test_date_text_format() {
        assert_eq!(
            coerce_date(Some(&text("2024-03-15")), "Production Date", 7),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 15))
        );
        assert_eq!(coerce_date(Some(&text(" ")), "Production Date", 7), Ok(None));
        assert_eq!(coerce_date(Some(&Data::Float(45000.0)), "Production Date", 7), Ok(None));
    }

    #[test]
    fn test_date_rejects_other_patterns() {
        for bad in ["15.03.2024", "2024/03/15", "2024-3-15", "2024-02-30", "yesterday"] {
            let err = coerce_date(Some(&text(bad)), "Production Date", 7).unwrap_err();
            assert!(err.to_string().contains("column H"), "{}", err);
        }
    }

    #[test]
    fn test_date_iso_typed_cell_uses_date_part() {
        let iso = |v: &str| Data::DateTimeIso(v.to_string());
        assert_eq!(
            coerce_date(Some(&iso("2024-03-15T00:00:00")), "Production Date", 7),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 15))
        );
        assert_eq!(
            coerce_date(Some(&iso("2024-03-15")), "Production Date", 7),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 15))
        );
        assert!(coerce_date(Some(&iso("15:30:00")), "Production Date", 7).is_err());

        // 普通文本仍只接受 10 位日期
        assert!(coerce_date(Some(&text("2024-03-15T00:00:00")), "Production Date", 7).is_err());
    }

    // ===== 状态 =====

    #[test]
    fn test_status_canonical_and_synonyms() {
        assert_eq!(coerce_status(Some(&text("IN_STOCK"))), (PipeStatus::InStock, None));
        assert_eq!(coerce_status(Some(&text("in use"))), (PipeStatus::InUse, None));
        assert_eq!(coerce_status(Some(&text("поврежден"))), (PipeStatus::Damaged, None));
        assert_eq!(coerce_status(Some(&text("Поврежден"))), (PipeStatus::Damaged, None));
        assert_eq!(coerce_status(Some(&text("На  складе"))), (PipeStatus::InStock, None));
        assert_eq!(coerce_status(Some(&text("списана"))), (PipeStatus::Scrapped, None));
        assert_eq!(
            coerce_status(Some(&text("на проверке"))),
            (PipeStatus::UnderInspection, None)
        );
    }

    #[test]
    fn test_status_empty_defaults_silently() {
        assert_eq!(coerce_status(Some(&text(""))), (PipeStatus::New, None));
        assert_eq!(coerce_status(None), (PipeStatus::New, None));
    }

    #[test]
    fn test_status_unrecognized_defaults_with_raw() {
        assert_eq!(
            coerce_status(Some(&text("broken"))),
            (PipeStatus::New, Some("broken".to_string()))
        );
    }

    #[test]
    fn test_coerce_dispatches_by_kind() {
        let diameter = &PIPE_ROW_LAYOUT[1];
        assert_eq!(
            coerce(Some(&Data::Float(100.0)), diameter, 1),
            Ok(CoercedValue::Decimal(Some(100.0)))
        );

        let status = &PIPE_ROW_LAYOUT[10];
        assert_eq!(
            coerce(Some(&text("damaged")), status, 10),
            Ok(CoercedValue::Status(PipeStatus::Damaged, None))
        );
    }
}
