// ==========================================
// 管道库存系统 - 领域类型定义
// ==========================================
// 职责: 管道生命周期状态枚举及其文本表示
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// PipeStatus - 管道生命周期状态
// ==========================================
// 对齐: pipe.status 列（全大写 + 下划线）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipeStatus {
    #[default]
    New, // 新入库
    InStock,         // 在库
    InUse,           // 使用中
    Damaged,         // 损坏
    Scrapped,        // 报废
    UnderInspection, // 检验中
}

impl PipeStatus {
    /// 全部状态（固定顺序）
    pub const ALL: [PipeStatus; 6] = [
        PipeStatus::New,
        PipeStatus::InStock,
        PipeStatus::InUse,
        PipeStatus::Damaged,
        PipeStatus::Scrapped,
        PipeStatus::UnderInspection,
    ];

    /// 规范名称（数据库存储格式）
    pub fn as_str(&self) -> &'static str {
        match self {
            PipeStatus::New => "NEW",
            PipeStatus::InStock => "IN_STOCK",
            PipeStatus::InUse => "IN_USE",
            PipeStatus::Damaged => "DAMAGED",
            PipeStatus::Scrapped => "SCRAPPED",
            PipeStatus::UnderInspection => "UNDER_INSPECTION",
        }
    }

    /// 按规范名称匹配（大小写不敏感，空格视为下划线）
    ///
    /// # 示例
    /// - "in stock" → Some(InStock)
    /// - "Under_Inspection" → Some(UnderInspection)
    /// - "поврежден" → None（同义词由导入层处理）
    pub fn from_canonical(value: &str) -> Option<Self> {
        let normalized = value.trim().to_uppercase().replace(' ', "_");
        PipeStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
    }
}

impl fmt::Display for PipeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipeStatus::from_canonical(s).ok_or_else(|| format!("unknown pipe status: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_round_trip() {
        for status in PipeStatus::ALL {
            assert_eq!(PipeStatus::from_canonical(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_canonical_case_and_spaces() {
        assert_eq!(PipeStatus::from_canonical("in stock"), Some(PipeStatus::InStock));
        assert_eq!(PipeStatus::from_canonical("In Use"), Some(PipeStatus::InUse));
        assert_eq!(
            PipeStatus::from_canonical("under_inspection"),
            Some(PipeStatus::UnderInspection)
        );
        assert_eq!(PipeStatus::from_canonical("broken"), None);
    }

    #[test]
    fn test_serde_format() {
        let json = serde_json::to_string(&PipeStatus::InStock).unwrap();
        assert_eq!(json, "\"IN_STOCK\"");
        let back: PipeStatus = serde_json::from_str("\"UNDER_INSPECTION\"").unwrap();
        assert_eq!(back, PipeStatus::UnderInspection);
    }

    #[test]
    fn test_default_is_new() {
        assert_eq!(PipeStatus::default(), PipeStatus::New);
    }
}
