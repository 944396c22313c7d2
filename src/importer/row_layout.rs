// ==========================================
// 管道库存系统 - 导入行布局
// ==========================================
// 职责: 声明 Excel 行的固定列顺序（位置 → 字段 → 目标类型）
// 约束: 不校验表头名称，列顺序即契约
// ==========================================

/// 单元格目标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Text,
    Decimal,
    Date,
    Status,
}

/// 管道字段（导入目标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipeField {
    PipeNumber,
    Diameter,
    Length,
    WallThickness,
    Material,
    Grade,
    Manufacturer,
    ProductionDate,
    Weight,
    Location,
    Status,
    Remarks,
    BatchNumber,
    QualityClass,
    CoatingType,
    PressureRating,
}

/// 列定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub field: PipeField,
    pub kind: CellKind,
    pub label: &'static str, // 错误信息中使用的字段标签
}

const fn column(field: PipeField, kind: CellKind, label: &'static str) -> ColumnSpec {
    ColumnSpec { field, kind, label }
}

/// 标准导入布局（16 列，A → P）
pub const PIPE_ROW_LAYOUT: [ColumnSpec; 16] = [
    column(PipeField::PipeNumber, CellKind::Text, "Pipe Number"),
    column(PipeField::Diameter, CellKind::Decimal, "Diameter"),
    column(PipeField::Length, CellKind::Decimal, "Length"),
    column(PipeField::WallThickness, CellKind::Decimal, "Wall Thickness"),
    column(PipeField::Material, CellKind::Text, "Material"),
    column(PipeField::Grade, CellKind::Text, "Grade"),
    column(PipeField::Manufacturer, CellKind::Text, "Manufacturer"),
    column(PipeField::ProductionDate, CellKind::Date, "Production Date"),
    column(PipeField::Weight, CellKind::Decimal, "Weight"),
    column(PipeField::Location, CellKind::Text, "Location"),
    column(PipeField::Status, CellKind::Status, "Status"),
    column(PipeField::Remarks, CellKind::Text, "Remarks"),
    column(PipeField::BatchNumber, CellKind::Text, "Batch Number"),
    column(PipeField::QualityClass, CellKind::Text, "Quality Class"),
    column(PipeField::CoatingType, CellKind::Text, "Coating Type"),
    column(PipeField::PressureRating, CellKind::Decimal, "Pressure Rating"),
];

/// 列序号（从 0 开始）→ Excel 列字母
///
/// # 示例
/// - 0 → "A"
/// - 25 → "Z"
/// - 26 → "AA"
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// 表头标签（按布局顺序，用于生成模板/提示）
pub fn header_labels() -> Vec<&'static str> {
    PIPE_ROW_LAYOUT.iter().map(|c| c.label).collect()
}
