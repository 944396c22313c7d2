// ==========================================
// 管道库存系统 - 管道领域模型
// ==========================================
// 职责: 管道台账实体 / 创建与更新载荷 / 业务校验
// 红线: pipe_number 为业务主键，全库唯一且非空
// ==========================================

use crate::domain::types::PipeStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Pipe - 管道台账记录
// ==========================================
// 用途: 仓储层写入后返回，API 层只读
// 对齐: pipe 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    // ===== 主键 =====
    pub id: i64,             // 系统生成 ID
    pub pipe_number: String, // 管道编号（业务主键）

    // ===== 物理尺寸 =====
    pub diameter: Option<f64>,       // 外径
    pub length: Option<f64>,         // 长度
    pub wall_thickness: Option<f64>, // 壁厚
    pub weight: Option<f64>,         // 重量
    pub pressure_rating: Option<f64>, // 额定压力

    // ===== 分类属性 =====
    pub material: Option<String>,
    pub grade: Option<String>,
    pub manufacturer: Option<String>,
    pub location: Option<String>,
    pub batch_number: Option<String>,
    pub quality_class: Option<String>,
    pub coating_type: Option<String>,

    // ===== 状态与日期 =====
    pub status: PipeStatus,
    pub production_date: Option<NaiveDate>,
    pub remarks: Option<String>,

    // ===== 审计字段（由仓储层写入）=====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// PipeDraft - 创建/更新载荷
// ==========================================
// 用途:
// - 导入管道的行映射产物（候选记录）
// - 单条创建请求
// - 部分更新补丁（None 表示不修改）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipeDraft {
    pub pipe_number: Option<String>,
    pub diameter: Option<f64>,
    pub length: Option<f64>,
    pub wall_thickness: Option<f64>,
    pub material: Option<String>,
    pub grade: Option<String>,
    pub manufacturer: Option<String>,
    pub production_date: Option<NaiveDate>,
    pub weight: Option<f64>,
    pub location: Option<String>,
    pub status: Option<PipeStatus>,
    pub remarks: Option<String>,
    pub batch_number: Option<String>,
    pub quality_class: Option<String>,
    pub coating_type: Option<String>,
    pub pressure_rating: Option<f64>,
}

impl PipeDraft {
    /// 创建仅含管道编号的载荷
    pub fn with_number(pipe_number: impl Into<String>) -> Self {
        Self {
            pipe_number: Some(pipe_number.into()),
            ..Self::default()
        }
    }

    /// 规范化后的管道编号（TRIM，空串视为缺失）
    pub fn normalized_number(&self) -> Option<&str> {
        self.pipe_number
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// 创建前校验
    ///
    /// # 规则
    /// 1. pipe_number 必填
    /// 2. 数值字段存在时必须为非负有限数
    pub fn validate(&self) -> Result<(), String> {
        if self.normalized_number().is_none() {
            return Err("Pipe number is required".to_string());
        }
        validate_dimensions(&[
            ("diameter", self.diameter),
            ("length", self.length),
            ("wall_thickness", self.wall_thickness),
            ("weight", self.weight),
            ("pressure_rating", self.pressure_rating),
        ])
    }
}

impl Pipe {
    /// 以补丁覆盖字段（补丁中为 None 的字段保持原值）
    pub fn apply_patch(&mut self, patch: PipeDraft) {
        if let Some(v) = patch.pipe_number {
            self.pipe_number = v.trim().to_string();
        }
        if patch.diameter.is_some() {
            self.diameter = patch.diameter;
        }
        if patch.length.is_some() {
            self.length = patch.length;
        }
        if patch.wall_thickness.is_some() {
            self.wall_thickness = patch.wall_thickness;
        }
        if patch.material.is_some() {
            self.material = patch.material;
        }
        if patch.grade.is_some() {
            self.grade = patch.grade;
        }
        if patch.manufacturer.is_some() {
            self.manufacturer = patch.manufacturer;
        }
        if patch.production_date.is_some() {
            self.production_date = patch.production_date;
        }
        if patch.weight.is_some() {
            self.weight = patch.weight;
        }
        if patch.location.is_some() {
            self.location = patch.location;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if patch.remarks.is_some() {
            self.remarks = patch.remarks;
        }
        if patch.batch_number.is_some() {
            self.batch_number = patch.batch_number;
        }
        if patch.quality_class.is_some() {
            self.quality_class = patch.quality_class;
        }
        if patch.coating_type.is_some() {
            self.coating_type = patch.coating_type;
        }
        if patch.pressure_rating.is_some() {
            self.pressure_rating = patch.pressure_rating;
        }
    }

    /// 更新后校验（与创建校验规则一致）
    pub fn validate(&self) -> Result<(), String> {
        if self.pipe_number.trim().is_empty() {
            return Err("Pipe number is required".to_string());
        }
        validate_dimensions(&[
            ("diameter", self.diameter),
            ("length", self.length),
            ("wall_thickness", self.wall_thickness),
            ("weight", self.weight),
            ("pressure_rating", self.pressure_rating),
        ])
    }
}

fn validate_dimensions(values: &[(&str, Option<f64>)]) -> Result<(), String> {
    for (field, value) in values {
        if let Some(v) = value {
            if !v.is_finite() || *v < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", field, v));
            }
        }
    }
    Ok(())
}
