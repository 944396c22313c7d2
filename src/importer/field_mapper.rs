// ==========================================
// 管道库存系统 - 字段映射器实现
// ==========================================
// 职责: 按 PIPE_ROW_LAYOUT 位置解码一行 → PipeDraft
// 红线: 不做重复检测、不落库
// ==========================================

use crate::domain::pipe::PipeDraft;
use crate::importer::cell_coercer::{coerce, CoercedValue};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::pipe_importer_trait::{FieldMapper, MappedRow};
use crate::importer::row_layout::{PipeField, PIPE_ROW_LAYOUT};
use calamine::Data;
use tracing::debug;

pub struct PositionalFieldMapper;

impl FieldMapper for PositionalFieldMapper {
    fn map_row(&self, cells: &[Data], row_number: usize) -> ImportResult<MappedRow> {
        let mut draft = PipeDraft::default();
        let mut warning = None;

        for (index, spec) in PIPE_ROW_LAYOUT.iter().enumerate() {
            // 缺失单元格（短行）按空处理
            let value = coerce(cells.get(index), spec, index).map_err(|source| {
                ImportError::RowParse {
                    row: row_number,
                    source,
                }
            })?;

            if let CoercedValue::Status(status, Some(raw)) = &value {
                debug!(row = row_number, raw = %raw, "状态无法识别，回退为 {}", status);
                warning = Some(format!(
                    "Row {}: unrecognized status '{}', defaulted to {}",
                    row_number, raw, status
                ));
            }

            assign(&mut draft, spec.field, value);
        }

        Ok(MappedRow { draft, warning })
    }
}

fn assign(draft: &mut PipeDraft, field: PipeField, value: CoercedValue) {
    match field {
        PipeField::PipeNumber => draft.pipe_number = value.into_text(),
        PipeField::Diameter => draft.diameter = value.into_decimal(),
        PipeField::Length => draft.length = value.into_decimal(),
        PipeField::WallThickness => draft.wall_thickness = value.into_decimal(),
        PipeField::Material => draft.material = value.into_text(),
        PipeField::Grade => draft.grade = value.into_text(),
        PipeField::Manufacturer => draft.manufacturer = value.into_text(),
        PipeField::ProductionDate => draft.production_date = value.into_date(),
        PipeField::Weight => draft.weight = value.into_decimal(),
        PipeField::Location => draft.location = value.into_text(),
        PipeField::Status => {
            if let CoercedValue::Status(status, _) = value {
                draft.status = Some(status);
            }
        }
        PipeField::Remarks => draft.remarks = value.into_text(),
        PipeField::BatchNumber => draft.batch_number = value.into_text(),
        PipeField::QualityClass => draft.quality_class = value.into_text(),
        PipeField::CoatingType => draft.coating_type = value.into_text(),
        PipeField::PressureRating => draft.pressure_rating = value.into_decimal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PipeStatus;
    use crate::importer::error::CoercionError;
    use chrono::NaiveDate;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    fn full_row() -> Vec<Data> {
        vec![
            s("P-001"),
            Data::Float(219.1),
            Data::Float(12.0),
            Data::Float(8.0),
            s("Steel"),
            s("X52"),
            s("TMK"),
            s("2024-01-15"),
            Data::Float(510.5),
            s("Yard A"),
            s("на складе"),
            s("first lot"),
            s("B-77"),
            s("A"),
            s("FBE"),
            Data::Float(10.0),
        ]
    }

    #[test]
    fn test_map_full_row() {
        let mapped = PositionalFieldMapper.map_row(&full_row(), 2).unwrap();
        let d = mapped.draft;

        assert_eq!(d.pipe_number.as_deref(), Some("P-001"));
        assert_eq!(d.diameter, Some(219.1));
        assert_eq!(d.length, Some(12.0));
        assert_eq!(d.wall_thickness, Some(8.0));
        assert_eq!(d.material.as_deref(), Some("Steel"));
        assert_eq!(d.grade.as_deref(), Some("X52"));
        assert_eq!(d.manufacturer.as_deref(), Some("TMK"));
        assert_eq!(d.production_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(d.weight, Some(510.5));
        assert_eq!(d.location.as_deref(), Some("Yard A"));
        assert_eq!(d.status, Some(PipeStatus::InStock));
        assert_eq!(d.remarks.as_deref(), Some("first lot"));
        assert_eq!(d.batch_number.as_deref(), Some("B-77"));
        assert_eq!(d.quality_class.as_deref(), Some("A"));
        assert_eq!(d.coating_type.as_deref(), Some("FBE"));
        assert_eq!(d.pressure_rating, Some(10.0));
        assert!(mapped.warning.is_none());
    }

    #[test]
    fn test_short_row_yields_absent_fields() {
        let mapped = PositionalFieldMapper
            .map_row(&[s("P-002"), Data::Float(100.0)], 3)
            .unwrap();

        assert_eq!(mapped.draft.pipe_number.as_deref(), Some("P-002"));
        assert_eq!(mapped.draft.diameter, Some(100.0));
        assert_eq!(mapped.draft.length, None);
        assert_eq!(mapped.draft.coating_type, None);
        assert_eq!(mapped.draft.status, Some(PipeStatus::New));
    }

    #[test]
    fn test_numeric_pipe_number_has_no_fraction() {
        let mapped = PositionalFieldMapper.map_row(&[Data::Float(12345.0)], 2).unwrap();
        assert_eq!(mapped.draft.pipe_number.as_deref(), Some("12345"));
    }

    #[test]
    fn test_bad_decimal_is_row_parse_error() {
        let mut row = full_row();
        row[1] = s("abc");

        let err = PositionalFieldMapper.map_row(&row, 5).unwrap_err();
        match &err {
            ImportError::RowParse { row, source } => {
                assert_eq!(*row, 5);
                assert!(matches!(source, CoercionError::InvalidDecimal { .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().starts_with("Row 5: "));
    }

    #[test]
    fn test_unrecognized_status_warns() {
        let mut row = full_row();
        row[10] = s("lost");

        let mapped = PositionalFieldMapper.map_row(&row, 7).unwrap();
        assert_eq!(mapped.draft.status, Some(PipeStatus::New));
        assert_eq!(
            mapped.warning.as_deref(),
            Some("Row 7: unrecognized status 'lost', defaulted to NEW")
        );
    }
}
