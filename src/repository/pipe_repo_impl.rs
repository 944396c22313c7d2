// ==========================================
// 管道库存系统 - 管道台账 Repository 实现
// ==========================================
// 职责: 实现 pipe 表数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::pipe::{Pipe, PipeDraft};
use crate::domain::types::PipeStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::pipe_repo::PipeRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    id, pipe_number, diameter, length, wall_thickness,
    material, grade, manufacturer, production_date, weight,
    location, status, remarks, batch_number, quality_class,
    coating_type, pressure_rating, created_at, updated_at
"#;

const DATE_FORMAT: &str = "%Y-%m-%d";

// 库内数据损坏时返回列转换错误，不做静默回退
fn conversion_error(
    idx: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err.into())
}

fn parse_status(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<PipeStatus> {
    let raw: String = row.get(idx)?;
    PipeStatus::from_canonical(raw.trim())
        .ok_or_else(|| conversion_error(idx, format!("未知状态: {}", raw)))
}

fn parse_timestamp(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn parse_date(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

fn map_pipe_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Pipe> {
    Ok(Pipe {
        id: row.get(0)?,
        pipe_number: row.get(1)?,
        diameter: row.get(2)?,
        length: row.get(3)?,
        wall_thickness: row.get(4)?,
        material: row.get(5)?,
        grade: row.get(6)?,
        manufacturer: row.get(7)?,
        production_date: parse_date(row, 8)?,
        weight: row.get(9)?,
        location: row.get(10)?,
        status: parse_status(row, 11)?,
        remarks: row.get(12)?,
        batch_number: row.get(13)?,
        quality_class: row.get(14)?,
        coating_type: row.get(15)?,
        pressure_rating: row.get(16)?,
        created_at: parse_timestamp(row, 17)?,
        updated_at: parse_timestamp(row, 18)?,
    })
}

// ==========================================
// PipeRepositoryImpl
// ==========================================
pub struct PipeRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl PipeRepositoryImpl {
    /// 创建新的 Repository 实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（测试可用 ":memory:"）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 共享底层连接（供配置管理器复用）
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn fetch_by_id(conn: &Connection, id: i64) -> RepositoryResult<Option<Pipe>> {
        let sql = format!("SELECT {} FROM pipe WHERE id = ?1", SELECT_COLUMNS);
        let pipe = conn
            .query_row(&sql, params![id], map_pipe_row)
            .optional()?;
        Ok(pipe)
    }

    fn query_list(&self, where_clause: &str, args: &[&dyn ToSql]) -> RepositoryResult<Vec<Pipe>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM pipe {} ORDER BY id",
            SELECT_COLUMNS, where_clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let pipes = stmt
            .query_map(args, map_pipe_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pipes)
    }
}

#[async_trait]
impl PipeRepository for PipeRepositoryImpl {
    async fn create(&self, draft: PipeDraft) -> RepositoryResult<Pipe> {
        let pipe_number = draft
            .normalized_number()
            .map(str::to_string)
            .ok_or_else(|| RepositoryError::FieldValueError {
                field: "pipe_number".to_string(),
                message: "不能为空".to_string(),
            })?;
        let now = Utc::now().to_rfc3339();

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO pipe (
                pipe_number, diameter, length, wall_thickness,
                material, grade, manufacturer, production_date, weight,
                location, status, remarks, batch_number, quality_class,
                coating_type, pressure_rating, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9,
                ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18
            )
            "#,
            params![
                pipe_number,
                draft.diameter,
                draft.length,
                draft.wall_thickness,
                draft.material,
                draft.grade,
                draft.manufacturer,
                draft.production_date.map(|d| d.format(DATE_FORMAT).to_string()),
                draft.weight,
                draft.location,
                draft.status.unwrap_or_default().as_str(),
                draft.remarks,
                draft.batch_number,
                draft.quality_class,
                draft.coating_type,
                draft.pressure_rating,
                now,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::fetch_by_id(&conn, id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "pipe".to_string(),
            id: id.to_string(),
        })
    }

    async fn update(&self, pipe: Pipe) -> RepositoryResult<Pipe> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE pipe SET
                pipe_number = ?2, diameter = ?3, length = ?4, wall_thickness = ?5,
                material = ?6, grade = ?7, manufacturer = ?8, production_date = ?9,
                weight = ?10, location = ?11, status = ?12, remarks = ?13,
                batch_number = ?14, quality_class = ?15, coating_type = ?16,
                pressure_rating = ?17, updated_at = ?18
            WHERE id = ?1
            "#,
            params![
                pipe.id,
                pipe.pipe_number,
                pipe.diameter,
                pipe.length,
                pipe.wall_thickness,
                pipe.material,
                pipe.grade,
                pipe.manufacturer,
                pipe.production_date.map(|d| d.format(DATE_FORMAT).to_string()),
                pipe.weight,
                pipe.location,
                pipe.status.as_str(),
                pipe.remarks,
                pipe.batch_number,
                pipe.quality_class,
                pipe.coating_type,
                pipe.pressure_rating,
                Utc::now().to_rfc3339(),
            ],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "pipe".to_string(),
                id: pipe.id.to_string(),
            });
        }

        Self::fetch_by_id(&conn, pipe.id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "pipe".to_string(),
            id: pipe.id.to_string(),
        })
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let deleted = conn.execute("DELETE FROM pipe WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    async fn exists_by_pipe_number(&self, pipe_number: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM pipe WHERE pipe_number = ?1)",
            params![pipe_number],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(exists)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Pipe>> {
        let conn = self.get_conn()?;
        Self::fetch_by_id(&conn, id)
    }

    async fn find_by_pipe_number(&self, pipe_number: &str) -> RepositoryResult<Option<Pipe>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM pipe WHERE pipe_number = ?1", SELECT_COLUMNS);
        let pipe = conn
            .query_row(&sql, params![pipe_number], map_pipe_row)
            .optional()?;
        Ok(pipe)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Pipe>> {
        self.query_list("", params![])
    }

    async fn find_by_status(&self, status: PipeStatus) -> RepositoryResult<Vec<Pipe>> {
        self.query_list("WHERE status = ?1", params![status.as_str()])
    }

    async fn find_by_material(&self, material: &str) -> RepositoryResult<Vec<Pipe>> {
        self.query_list("WHERE material = ?1", params![material])
    }

    async fn find_by_location(&self, location: &str) -> RepositoryResult<Vec<Pipe>> {
        self.query_list("WHERE location = ?1", params![location])
    }

    async fn find_by_manufacturer(&self, manufacturer: &str) -> RepositoryResult<Vec<Pipe>> {
        self.query_list("WHERE manufacturer = ?1", params![manufacturer])
    }

    async fn find_by_diameter_range(&self, min: f64, max: f64) -> RepositoryResult<Vec<Pipe>> {
        self.query_list("WHERE diameter BETWEEN ?1 AND ?2", params![min, max])
    }

    async fn find_by_batch_number(&self, batch_number: &str) -> RepositoryResult<Vec<Pipe>> {
        self.query_list("WHERE batch_number = ?1", params![batch_number])
    }

    async fn count_by_status(&self, status: PipeStatus) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM pipe WHERE status = ?1",
            params![status.as_str()],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count)
    }
}
