// ==========================================
// 车队投运决策系统 - 检修后准入结果仓储
// ==========================================
// 红线: 结果按检修会话落库一次，不回溯重算
// ==========================================

use crate::domain::readiness::{PerformanceParameters, ReadinessResult};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 检修会话准入记录
#[derive(Debug, Clone, PartialEq)]
pub struct ReadinessRecord {
    pub session_id: String,
    pub before: Option<PerformanceParameters>,
    pub after: PerformanceParameters,
    pub result: ReadinessResult,
}

// ==========================================
// ReadinessRepository - 准入结果仓储
// ==========================================
pub struct ReadinessRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReadinessRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存准入结果
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 该检修会话已有结果
    pub fn save(&self, record: &ReadinessRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let before_json = record
            .before
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        conn.execute(
            r#"INSERT INTO readiness_assessment (
                session_id, vehicle_id, overall_score, status, ready_for_operation,
                before_json, after_json, result_json, assessed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            params![
                &record.session_id,
                &record.result.vehicle_id,
                record.result.overall_score,
                record.result.status.to_string(),
                record.result.ready_for_operation,
                before_json,
                serde_json::to_string(&record.after)?,
                serde_json::to_string(&record.result)?,
                record.result.alert.generated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 按检修会话查询
    pub fn find_by_session(&self, session_id: &str) -> RepositoryResult<Option<ReadinessRecord>> {
        let conn = self.get_conn()?;
        let row: Option<(String, Option<String>, String, String)> = conn
            .query_row(
                r#"SELECT session_id, before_json, after_json, result_json
                   FROM readiness_assessment WHERE session_id = ?1"#,
                params![session_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        row.map(Self::decode).transpose()
    }

    /// 查询车辆的准入历史（最新在前）
    pub fn list_by_vehicle(&self, vehicle_id: &str) -> RepositoryResult<Vec<ReadinessRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT session_id, before_json, after_json, result_json
               FROM readiness_assessment
               WHERE vehicle_id = ?1
               ORDER BY assessed_at DESC"#,
        )?;
        let rows = stmt.query_map(params![vehicle_id], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(Self::decode(row?)?);
        }
        Ok(records)
    }

    fn decode(
        (session_id, before_json, after_json, result_json): (String, Option<String>, String, String),
    ) -> RepositoryResult<ReadinessRecord> {
        Ok(ReadinessRecord {
            session_id,
            before: before_json
                .map(|raw| serde_json::from_str(&raw))
                .transpose()?,
            after: serde_json::from_str(&after_json)?,
            result: serde_json::from_str(&result_json)?,
        })
    }
}
