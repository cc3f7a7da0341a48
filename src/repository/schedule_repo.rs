// ==========================================
// 车队投运决策系统 - 排程数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 存储模型:
// - fleet_schedule: 每次生成都追加一行（历史只追加，不修改）
// - fleet_schedule_canonical: 每个目标日期唯一的正式排程指针
// 并发策略: 按生成时间单调的“后写胜出”
// - 新排程的 generated_at 必须严格晚于当前正式排程，否则返回 ScheduleConflict
// - 冲突时整个事务回滚，不留下任何部分写入
// ==========================================

use crate::domain::schedule::Schedule;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// 写入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSaveOutcome {
    pub schedule_id: String,
    /// 该日期正式排程的修订号（首次为 1）
    pub revision: i64,
    /// 被替换的旧正式排程
    pub replaced_schedule_id: Option<String>,
}

// ==========================================
// ScheduleRepository - 排程仓储
// ==========================================
pub struct ScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleRepository {
    /// 创建新的ScheduleRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存排程并切换正式指针
    ///
    /// # 返回
    /// - Ok(ScheduleSaveOutcome): 保存成功
    /// - Err(ScheduleConflict): generated_at 不晚于当前正式排程
    pub fn save(&self, schedule: &Schedule) -> RepositoryResult<ScheduleSaveOutcome> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let date_str = schedule.target_date.format("%Y-%m-%d").to_string();
        let incoming_us = schedule.generated_at.timestamp_micros();

        let current: Option<(String, i64, i64, String)> = tx
            .query_row(
                r#"SELECT c.schedule_id, c.generated_at_us, c.revision, s.generated_at
                   FROM fleet_schedule_canonical c
                   JOIN fleet_schedule s ON s.schedule_id = c.schedule_id
                   WHERE c.target_date = ?1"#,
                params![&date_str],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        if let Some((_, canonical_us, _, canonical_at)) = &current {
            if incoming_us <= *canonical_us {
                warn!(
                    target_date = %date_str,
                    canonical_generated_at = %canonical_at,
                    incoming_generated_at = %schedule.generated_at.to_rfc3339(),
                    "排程写入冲突，已拒绝"
                );
                return Err(RepositoryError::ScheduleConflict {
                    target_date: date_str,
                    canonical: canonical_at.clone(),
                    incoming: schedule.generated_at.to_rfc3339(),
                });
            }
        }

        let schedule_json = serde_json::to_string(schedule)?;
        tx.execute(
            r#"INSERT INTO fleet_schedule (
                schedule_id, target_date, generated_at, generated_at_us, coverage, schedule_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                &schedule.schedule_id,
                &date_str,
                &schedule.generated_at.to_rfc3339(),
                incoming_us,
                schedule.summary.coverage,
                &schedule_json,
            ],
        )?;

        let revision = current.as_ref().map(|c| c.2 + 1).unwrap_or(1);
        tx.execute(
            r#"INSERT INTO fleet_schedule_canonical (target_date, schedule_id, generated_at_us, revision)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(target_date) DO UPDATE SET
                   schedule_id = excluded.schedule_id,
                   generated_at_us = excluded.generated_at_us,
                   revision = excluded.revision"#,
            params![&date_str, &schedule.schedule_id, incoming_us, revision],
        )?;

        tx.commit()?;

        debug!(
            schedule_id = %schedule.schedule_id,
            target_date = %date_str,
            revision,
            "排程已保存"
        );

        Ok(ScheduleSaveOutcome {
            schedule_id: schedule.schedule_id.clone(),
            revision,
            replaced_schedule_id: current.map(|c| c.0),
        })
    }

    /// 当前正式排程的生成时间（微秒）
    pub fn canonical_generated_at_us(&self, target_date: NaiveDate) -> RepositoryResult<Option<i64>> {
        let conn = self.get_conn()?;
        let date_str = target_date.format("%Y-%m-%d").to_string();
        let us = conn
            .query_row(
                "SELECT generated_at_us FROM fleet_schedule_canonical WHERE target_date = ?1",
                params![&date_str],
                |row| row.get(0),
            )
            .optional()?;
        Ok(us)
    }

    /// 按目标日期查询正式排程
    pub fn find_by_date(&self, target_date: NaiveDate) -> RepositoryResult<Option<Schedule>> {
        let conn = self.get_conn()?;
        let date_str = target_date.format("%Y-%m-%d").to_string();

        let raw: Option<String> = conn
            .query_row(
                r#"SELECT s.schedule_json
                   FROM fleet_schedule_canonical c
                   JOIN fleet_schedule s ON s.schedule_id = c.schedule_id
                   WHERE c.target_date = ?1"#,
                params![&date_str],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// 查询最近的正式排程（按目标日期倒序）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<Schedule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT s.schedule_json
               FROM fleet_schedule_canonical c
               JOIN fleet_schedule s ON s.schedule_id = c.schedule_id
               ORDER BY c.target_date DESC
               LIMIT ?1"#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| row.get::<_, String>(0))?;
        let mut schedules = Vec::new();
        for row in rows {
            schedules.push(serde_json::from_str(&row?)?);
        }
        Ok(schedules)
    }

    /// 查询日期区间内的正式排程（含首尾，按目标日期倒序）
    pub fn list_between(&self, start: NaiveDate, end: NaiveDate) -> RepositoryResult<Vec<Schedule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT s.schedule_json
               FROM fleet_schedule_canonical c
               JOIN fleet_schedule s ON s.schedule_id = c.schedule_id
               WHERE c.target_date BETWEEN ?1 AND ?2
               ORDER BY c.target_date DESC"#,
        )?;

        let rows = stmt.query_map(
            params![
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string()
            ],
            |row| row.get::<_, String>(0),
        )?;
        let mut schedules = Vec::new();
        for row in rows {
            schedules.push(serde_json::from_str(&row?)?);
        }
        Ok(schedules)
    }

    /// 某日期的历史生成次数（含被替换的）
    pub fn count_history_for_date(&self, target_date: NaiveDate) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM fleet_schedule WHERE target_date = ?1",
            params![target_date.format("%Y-%m-%d").to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::{ScheduleConstraints, ScheduleSummary};
    use chrono::{Duration, TimeZone, Utc};

    fn repo() -> ScheduleRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ScheduleRepository::new(Arc::new(Mutex::new(conn)))
    }

    fn schedule(id: &str, date: NaiveDate, offset_secs: i64) -> Schedule {
        Schedule {
            schedule_id: id.to_string(),
            target_date: date,
            generated_at: Utc.with_ymd_and_hms(2026, 1, 10, 6, 0, 0).unwrap()
                + Duration::seconds(offset_secs),
            induction: vec![],
            standby: vec![],
            maintenance: vec![],
            unallocated: vec![],
            summary: ScheduleSummary {
                total_vehicles: 0,
                total_eligible: 0,
                requested: 20,
                inducted: 0,
                standby: 0,
                maintenance: 0,
                unallocated: 0,
                coverage: 0,
                maintenance_over_limit: false,
            },
            constraints: ScheduleConstraints::default(),
            warnings: vec![],
            is_simulation: false,
        }
    }

    #[test]
    fn test_newer_generation_replaces_canonical() {
        let repo = repo();
        let date = NaiveDate::from_ymd_opt(2026, 1, 11).unwrap();

        let first = repo.save(&schedule("S1", date, 0)).unwrap();
        assert_eq!(first.revision, 1);
        assert_eq!(first.replaced_schedule_id, None);

        let second = repo.save(&schedule("S2", date, 5)).unwrap();
        assert_eq!(second.revision, 2);
        assert_eq!(second.replaced_schedule_id.as_deref(), Some("S1"));

        let canonical = repo.find_by_date(date).unwrap().unwrap();
        assert_eq!(canonical.schedule_id, "S2");
        assert_eq!(repo.count_history_for_date(date).unwrap(), 2);
    }

    #[test]
    fn test_stale_generation_is_rejected_without_partial_write() {
        let repo = repo();
        let date = NaiveDate::from_ymd_opt(2026, 1, 11).unwrap();

        repo.save(&schedule("S1", date, 10)).unwrap();
        let err = repo.save(&schedule("S0", date, 0)).unwrap_err();
        assert!(matches!(err, RepositoryError::ScheduleConflict { .. }));

        // 同一时间戳也视为冲突
        let err = repo.save(&schedule("S1b", date, 10)).unwrap_err();
        assert!(matches!(err, RepositoryError::ScheduleConflict { .. }));

        assert_eq!(repo.find_by_date(date).unwrap().unwrap().schedule_id, "S1");
        assert_eq!(repo.count_history_for_date(date).unwrap(), 1);
    }

    #[test]
    fn test_list_recent_orders_by_target_date_desc() {
        let repo = repo();
        for day in 1..=4 {
            let date = NaiveDate::from_ymd_opt(2026, 2, day).unwrap();
            repo.save(&schedule(&format!("S{}", day), date, 0)).unwrap();
        }

        let recent = repo.list_recent(3).unwrap();
        let ids: Vec<_> = recent.iter().map(|s| s.schedule_id.as_str()).collect();
        assert_eq!(ids, vec!["S4", "S3", "S2"]);

        let window = repo
            .list_between(
                NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            )
            .unwrap();
        assert_eq!(window.len(), 2);
        assert!(repo
            .find_by_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
            .unwrap()
            .is_none());
    }
}
