// ==========================================
// 车队投运决策系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建库脚本集中在 init_schema (幂等)
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// 表：
/// - config_kv: 配置覆写
/// - fleet_schedule: 排程历史（只追加）
/// - fleet_schedule_canonical: 每个目标日期的正式排程指针
/// - readiness_assessment: 检修后准入结果
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS fleet_schedule (
            schedule_id TEXT PRIMARY KEY,
            target_date TEXT NOT NULL,
            generated_at TEXT NOT NULL,
            generated_at_us INTEGER NOT NULL,
            coverage INTEGER NOT NULL,
            schedule_json TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_fleet_schedule_date
            ON fleet_schedule (target_date, generated_at_us);

        CREATE TABLE IF NOT EXISTS fleet_schedule_canonical (
            target_date TEXT PRIMARY KEY,
            schedule_id TEXT NOT NULL REFERENCES fleet_schedule(schedule_id),
            generated_at_us INTEGER NOT NULL,
            revision INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS readiness_assessment (
            session_id TEXT PRIMARY KEY,
            vehicle_id TEXT NOT NULL,
            overall_score REAL NOT NULL,
            status TEXT NOT NULL,
            ready_for_operation INTEGER NOT NULL,
            before_json TEXT,
            after_json TEXT NOT NULL,
            result_json TEXT NOT NULL,
            assessed_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_readiness_vehicle
            ON readiness_assessment (vehicle_id, assessed_at);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
