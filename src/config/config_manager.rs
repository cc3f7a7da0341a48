// ==========================================
// 车队投运决策系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入配置值（upsert）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取引擎配置
    ///
    /// # 规则
    /// - 未配置 → EngineConfig::default()
    /// - JSON 缺失字段 → 对应默认值
    /// - 标量覆写键 (preferred_depot / analytics_window) 优先于 JSON
    pub fn load_engine_config(&self) -> RepositoryResult<EngineConfig> {
        let mut config = match self.get_global_config_value(config_keys::ENGINE_CONFIG)? {
            Some(raw) => serde_json::from_str::<EngineConfig>(&raw)?,
            None => EngineConfig::default(),
        };

        if let Some(depot) = self.get_global_config_value(config_keys::PREFERRED_DEPOT)? {
            config.preferred_depot = depot;
        }
        if let Some(raw) = self.get_global_config_value(config_keys::ANALYTICS_WINDOW)? {
            match raw.trim().parse::<usize>() {
                Ok(v) if v > 0 => config.analytics_window = v,
                _ => warn!(value = %raw, "analytics_window 配置无效，使用默认值"),
            }
        }

        config
            .validate()
            .map_err(|e| RepositoryError::FieldValueError {
                field: config_keys::ENGINE_CONFIG.to_string(),
                message: e,
            })?;

        debug!(preferred_depot = %config.preferred_depot, "引擎配置已加载");
        Ok(config)
    }

    /// 保存引擎配置（保存前校验）
    pub fn save_engine_config(&self, config: &EngineConfig) -> RepositoryResult<()> {
        config
            .validate()
            .map_err(RepositoryError::ValidationError)?;
        let raw = serde_json::to_string(config)?;
        self.set_global_config_value(config_keys::ENGINE_CONFIG, &raw)
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 与排程一起记录，保证结果可复现
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (k, v) = row?;
            snapshot.insert(k, v);
        }
        Ok(serde_json::to_string(&snapshot)?)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const ENGINE_CONFIG: &str = "engine_config";
    pub const PREFERRED_DEPOT: &str = "preferred_depot";
    pub const ANALYTICS_WINDOW: &str = "analytics_window";
}
