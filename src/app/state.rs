// ==========================================
// 车队投运决策系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::FleetApi;
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{FleetDataSource, ReadinessRepository, ScheduleRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 投运排程API
    pub fleet_api: Arc<FleetApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 排程仓储（供历史查询直接使用）
    pub schedule_repo: Arc<ScheduleRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - source: 外部车队数据源
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String, source: Arc<dyn FleetDataSource>) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 共享连接
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化数据库schema: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let schedule_repo = Arc::new(ScheduleRepository::new(conn.clone()));
        let readiness_repo = Arc::new(ReadinessRepository::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // 启动时校验配置,失败即拒绝启动
        config_manager
            .load_engine_config()
            .map_err(|e| format!("引擎配置无效: {}", e))?;

        // ==========================================
        // 初始化API层
        // ==========================================
        let fleet_api = Arc::new(FleetApi::new(
            source,
            schedule_repo.clone(),
            readiness_repo,
            config_manager.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            fleet_api,
            config_manager,
            schedule_repo,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级:
/// 1. 环境变量 FLEET_INDUCTION_DB_PATH
/// 2. 用户数据目录下的 fleet-induction/fleet_induction.db
/// 3. 当前目录 ./fleet_induction.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("FLEET_INDUCTION_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./fleet_induction.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("fleet-induction");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("fleet_induction.db");
        }
    }

    path.to_string_lossy().to_string()
}
