// ==========================================
// 车队投运决策系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (投运/备用/检修清单由人工最终确认)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问与外部数据源接口
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 权重/门槛/约束策略
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/schema）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    CertificateType, PerformanceImpact, ReadinessStatus, ScheduleList, TrendLabel, VehicleStatus,
};

// 领域实体
pub use domain::{
    FleetSnapshot, PerformanceParameters, ReadinessResult, Schedule, ScheduleConstraints,
    ScoreResult, VehicleRecords, VehicleSnapshot,
};

// 引擎
pub use engine::{
    ConstraintValidator, InductionAllocator, InductionOrchestrator, ReadinessClassifier,
    ScenarioSimulator, ScheduleAnalytics, ScoreAggregator, ScoreFunctions, SignalOverride,
};

// 配置
pub use config::{ConfigManager, EngineConfig, PerformanceWeights, ScoringWeights};

// 数据源
pub use repository::{DataSourceError, FleetDataSource, InMemoryFleetSource};

// API
pub use api::{ApiError, ApiResult, FleetApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车队投运决策系统";
