// ==========================================
// 车队投运决策系统 - 配置层
// ==========================================
// 职责: 权重、阈值、约束边界等引擎配置,支持 config_kv 覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_config;
pub mod weights;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use engine_config::{
    ConstraintPolicy, EligibilityThresholds, EngineConfig, ReadinessThresholds,
};
pub use weights::{PerformanceWeights, ScoringWeights, WEIGHT_SUM_TOLERANCE};
