// ==========================================
// 车队投运决策系统 - 引擎配置
// ==========================================
// 职责: 评分/排程/准入所需的全部可调参数
// 存储: config_kv (scope_id='global', key='engine_config', JSON)
// ==========================================

use crate::config::weights::{PerformanceWeights, ScoringWeights};
use crate::domain::schedule::ScheduleConstraints;
use crate::domain::types::CertificateType;
use serde::{Deserialize, Serialize};

/// 约束策略边界
///
/// - required_trainsets 越界 → 错误
/// - max_standby / max_maintenance 越界 → 警告
/// - 三者之和超过 total_limit → 警告
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintPolicy {
    pub required_min: u32,
    pub required_max: u32,
    pub standby_min: u32,
    pub standby_max: u32,
    pub maintenance_min: u32,
    pub maintenance_max: u32,
    pub total_limit: u32,
}

impl Default for ConstraintPolicy {
    fn default() -> Self {
        Self {
            required_min: 15,
            required_max: 25,
            standby_min: 3,
            standby_max: 8,
            maintenance_min: 1,
            maintenance_max: 5,
            total_limit: 30,
        }
    }
}

/// 合格性硬门槛
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EligibilityThresholds {
    /// 适航得分低于该值 → 不合格
    pub min_fitness: f64,
    /// 检修负荷得分低于该值 → 不合格
    pub min_maintenance: f64,
}

impl Default for EligibilityThresholds {
    fn default() -> Self {
        Self {
            min_fitness: 30.0,
            min_maintenance: 20.0,
        }
    }
}

/// 检修后准入判定阈值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessThresholds {
    pub ready_score: f64,
    pub dropout_score: f64,
    /// 制动 / 牵引 关键参数下限
    pub critical_parameter_min: f64,
}

impl Default for ReadinessThresholds {
    fn default() -> Self {
        Self {
            ready_score: 85.0,
            dropout_score: 60.0,
            critical_parameter_min: 70.0,
        }
    }
}

// ==========================================
// EngineConfig - 引擎配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 必备证书类型 (有序,评分按此顺序短路)
    pub required_certificates: Vec<CertificateType>,
    /// 优先停放车辆段
    pub preferred_depot: String,
    /// 证书"即将到期"窗口 (天)
    pub expiring_window_days: i64,
    pub default_constraints: ScheduleConstraints,
    pub constraint_policy: ConstraintPolicy,
    pub eligibility: EligibilityThresholds,
    pub readiness: ReadinessThresholds,
    pub scoring_weights: ScoringWeights,
    pub performance_weights: PerformanceWeights,
    /// 分析: 滚动平均覆盖率窗口 (排程数)
    pub analytics_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            required_certificates: vec![
                CertificateType::RollingStock,
                CertificateType::Signalling,
                CertificateType::Telecom,
            ],
            preferred_depot: "Muttom".to_string(),
            expiring_window_days: 30,
            default_constraints: ScheduleConstraints::default(),
            constraint_policy: ConstraintPolicy::default(),
            eligibility: EligibilityThresholds::default(),
            readiness: ReadinessThresholds::default(),
            scoring_weights: ScoringWeights::default(),
            performance_weights: PerformanceWeights::default(),
            analytics_window: 7,
        }
    }
}

impl EngineConfig {
    /// 校验配置一致性
    pub fn validate(&self) -> Result<(), String> {
        if self.required_certificates.is_empty() {
            return Err("必备证书类型不能为空".to_string());
        }
        if self.analytics_window == 0 {
            return Err("analytics_window 必须大于 0".to_string());
        }
        self.scoring_weights.validate()?;
        self.performance_weights.validate()?;
        Ok(())
    }
}
