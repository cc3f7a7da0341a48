// ==========================================
// 车队投运决策系统 - 检修后性能参数与准入结果
// ==========================================
// ReadinessResult 每次检修完成时计算一次并随检修记录落库
// ==========================================

use crate::domain::types::{AlertType, ReadinessStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 性能参数 (六项子指标,各 ∈ [0,100])
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceParameters {
    pub braking_efficiency: f64,
    pub door_operation: f64,
    pub traction_motor: f64,
    pub hvac_status: f64,
    pub signal_communication: f64,
    pub battery_health: f64,
}

impl PerformanceParameters {
    /// 所有指标截断到 [0,100]
    pub fn clamped(&self) -> Self {
        let c = crate::domain::score::clamp_score;
        Self {
            braking_efficiency: c(self.braking_efficiency),
            door_operation: c(self.door_operation),
            traction_motor: c(self.traction_motor),
            hvac_status: c(self.hvac_status),
            signal_communication: c(self.signal_communication),
            battery_health: c(self.battery_health),
        }
    }

    /// 逐项差值 (self − before)
    pub fn delta_from(&self, before: &PerformanceParameters) -> PerformanceParameters {
        PerformanceParameters {
            braking_efficiency: self.braking_efficiency - before.braking_efficiency,
            door_operation: self.door_operation - before.door_operation,
            traction_motor: self.traction_motor - before.traction_motor,
            hvac_status: self.hvac_status - before.hvac_status,
            signal_communication: self.signal_communication - before.signal_communication,
            battery_health: self.battery_health - before.battery_health,
        }
    }
}

/// 准入告警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessAlert {
    pub generated: bool,
    pub alert_type: AlertType,
    pub message: String,
    pub generated_at: DateTime<Utc>,
}

/// 检修后准入结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessResult {
    pub vehicle_id: String,
    pub overall_score: f64,
    pub status: ReadinessStatus,
    pub ready_for_operation: bool,
    /// 制动 ≥70 且 牵引 ≥70
    pub critical_ok: bool,
    pub alert: ReadinessAlert,
    /// 检修前综合得分 (提供检修前参数时)
    #[serde(default)]
    pub before_overall_score: Option<f64>,
    /// 检修前后逐项改善量
    #[serde(default)]
    pub improvement: Option<PerformanceParameters>,
}
