// ==========================================
// 车队投运决策系统 - 权重配置
// ==========================================
// 职责: 评分权重 / 性能权重 作为显式配置值注入引擎
// 红线: 权重之和必须为 1.0 (±1e-9)
// ==========================================

use crate::domain::readiness::PerformanceParameters;
use crate::domain::score::SubScores;
use serde::{Deserialize, Serialize};

/// 权重和容差
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

// ==========================================
// ScoringWeights - 六项运营信号权重
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub fitness: f64,
    pub maintenance: f64,
    pub branding: f64,
    pub mileage: f64,
    pub cleaning: f64,
    pub stabling: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            fitness: 0.25,
            maintenance: 0.20,
            branding: 0.15,
            mileage: 0.15,
            cleaning: 0.10,
            stabling: 0.15,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.fitness + self.maintenance + self.branding + self.mileage + self.cleaning + self.stabling
    }

    /// 校验权重
    ///
    /// # 返回
    /// - Ok(()): 权重非负且和为 1.0
    /// - Err(String): 原因
    pub fn validate(&self) -> Result<(), String> {
        let all = [
            self.fitness,
            self.maintenance,
            self.branding,
            self.mileage,
            self.cleaning,
            self.stabling,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err("评分权重必须为非负有限数".to_string());
        }
        validate_sum(self.sum(), "评分权重")
    }

    /// 加权求和
    pub fn weighted_total(&self, scores: &SubScores) -> f64 {
        scores.fitness * self.fitness
            + scores.maintenance * self.maintenance
            + scores.branding * self.branding
            + scores.mileage * self.mileage
            + scores.cleaning * self.cleaning
            + scores.stabling * self.stabling
    }
}

// ==========================================
// PerformanceWeights - 检修后性能指标权重
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceWeights {
    pub braking_efficiency: f64,
    pub door_operation: f64,
    pub traction_motor: f64,
    pub hvac_status: f64,
    pub signal_communication: f64,
    pub battery_health: f64,
}

impl Default for PerformanceWeights {
    fn default() -> Self {
        Self {
            braking_efficiency: 0.25,
            door_operation: 0.15,
            traction_motor: 0.25,
            hvac_status: 0.10,
            signal_communication: 0.15,
            battery_health: 0.10,
        }
    }
}

impl PerformanceWeights {
    pub fn sum(&self) -> f64 {
        self.braking_efficiency
            + self.door_operation
            + self.traction_motor
            + self.hvac_status
            + self.signal_communication
            + self.battery_health
    }

    pub fn validate(&self) -> Result<(), String> {
        let all = [
            self.braking_efficiency,
            self.door_operation,
            self.traction_motor,
            self.hvac_status,
            self.signal_communication,
            self.battery_health,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err("性能权重必须为非负有限数".to_string());
        }
        validate_sum(self.sum(), "性能权重")
    }

    pub fn weighted_total(&self, p: &PerformanceParameters) -> f64 {
        p.braking_efficiency * self.braking_efficiency
            + p.door_operation * self.door_operation
            + p.traction_motor * self.traction_motor
            + p.hvac_status * self.hvac_status
            + p.signal_communication * self.signal_communication
            + p.battery_health * self.battery_health
    }
}

fn validate_sum(sum: f64, label: &str) -> Result<(), String> {
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(format!("{}之和必须为 1.0, 实际为 {}", label, sum));
    }
    Ok(())
}
