// ==========================================
// 车队投运决策系统 - 评分结果
// ==========================================
// ScoreResult 为值对象: 每次聚合新建,创建后不再修改
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 六项运营信号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSignal {
    Fitness,
    Maintenance,
    Branding,
    Mileage,
    Cleaning,
    Stabling,
}

impl ScoreSignal {
    pub const ALL: [ScoreSignal; 6] = [
        ScoreSignal::Fitness,
        ScoreSignal::Maintenance,
        ScoreSignal::Branding,
        ScoreSignal::Mileage,
        ScoreSignal::Cleaning,
        ScoreSignal::Stabling,
    ];
}

impl fmt::Display for ScoreSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreSignal::Fitness => write!(f, "fitness"),
            ScoreSignal::Maintenance => write!(f, "maintenance"),
            ScoreSignal::Branding => write!(f, "branding"),
            ScoreSignal::Mileage => write!(f, "mileage"),
            ScoreSignal::Cleaning => write!(f, "cleaning"),
            ScoreSignal::Stabling => write!(f, "stabling"),
        }
    }
}

/// 分项得分 (每项 ∈ [0,100])
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub fitness: f64,
    pub maintenance: f64,
    pub branding: f64,
    pub mileage: f64,
    pub cleaning: f64,
    pub stabling: f64,
}

impl SubScores {
    pub fn get(&self, signal: ScoreSignal) -> f64 {
        match signal {
            ScoreSignal::Fitness => self.fitness,
            ScoreSignal::Maintenance => self.maintenance,
            ScoreSignal::Branding => self.branding,
            ScoreSignal::Mileage => self.mileage,
            ScoreSignal::Cleaning => self.cleaning,
            ScoreSignal::Stabling => self.stabling,
        }
    }

    /// 写入单项得分,自动截断到 [0,100]
    pub fn set(&mut self, signal: ScoreSignal, value: f64) {
        let value = clamp_score(value);
        match signal {
            ScoreSignal::Fitness => self.fitness = value,
            ScoreSignal::Maintenance => self.maintenance = value,
            ScoreSignal::Branding => self.branding = value,
            ScoreSignal::Mileage => self.mileage = value,
            ScoreSignal::Cleaning => self.cleaning = value,
            ScoreSignal::Stabling => self.stabling = value,
        }
    }
}

/// 单车评分结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub vehicle_id: String,
    pub scores: SubScores,
    pub total_score: f64,
    pub eligible: bool,
    pub issues: Vec<String>,
}

/// 截断到 [0,100]; NaN 视为 0
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clamps_values() {
        let mut scores = SubScores {
            fitness: 100.0,
            maintenance: 100.0,
            branding: 50.0,
            mileage: 50.0,
            cleaning: 30.0,
            stabling: 50.0,
        };
        scores.set(ScoreSignal::Fitness, -5.0);
        scores.set(ScoreSignal::Stabling, 140.0);
        assert_eq!(scores.get(ScoreSignal::Fitness), 0.0);
        assert_eq!(scores.get(ScoreSignal::Stabling), 100.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(85.004), 85.0);
        assert_eq!(round2(59.896), 59.9);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }
}
