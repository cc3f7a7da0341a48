// ==========================================
// 车队投运决策系统 - 检修后准入分类器
// ==========================================
// 职责: 检修后性能参数 → 综合得分 → ready / testing / dropout
// 输入: PerformanceParameters (检修后,可选检修前)
// 输出: ReadinessResult (含本地化告警)
// ==========================================
// 判定顺序:
// 1) 综合 ≥85 且关键参数达标 → ready
// 2) 综合 <60 或关键参数不达标 → dropout
// 3) 其余 → testing
// ==========================================

use crate::config::{EngineConfig, PerformanceWeights, ReadinessThresholds};
use crate::domain::readiness::{PerformanceParameters, ReadinessAlert, ReadinessResult};
use crate::domain::score::round2;
use crate::domain::types::{AlertType, ReadinessStatus};
use crate::i18n::t_with_args;
use chrono::{DateTime, Utc};
use tracing::info;

// ==========================================
// ReadinessClassifier - 准入分类器
// ==========================================
#[derive(Debug, Clone)]
pub struct ReadinessClassifier {
    weights: PerformanceWeights,
    thresholds: ReadinessThresholds,
}

impl ReadinessClassifier {
    pub fn new(weights: PerformanceWeights, thresholds: ReadinessThresholds) -> Self {
        Self { weights, thresholds }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.performance_weights, config.readiness)
    }

    /// 综合得分 (保留两位小数)
    pub fn overall_score(&self, params: &PerformanceParameters) -> f64 {
        round2(self.weights.weighted_total(&params.clamped()))
    }

    /// 关键参数门槛: 制动与牵引均达标
    pub fn critical_ok(&self, braking: f64, traction: f64) -> bool {
        braking >= self.thresholds.critical_parameter_min
            && traction >= self.thresholds.critical_parameter_min
    }

    /// 仅按得分与关键参数分类
    pub fn classify_score(&self, overall: f64, braking: f64, traction: f64) -> ReadinessStatus {
        let critical_ok = self.critical_ok(braking, traction);
        if overall >= self.thresholds.ready_score && critical_ok {
            ReadinessStatus::Ready
        } else if overall < self.thresholds.dropout_score || !critical_ok {
            ReadinessStatus::Dropout
        } else {
            ReadinessStatus::Testing
        }
    }

    /// 完整准入评估
    ///
    /// # 参数
    /// - vehicle_id: 车辆编号(写入告警文本)
    /// - after: 检修后参数
    /// - before: 检修前参数(可选,用于计算改善量)
    /// - now: 评估时间
    pub fn assess(
        &self,
        vehicle_id: &str,
        after: &PerformanceParameters,
        before: Option<&PerformanceParameters>,
        now: DateTime<Utc>,
    ) -> ReadinessResult {
        let after = after.clamped();
        let overall_score = self.overall_score(&after);
        let critical_ok = self.critical_ok(after.braking_efficiency, after.traction_motor);
        let status = self.classify_score(overall_score, after.braking_efficiency, after.traction_motor);

        let score_text = format!("{:.2}", overall_score);
        let args = [("vehicle", vehicle_id), ("score", score_text.as_str())];
        let (alert_type, message) = match status {
            ReadinessStatus::Ready => (AlertType::Success, t_with_args("readiness.alert_ready", &args)),
            ReadinessStatus::Dropout => (AlertType::Critical, t_with_args("readiness.alert_dropout", &args)),
            ReadinessStatus::Testing => (AlertType::Warning, t_with_args("readiness.alert_testing", &args)),
        };

        let (before_overall_score, improvement) = match before {
            Some(b) => {
                let b = b.clamped();
                (Some(self.overall_score(&b)), Some(after.delta_from(&b)))
            }
            None => (None, None),
        };

        info!(
            vehicle_id = %vehicle_id,
            overall_score,
            critical_ok,
            status = %status,
            "检修后准入评估完成"
        );

        ReadinessResult {
            vehicle_id: vehicle_id.to_string(),
            overall_score,
            status,
            ready_for_operation: status == ReadinessStatus::Ready,
            critical_ok,
            alert: ReadinessAlert {
                generated: true,
                alert_type,
                message,
                generated_at: now,
            },
            before_overall_score,
            improvement,
        }
    }
}

impl Default for ReadinessClassifier {
    fn default() -> Self {
        Self::new(PerformanceWeights::default(), ReadinessThresholds::default())
    }
}
