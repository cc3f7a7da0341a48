// ==========================================
// 车队投运决策系统 - 评分聚合与合格性判定
// ==========================================
// 职责: 六项得分加权汇总 + 硬合格性门槛
// 输入: 单车快照与运营记录
// 输出: ScoreResult (值对象)
// ==========================================
// 红线: 合格性规则互不短路,所有命中规则都要输出 issue
// ==========================================

use crate::config::{EligibilityThresholds, EngineConfig, ScoringWeights};
use crate::domain::score::{clamp_score, ScoreResult, SubScores};
use crate::domain::types::{CertificateStatus, CertificateType, VehicleStatus};
use crate::domain::vehicle::{CertificateRecord, VehicleInputs};
use crate::engine::score_functions::{ScoreFunctions, NEUTRAL_SCORE};
use crate::repository::RecordKind;
use chrono::NaiveDate;

/// 单次评分的车队级上下文
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreContext {
    pub target_date: NaiveDate,
    pub fleet_average_mileage: Option<f64>,
}

// ==========================================
// ScoreAggregator - 评分聚合器
// ==========================================
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    weights: ScoringWeights,
    thresholds: EligibilityThresholds,
    required_certificates: Vec<CertificateType>,
    preferred_depot: String,
    expiring_window_days: i64,
}

impl ScoreAggregator {
    /// 从引擎配置构建
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            weights: config.scoring_weights,
            thresholds: config.eligibility,
            required_certificates: config.required_certificates.clone(),
            preferred_depot: config.preferred_depot.clone(),
            expiring_window_days: config.expiring_window_days,
        }
    }

    /// 替换权重配置(用于多套权重并存的场景)
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// 计算六项分项得分
    pub fn compute_sub_scores(&self, inputs: &VehicleInputs, ctx: &ScoreContext) -> SubScores {
        let records = &inputs.records;
        SubScores {
            fitness: ScoreFunctions::fitness_score(
                &records.certificates,
                &self.required_certificates,
                ctx.target_date,
            ),
            maintenance: ScoreFunctions::maintenance_score(&records.job_cards),
            branding: ScoreFunctions::branding_score(&records.campaigns, ctx.target_date),
            mileage: ScoreFunctions::mileage_score(records.mileage_km, ctx.fleet_average_mileage),
            cleaning: ScoreFunctions::cleaning_score(&records.cleaning, ctx.target_date),
            stabling: ScoreFunctions::stabling_score(records.stabling.as_ref(), &self.preferred_depot),
        }
    }

    /// 加权汇总并判定合格性
    ///
    /// # 合格性规则 (任一命中即不合格,全部收集)
    /// 1. 适航得分 < 30
    /// 2. 检修负荷得分 < 20
    /// 3. 车辆当前状态为 critical
    ///
    /// # 参数
    /// - issues: 调用方已有的问题说明(如数据缺口),保留在最前
    pub fn aggregate(
        &self,
        vehicle_id: &str,
        status: VehicleStatus,
        scores: SubScores,
        mut issues: Vec<String>,
    ) -> ScoreResult {
        let total_score = clamp_score(self.weights.weighted_total(&scores));
        let mut eligible = true;

        if scores.fitness < self.thresholds.min_fitness {
            eligible = false;
            issues.push(format!(
                "FITNESS_BELOW_THRESHOLD: fitness score {:.1} < {:.0}",
                scores.fitness, self.thresholds.min_fitness
            ));
        }

        if scores.maintenance < self.thresholds.min_maintenance {
            eligible = false;
            issues.push(format!(
                "MAINTENANCE_BELOW_THRESHOLD: maintenance score {:.1} < {:.0}",
                scores.maintenance, self.thresholds.min_maintenance
            ));
        }

        if status == VehicleStatus::Critical {
            eligible = false;
            issues.push("CRITICAL_STATUS: vehicle status is critical".to_string());
        }

        ScoreResult {
            vehicle_id: vehicle_id.to_string(),
            scores,
            total_score,
            eligible,
            issues,
        }
    }

    /// 单车完整评分
    pub fn score_vehicle(&self, inputs: &VehicleInputs, ctx: &ScoreContext) -> ScoreResult {
        self.score_vehicle_with(inputs, ctx, |_, _, _| {})
    }

    /// 单车评分,聚合前允许调用方调整分项得分/状态并追加说明
    ///
    /// # 说明顺序
    /// 1. 加载阶段的数据缺口
    /// 2. 记录缺失 (停放/里程) 导致的中性默认
    /// 3. 证书状态
    /// 4. 调用方追加 (如场景覆盖)
    /// 5. 合格性规则
    pub fn score_vehicle_with<F>(&self, inputs: &VehicleInputs, ctx: &ScoreContext, adjust: F) -> ScoreResult
    where
        F: FnOnce(&mut SubScores, &mut VehicleStatus, &mut Vec<String>),
    {
        let mut scores = self.compute_sub_scores(inputs, ctx);
        let mut status = inputs.snapshot.status;
        let mut issues = inputs.data_gaps.clone();
        Self::push_missing_record_gaps(inputs, &mut issues);
        issues.extend(self.certificate_issues(&inputs.records.certificates, ctx.target_date));
        adjust(&mut scores, &mut status, &mut issues);
        self.aggregate(&inputs.snapshot.vehicle_id, status, scores, issues)
    }

    /// 停放/里程记录缺失 → 中性默认,记为数据缺口
    ///
    /// 加载失败已记录同类缺口时不重复
    fn push_missing_record_gaps(inputs: &VehicleInputs, issues: &mut Vec<String>) {
        let records = &inputs.records;
        let missing = [
            (RecordKind::Stabling, records.stabling.is_none(), "no stabling assignment"),
            (RecordKind::Mileage, records.mileage_km.is_none(), "no mileage value"),
        ];
        for (kind, is_missing, what) in missing {
            if !is_missing {
                continue;
            }
            let prefix = format!("DATA_GAP: {}", kind);
            if issues.iter().any(|i| i.starts_with(&prefix)) {
                continue;
            }
            issues.push(format!("{} record missing ({}), neutral default {:.0}", prefix, what, NEUTRAL_SCORE));
        }
    }

    /// 证书状态说明(缺失/过期/即将到期)
    fn certificate_issues(&self, certificates: &[CertificateRecord], target_date: NaiveDate) -> Vec<String> {
        let mut issues = Vec::new();
        for required in &self.required_certificates {
            let latest = certificates
                .iter()
                .filter(|c| c.certificate_type == *required)
                .max_by_key(|c| c.valid_to);
            match latest {
                None => issues.push(format!("CERTIFICATE_MISSING: {}", required)),
                Some(cert) => match cert.derive_status(target_date, self.expiring_window_days) {
                    CertificateStatus::Expired => issues.push(format!(
                        "CERTIFICATE_EXPIRED: {} (valid_to={})",
                        required, cert.valid_to
                    )),
                    CertificateStatus::Expiring => issues.push(format!(
                        "CERTIFICATE_EXPIRING: {} in {} days",
                        required,
                        cert.days_to_expiry(target_date)
                    )),
                    CertificateStatus::Active => {}
                },
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WEIGHT_SUM_TOLERANCE;
    use crate::domain::vehicle::{VehicleRecords, VehicleSnapshot};

    fn ctx() -> ScoreContext {
        ScoreContext {
            target_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            fleet_average_mileage: None,
        }
    }

    fn scores(fitness: f64, maintenance: f64) -> SubScores {
        SubScores {
            fitness,
            maintenance,
            branding: 50.0,
            mileage: 50.0,
            cleaning: 30.0,
            stabling: 50.0,
        }
    }

    #[test]
    fn test_weighted_total() {
        let aggregator = ScoreAggregator::new(&EngineConfig::default());
        let result = aggregator.aggregate("TS-01", VehicleStatus::Ready, scores(100.0, 100.0), vec![]);
        // 25 + 20 + 7.5 + 7.5 + 3 + 7.5
        assert!((result.total_score - 70.5).abs() < 1e-9);
        assert!(result.eligible);
        assert!(result.issues.is_empty());
        assert!((aggregator.weights().sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn test_all_failing_rules_are_collected() {
        let aggregator = ScoreAggregator::new(&EngineConfig::default());
        let result = aggregator.aggregate(
            "TS-01",
            VehicleStatus::Critical,
            scores(20.0, 15.0),
            vec!["DATA_GAP: x".to_string()],
        );
        assert!(!result.eligible);
        assert_eq!(result.issues.len(), 4);
        assert_eq!(result.issues[0], "DATA_GAP: x");
        assert!(result.issues[1].starts_with("FITNESS_BELOW_THRESHOLD"));
        assert!(result.issues[2].starts_with("MAINTENANCE_BELOW_THRESHOLD"));
        assert!(result.issues[3].starts_with("CRITICAL_STATUS"));
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive_pass() {
        let aggregator = ScoreAggregator::new(&EngineConfig::default());
        let result = aggregator.aggregate("TS-01", VehicleStatus::Maintenance, scores(30.0, 20.0), vec![]);
        assert!(result.eligible);
    }

    #[test]
    fn test_missing_certificates_reported_and_ineligible() {
        let aggregator = ScoreAggregator::new(&EngineConfig::default());
        let inputs = VehicleInputs {
            snapshot: VehicleSnapshot::new("TS-09", VehicleStatus::Ready, "Muttom"),
            records: VehicleRecords::default(),
            data_gaps: vec![],
        };
        let result = aggregator.score_vehicle(&inputs, &ctx());
        assert_eq!(result.scores.fitness, 0.0);
        assert!(!result.eligible);
        assert!(result.issues.iter().any(|i| i == "CERTIFICATE_MISSING: rolling_stock"));
    }

    #[test]
    fn test_alternate_weight_profile_coexists() {
        let config = EngineConfig::default();
        let default_agg = ScoreAggregator::new(&config);
        let fitness_heavy = ScoreAggregator::new(&config).with_weights(ScoringWeights {
            fitness: 0.5,
            maintenance: 0.1,
            branding: 0.1,
            mileage: 0.1,
            cleaning: 0.1,
            stabling: 0.1,
        });

        let s = scores(100.0, 0.0);
        let a = default_agg.aggregate("TS-01", VehicleStatus::Ready, s, vec![]);
        let b = fitness_heavy.aggregate("TS-01", VehicleStatus::Ready, s, vec![]);
        assert!(b.total_score > a.total_score);
    }
}
