// ==========================================
// 车队投运决策系统 - 场景模拟器
// ==========================================
// 职责: 在同一快照上运行 基线 与 场景 两次分配,输出影响分析
// 输入: FleetSnapshot + 约束 + 按车辆的信号覆盖
// 输出: SimulationResult { schedule, impact }
// ==========================================
// 红线:
// - 覆盖只作用于分项得分/状态,不修改底层记录
// - 覆盖仅在单次模拟内有效,结果不落库
// ==========================================

use crate::domain::schedule::{Schedule, ScheduleConstraints};
use crate::domain::score::{ScoreResult, ScoreSignal, SubScores};
use crate::domain::types::{PerformanceImpact, ScheduleList, VehicleStatus};
use crate::domain::vehicle::FleetSnapshot;
use crate::engine::aggregator::{ScoreAggregator, ScoreContext};
use crate::engine::allocator::InductionAllocator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

/// 模拟强制值
const FORCED_STABLING_SCORE: f64 = 20.0;
const FORCED_RECENT_CLEANING_SCORE: f64 = 100.0;
const FORCED_OVERDUE_CLEANING_SCORE: f64 = 20.0;
/// 一张紧急作业卡的扣分: 紧急 50 + 任意未关闭 5
const EMERGENCY_JOB_CARD_PENALTY: f64 = 55.0;
/// 覆盖率下降超过该值视为严重劣化
const MAJOR_DEGRADATION_COVERAGE_DROP: i32 = 10;

// ==========================================
// SignalOverride - 单项信号覆盖
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalOverride {
    /// 视为证书已过期: 适航得分 = 0
    ForceExpiredCertificate,
    /// 追加一张紧急作业卡
    ForceEmergencyJobCard,
    /// 调车成本高: 停放得分强制偏低
    ForceHighShuntingCost,
    /// 刚完成清洗
    ForceRecentCleaning,
    /// 清洗严重逾期
    ForceCleaningOverdue,
    /// 车辆状态强制为 critical
    ForceCriticalStatus,
    /// 车辆状态强制为指定值
    ForceStatus { status: VehicleStatus },
    /// 直接指定某项分项得分
    SetScore { signal: ScoreSignal, value: f64 },
}

impl SignalOverride {
    /// 作用于分项得分与车辆状态
    pub fn apply(&self, scores: &mut SubScores, status: &mut VehicleStatus) {
        match *self {
            SignalOverride::ForceExpiredCertificate => scores.set(ScoreSignal::Fitness, 0.0),
            SignalOverride::ForceEmergencyJobCard => {
                let current = scores.maintenance;
                scores.set(ScoreSignal::Maintenance, current - EMERGENCY_JOB_CARD_PENALTY);
            }
            SignalOverride::ForceHighShuntingCost => {
                scores.set(ScoreSignal::Stabling, FORCED_STABLING_SCORE)
            }
            SignalOverride::ForceRecentCleaning => {
                scores.set(ScoreSignal::Cleaning, FORCED_RECENT_CLEANING_SCORE)
            }
            SignalOverride::ForceCleaningOverdue => {
                scores.set(ScoreSignal::Cleaning, FORCED_OVERDUE_CLEANING_SCORE)
            }
            SignalOverride::ForceCriticalStatus => *status = VehicleStatus::Critical,
            SignalOverride::ForceStatus { status: forced } => *status = forced,
            SignalOverride::SetScore { signal, value } => scores.set(signal, value),
        }
    }
}

impl fmt::Display for SignalOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalOverride::ForceExpiredCertificate => write!(f, "force_expired_certificate"),
            SignalOverride::ForceEmergencyJobCard => write!(f, "force_emergency_job_card"),
            SignalOverride::ForceHighShuntingCost => write!(f, "force_high_shunting_cost"),
            SignalOverride::ForceRecentCleaning => write!(f, "force_recent_cleaning"),
            SignalOverride::ForceCleaningOverdue => write!(f, "force_cleaning_overdue"),
            SignalOverride::ForceCriticalStatus => write!(f, "force_critical_status"),
            SignalOverride::ForceStatus { status } => write!(f, "force_status={}", status),
            SignalOverride::SetScore { signal, value } => write!(f, "set_score {}={}", signal, value),
        }
    }
}

/// 按车辆编号组织的覆盖集合 (有序,保证模拟结果确定)
pub type ScenarioOverrides = BTreeMap<String, Vec<SignalOverride>>;

// ==========================================
// ImpactSummary - 影响分析
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListChange {
    pub vehicle_id: String,
    pub from: Option<ScheduleList>,
    pub to: Option<ScheduleList>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    /// 实际命中快照的被覆盖车辆数
    pub vehicles_overridden: usize,
    /// 清单发生变化的车辆
    pub changed: Vec<ListChange>,
    pub newly_inducted: Vec<String>,
    pub removed_from_induction: Vec<String>,
    pub moved_to_maintenance: Vec<String>,
    pub coverage_before: u32,
    pub coverage_after: u32,
    pub coverage_delta: i32,
    pub performance_impact: PerformanceImpact,
}

/// 模拟结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub schedule: Schedule,
    pub impact: ImpactSummary,
}

// ==========================================
// ScenarioSimulator - 场景模拟器
// ==========================================
#[derive(Debug, Clone)]
pub struct ScenarioSimulator {
    aggregator: ScoreAggregator,
    allocator: InductionAllocator,
}

impl ScenarioSimulator {
    pub fn new(aggregator: ScoreAggregator) -> Self {
        Self {
            aggregator,
            allocator: InductionAllocator::new(),
        }
    }

    /// 对快照评分,覆盖在聚合前作用于分项得分
    pub fn score_with_overrides(
        &self,
        snapshot: &FleetSnapshot,
        overrides: &ScenarioOverrides,
    ) -> Vec<ScoreResult> {
        let ctx = ScoreContext {
            target_date: snapshot.target_date,
            fleet_average_mileage: snapshot.fleet_average_mileage(),
        };

        snapshot
            .vehicles
            .iter()
            .map(|inputs| match overrides.get(&inputs.snapshot.vehicle_id) {
                None => self.aggregator.score_vehicle(inputs, &ctx),
                Some(list) => {
                    debug!(vehicle_id = %inputs.snapshot.vehicle_id, overrides = list.len(), "应用场景覆盖");
                    self.aggregator
                        .score_vehicle_with(inputs, &ctx, |scores, status, issues| {
                            for o in list {
                                o.apply(scores, status);
                                issues.push(format!("OVERRIDE: {}", o));
                            }
                        })
                }
            })
            .collect()
    }

    /// 运行模拟
    ///
    /// # 返回
    /// - schedule: 场景排程 (is_simulation = true)
    /// - impact: 与基线排程的对比
    pub fn simulate(
        &self,
        snapshot: &FleetSnapshot,
        constraints: ScheduleConstraints,
        overrides: &ScenarioOverrides,
        warnings: Vec<String>,
        generated_at: DateTime<Utc>,
    ) -> SimulationResult {
        for id in overrides.keys() {
            if !snapshot.vehicles.iter().any(|v| &v.snapshot.vehicle_id == id) {
                warn!(vehicle_id = %id, "覆盖目标车辆不在快照中,忽略");
            }
        }

        let baseline_scores = self.score_with_overrides(snapshot, &ScenarioOverrides::new());
        let baseline = self
            .allocator
            .allocate(&baseline_scores, &constraints)
            .into_schedule(snapshot.target_date, generated_at, constraints, warnings.clone());

        let scenario_scores = self.score_with_overrides(snapshot, overrides);
        let mut schedule = self
            .allocator
            .allocate(&scenario_scores, &constraints)
            .into_schedule(snapshot.target_date, generated_at, constraints, warnings);
        schedule.is_simulation = true;

        let vehicles_overridden = snapshot
            .vehicles
            .iter()
            .filter(|v| overrides.contains_key(&v.snapshot.vehicle_id))
            .count();
        let impact = Self::compare(&baseline, &schedule, vehicles_overridden);

        info!(
            overridden = impact.vehicles_overridden,
            changed = impact.changed.len(),
            coverage_before = impact.coverage_before,
            coverage_after = impact.coverage_after,
            impact = %impact.performance_impact,
            "场景模拟完成"
        );

        SimulationResult { schedule, impact }
    }

    /// 基线与场景排程对比
    pub fn compare(baseline: &Schedule, scenario: &Schedule, vehicles_overridden: usize) -> ImpactSummary {
        let mut changed = Vec::new();
        let mut newly_inducted = Vec::new();
        let mut removed_from_induction = Vec::new();
        let mut moved_to_maintenance = Vec::new();

        // 基线顺序遍历,再补充仅出现在场景中的车辆
        let mut ids: Vec<&str> = Vec::new();
        for (_, entries) in baseline.lists().into_iter().chain(scenario.lists()) {
            for e in entries.iter() {
                if !ids.contains(&e.vehicle_id.as_str()) {
                    ids.push(e.vehicle_id.as_str());
                }
            }
        }

        for id in ids {
            let from = baseline.list_of(id);
            let to = scenario.list_of(id);
            if from == to {
                continue;
            }
            if to == Some(ScheduleList::Induction) {
                newly_inducted.push(id.to_string());
            }
            if from == Some(ScheduleList::Induction) {
                removed_from_induction.push(id.to_string());
            }
            if to == Some(ScheduleList::Maintenance) {
                moved_to_maintenance.push(id.to_string());
            }
            changed.push(ListChange {
                vehicle_id: id.to_string(),
                from,
                to,
            });
        }

        let coverage_before = baseline.summary.coverage;
        let coverage_after = scenario.summary.coverage;
        let coverage_delta = coverage_after as i32 - coverage_before as i32;

        ImpactSummary {
            vehicles_overridden,
            changed,
            newly_inducted,
            removed_from_induction,
            moved_to_maintenance,
            coverage_before,
            coverage_after,
            coverage_delta,
            performance_impact: Self::impact_label(coverage_delta),
        }
    }

    /// 覆盖率变化 → 影响等级
    pub fn impact_label(coverage_delta: i32) -> PerformanceImpact {
        if coverage_delta > 0 {
            PerformanceImpact::Improved
        } else if coverage_delta == 0 {
            PerformanceImpact::Neutral
        } else if coverage_delta >= -MAJOR_DEGRADATION_COVERAGE_DROP {
            PerformanceImpact::MinorDegradation
        } else {
            PerformanceImpact::MajorDegradation
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::domain::types::CertificateType;
    use crate::domain::vehicle::{CertificateRecord, VehicleInputs, VehicleRecords, VehicleSnapshot};
    use chrono::NaiveDate;

    fn target() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn healthy(id: &str) -> VehicleInputs {
        let certificates = [
            CertificateType::RollingStock,
            CertificateType::Signalling,
            CertificateType::Telecom,
        ]
        .into_iter()
        .map(|t| CertificateRecord {
            vehicle_id: id.to_string(),
            certificate_type: t,
            valid_to: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
        })
        .collect();
        VehicleInputs {
            snapshot: VehicleSnapshot::new(id, VehicleStatus::Ready, "Muttom"),
            records: VehicleRecords {
                certificates,
                ..VehicleRecords::default()
            },
            data_gaps: vec![],
        }
    }

    fn snapshot(n: usize) -> FleetSnapshot {
        FleetSnapshot {
            target_date: target(),
            vehicles: (1..=n).map(|i| healthy(&format!("TS-{:02}", i))).collect(),
        }
    }

    fn simulator() -> ScenarioSimulator {
        ScenarioSimulator::new(ScoreAggregator::new(&EngineConfig::default()))
    }

    fn constraints() -> ScheduleConstraints {
        ScheduleConstraints {
            required_trainsets: 2,
            max_standby: 1,
            max_maintenance: 1,
        }
    }

    #[test]
    fn test_override_application() {
        let mut scores = SubScores {
            fitness: 100.0,
            maintenance: 40.0,
            branding: 50.0,
            mileage: 50.0,
            cleaning: 30.0,
            stabling: 50.0,
        };
        let mut status = VehicleStatus::Ready;

        SignalOverride::ForceEmergencyJobCard.apply(&mut scores, &mut status);
        assert_eq!(scores.maintenance, 0.0);

        SignalOverride::ForceHighShuntingCost.apply(&mut scores, &mut status);
        assert_eq!(scores.stabling, 20.0);

        SignalOverride::SetScore { signal: ScoreSignal::Branding, value: 150.0 }.apply(&mut scores, &mut status);
        assert_eq!(scores.branding, 100.0);

        SignalOverride::ForceStatus { status: VehicleStatus::Standby }.apply(&mut scores, &mut status);
        assert_eq!(status, VehicleStatus::Standby);
    }

    #[test]
    fn test_expired_certificate_moves_vehicle_to_maintenance() {
        let snap = snapshot(3);
        let mut overrides = ScenarioOverrides::new();
        overrides.insert("TS-01".to_string(), vec![SignalOverride::ForceExpiredCertificate]);

        let result = simulator().simulate(&snap, constraints(), &overrides, vec![], Utc::now());

        assert!(result.schedule.is_simulation);
        assert_eq!(result.schedule.list_of("TS-01"), Some(ScheduleList::Maintenance));
        assert_eq!(result.impact.vehicles_overridden, 1);
        assert_eq!(result.impact.moved_to_maintenance, vec!["TS-01".to_string()]);
        assert_eq!(result.impact.removed_from_induction, vec!["TS-01".to_string()]);
        assert_eq!(result.impact.newly_inducted, vec!["TS-03".to_string()]);
        // 3 辆合格 → 2 辆合格,投运仍满足 2 辆
        assert_eq!(result.impact.coverage_delta, 0);
        assert_eq!(result.impact.performance_impact, PerformanceImpact::Neutral);
    }

    #[test]
    fn test_coverage_drop_is_degradation() {
        let snap = snapshot(2);
        let mut overrides = ScenarioOverrides::new();
        overrides.insert("TS-02".to_string(), vec![SignalOverride::ForceCriticalStatus]);

        let result = simulator().simulate(&snap, constraints(), &overrides, vec![], Utc::now());
        assert_eq!(result.impact.coverage_before, 100);
        assert_eq!(result.impact.coverage_after, 50);
        assert_eq!(result.impact.performance_impact, PerformanceImpact::MajorDegradation);
    }

    #[test]
    fn test_overrides_do_not_touch_snapshot() {
        let snap = snapshot(2);
        let before = snap.clone();
        let mut overrides = ScenarioOverrides::new();
        overrides.insert("TS-01".to_string(), vec![SignalOverride::ForceCriticalStatus]);
        let _ = simulator().simulate(&snap, constraints(), &overrides, vec![], Utc::now());
        assert_eq!(snap, before);
    }

    #[test]
    fn test_unknown_vehicle_override_is_ignored() {
        let snap = snapshot(2);
        let mut overrides = ScenarioOverrides::new();
        overrides.insert("GHOST".to_string(), vec![SignalOverride::ForceCriticalStatus]);
        let result = simulator().simulate(&snap, constraints(), &overrides, vec![], Utc::now());
        assert_eq!(result.impact.vehicles_overridden, 0);
        assert!(result.impact.changed.is_empty());
    }

    #[test]
    fn test_overridden_vehicle_keeps_certificate_issues() {
        let mut snap = snapshot(3);
        // TS-01 的通信证书 10 天后到期
        for c in snap.vehicles[0].records.certificates.iter_mut() {
            if c.certificate_type == CertificateType::Telecom {
                c.valid_to = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
            }
        }
        let mut overrides = ScenarioOverrides::new();
        overrides.insert("TS-01".to_string(), vec![SignalOverride::ForceRecentCleaning]);

        let baseline = simulator().score_with_overrides(&snap, &ScenarioOverrides::new());
        let scenario = simulator().score_with_overrides(&snap, &overrides);

        assert_eq!(scenario[0].scores.cleaning, 100.0);
        assert!(scenario[0]
            .issues
            .iter()
            .any(|i| i.starts_with("CERTIFICATE_EXPIRING: telecom")));
        assert!(scenario[0].issues.iter().any(|i| i == "OVERRIDE: force_recent_cleaning"));

        // 覆盖之外的说明与基线一致
        let untouched: Vec<&String> = scenario[0]
            .issues
            .iter()
            .filter(|i| !i.starts_with("OVERRIDE"))
            .collect();
        assert_eq!(untouched, baseline[0].issues.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_impact_label_thresholds() {
        assert_eq!(ScenarioSimulator::impact_label(5), PerformanceImpact::Improved);
        assert_eq!(ScenarioSimulator::impact_label(0), PerformanceImpact::Neutral);
        assert_eq!(ScenarioSimulator::impact_label(-10), PerformanceImpact::MinorDegradation);
        assert_eq!(ScenarioSimulator::impact_label(-11), PerformanceImpact::MajorDegradation);
    }

    #[test]
    fn test_override_serde_shape() {
        let json = r#"[{"kind":"force_expired_certificate"},{"kind":"set_score","signal":"cleaning","value":90.0},{"kind":"force_status","status":"standby"}]"#;
        let parsed: Vec<SignalOverride> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0], SignalOverride::ForceExpiredCertificate);
        assert_eq!(
            parsed[1],
            SignalOverride::SetScore { signal: ScoreSignal::Cleaning, value: 90.0 }
        );
        assert_eq!(parsed[2], SignalOverride::ForceStatus { status: VehicleStatus::Standby });
    }
}
