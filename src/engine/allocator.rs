// ==========================================
// 车队投运决策系统 - 投运分配引擎
// ==========================================
// 职责: 按总分排序并划分 投运/备用/检修/未分配 四个清单
// 输入: ScoreResult 列表 + 容量约束
// 输出: Allocation (可转换为 Schedule)
// ==========================================
// 规则:
// 1) 合格池按总分降序稳定排序(同分保持输入顺序)
// 2) 前 required_trainsets 辆 → 投运
// 3) 其后 max_standby 辆 → 备用
// 4) 合格但超出容量 → 未分配(显式上报)
// 5) 不合格池全部 → 检修 (max_maintenance 仅提示,不截断)
// ==========================================

use crate::domain::schedule::{
    Schedule, ScheduleConstraints, ScheduleEntry, ScheduleSummary,
};
use crate::domain::score::{round2, ScoreResult, ScoreSignal};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, instrument, warn};

/// 分配结果
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub induction: Vec<ScoreResult>,
    pub standby: Vec<ScoreResult>,
    pub maintenance: Vec<ScoreResult>,
    pub unallocated: Vec<ScoreResult>,
    pub summary: ScheduleSummary,
}

// ==========================================
// InductionAllocator - 投运分配引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct InductionAllocator;

impl InductionAllocator {
    pub fn new() -> Self {
        Self
    }

    /// 执行分配
    #[instrument(skip(self, scores), fields(
        vehicles = scores.len(),
        required = constraints.required_trainsets,
        max_standby = constraints.max_standby
    ))]
    pub fn allocate(&self, scores: &[ScoreResult], constraints: &ScheduleConstraints) -> Allocation {
        let (mut eligible, maintenance): (Vec<ScoreResult>, Vec<ScoreResult>) =
            scores.iter().cloned().partition(|s| s.eligible);

        // sort_by 为稳定排序,同分保持输入顺序
        eligible.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

        let total_eligible = eligible.len();
        let induction_count = (constraints.required_trainsets as usize).min(eligible.len());
        let mut rest = eligible.split_off(induction_count);
        let induction = eligible;

        let standby_count = (constraints.max_standby as usize).min(rest.len());
        let unallocated = rest.split_off(standby_count);
        let standby = rest;

        if !unallocated.is_empty() {
            debug!(unallocated = unallocated.len(), "合格车辆超出投运+备用容量");
        }

        let maintenance_over_limit = maintenance.len() > constraints.max_maintenance as usize;
        if maintenance_over_limit {
            warn!(
                maintenance = maintenance.len(),
                max_maintenance = constraints.max_maintenance,
                "检修清单超出建议上限(仅提示)"
            );
        }

        let summary = ScheduleSummary {
            total_vehicles: scores.len(),
            total_eligible,
            requested: constraints.required_trainsets,
            inducted: induction.len(),
            standby: standby.len(),
            maintenance: maintenance.len(),
            unallocated: unallocated.len(),
            coverage: Self::coverage(induction.len(), constraints.required_trainsets),
            maintenance_over_limit,
        };

        Allocation {
            induction,
            standby,
            maintenance,
            unallocated,
            summary,
        }
    }

    /// 覆盖率 = round(投运数 / 目标数 × 100)
    pub fn coverage(inducted: usize, required_trainsets: u32) -> u32 {
        if required_trainsets == 0 {
            return 0;
        }
        ((inducted as f64 / required_trainsets as f64) * 100.0).round() as u32
    }
}

impl Allocation {
    /// 转换为排程
    pub fn into_schedule(
        self,
        target_date: NaiveDate,
        generated_at: DateTime<Utc>,
        constraints: ScheduleConstraints,
        warnings: Vec<String>,
    ) -> Schedule {
        let required = constraints.required_trainsets;
        let standby_base = self.induction.len();

        let induction = self
            .induction
            .iter()
            .enumerate()
            .map(|(i, s)| {
                entry(
                    s,
                    format!("INDUCTION: rank #{} of eligible pool (target {})", i + 1, required),
                )
            })
            .collect();

        let standby = self
            .standby
            .iter()
            .enumerate()
            .map(|(i, s)| {
                entry(
                    s,
                    format!(
                        "STANDBY: reserve #{} (eligible rank #{})",
                        i + 1,
                        standby_base + i + 1
                    ),
                )
            })
            .collect();

        let maintenance = self
            .maintenance
            .iter()
            .map(|s| entry(s, "MAINTENANCE: failed eligibility gate".to_string()))
            .collect();

        let unallocated_base = standby_base + self.standby.len();
        let unallocated = self
            .unallocated
            .iter()
            .enumerate()
            .map(|(i, s)| {
                entry(
                    s,
                    format!(
                        "UNALLOCATED: eligible rank #{} exceeds induction + standby capacity",
                        unallocated_base + i + 1
                    ),
                )
            })
            .collect();

        Schedule {
            schedule_id: uuid::Uuid::new_v4().to_string(),
            target_date,
            generated_at,
            induction,
            standby,
            maintenance,
            unallocated,
            summary: self.summary,
            constraints,
            warnings,
            is_simulation: false,
        }
    }
}

/// 构建条目: 首条为分配原因,其后为分项得分摘要与问题说明
fn entry(score: &ScoreResult, headline: String) -> ScheduleEntry {
    let mut reasoning = vec![headline];
    reasoning.push(format!(
        "total={:.2}; {}",
        score.total_score,
        ScoreSignal::ALL
            .iter()
            .map(|s| format!("{}={:.0}", s, score.scores.get(*s)))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    reasoning.extend(score.issues.iter().cloned());

    ScheduleEntry {
        vehicle_id: score.vehicle_id.clone(),
        score: round2(score.total_score),
        reasoning,
    }
}
