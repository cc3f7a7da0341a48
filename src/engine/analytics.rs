// ==========================================
// 车队投运决策系统 - 排程历史分析
// ==========================================
// 职责: 基于历史排程(最新在前)计算滚动覆盖率、单车出现次数与趋势
// 红线: 只读历史,不修改任何排程
// ==========================================

use crate::domain::schedule::Schedule;
use crate::domain::score::round2;
use crate::domain::types::{ScheduleList, TrendLabel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 单车在各清单中的出现次数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAppearances {
    pub induction: usize,
    pub standby: usize,
    pub maintenance: usize,
    pub unallocated: usize,
}

impl ListAppearances {
    pub fn total(&self) -> usize {
        self.induction + self.standby + self.maintenance + self.unallocated
    }

    fn record(&mut self, list: ScheduleList) {
        match list {
            ScheduleList::Induction => self.induction += 1,
            ScheduleList::Standby => self.standby += 1,
            ScheduleList::Maintenance => self.maintenance += 1,
            ScheduleList::Unallocated => self.unallocated += 1,
        }
    }
}

/// 单车历史分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainsetAnalytics {
    pub vehicle_id: String,
    pub schedules_considered: usize,
    pub appearances: ListAppearances,
    /// 出现过的排程中条目得分均值;从未出现为 0
    pub average_score: f64,
    pub trend: TrendLabel,
}

/// 时间窗内的车队汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetAnalyticsSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub schedules: usize,
    pub average_coverage: f64,
    pub min_coverage: Option<u32>,
    pub max_coverage: Option<u32>,
    pub total_unallocated: usize,
    /// 检修数超出建议上限的天数
    pub maintenance_over_limit_days: usize,
}

// ==========================================
// ScheduleAnalytics - 排程分析
// ==========================================
#[derive(Debug, Clone)]
pub struct ScheduleAnalytics {
    window: usize,
}

impl ScheduleAnalytics {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// 最近 window 份排程的平均覆盖率 (无历史为 0)
    pub fn rolling_average_coverage(&self, history: &[Schedule]) -> f64 {
        let recent = newest_first(history);
        let recent: Vec<&Schedule> = recent.into_iter().take(self.window).collect();
        if recent.is_empty() {
            return 0.0;
        }
        let sum: u32 = recent.iter().map(|s| s.summary.coverage).sum();
        round2(sum as f64 / recent.len() as f64)
    }

    /// 单车分析 (统计最近 window 份排程)
    ///
    /// # 趋势规则
    /// - 检修次数 > 投运次数 → declining
    /// - 投运次数 > 备用次数 → improving
    /// - 其余 → stable
    pub fn trainset(&self, vehicle_id: &str, history: &[Schedule]) -> TrainsetAnalytics {
        let recent: Vec<&Schedule> = newest_first(history).into_iter().take(self.window).collect();

        let mut appearances = ListAppearances::default();
        let mut score_sum = 0.0;
        for schedule in &recent {
            if let (Some(list), Some(entry)) = (schedule.list_of(vehicle_id), schedule.entry_of(vehicle_id)) {
                appearances.record(list);
                score_sum += entry.score;
            }
        }

        let average_score = match appearances.total() {
            0 => 0.0,
            n => round2(score_sum / n as f64),
        };

        TrainsetAnalytics {
            vehicle_id: vehicle_id.to_string(),
            schedules_considered: recent.len(),
            appearances,
            average_score,
            trend: Self::trend(&appearances),
        }
    }

    pub fn trend(appearances: &ListAppearances) -> TrendLabel {
        if appearances.maintenance > appearances.induction {
            TrendLabel::Declining
        } else if appearances.induction > appearances.standby {
            TrendLabel::Improving
        } else {
            TrendLabel::Stable
        }
    }

    /// 时间窗 [start, end] 内的车队汇总 (不受 window 限制)
    pub fn fleet_summary(&self, history: &[Schedule], start: NaiveDate, end: NaiveDate) -> FleetAnalyticsSummary {
        let in_range: Vec<&Schedule> = history
            .iter()
            .filter(|s| s.target_date >= start && s.target_date <= end)
            .collect();

        let coverages: Vec<u32> = in_range.iter().map(|s| s.summary.coverage).collect();
        let average_coverage = if coverages.is_empty() {
            0.0
        } else {
            round2(coverages.iter().sum::<u32>() as f64 / coverages.len() as f64)
        };

        FleetAnalyticsSummary {
            start_date: start,
            end_date: end,
            schedules: in_range.len(),
            average_coverage,
            min_coverage: coverages.iter().copied().min(),
            max_coverage: coverages.iter().copied().max(),
            total_unallocated: in_range.iter().map(|s| s.summary.unallocated).sum(),
            maintenance_over_limit_days: in_range
                .iter()
                .filter(|s| s.summary.maintenance_over_limit)
                .count(),
        }
    }
}

impl Default for ScheduleAnalytics {
    fn default() -> Self {
        Self::new(7)
    }
}

/// 按目标日期降序(稳定)
fn newest_first(history: &[Schedule]) -> Vec<&Schedule> {
    let mut sorted: Vec<&Schedule> = history.iter().collect();
    sorted.sort_by(|a, b| b.target_date.cmp(&a.target_date));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::{ScheduleConstraints, ScheduleEntry, ScheduleSummary};
    use chrono::Utc;

    fn entry(id: &str, score: f64) -> ScheduleEntry {
        ScheduleEntry {
            vehicle_id: id.to_string(),
            score,
            reasoning: vec![],
        }
    }

    fn schedule(day: u32, coverage: u32, induction: &[&str], standby: &[&str], maintenance: &[&str]) -> Schedule {
        Schedule {
            schedule_id: format!("S-{}", day),
            target_date: NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
            generated_at: Utc::now(),
            induction: induction.iter().map(|id| entry(id, 80.0)).collect(),
            standby: standby.iter().map(|id| entry(id, 60.0)).collect(),
            maintenance: maintenance.iter().map(|id| entry(id, 20.0)).collect(),
            unallocated: vec![],
            summary: ScheduleSummary {
                total_vehicles: induction.len() + standby.len() + maintenance.len(),
                total_eligible: induction.len() + standby.len(),
                requested: 20,
                inducted: induction.len(),
                standby: standby.len(),
                maintenance: maintenance.len(),
                unallocated: 0,
                coverage,
                maintenance_over_limit: maintenance.len() > 3,
            },
            constraints: ScheduleConstraints::default(),
            warnings: vec![],
            is_simulation: false,
        }
    }

    #[test]
    fn test_rolling_coverage_uses_newest_window() {
        let history: Vec<Schedule> = (1..=10).map(|d| schedule(d, d * 10, &[], &[], &[])).collect();
        let analytics = ScheduleAnalytics::new(3);
        // 最新三天: 100, 90, 80
        assert_eq!(analytics.rolling_average_coverage(&history), 90.0);
        assert_eq!(ScheduleAnalytics::default().rolling_average_coverage(&[]), 0.0);
    }

    #[test]
    fn test_trainset_declining() {
        let history = vec![
            schedule(1, 90, &["A"], &[], &[]),
            schedule(2, 90, &[], &[], &["A"]),
            schedule(3, 90, &[], &[], &["A"]),
        ];
        let a = ScheduleAnalytics::default().trainset("A", &history);
        assert_eq!(a.appearances.induction, 1);
        assert_eq!(a.appearances.maintenance, 2);
        assert_eq!(a.trend, TrendLabel::Declining);
        assert_eq!(a.average_score, 40.0);
    }

    #[test]
    fn test_trainset_improving_and_stable() {
        let history = vec![
            schedule(1, 90, &["A"], &["B"], &[]),
            schedule(2, 90, &["A"], &["B"], &[]),
        ];
        let analytics = ScheduleAnalytics::default();
        assert_eq!(analytics.trainset("A", &history).trend, TrendLabel::Improving);
        assert_eq!(analytics.trainset("B", &history).trend, TrendLabel::Stable);

        let ghost = analytics.trainset("Z", &history);
        assert_eq!(ghost.appearances.total(), 0);
        assert_eq!(ghost.average_score, 0.0);
        assert_eq!(ghost.trend, TrendLabel::Stable);
    }

    #[test]
    fn test_fleet_summary_window() {
        let history = vec![
            schedule(1, 80, &[], &[], &[]),
            schedule(2, 100, &[], &[], &["A", "B", "C", "D"]),
            schedule(5, 50, &[], &[], &[]),
        ];
        let summary = ScheduleAnalytics::default().fleet_summary(
            &history,
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
        );
        assert_eq!(summary.schedules, 2);
        assert_eq!(summary.average_coverage, 90.0);
        assert_eq!(summary.min_coverage, Some(80));
        assert_eq!(summary.max_coverage, Some(100));
        assert_eq!(summary.maintenance_over_limit_days, 1);
    }
}
