// ==========================================
// 车队投运决策系统 - 排程实体
// ==========================================
// 职责: 排程 (Schedule) 及其约束、条目、汇总
// 红线: 历史排程只追加,不修改
// ==========================================

use crate::domain::types::ScheduleList;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ScheduleConstraints - 容量约束
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConstraints {
    /// 目标投运数量
    pub required_trainsets: u32,
    /// 备用上限
    pub max_standby: u32,
    /// 检修上限 (仅提示,不作为硬约束)
    pub max_maintenance: u32,
}

impl Default for ScheduleConstraints {
    fn default() -> Self {
        Self {
            required_trainsets: 20,
            max_standby: 5,
            max_maintenance: 3,
        }
    }
}

impl ScheduleConstraints {
    /// 三项之和,超出 u32 时饱和
    pub fn total(&self) -> u32 {
        self.required_trainsets
            .saturating_add(self.max_standby)
            .saturating_add(self.max_maintenance)
    }
}

// ==========================================
// ConstraintValidation - 约束校验结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

// ==========================================
// ScheduleEntry - 排程条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub vehicle_id: String,
    pub score: f64,
    pub reasoning: Vec<String>,
}

// ==========================================
// ScheduleSummary - 排程汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_vehicles: usize,
    pub total_eligible: usize,
    pub requested: u32,
    pub inducted: usize,
    pub standby: usize,
    pub maintenance: usize,
    pub unallocated: usize,
    /// round(inducted / requested × 100)
    pub coverage: u32,
    /// 检修数超出 max_maintenance (提示)
    pub maintenance_over_limit: bool,
}

// ==========================================
// Schedule - 排程
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub schedule_id: String,
    pub target_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub induction: Vec<ScheduleEntry>,
    pub standby: Vec<ScheduleEntry>,
    pub maintenance: Vec<ScheduleEntry>,
    pub unallocated: Vec<ScheduleEntry>,
    pub summary: ScheduleSummary,
    pub constraints: ScheduleConstraints,
    /// 约束软校验警告
    #[serde(default)]
    pub warnings: Vec<String>,
    /// 是否为场景模拟结果(模拟结果不落库)
    #[serde(default)]
    pub is_simulation: bool,
}

impl Schedule {
    /// 查找车辆所在清单
    pub fn list_of(&self, vehicle_id: &str) -> Option<ScheduleList> {
        self.lists()
            .into_iter()
            .find(|(_, entries)| entries.iter().any(|e| e.vehicle_id == vehicle_id))
            .map(|(list, _)| list)
    }

    /// 查找车辆条目
    pub fn entry_of(&self, vehicle_id: &str) -> Option<&ScheduleEntry> {
        self.lists()
            .into_iter()
            .flat_map(|(_, entries)| entries.iter())
            .find(|e| e.vehicle_id == vehicle_id)
    }

    /// 四个清单(固定顺序)
    pub fn lists(&self) -> [(ScheduleList, &Vec<ScheduleEntry>); 4] {
        [
            (ScheduleList::Induction, &self.induction),
            (ScheduleList::Standby, &self.standby),
            (ScheduleList::Maintenance, &self.maintenance),
            (ScheduleList::Unallocated, &self.unallocated),
        ]
    }

    pub fn vehicle_ids(&self, list: ScheduleList) -> Vec<&str> {
        let entries = match list {
            ScheduleList::Induction => &self.induction,
            ScheduleList::Standby => &self.standby,
            ScheduleList::Maintenance => &self.maintenance,
            ScheduleList::Unallocated => &self.unallocated,
        };
        entries.iter().map(|e| e.vehicle_id.as_str()).collect()
    }
}
