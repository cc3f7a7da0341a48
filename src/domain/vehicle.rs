// ==========================================
// 车队投运决策系统 - 车辆快照与运营记录
// ==========================================
// 职责: 评分输入的只读快照 (由外部数据源提供)
// 红线: 评分过程不修改任何记录
// ==========================================

use crate::domain::types::{
    CampaignPriority, CertificateStatus, CertificateType, CleaningStatus, JobCardStatus,
    JobPriority, VehicleStatus,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// VehicleSnapshot - 车辆快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub vehicle_id: String,
    pub status: VehicleStatus,
    pub home_depot: String,
    /// 里程基准 (km),仅用于展示,评分使用车队里程表
    pub mileage_baseline_km: f64,
}

impl VehicleSnapshot {
    pub fn new(vehicle_id: &str, status: VehicleStatus, home_depot: &str) -> Self {
        Self {
            vehicle_id: vehicle_id.to_string(),
            status,
            home_depot: home_depot.to_string(),
            mileage_baseline_km: 0.0,
        }
    }
}

// ==========================================
// CertificateRecord - 适航证书
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub vehicle_id: String,
    pub certificate_type: CertificateType,
    pub valid_to: NaiveDate,
}

impl CertificateRecord {
    /// 相对目标日期的剩余有效天数(可为负)
    pub fn days_to_expiry(&self, target_date: NaiveDate) -> i64 {
        self.valid_to.signed_duration_since(target_date).num_days()
    }

    /// 派生证书状态
    ///
    /// # 规则
    /// - 剩余天数 < 0 → Expired
    /// - 剩余天数 < expiring_window_days → Expiring
    /// - 否则 → Active
    pub fn derive_status(&self, target_date: NaiveDate, expiring_window_days: i64) -> CertificateStatus {
        let days = self.days_to_expiry(target_date);
        if days < 0 {
            CertificateStatus::Expired
        } else if days < expiring_window_days {
            CertificateStatus::Expiring
        } else {
            CertificateStatus::Active
        }
    }
}

// ==========================================
// JobCardRecord - 检修工单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCardRecord {
    pub vehicle_id: String,
    pub status: JobCardStatus,
    pub priority: JobPriority,
}

// ==========================================
// BrandingCampaignRecord - 车身广告投放
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandingCampaignRecord {
    pub vehicle_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub priority: CampaignPriority,
    pub target_exposure_hours: f64,
    pub achieved_exposure_hours: f64,
}

impl BrandingCampaignRecord {
    /// 目标日期是否处于投放窗口内(含首尾)
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// 曝光完成率; 目标为 0 时视为已完成
    pub fn exposure_ratio(&self) -> f64 {
        if self.target_exposure_hours <= 0.0 {
            return f64::INFINITY;
        }
        self.achieved_exposure_hours / self.target_exposure_hours
    }
}

// ==========================================
// CleaningRecord - 清洗记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningRecord {
    pub vehicle_id: String,
    pub scheduled_at: NaiveDateTime,
    pub status: CleaningStatus,
}

// ==========================================
// StablingRecord - 停放股道
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StablingRecord {
    pub vehicle_id: String,
    pub occupied: bool,
    pub position_order: u32,
    pub depot: String,
}

// ==========================================
// VehicleRecords - 单车全部运营记录
// ==========================================
// 缺失的数组视为空,而非错误
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecords {
    #[serde(default)]
    pub certificates: Vec<CertificateRecord>,
    #[serde(default)]
    pub job_cards: Vec<JobCardRecord>,
    #[serde(default)]
    pub campaigns: Vec<BrandingCampaignRecord>,
    #[serde(default)]
    pub cleaning: Vec<CleaningRecord>,
    #[serde(default)]
    pub stabling: Option<StablingRecord>,
    /// 累计里程 (km)
    #[serde(default)]
    pub mileage_km: Option<f64>,
}

// ==========================================
// VehicleInputs - 单车评分输入
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleInputs {
    pub snapshot: VehicleSnapshot,
    pub records: VehicleRecords,
    /// 数据缺口 (DataGap) 说明,加载失败时写入
    #[serde(default)]
    pub data_gaps: Vec<String>,
}

// ==========================================
// FleetSnapshot - 单次评分的车队一致性快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub target_date: NaiveDate,
    pub vehicles: Vec<VehicleInputs>,
}

impl FleetSnapshot {
    /// 车队平均累计里程(仅统计有里程记录的车辆)
    pub fn fleet_average_mileage(&self) -> Option<f64> {
        let values: Vec<f64> = self
            .vehicles
            .iter()
            .filter_map(|v| v.records.mileage_km)
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
