// ==========================================
// 车队投运决策系统 - 领域类型定义
// ==========================================
// 职责: 车辆状态、证书状态、工单优先级、准入状态等枚举
// 序列化格式: snake_case (与存储/外部接口一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 车辆当前状态 (Vehicle Status)
// ==========================================
// 由检修后准入判定回写,作为下一轮评分的输入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Ready,       // 可投运
    Standby,     // 备用
    Maintenance, // 检修中
    Critical,    // 严重故障
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleStatus::Ready => write!(f, "ready"),
            VehicleStatus::Standby => write!(f, "standby"),
            VehicleStatus::Maintenance => write!(f, "maintenance"),
            VehicleStatus::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ready" => Ok(VehicleStatus::Ready),
            "standby" => Ok(VehicleStatus::Standby),
            "maintenance" => Ok(VehicleStatus::Maintenance),
            "critical" => Ok(VehicleStatus::Critical),
            other => Err(format!("未知车辆状态: {}", other)),
        }
    }
}

// ==========================================
// 适航证书类型 (Certificate Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateType {
    RollingStock, // 车辆本体
    Signalling,   // 信号
    Telecom,      // 通信
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateType::RollingStock => write!(f, "rolling_stock"),
            CertificateType::Signalling => write!(f, "signalling"),
            CertificateType::Telecom => write!(f, "telecom"),
        }
    }
}

// ==========================================
// 证书派生状态 (Certificate Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    Active,   // 有效
    Expiring, // 即将到期
    Expired,  // 已过期
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateStatus::Active => write!(f, "active"),
            CertificateStatus::Expiring => write!(f, "expiring"),
            CertificateStatus::Expired => write!(f, "expired"),
        }
    }
}

// ==========================================
// 工单状态 / 优先级 (Job Card)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCardStatus {
    Open,
    InProgress,
    Closed,
}

impl JobCardStatus {
    /// 是否仍占用检修负荷 (open / in_progress)
    pub fn is_open(&self) -> bool {
        matches!(self, JobCardStatus::Open | JobCardStatus::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPriority {
    Normal,
    High,
    Emergency,
}

impl fmt::Display for JobPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobPriority::Normal => write!(f, "normal"),
            JobPriority::High => write!(f, "high"),
            JobPriority::Emergency => write!(f, "emergency"),
        }
    }
}

// ==========================================
// 广告投放优先级 (Branding Campaign Priority)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignPriority {
    Normal,
    High,
    Critical,
}

// ==========================================
// 清洗记录状态 (Cleaning Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStatus {
    Scheduled,
    Completed,
    Cancelled,
}

// ==========================================
// 检修后准入状态 (Readiness Status)
// ==========================================
// 判定顺序: ready → dropout → testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,   // 可回归运营
    Dropout, // 退出,需重新检修
    Testing, // 观察测试
}

impl ReadinessStatus {
    /// 回写到车辆当前状态(下一轮评分输入)
    pub fn to_vehicle_status(&self) -> VehicleStatus {
        match self {
            ReadinessStatus::Ready => VehicleStatus::Ready,
            ReadinessStatus::Dropout => VehicleStatus::Critical,
            ReadinessStatus::Testing => VehicleStatus::Standby,
        }
    }
}

impl fmt::Display for ReadinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessStatus::Ready => write!(f, "ready"),
            ReadinessStatus::Dropout => write!(f, "dropout"),
            ReadinessStatus::Testing => write!(f, "testing"),
        }
    }
}

impl FromStr for ReadinessStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ready" => Ok(ReadinessStatus::Ready),
            "dropout" => Ok(ReadinessStatus::Dropout),
            "testing" => Ok(ReadinessStatus::Testing),
            other => Err(format!("未知准入状态: {}", other)),
        }
    }
}

// ==========================================
// 告警类型 (Alert Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Success,
    Critical,
    Warning,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertType::Success => write!(f, "success"),
            AlertType::Critical => write!(f, "critical"),
            AlertType::Warning => write!(f, "warning"),
        }
    }
}

// ==========================================
// 排程清单 (Schedule List)
// ==========================================
// Unallocated: 合格但超出 投运+备用 容量的车辆(显式上报)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleList {
    Induction,
    Standby,
    Maintenance,
    Unallocated,
}

impl fmt::Display for ScheduleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleList::Induction => write!(f, "induction"),
            ScheduleList::Standby => write!(f, "standby"),
            ScheduleList::Maintenance => write!(f, "maintenance"),
            ScheduleList::Unallocated => write!(f, "unallocated"),
        }
    }
}

// ==========================================
// 车辆趋势 (Trend Label)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Improving,
    Stable,
    Declining,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendLabel::Improving => write!(f, "improving"),
            TrendLabel::Stable => write!(f, "stable"),
            TrendLabel::Declining => write!(f, "declining"),
        }
    }
}

// ==========================================
// 场景影响等级 (Performance Impact)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceImpact {
    Improved,
    Neutral,
    MinorDegradation,
    MajorDegradation,
}

impl fmt::Display for PerformanceImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerformanceImpact::Improved => write!(f, "improved"),
            PerformanceImpact::Neutral => write!(f, "neutral"),
            PerformanceImpact::MinorDegradation => write!(f, "minor_degradation"),
            PerformanceImpact::MajorDegradation => write!(f, "major_degradation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_status_round_trip_str() {
        for status in [
            VehicleStatus::Ready,
            VehicleStatus::Standby,
            VehicleStatus::Maintenance,
            VehicleStatus::Critical,
        ] {
            assert_eq!(status.to_string().parse::<VehicleStatus>(), Ok(status));
        }
        assert!("broken".parse::<VehicleStatus>().is_err());
    }

    #[test]
    fn test_job_card_open_states() {
        assert!(JobCardStatus::Open.is_open());
        assert!(JobCardStatus::InProgress.is_open());
        assert!(!JobCardStatus::Closed.is_open());
    }

    #[test]
    fn test_readiness_feeds_vehicle_status() {
        assert_eq!(ReadinessStatus::Ready.to_vehicle_status(), VehicleStatus::Ready);
        assert_eq!(ReadinessStatus::Dropout.to_vehicle_status(), VehicleStatus::Critical);
        assert_eq!(ReadinessStatus::Testing.to_vehicle_status(), VehicleStatus::Standby);
    }
}
