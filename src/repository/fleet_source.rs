// ==========================================
// 车队投运决策系统 - 车队数据源 Trait
// ==========================================
// 职责: 定义外部协作数据存储的读取接口(不含业务逻辑)
// 实现者: InMemoryFleetSource / 调用方自有数据存储
// ==========================================
// 约定:
// - 缺失的记录数组视为空,不视为错误
// - 单车单类记录加载失败由引擎降级为 DataGap,不中断整次排程
// ==========================================

use crate::domain::vehicle::{
    BrandingCampaignRecord, CertificateRecord, CleaningRecord, JobCardRecord, StablingRecord,
    VehicleSnapshot,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

// ==========================================
// RecordKind - 记录类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Certificates,
    JobCards,
    Campaigns,
    Cleaning,
    Stabling,
    Mileage,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Certificates => write!(f, "certificate"),
            RecordKind::JobCards => write!(f, "job_card"),
            RecordKind::Campaigns => write!(f, "branding_campaign"),
            RecordKind::Cleaning => write!(f, "cleaning"),
            RecordKind::Stabling => write!(f, "stabling"),
            RecordKind::Mileage => write!(f, "mileage"),
        }
    }
}

// ==========================================
// DataSourceError - 数据源错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataSourceError {
    #[error("数据源不可用: {0}")]
    Unavailable(String),

    #[error("{kind} 记录加载失败 (vehicle_id={vehicle_id}): {message}")]
    LoadFailed {
        kind: RecordKind,
        vehicle_id: String,
        message: String,
    },

    #[error("数据源锁获取失败: {0}")]
    LockError(String),
}

// ==========================================
// FleetDataSource Trait
// ==========================================
#[async_trait]
pub trait FleetDataSource: Send + Sync {
    /// 车辆清单(含当前状态)
    ///
    /// # 返回
    /// - Err: 清单不可用时整次生成失败
    async fn list_vehicles(&self) -> Result<Vec<VehicleSnapshot>, DataSourceError>;

    /// 车辆证书
    async fn load_certificates(&self, vehicle_id: &str) -> Result<Vec<CertificateRecord>, DataSourceError>;

    /// 车辆作业卡
    async fn load_job_cards(&self, vehicle_id: &str) -> Result<Vec<JobCardRecord>, DataSourceError>;

    /// 车辆品牌广告合同
    async fn load_campaigns(&self, vehicle_id: &str) -> Result<Vec<BrandingCampaignRecord>, DataSourceError>;

    /// 车辆清洗记录
    async fn load_cleaning(&self, vehicle_id: &str) -> Result<Vec<CleaningRecord>, DataSourceError>;

    /// 车辆当前停放股道(无分配时为 None)
    async fn load_stabling(&self, vehicle_id: &str) -> Result<Option<StablingRecord>, DataSourceError>;

    /// 全车队累计里程表 (vehicle_id → km)
    async fn load_mileage(&self) -> Result<HashMap<String, f64>, DataSourceError>;
}
