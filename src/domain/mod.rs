// ==========================================
// 车队投运决策系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、值对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod readiness;
pub mod schedule;
pub mod score;
pub mod types;
pub mod vehicle;

// 重导出核心类型
pub use readiness::{PerformanceParameters, ReadinessAlert, ReadinessResult};
pub use schedule::{
    ConstraintValidation, Schedule, ScheduleConstraints, ScheduleEntry, ScheduleSummary,
};
pub use score::{ScoreResult, ScoreSignal, SubScores};
pub use types::{
    AlertType, CampaignPriority, CertificateStatus, CertificateType, CleaningStatus,
    JobCardStatus, JobPriority, PerformanceImpact, ReadinessStatus, ScheduleList, TrendLabel,
    VehicleStatus,
};
pub use vehicle::{
    BrandingCampaignRecord, CertificateRecord, CleaningRecord, FleetSnapshot, JobCardRecord,
    StablingRecord, VehicleInputs, VehicleRecords, VehicleSnapshot,
};
