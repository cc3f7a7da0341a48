// ==========================================
// 车队投运决策系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 排程历史与准入结果的持久化;外部车队数据源接口
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod fleet_source;
pub mod fleet_source_memory;
pub mod readiness_repo;
pub mod schedule_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use fleet_source::{DataSourceError, FleetDataSource, RecordKind};
pub use fleet_source_memory::InMemoryFleetSource;
pub use readiness_repo::{ReadinessRecord, ReadinessRepository};
pub use schedule_repo::{ScheduleRepository, ScheduleSaveOutcome};
