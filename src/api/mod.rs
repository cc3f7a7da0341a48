// ==========================================
// 车队投运决策系统 - API 层
// ==========================================
// 职责: 对外提供传输无关的业务接口
// ==========================================

pub mod error;
pub mod fleet_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use fleet_api::FleetApi;
