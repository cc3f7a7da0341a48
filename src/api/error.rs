// ==========================================
// 车队投运决策系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把仓储/数据源错误转换为调用方可处理的错误
// 分类: InputError / DataGap(引擎内部降级,不出现在此) / PersistenceFailure / ConflictError
// ==========================================

use crate::repository::error::RepositoryError;
use crate::repository::fleet_source::DataSourceError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误 (InputError)
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("缺少输入: {0}")]
    MissingInput(String),

    /// 约束越过硬边界,生成中止
    #[error("约束校验失败: {}", errors.join("; "))]
    ConstraintViolation { errors: Vec<String> },

    // ==========================================
    // 查询错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 并发控制错误 (ConflictError)
    // ==========================================
    #[error("写入冲突: {0}")]
    Conflict(String),

    // ==========================================
    // 持久化错误 (PersistenceFailure)
    // ==========================================
    #[error("持久化失败: {0}")]
    PersistenceFailure(String),

    // ==========================================
    // 外部数据源错误
    // ==========================================
    #[error("数据源错误: {0}")]
    DataSourceError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ScheduleConflict {
                target_date,
                canonical,
                incoming,
            } => ApiError::Conflict(format!(
                "目标日期{}已有更新的排程（canonical={}，incoming={}）",
                target_date, canonical, incoming
            )),
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::Conflict(msg),
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::PersistenceFailure(other.to_string()),
        }
    }
}

impl From<DataSourceError> for ApiError {
    fn from(err: DataSourceError) -> Self {
        ApiError::DataSourceError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
