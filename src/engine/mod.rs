// ==========================================
// 车队投运决策系统 - 引擎层
// ==========================================
// 职责: 评分/合格性/分配/准入/模拟/分析 规则引擎
// 红线: Engine 不拼 SQL, 所有判定必须输出可解释的 issue / reasoning
// ==========================================

pub mod aggregator;
pub mod allocator;
pub mod analytics;
pub mod constraint_validator;
pub mod orchestrator;
pub mod readiness;
pub mod score_functions;
pub mod simulator;

// 重导出核心引擎
pub use aggregator::{ScoreAggregator, ScoreContext};
pub use allocator::{Allocation, InductionAllocator};
pub use analytics::{FleetAnalyticsSummary, ListAppearances, ScheduleAnalytics, TrainsetAnalytics};
pub use constraint_validator::ConstraintValidator;
pub use orchestrator::InductionOrchestrator;
pub use readiness::ReadinessClassifier;
pub use score_functions::{ScoreFunctions, NEUTRAL_SCORE, NO_CLEANING_SCORE};
pub use simulator::{
    ImpactSummary, ListChange, ScenarioOverrides, ScenarioSimulator, SignalOverride,
    SimulationResult,
};
