// ==========================================
// 车队投运决策系统 - 投运排程 API
// ==========================================
// 职责: 排程生成/查询、场景模拟、约束校验、检修后准入、历史分析
// 依赖: FleetDataSource(外部协作数据) + ScheduleRepository + ReadinessRepository
// ==========================================
// 错误分类:
// - 输入错误: InvalidInput / MissingInput / ConstraintViolation (生成中止)
// - 数据缺口: 引擎内部降级为 issue,不抛错
// - PersistenceFailure: 排程未落库时不返回该排程
// - Conflict: 同一日期存在更新的正式排程
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, EngineConfig};
use crate::domain::readiness::{PerformanceParameters, ReadinessResult};
use crate::domain::schedule::{ConstraintValidation, Schedule, ScheduleConstraints};
use crate::engine::{
    ConstraintValidator, FleetAnalyticsSummary, InductionOrchestrator, ReadinessClassifier,
    ScenarioOverrides, ScheduleAnalytics, SimulationResult, TrainsetAnalytics,
};
use crate::repository::{
    FleetDataSource, ReadinessRecord, ReadinessRepository, ScheduleRepository,
};

// ==========================================
// FleetApi - 投运排程 API
// ==========================================
pub struct FleetApi {
    source: Arc<dyn FleetDataSource>,
    schedule_repo: Arc<ScheduleRepository>,
    readiness_repo: Arc<ReadinessRepository>,
    config_manager: Arc<ConfigManager>,
}

impl FleetApi {
    /// 创建新的FleetApi实例
    pub fn new(
        source: Arc<dyn FleetDataSource>,
        schedule_repo: Arc<ScheduleRepository>,
        readiness_repo: Arc<ReadinessRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            source,
            schedule_repo,
            readiness_repo,
            config_manager,
        }
    }

    fn engine_config(&self) -> ApiResult<EngineConfig> {
        Ok(self.config_manager.load_engine_config()?)
    }

    /// 解析日期 (YYYY-MM-DD)
    pub fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|e| ApiError::InvalidInput(format!("日期格式错误 '{}': {}", raw, e)))
    }

    // ==========================================
    // 约束校验
    // ==========================================

    /// 校验约束 (不修改约束)
    pub fn validate_constraints(&self, constraints: &ScheduleConstraints) -> ApiResult<ConstraintValidation> {
        let config = self.engine_config()?;
        Ok(ConstraintValidator::new(config.constraint_policy).validate(constraints))
    }

    /// 解析有效约束并执行校验
    ///
    /// # 返回
    /// - Ok((约束, 警告)): 校验通过
    /// - Err(ConstraintViolation): 存在硬错误
    fn resolve_constraints(
        config: &EngineConfig,
        constraints: Option<ScheduleConstraints>,
    ) -> ApiResult<(ScheduleConstraints, Vec<String>)> {
        let constraints = constraints.unwrap_or(config.default_constraints);
        let validation = ConstraintValidator::new(config.constraint_policy).validate(&constraints);
        if !validation.valid {
            warn!(errors = ?validation.errors, "约束校验失败,生成中止");
            return Err(ApiError::ConstraintViolation {
                errors: validation.errors,
            });
        }
        for w in &validation.warnings {
            warn!(warning = %w, "约束软校验警告");
        }
        Ok((constraints, validation.warnings))
    }

    // ==========================================
    // 排程生成 / 查询
    // ==========================================

    /// 生成目标日期的排程并落库为正式排程
    ///
    /// # 参数
    /// - target_date: 目标日期
    /// - constraints: 容量约束 (None 时使用配置默认值)
    ///
    /// # 返回
    /// - Err(MissingInput): 数据源未提供任何车辆
    /// - Err(ConstraintViolation): 约束越过硬边界
    /// - Err(Conflict): 同一日期已有更新的正式排程
    /// - Err(PersistenceFailure): 排程未能落库
    #[instrument(skip(self))]
    pub async fn generate_schedule(
        &self,
        target_date: NaiveDate,
        constraints: Option<ScheduleConstraints>,
    ) -> ApiResult<Schedule> {
        let config = self.engine_config()?;
        let (constraints, warnings) = Self::resolve_constraints(&config, constraints)?;

        let orchestrator = InductionOrchestrator::new(self.source.clone(), &config);
        let snapshot = orchestrator.load_snapshot(target_date).await?;
        if snapshot.vehicles.is_empty() {
            return Err(ApiError::MissingInput(format!(
                "数据源未提供任何车辆 (target_date={})",
                target_date
            )));
        }

        let generated_at = self.next_generated_at(target_date)?;
        let schedule = orchestrator.plan(&snapshot, constraints, warnings, generated_at);
        let outcome = self.schedule_repo.save(&schedule)?;

        info!(
            schedule_id = %outcome.schedule_id,
            target_date = %target_date,
            revision = outcome.revision,
            replaced = ?outcome.replaced_schedule_id,
            "正式排程已更新"
        );
        Ok(schedule)
    }

    /// 生成时间: 当前时间,且严格晚于该日期现有正式排程
    ///
    /// 并发写入仍由仓储层事务裁决
    fn next_generated_at(&self, target_date: NaiveDate) -> ApiResult<DateTime<Utc>> {
        let now = Utc::now();
        let canonical_us = self.schedule_repo.canonical_generated_at_us(target_date)?;
        match canonical_us {
            Some(us) if now.timestamp_micros() <= us => DateTime::from_timestamp_micros(us + 1)
                .ok_or_else(|| ApiError::InternalError(format!("生成时间越界: {}", us))),
            _ => Ok(now),
        }
    }

    /// 查询目标日期的正式排程
    pub fn get_schedule(&self, target_date: NaiveDate) -> ApiResult<Schedule> {
        self.schedule_repo
            .find_by_date(target_date)?
            .ok_or_else(|| ApiError::NotFound(format!("Schedule(target_date={})不存在", target_date)))
    }

    // ==========================================
    // 场景模拟
    // ==========================================

    /// 场景模拟 (结果不落库,不影响后续生成)
    #[instrument(skip(self, overrides), fields(overridden = overrides.len()))]
    pub async fn simulate_scenario(
        &self,
        target_date: NaiveDate,
        constraints: Option<ScheduleConstraints>,
        overrides: &ScenarioOverrides,
    ) -> ApiResult<SimulationResult> {
        let config = self.engine_config()?;
        let (constraints, warnings) = Self::resolve_constraints(&config, constraints)?;

        let orchestrator = InductionOrchestrator::new(self.source.clone(), &config);
        let snapshot = orchestrator.load_snapshot(target_date).await?;
        if snapshot.vehicles.is_empty() {
            return Err(ApiError::MissingInput(format!(
                "数据源未提供任何车辆 (target_date={})",
                target_date
            )));
        }

        Ok(orchestrator.simulate(&snapshot, constraints, overrides, warnings, Utc::now()))
    }

    // ==========================================
    // 检修后准入
    // ==========================================

    /// 检修后准入评估并按检修会话落库
    ///
    /// # 参数
    /// - session_id: 检修会话ID(同一会话只评估一次)
    /// - vehicle_id: 车辆编号
    /// - after: 检修后性能参数
    /// - before: 检修前性能参数(可选)
    ///
    /// # 返回
    /// - Err(InvalidInput): 编号为空或参数非有限数
    /// - Err(Conflict): 该会话已有评估结果
    pub fn assess_readiness(
        &self,
        session_id: &str,
        vehicle_id: &str,
        after: PerformanceParameters,
        before: Option<PerformanceParameters>,
    ) -> ApiResult<ReadinessResult> {
        if session_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("session_id 不能为空".to_string()));
        }
        if vehicle_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("vehicle_id 不能为空".to_string()));
        }
        check_finite("after", &after)?;
        if let Some(b) = &before {
            check_finite("before", b)?;
        }

        let config = self.engine_config()?;
        let classifier = ReadinessClassifier::from_config(&config);
        let result = classifier.assess(vehicle_id, &after, before.as_ref(), Utc::now());

        self.readiness_repo.save(&ReadinessRecord {
            session_id: session_id.to_string(),
            before,
            after,
            result: result.clone(),
        })?;

        Ok(result)
    }

    /// 查询检修会话的准入结果
    pub fn get_readiness(&self, session_id: &str) -> ApiResult<ReadinessRecord> {
        self.readiness_repo
            .find_by_session(session_id)?
            .ok_or_else(|| ApiError::NotFound(format!("ReadinessAssessment(session_id={})不存在", session_id)))
    }

    /// 车辆准入历史 (最新在前)
    pub fn list_readiness(&self, vehicle_id: &str) -> ApiResult<Vec<ReadinessRecord>> {
        Ok(self.readiness_repo.list_by_vehicle(vehicle_id)?)
    }

    // ==========================================
    // 历史分析
    // ==========================================

    fn analytics(&self) -> ApiResult<ScheduleAnalytics> {
        Ok(ScheduleAnalytics::new(self.engine_config()?.analytics_window))
    }

    /// 单车分析 (最近 analytics_window 份正式排程)
    pub fn get_trainset_analytics(&self, vehicle_id: &str) -> ApiResult<TrainsetAnalytics> {
        let analytics = self.analytics()?;
        let history = self.schedule_repo.list_recent(analytics.window())?;
        Ok(analytics.trainset(vehicle_id, &history))
    }

    /// 滚动平均覆盖率
    pub fn get_rolling_coverage(&self) -> ApiResult<f64> {
        let analytics = self.analytics()?;
        let history = self.schedule_repo.list_recent(analytics.window())?;
        Ok(analytics.rolling_average_coverage(&history))
    }

    /// 时间窗内车队汇总
    pub fn get_fleet_summary(&self, start: NaiveDate, end: NaiveDate) -> ApiResult<FleetAnalyticsSummary> {
        if start > end {
            return Err(ApiError::InvalidInput(format!(
                "时间窗起点晚于终点: {} > {}",
                start, end
            )));
        }
        let history = self.schedule_repo.list_between(start, end)?;
        Ok(self.analytics()?.fleet_summary(&history, start, end))
    }
}

fn check_finite(label: &str, p: &PerformanceParameters) -> ApiResult<()> {
    let values = [
        p.braking_efficiency,
        p.door_operation,
        p.traction_motor,
        p.hvac_status,
        p.signal_communication,
        p.battery_health,
    ];
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!("{} 性能参数包含非有限数值", label)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            FleetApi::parse_date("2026-05-01").unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
        );
        assert!(matches!(FleetApi::parse_date("05/01/2026"), Err(ApiError::InvalidInput(_))));
        assert!(matches!(FleetApi::parse_date(""), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_check_finite() {
        let mut p = PerformanceParameters {
            braking_efficiency: 90.0,
            door_operation: 90.0,
            traction_motor: 90.0,
            hvac_status: 90.0,
            signal_communication: 90.0,
            battery_health: 90.0,
        };
        assert!(check_finite("after", &p).is_ok());
        p.hvac_status = f64::NAN;
        assert!(check_finite("after", &p).is_err());
    }
}
