// ==========================================
// 车队投运决策系统 - 引擎编排器
// ==========================================
// 用途: 协调 加载快照 → 评分 → 分配 → 生成排程 的执行顺序
// ==========================================
// 红线:
// - 单次调用只处理一份一致的快照(评分前一次性加载)
// - 单车单类记录加载失败只影响该车该项得分(DataGap),不中断整次生成
// ==========================================

use crate::config::EngineConfig;
use crate::domain::schedule::{Schedule, ScheduleConstraints};
use crate::domain::score::ScoreResult;
use crate::domain::vehicle::{FleetSnapshot, VehicleInputs, VehicleRecords, VehicleSnapshot};
use crate::engine::aggregator::{ScoreAggregator, ScoreContext};
use crate::engine::allocator::InductionAllocator;
use crate::engine::simulator::{ScenarioOverrides, ScenarioSimulator, SimulationResult};
use crate::repository::fleet_source::{DataSourceError, FleetDataSource, RecordKind};
use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ==========================================
// InductionOrchestrator - 投运编排器
// ==========================================
pub struct InductionOrchestrator {
    source: Arc<dyn FleetDataSource>,
    aggregator: ScoreAggregator,
    allocator: InductionAllocator,
}

impl InductionOrchestrator {
    /// 创建编排器
    ///
    /// # 参数
    /// - source: 外部车队数据源
    /// - config: 引擎配置(权重/门槛/首选车场)
    pub fn new(source: Arc<dyn FleetDataSource>, config: &EngineConfig) -> Self {
        Self {
            source,
            aggregator: ScoreAggregator::new(config),
            allocator: InductionAllocator::new(),
        }
    }

    pub fn aggregator(&self) -> &ScoreAggregator {
        &self.aggregator
    }

    /// 加载目标日期的一致性快照
    ///
    /// # 返回
    /// - Err: 车辆清单不可用(无法确定评分范围)
    /// - Ok: 其余加载失败已降级为 data_gaps
    #[instrument(skip(self))]
    pub async fn load_snapshot(&self, target_date: NaiveDate) -> Result<FleetSnapshot, DataSourceError> {
        let vehicles = self.source.list_vehicles().await?;
        let mileage = self.source.load_mileage().await;
        if let Err(e) = &mileage {
            warn!(error = %e, "里程表加载失败,全车队里程得分降级为中性值");
        }

        let mileage = mileage.as_ref();
        let loaded = join_all(
            vehicles
                .into_iter()
                .map(|snapshot| self.load_vehicle(snapshot, mileage)),
        )
        .await;

        let gaps = loaded.iter().filter(|v| !v.data_gaps.is_empty()).count();
        info!(
            target_date = %target_date,
            vehicles = loaded.len(),
            vehicles_with_gaps = gaps,
            "快照加载完成"
        );

        Ok(FleetSnapshot {
            target_date,
            vehicles: loaded,
        })
    }

    /// 并发加载单车全部记录
    async fn load_vehicle(
        &self,
        snapshot: VehicleSnapshot,
        mileage: Result<&HashMap<String, f64>, &DataSourceError>,
    ) -> VehicleInputs {
        let id = snapshot.vehicle_id.as_str();
        let (certificates, job_cards, campaigns, cleaning, stabling) = futures::join!(
            self.source.load_certificates(id),
            self.source.load_job_cards(id),
            self.source.load_campaigns(id),
            self.source.load_cleaning(id),
            self.source.load_stabling(id),
        );

        let mut gaps = Vec::new();
        let records = VehicleRecords {
            certificates: recover(certificates, RecordKind::Certificates, id, &mut gaps),
            job_cards: recover(job_cards, RecordKind::JobCards, id, &mut gaps),
            campaigns: recover(campaigns, RecordKind::Campaigns, id, &mut gaps),
            cleaning: recover(cleaning, RecordKind::Cleaning, id, &mut gaps),
            stabling: recover(stabling, RecordKind::Stabling, id, &mut gaps),
            mileage_km: match mileage {
                Ok(table) => table.get(id).copied(),
                Err(e) => {
                    gaps.push(data_gap(RecordKind::Mileage, e));
                    None
                }
            },
        };

        VehicleInputs {
            snapshot,
            records,
            data_gaps: gaps,
        }
    }

    /// 对快照逐车评分
    pub fn score_snapshot(&self, snapshot: &FleetSnapshot) -> Vec<ScoreResult> {
        let ctx = ScoreContext {
            target_date: snapshot.target_date,
            fleet_average_mileage: snapshot.fleet_average_mileage(),
        };
        let results: Vec<ScoreResult> = snapshot
            .vehicles
            .iter()
            .map(|inputs| self.aggregator.score_vehicle(inputs, &ctx))
            .collect();

        debug!(
            scored = results.len(),
            eligible = results.iter().filter(|r| r.eligible).count(),
            "评分完成"
        );
        results
    }

    /// 快照 → 排程 (纯计算,不落库)
    #[instrument(skip(self, snapshot, warnings), fields(target_date = %snapshot.target_date))]
    pub fn plan(
        &self,
        snapshot: &FleetSnapshot,
        constraints: ScheduleConstraints,
        warnings: Vec<String>,
        generated_at: DateTime<Utc>,
    ) -> Schedule {
        let scores = self.score_snapshot(snapshot);
        let schedule = self
            .allocator
            .allocate(&scores, &constraints)
            .into_schedule(snapshot.target_date, generated_at, constraints, warnings);

        info!(
            schedule_id = %schedule.schedule_id,
            inducted = schedule.summary.inducted,
            standby = schedule.summary.standby,
            maintenance = schedule.summary.maintenance,
            unallocated = schedule.summary.unallocated,
            coverage = schedule.summary.coverage,
            "排程生成完成"
        );
        schedule
    }

    /// 在快照上运行场景模拟
    pub fn simulate(
        &self,
        snapshot: &FleetSnapshot,
        constraints: ScheduleConstraints,
        overrides: &ScenarioOverrides,
        warnings: Vec<String>,
        generated_at: DateTime<Utc>,
    ) -> SimulationResult {
        ScenarioSimulator::new(self.aggregator.clone()).simulate(
            snapshot,
            constraints,
            overrides,
            warnings,
            generated_at,
        )
    }
}

fn data_gap(kind: RecordKind, error: &DataSourceError) -> String {
    format!("DATA_GAP: {} records unavailable ({})", kind, error)
}

/// 加载失败 → 空记录 + DataGap 说明
fn recover<T: Default>(
    result: Result<T, DataSourceError>,
    kind: RecordKind,
    vehicle_id: &str,
    gaps: &mut Vec<String>,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(vehicle_id = %vehicle_id, kind = %kind, error = %e, "记录加载失败,降级为中性默认值");
            gaps.push(data_gap(kind, &e));
            T::default()
        }
    }
}
