// ==========================================
// 车队投运决策系统 - 内存车队数据源
// ==========================================
// 用途: 调用方已在别处取得的快照直接注入引擎;测试注入故障
// ==========================================

use crate::domain::readiness::ReadinessResult;
use crate::domain::types::VehicleStatus;
use crate::domain::vehicle::{
    BrandingCampaignRecord, CertificateRecord, CleaningRecord, JobCardRecord, StablingRecord,
    VehicleRecords, VehicleSnapshot,
};
use crate::repository::fleet_source::{DataSourceError, FleetDataSource, RecordKind};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct FleetState {
    vehicles: Vec<VehicleSnapshot>,
    records: HashMap<String, VehicleRecords>,
    /// 故障注入: (vehicle_id, kind);mileage 故障的 vehicle_id 为空串
    failures: HashSet<(String, RecordKind)>,
    vehicle_list_unavailable: bool,
}

// ==========================================
// InMemoryFleetSource - 内存数据源
// ==========================================
#[derive(Debug, Default)]
pub struct InMemoryFleetSource {
    state: RwLock<FleetState>,
}

impl InMemoryFleetSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, FleetState>, DataSourceError> {
        self.state
            .read()
            .map_err(|e| DataSourceError::LockError(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, FleetState>, DataSourceError> {
        self.state
            .write()
            .map_err(|e| DataSourceError::LockError(e.to_string()))
    }

    /// 新增或替换车辆及其记录(保持首次插入的顺序)
    pub fn upsert_vehicle(
        &self,
        snapshot: VehicleSnapshot,
        records: VehicleRecords,
    ) -> Result<(), DataSourceError> {
        let mut state = self.write()?;
        let id = snapshot.vehicle_id.clone();
        match state.vehicles.iter_mut().find(|v| v.vehicle_id == id) {
            Some(existing) => *existing = snapshot,
            None => state.vehicles.push(snapshot),
        }
        state.records.insert(id, records);
        Ok(())
    }

    /// 更新车辆当前状态
    pub fn set_vehicle_status(&self, vehicle_id: &str, status: VehicleStatus) -> Result<(), DataSourceError> {
        let mut state = self.write()?;
        let vehicle = state
            .vehicles
            .iter_mut()
            .find(|v| v.vehicle_id == vehicle_id)
            .ok_or_else(|| DataSourceError::Unavailable(format!("unknown vehicle {}", vehicle_id)))?;
        vehicle.status = status;
        Ok(())
    }

    /// 检修完工回写: 按准入结果更新车辆状态,供下一轮排程使用
    pub fn apply_readiness(&self, result: &ReadinessResult) -> Result<(), DataSourceError> {
        self.set_vehicle_status(&result.vehicle_id, result.status.to_vehicle_status())
    }

    /// 注入故障: 指定车辆的某类记录加载失败
    pub fn fail_loader(&self, vehicle_id: &str, kind: RecordKind) -> Result<(), DataSourceError> {
        self.write()?.failures.insert((vehicle_id.to_string(), kind));
        Ok(())
    }

    /// 注入故障: 里程表整体不可用
    pub fn fail_mileage(&self) -> Result<(), DataSourceError> {
        self.fail_loader("", RecordKind::Mileage)
    }

    /// 注入故障: 车辆清单不可用
    pub fn fail_vehicle_list(&self) -> Result<(), DataSourceError> {
        self.write()?.vehicle_list_unavailable = true;
        Ok(())
    }

    pub fn clear_failures(&self) -> Result<(), DataSourceError> {
        let mut state = self.write()?;
        state.failures.clear();
        state.vehicle_list_unavailable = false;
        Ok(())
    }

    /// 读取单车记录的一个切片,命中故障注入时返回 LoadFailed
    fn load<T>(
        &self,
        vehicle_id: &str,
        kind: RecordKind,
        pick: impl FnOnce(&VehicleRecords) -> T,
    ) -> Result<T, DataSourceError>
    where
        T: Default,
    {
        let state = self.read()?;
        if state.failures.contains(&(vehicle_id.to_string(), kind)) {
            return Err(DataSourceError::LoadFailed {
                kind,
                vehicle_id: vehicle_id.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(state.records.get(vehicle_id).map(pick).unwrap_or_default())
    }
}

#[async_trait]
impl FleetDataSource for InMemoryFleetSource {
    async fn list_vehicles(&self) -> Result<Vec<VehicleSnapshot>, DataSourceError> {
        let state = self.read()?;
        if state.vehicle_list_unavailable {
            return Err(DataSourceError::Unavailable("vehicle list".to_string()));
        }
        Ok(state.vehicles.clone())
    }

    async fn load_certificates(&self, vehicle_id: &str) -> Result<Vec<CertificateRecord>, DataSourceError> {
        self.load(vehicle_id, RecordKind::Certificates, |r| r.certificates.clone())
    }

    async fn load_job_cards(&self, vehicle_id: &str) -> Result<Vec<JobCardRecord>, DataSourceError> {
        self.load(vehicle_id, RecordKind::JobCards, |r| r.job_cards.clone())
    }

    async fn load_campaigns(&self, vehicle_id: &str) -> Result<Vec<BrandingCampaignRecord>, DataSourceError> {
        self.load(vehicle_id, RecordKind::Campaigns, |r| r.campaigns.clone())
    }

    async fn load_cleaning(&self, vehicle_id: &str) -> Result<Vec<CleaningRecord>, DataSourceError> {
        self.load(vehicle_id, RecordKind::Cleaning, |r| r.cleaning.clone())
    }

    async fn load_stabling(&self, vehicle_id: &str) -> Result<Option<StablingRecord>, DataSourceError> {
        self.load(vehicle_id, RecordKind::Stabling, |r| r.stabling.clone())
    }

    async fn load_mileage(&self) -> Result<HashMap<String, f64>, DataSourceError> {
        let state = self.read()?;
        if state.failures.contains(&(String::new(), RecordKind::Mileage)) {
            return Err(DataSourceError::LoadFailed {
                kind: RecordKind::Mileage,
                vehicle_id: String::new(),
                message: "injected failure".to_string(),
            });
        }
        Ok(state
            .records
            .iter()
            .filter_map(|(id, r)| r.mileage_km.map(|km| (id.clone(), km)))
            .collect())
    }
}
