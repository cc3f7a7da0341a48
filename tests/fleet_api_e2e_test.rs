// ==========================================
// FleetApi 端到端测试
// ==========================================
// 测试范围:
// 1. 排程生成 / 查询 / 落库
// 2. 输入错误: MissingInput / ConstraintViolation / InvalidInput
// 3. 约束软警告随排程保存
// 4. 数据缺口降级不中断生成
// 5. 场景模拟不落库、不影响后续生成
// ==========================================


use fleet_induction::api::ApiError;
use fleet_induction::domain::schedule::ScheduleConstraints;
use fleet_induction::domain::types::{PerformanceImpact, ScheduleList, VehicleStatus};
use fleet_induction::engine::{ScenarioOverrides, SignalOverride};
use fleet_induction::repository::{InMemoryFleetSource, RecordKind};
use fleet_induction::FleetApi;
use test_helpers::*;

fn constraints(required: u32, standby: u32, maintenance: u32) -> ScheduleConstraints {
    ScheduleConstraints {
        required_trainsets: required,
        max_standby: standby,
        max_maintenance: maintenance,
    }
}

// ==========================================
// 排程生成
// ==========================================

#[tokio::test]
async fn test_generate_schedule_正常生成并落库() {
    println!("\n=== 测试：正常生成排程 ===");
    let source = healthy_fleet(25);
    VehicleBuilder::new("TS-90")
        .status(VehicleStatus::Critical)
        .insert_into(&source);
    let env = FleetTestEnv::new(source).expect("无法创建测试环境");

    let schedule = env
        .api
        .generate_schedule(target_date(), None)
        .await
        .expect("生成失败");

    println!("  投运: {}, 备用: {}, 检修: {}, 未分配: {}",
        schedule.summary.inducted, schedule.summary.standby,
        schedule.summary.maintenance, schedule.summary.unallocated);

    // 默认约束 20/5/3
    assert_eq!(schedule.summary.total_vehicles, 26);
    assert_eq!(schedule.summary.total_eligible, 25);
    assert_eq!(schedule.induction.len(), 20);
    assert_eq!(schedule.standby.len(), 5);
    assert_eq!(schedule.unallocated.len(), 0);
    assert_eq!(schedule.vehicle_ids(ScheduleList::Maintenance), vec!["TS-90"]);
    assert_eq!(schedule.summary.coverage, 100);
    assert!(!schedule.is_simulation);

    // 排名按总分降序
    let scores: Vec<f64> = schedule.induction.iter().map(|e| e.score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    // 检修条目带原因
    assert!(schedule.maintenance[0]
        .reasoning
        .iter()
        .any(|r| r.starts_with("CRITICAL_STATUS")));

    let stored = env.api.get_schedule(target_date()).expect("查询失败");
    assert_eq!(stored.schedule_id, schedule.schedule_id);
    assert_eq!(stored.generated_at, schedule.generated_at);
    assert_eq!(stored.summary, schedule.summary);
    for (list, _) in schedule.lists() {
        assert_eq!(stored.vehicle_ids(list), schedule.vehicle_ids(list));
    }
    println!("✓ 排程生成并落库");
}

#[tokio::test]
async fn test_generate_schedule_覆盖率不足() {
    let env = FleetTestEnv::new(healthy_fleet(18)).expect("无法创建测试环境");

    let schedule = env
        .api
        .generate_schedule(target_date(), Some(constraints(20, 5, 3)))
        .await
        .expect("生成失败");

    assert_eq!(schedule.induction.len(), 18);
    assert!(schedule.standby.is_empty());
    assert_eq!(schedule.summary.coverage, 90);
}

#[tokio::test]
async fn test_generate_schedule_超出容量的合格车辆进入未分配() {
    let env = FleetTestEnv::new(healthy_fleet(25)).expect("无法创建测试环境");

    let schedule = env
        .api
        .generate_schedule(target_date(), Some(constraints(15, 3, 1)))
        .await
        .expect("生成失败");

    assert_eq!(schedule.induction.len(), 15);
    assert_eq!(schedule.standby.len(), 3);
    assert_eq!(schedule.unallocated.len(), 7);
    assert_eq!(schedule.summary.unallocated, 7);
    assert!(schedule.unallocated[0].reasoning[0].starts_with("UNALLOCATED"));
}

// ==========================================
// 输入错误
// ==========================================

#[tokio::test]
async fn test_generate_schedule_无车辆返回MissingInput() {
    let env = FleetTestEnv::new(InMemoryFleetSource::new()).expect("无法创建测试环境");

    let result = env.api.generate_schedule(target_date(), None).await;
    assert!(matches!(result, Err(ApiError::MissingInput(_))));
    assert_eq!(env.schedule_repo.count_history_for_date(target_date()).unwrap(), 0);
}

#[tokio::test]
async fn test_generate_schedule_约束越界中止() {
    let env = FleetTestEnv::new(healthy_fleet(10)).expect("无法创建测试环境");

    let result = env
        .api
        .generate_schedule(target_date(), Some(constraints(26, 5, 3)))
        .await;
    match result {
        Err(ApiError::ConstraintViolation { errors }) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("requiredTrainsets"));
        }
        other => panic!("Expected ConstraintViolation, got {:?}", other),
    }
    assert!(matches!(
        env.api.get_schedule(target_date()),
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_generate_schedule_极端约束值() {
    let env = FleetTestEnv::new(healthy_fleet(20)).expect("无法创建测试环境");

    let result = env
        .api
        .generate_schedule(target_date(), Some(constraints(u32::MAX, u32::MAX, 3)))
        .await;
    assert!(matches!(result, Err(ApiError::ConstraintViolation { .. })));
    assert!(matches!(
        env.api.get_schedule(target_date()),
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_generate_schedule_软警告随排程保存() {
    let env = FleetTestEnv::new(healthy_fleet(10)).expect("无法创建测试环境");

    let schedule = env
        .api
        .generate_schedule(target_date(), Some(constraints(20, 9, 3)))
        .await
        .expect("软警告不应阻断生成");

    // 9 超出备用建议区间; 20 + 9 + 3 = 32 超出建议总量
    assert_eq!(schedule.warnings.len(), 2);
    assert!(schedule.warnings.iter().any(|w| w.contains("maxStandby")));
    assert!(schedule.warnings.iter().any(|w| w.contains("exceeds recommended limit")));
}

#[tokio::test]
async fn test_generate_schedule_车辆清单不可用() {
    let source = healthy_fleet(3);
    source.fail_vehicle_list().unwrap();
    let env = FleetTestEnv::new(source).expect("无法创建测试环境");

    let result = env.api.generate_schedule(target_date(), None).await;
    assert!(matches!(result, Err(ApiError::DataSourceError(_))));
}

#[test]
fn test_validate_constraints_接口() {
    let env = FleetTestEnv::new(InMemoryFleetSource::new()).expect("无法创建测试环境");

    let v = env.api.validate_constraints(&constraints(26, 5, 3)).unwrap();
    assert!(!v.valid);
    assert!(!v.errors.is_empty());

    let v = env.api.validate_constraints(&constraints(20, 9, 1)).unwrap();
    assert!(v.valid);
    assert!(!v.warnings.is_empty());
}

#[test]
fn test_parse_date_非法输入() {
    assert!(matches!(
        FleetApi::parse_date("2026-13-40"),
        Err(ApiError::InvalidInput(_))
    ));
}

// ==========================================
// 数据缺口
// ==========================================

#[tokio::test]
async fn test_generate_schedule_数据缺口降级() {
    let source = healthy_fleet(16);
    source.fail_loader("TS-03", RecordKind::Cleaning).unwrap();
    source.fail_loader("TS-05", RecordKind::Certificates).unwrap();
    let env = FleetTestEnv::new(source).expect("无法创建测试环境");

    let schedule = env
        .api
        .generate_schedule(target_date(), Some(constraints(15, 3, 3)))
        .await
        .expect("数据缺口不应中断生成");

    // 清洗缺口: 中性默认,仍可投运
    let ts03 = schedule.entry_of("TS-03").expect("TS-03 应在排程中");
    assert!(ts03.reasoning.iter().any(|r| r.starts_with("DATA_GAP: cleaning")));
    assert_ne!(schedule.list_of("TS-03"), Some(ScheduleList::Maintenance));

    // 证书缺口: 视为无证书,适航得分 0 → 检修
    assert_eq!(schedule.list_of("TS-05"), Some(ScheduleList::Maintenance));
    let ts05 = schedule.entry_of("TS-05").unwrap();
    assert!(ts05.reasoning.iter().any(|r| r.starts_with("DATA_GAP: certificate")));

    assert_eq!(schedule.summary.total_vehicles, 16);
}

// ==========================================
// 场景模拟
// ==========================================

#[tokio::test]
async fn test_simulate_scenario_不落库且不影响后续生成() {
    println!("\n=== 测试：模拟不落库 ===");
    let env = FleetTestEnv::new(healthy_fleet(20)).expect("无法创建测试环境");

    let mut overrides = ScenarioOverrides::new();
    overrides.insert("TS-01".to_string(), vec![SignalOverride::ForceExpiredCertificate]);
    overrides.insert("TS-02".to_string(), vec![SignalOverride::ForceCriticalStatus]);

    let sim = env
        .api
        .simulate_scenario(target_date(), Some(constraints(20, 3, 3)), &overrides)
        .await
        .expect("模拟失败");

    assert!(sim.schedule.is_simulation);
    assert_eq!(sim.impact.vehicles_overridden, 2);
    assert_eq!(sim.impact.coverage_before, 100);
    assert_eq!(sim.impact.coverage_after, 90);
    assert_eq!(sim.impact.coverage_delta, -10);
    assert_eq!(sim.impact.performance_impact, PerformanceImpact::MinorDegradation);
    assert_eq!(sim.impact.moved_to_maintenance.len(), 2);

    // 模拟不落库
    assert_eq!(env.schedule_repo.count_history_for_date(target_date()).unwrap(), 0);

    // 后续正常生成不受覆盖影响
    let schedule = env
        .api
        .generate_schedule(target_date(), Some(constraints(20, 3, 3)))
        .await
        .expect("生成失败");
    assert_eq!(schedule.list_of("TS-01"), Some(ScheduleList::Induction));
    assert_eq!(schedule.list_of("TS-02"), Some(ScheduleList::Induction));
    assert_eq!(schedule.summary.coverage, 100);
    println!("✓ 模拟结果未落库,后续生成不受影响");
}

#[tokio::test]
async fn test_simulate_scenario_约束越界同样中止() {
    let env = FleetTestEnv::new(healthy_fleet(5)).expect("无法创建测试环境");
    let result = env
        .api
        .simulate_scenario(target_date(), Some(constraints(10, 3, 3)), &ScenarioOverrides::new())
        .await;
    assert!(matches!(result, Err(ApiError::ConstraintViolation { .. })));
}
