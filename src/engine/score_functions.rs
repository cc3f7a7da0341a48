// ==========================================
// 车队投运决策系统 - 六项运营信号评分纯函数库
// ==========================================
// 职责: 适航/检修负荷/广告/里程/清洗/停放 → [0,100] 分
// 红线: 无状态、无副作用、无 I/O 操作
// 红线: 数据缺失时返回中性默认值,不报错
// ==========================================

use crate::domain::score::clamp_score;
use crate::domain::types::{CampaignPriority, CertificateType, CleaningStatus, JobPriority};
use crate::domain::vehicle::{
    BrandingCampaignRecord, CertificateRecord, CleaningRecord, JobCardRecord, StablingRecord,
};
use chrono::NaiveDate;

/// 中性默认值: 无广告 / 无里程 / 无停放
pub const NEUTRAL_SCORE: f64 = 50.0;
/// 无清洗记录
pub const NO_CLEANING_SCORE: f64 = 30.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

// ==========================================
// ScoreFunctions - 纯函数工具类
// ==========================================
pub struct ScoreFunctions;

impl ScoreFunctions {
    /// 适航证书得分
    ///
    /// # 规则 (按必备类型顺序逐一检查,遇到不合格立即返回)
    /// 1. 缺少该类型证书 → 0
    /// 2. 剩余天数 < 0 → 0
    /// 3. 剩余天数 < 7 → 20
    /// 4. 剩余天数 < 30 → 60
    /// 5. 全部类型通过 → 累计 100 / 类型数
    ///
    /// 注意: 只有全部类型都通过时才会求平均,这是既有行为,
    /// 历史排程与合格性门槛依赖此短路语义。
    ///
    /// # 参数
    /// - certificates: 该车全部证书
    /// - required_types: 必备证书类型(有序)
    /// - target_date: 目标日期
    pub fn fitness_score(
        certificates: &[CertificateRecord],
        required_types: &[CertificateType],
        target_date: NaiveDate,
    ) -> f64 {
        if required_types.is_empty() {
            return 0.0;
        }

        let mut total_score = 0.0;
        for required in required_types {
            // 同类型多张证书时取有效期最晚的一张
            let cert = certificates
                .iter()
                .filter(|c| c.certificate_type == *required)
                .max_by_key(|c| c.valid_to);

            let cert = match cert {
                Some(c) => c,
                None => return 0.0,
            };

            let days = cert.days_to_expiry(target_date);
            if days < 0 {
                return 0.0;
            }
            if days < 7 {
                return 20.0;
            }
            if days < 30 {
                return 60.0;
            }
            total_score += 100.0;
        }

        clamp_score(total_score / required_types.len() as f64)
    }

    /// 检修负荷得分
    ///
    /// # 规则
    /// - 起始 100
    /// - 每张未关闭的紧急工单 −50
    /// - 每张未关闭的高优先级工单 −25
    /// - 每张未关闭工单(任意优先级) −5
    /// - 三项扣分叠加, 下限 0
    pub fn maintenance_score(job_cards: &[JobCardRecord]) -> f64 {
        let open: Vec<&JobCardRecord> = job_cards.iter().filter(|j| j.status.is_open()).collect();

        let emergency = open.iter().filter(|j| j.priority == JobPriority::Emergency).count();
        let high = open.iter().filter(|j| j.priority == JobPriority::High).count();

        let score = 100.0 - 50.0 * emergency as f64 - 25.0 * high as f64 - 5.0 * open.len() as f64;
        clamp_score(score)
    }

    /// 广告投放得分
    ///
    /// # 规则
    /// - 目标日期无生效投放 → 50 (中性)
    /// - critical 投放: 完成率 < 0.8 → 100, 否则 50
    /// - 其它投放: 完成率 < 0.9 → 80, 否则 40
    /// - 多个投放取平均, 上限 100
    pub fn branding_score(campaigns: &[BrandingCampaignRecord], target_date: NaiveDate) -> f64 {
        let contributions: Vec<f64> = campaigns
            .iter()
            .filter(|c| c.is_active_on(target_date))
            .map(|c| {
                let ratio = c.exposure_ratio();
                if c.priority == CampaignPriority::Critical {
                    if ratio < 0.8 {
                        100.0
                    } else {
                        50.0
                    }
                } else if ratio < 0.9 {
                    80.0
                } else {
                    40.0
                }
            })
            .collect();

        if contributions.is_empty() {
            return NEUTRAL_SCORE;
        }

        let average = contributions.iter().sum::<f64>() / contributions.len() as f64;
        clamp_score(average.min(100.0))
    }

    /// 里程均衡得分
    ///
    /// # 规则 (ratio = 本车累计里程 / 车队平均)
    /// - < 0.8 → 100; < 0.9 → 80; < 1.1 → 60; < 1.2 → 40; 否则 20
    /// - 无本车里程 / 车队平均缺失或为 0 → 50 (中性)
    pub fn mileage_score(vehicle_km: Option<f64>, fleet_average_km: Option<f64>) -> f64 {
        let (km, average) = match (vehicle_km, fleet_average_km) {
            (Some(km), Some(avg)) if avg > 0.0 && km.is_finite() => (km, avg),
            _ => return NEUTRAL_SCORE,
        };

        let ratio = km / average;
        if ratio < 0.8 {
            100.0
        } else if ratio < 0.9 {
            80.0
        } else if ratio < 1.1 {
            60.0
        } else if ratio < 1.2 {
            40.0
        } else {
            20.0
        }
    }

    /// 清洗得分
    ///
    /// # 规则
    /// - 取目标日期当天及之前最近一次(未取消)清洗记录
    /// - 无记录 → 30
    /// - 距目标日期 0 点: < 1 天 → 100; < 3 → 80; < 7 → 60; < 14 → 40; 否则 20
    pub fn cleaning_score(records: &[CleaningRecord], target_date: NaiveDate) -> f64 {
        let latest = records
            .iter()
            .filter(|r| r.status != CleaningStatus::Cancelled)
            .filter(|r| r.scheduled_at.date() <= target_date)
            .max_by_key(|r| r.scheduled_at);

        let latest = match latest {
            Some(r) => r,
            None => return NO_CLEANING_SCORE,
        };

        let day_start = target_date.and_hms_opt(0, 0, 0).unwrap_or_default();
        let seconds = day_start.signed_duration_since(latest.scheduled_at).num_seconds();
        let days_elapsed = (seconds as f64 / SECONDS_PER_DAY).max(0.0);

        if days_elapsed < 1.0 {
            100.0
        } else if days_elapsed < 3.0 {
            80.0
        } else if days_elapsed < 7.0 {
            60.0
        } else if days_elapsed < 14.0 {
            40.0
        } else {
            20.0
        }
    }

    /// 停放股道得分
    ///
    /// # 规则
    /// - 无停放记录 → 50 (中性)
    /// - 起始 100; 股道被占用 −30
    /// - 出库顺位 ≤5 → +20; ≤10 → +10
    /// - 停放于优先车辆段 → +10
    /// - 截断到 [0,100]
    pub fn stabling_score(stabling: Option<&StablingRecord>, preferred_depot: &str) -> f64 {
        let record = match stabling {
            Some(r) => r,
            None => return NEUTRAL_SCORE,
        };

        let mut score = 100.0;
        if record.occupied {
            score -= 30.0;
        }
        if record.position_order <= 5 {
            score += 20.0;
        } else if record.position_order <= 10 {
            score += 10.0;
        }
        if record.depot == preferred_depot {
            score += 10.0;
        }
        clamp_score(score)
    }
}
