// ==========================================
// 车队投运决策系统 - 容量约束校验器
// ==========================================
// 职责: 校验排程约束的硬边界与建议区间
// 红线: 校验不修改约束本身,只返回 {valid, errors, warnings}
// ==========================================

use crate::config::ConstraintPolicy;
use crate::domain::schedule::{ConstraintValidation, ScheduleConstraints};

// ==========================================
// ConstraintValidator - 约束校验器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConstraintValidator {
    policy: ConstraintPolicy,
}

impl ConstraintValidator {
    pub fn new(policy: ConstraintPolicy) -> Self {
        Self { policy }
    }

    /// 校验约束
    ///
    /// # 规则
    /// - required_trainsets ∉ [required_min, required_max] → 错误
    /// - max_standby ∉ [standby_min, standby_max] → 警告
    /// - max_maintenance ∉ [maintenance_min, maintenance_max] → 警告
    /// - 三者之和 > total_limit → 警告
    pub fn validate(&self, constraints: &ScheduleConstraints) -> ConstraintValidation {
        let p = &self.policy;
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !(p.required_min..=p.required_max).contains(&constraints.required_trainsets) {
            errors.push(format!(
                "requiredTrainsets must be between {} and {} (got {})",
                p.required_min, p.required_max, constraints.required_trainsets
            ));
        }

        if !(p.standby_min..=p.standby_max).contains(&constraints.max_standby) {
            warnings.push(format!(
                "maxStandby should be between {} and {} (got {})",
                p.standby_min, p.standby_max, constraints.max_standby
            ));
        }

        if !(p.maintenance_min..=p.maintenance_max).contains(&constraints.max_maintenance) {
            warnings.push(format!(
                "maxMaintenance should be between {} and {} (got {})",
                p.maintenance_min, p.maintenance_max, constraints.max_maintenance
            ));
        }

        let total = constraints.total();
        if total > p.total_limit {
            warnings.push(format!(
                "Total constraint sum {} exceeds recommended limit of {}",
                total, p.total_limit
            ));
        }

        ConstraintValidation {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(required: u32, standby: u32, maintenance: u32) -> ScheduleConstraints {
        ScheduleConstraints {
            required_trainsets: required,
            max_standby: standby,
            max_maintenance: maintenance,
        }
    }

    #[test]
    fn test_required_out_of_range_is_error() {
        let v = ConstraintValidator::default().validate(&c(26, 3, 1));
        assert!(!v.valid);
        assert_eq!(v.errors.len(), 1);

        let v = ConstraintValidator::default().validate(&c(14, 3, 1));
        assert!(!v.valid);
    }

    #[test]
    fn test_standby_out_of_range_is_warning_only() {
        let v = ConstraintValidator::default().validate(&c(20, 9, 1));
        assert!(v.valid);
        assert!(v.errors.is_empty());
        assert!(v.warnings.iter().any(|w| w.contains("maxStandby")));
    }

    #[test]
    fn test_maintenance_out_of_range_is_warning_only() {
        let v = ConstraintValidator::default().validate(&c(20, 5, 0));
        assert!(v.valid);
        assert_eq!(v.warnings.len(), 1);
    }

    #[test]
    fn test_total_limit_warning() {
        // 20 + 8 + 5 = 33 > 30
        let v = ConstraintValidator::default().validate(&c(20, 8, 5));
        assert!(v.valid);
        assert_eq!(v.warnings.len(), 1);
        assert!(v.warnings[0].contains("exceeds recommended limit"));
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let v = ConstraintValidator::default().validate(&c(u32::MAX, 5, 3));
        assert!(!v.valid);
        assert_eq!(v.errors.len(), 1);
        assert!(v.warnings.iter().any(|w| w.contains("exceeds recommended limit")));

        let v = ConstraintValidator::default().validate(&c(20, u32::MAX, u32::MAX));
        assert!(v.valid);
        assert!(v
            .warnings
            .iter()
            .any(|w| w.contains(&format!("sum {} exceeds", u32::MAX))));
    }

    #[test]
    fn test_defaults_are_clean() {
        let v = ConstraintValidator::default().validate(&ScheduleConstraints::default());
        assert!(v.valid);
        assert!(v.errors.is_empty());
        assert!(v.warnings.is_empty());
    }

    #[test]
    fn test_validation_does_not_mutate() {
        let constraints = c(30, 10, 10);
        let before = constraints;
        let _ = ConstraintValidator::default().validate(&constraints);
        assert_eq!(constraints, before);
    }
}
