//! Borrow policy rules
//!
//! Pure functions over role and current counts. Callers must re-check state
//! against the store at commit time; these checks alone do not reserve
//! anything.

use crate::{
    config::PolicyConfig,
    error::{AppError, AppResult},
    models::user::Role,
};

/// Role-based borrow limits and loan durations
#[derive(Debug, Clone)]
pub struct LoanPolicy {
    config: PolicyConfig,
}

impl LoanPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// Maximum concurrent active borrows for a role. `None` means unbounded.
    pub fn max_active_borrows(&self, role: Role) -> Option<i64> {
        match role {
            Role::Member => Some(self.config.member_max_borrows),
            Role::Teacher => Some(self.config.teacher_max_borrows),
            Role::Admin => None,
        }
    }

    /// Loan duration in days for a role
    pub fn loan_duration_days(&self, role: Role) -> i64 {
        let days = match role {
            Role::Member => self.config.member_loan_days,
            Role::Teacher => self.config.teacher_loan_days,
            Role::Admin => self.config.admin_loan_days,
        };
        if days > 0 {
            days
        } else {
            self.config.default_loan_days
        }
    }

    /// Check whether a new borrow request is admissible
    pub fn can_borrow(
        &self,
        role: Role,
        active_count: i64,
        copies_available: i32,
    ) -> AppResult<()> {
        if let Some(max) = self.max_active_borrows(role) {
            if active_count >= max {
                return Err(AppError::LimitReached(format!(
                    "Maximum active borrows reached ({}/{})",
                    active_count, max
                )));
            }
        }
        if copies_available <= 0 {
            return Err(AppError::NoCopiesAvailable(
                "No copies of this book are currently available".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_per_role() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.max_active_borrows(Role::Member), Some(3));
        assert_eq!(policy.max_active_borrows(Role::Teacher), Some(5));
        assert_eq!(policy.max_active_borrows(Role::Admin), None);
    }

    #[test]
    fn default_loan_durations_per_role() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.loan_duration_days(Role::Member), 7);
        assert_eq!(policy.loan_duration_days(Role::Teacher), 15);
        assert_eq!(policy.loan_duration_days(Role::Admin), 30);
    }

    #[test]
    fn unconfigured_duration_falls_back_to_default() {
        let policy = LoanPolicy::new(PolicyConfig {
            member_loan_days: 0,
            ..PolicyConfig::default()
        });
        assert_eq!(policy.loan_duration_days(Role::Member), 14);
    }

    #[test]
    fn member_at_limit_is_rejected() {
        let policy = LoanPolicy::default();
        let err = policy.can_borrow(Role::Member, 3, 5).unwrap_err();
        assert!(matches!(err, AppError::LimitReached(_)));
    }

    #[test]
    fn member_over_limit_is_rejected() {
        let policy = LoanPolicy::default();
        let err = policy.can_borrow(Role::Member, 4, 5).unwrap_err();
        assert!(matches!(err, AppError::LimitReached(_)));
    }

    #[test]
    fn teacher_below_limit_is_accepted() {
        let policy = LoanPolicy::default();
        assert!(policy.can_borrow(Role::Teacher, 4, 1).is_ok());
    }

    #[test]
    fn admin_has_no_limit() {
        let policy = LoanPolicy::default();
        assert!(policy.can_borrow(Role::Admin, 1000, 1).is_ok());
    }

    #[test]
    fn zero_copies_is_rejected() {
        let policy = LoanPolicy::default();
        let err = policy.can_borrow(Role::Member, 0, 0).unwrap_err();
        assert!(matches!(err, AppError::NoCopiesAvailable(_)));
    }

    #[test]
    fn limit_is_checked_before_copies() {
        let policy = LoanPolicy::default();
        let err = policy.can_borrow(Role::Member, 3, 0).unwrap_err();
        assert!(matches!(err, AppError::LimitReached(_)));
    }
}
