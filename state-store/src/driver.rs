//! Driver writes and report policies
//!
//! A driver is a named integer status slot on a controller node (`ST`,
//! `GV0`, ...). Every write carries a [`ReportPolicy`] that decides whether
//! the new value is reported upstream to the controller.
//!
//! # Example
//!
//! ```rust
//! use state_store::{DriverWrite, ReportPolicy};
//!
//! let write = DriverWrite::forced("GV0", 42);
//! assert!(write.policy.should_report(false));
//!
//! let quiet = DriverWrite::new("GV0", 42).with_policy(ReportPolicy::SILENT);
//! assert!(!quiet.policy.should_report(true));
//! ```

/// Name of a driver slot, e.g. `"ST"` or `"GV10"`
pub type DriverCode = &'static str;

/// How a driver write is reported to the controller
///
/// Mirrors the two flags every controller status write takes: whether to
/// report at all, and whether to report even when the stored value did not
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportPolicy {
    /// Report the write upstream
    pub report: bool,
    /// Report even if the value is unchanged
    pub force: bool,
}

impl ReportPolicy {
    /// Always report, changed or not
    pub const FORCED: Self = Self {
        report: true,
        force: true,
    };

    /// Report only when the stored value changes
    pub const ON_CHANGE: Self = Self {
        report: true,
        force: false,
    };

    /// Store without reporting
    pub const SILENT: Self = Self {
        report: false,
        force: false,
    };

    /// Decide whether a write that did (or did not) change the value is reported
    pub fn should_report(&self, changed: bool) -> bool {
        self.report && (changed || self.force)
    }
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self::ON_CHANGE
    }
}

/// A single driver write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriverWrite {
    pub driver: DriverCode,
    pub value: i32,
    pub policy: ReportPolicy,
}

impl DriverWrite {
    /// Create a write that reports on change
    pub fn new(driver: DriverCode, value: i32) -> Self {
        Self {
            driver,
            value,
            policy: ReportPolicy::ON_CHANGE,
        }
    }

    /// Create a write that is always reported
    pub fn forced(driver: DriverCode, value: i32) -> Self {
        Self {
            driver,
            value,
            policy: ReportPolicy::FORCED,
        }
    }

    pub fn with_policy(mut self, policy: ReportPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_reports_unchanged_value() {
        assert!(ReportPolicy::FORCED.should_report(false));
        assert!(ReportPolicy::FORCED.should_report(true));
    }

    #[test]
    fn test_on_change_reports_only_changes() {
        assert!(ReportPolicy::ON_CHANGE.should_report(true));
        assert!(!ReportPolicy::ON_CHANGE.should_report(false));
    }

    #[test]
    fn test_silent_never_reports() {
        assert!(!ReportPolicy::SILENT.should_report(true));
        assert!(!ReportPolicy::SILENT.should_report(false));
    }

    #[test]
    fn test_force_without_report_is_silent() {
        let policy = ReportPolicy {
            report: false,
            force: true,
        };
        assert!(!policy.should_report(false));
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(ReportPolicy::default(), ReportPolicy::ON_CHANGE);
        assert_eq!(DriverWrite::new("ST", 1).policy, ReportPolicy::ON_CHANGE);
    }
}
