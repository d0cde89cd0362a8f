//! Report events for driver writes
//!
//! When a driver write passes its [`ReportPolicy`](crate::ReportPolicy), a
//! `ReportEvent` is emitted carrying the node, driver, and reported value.

use std::time::Instant;

use crate::driver::DriverCode;

/// A driver value reported upstream
///
/// # Example
///
/// ```rust,ignore
/// for report in store.iter() {
///     println!("{:?} {} = {}", report.entity_id, report.driver, report.value);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ReportEvent<Id> {
    /// The node whose driver was written
    pub entity_id: Id,

    /// The driver that was written
    pub driver: DriverCode,

    /// The value that was reported
    pub value: i32,

    /// True when the stored value was unchanged and the report was forced
    pub forced: bool,

    /// When the write was applied
    pub timestamp: Instant,
}

impl<Id> ReportEvent<Id> {
    pub fn new(entity_id: Id, driver: DriverCode, value: i32, forced: bool) -> Self {
        Self {
            entity_id,
            driver,
            value,
            forced,
            timestamp: Instant::now(),
        }
    }
}

impl<Id: PartialEq> PartialEq for ReportEvent<Id> {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp not included in equality
        self.entity_id == other.entity_id
            && self.driver == other.driver
            && self.value == other.value
            && self.forced == other.forced
    }
}
