//! Blocking iteration over driver reports
//!
//! Reports can be consumed blocking (`recv()`, `for report in iter`),
//! non-blocking (`try_recv()`, `try_iter()`), or with a timeout
//! (`recv_timeout()`, `timeout_iter()`).

use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use crate::event::ReportEvent;

/// Blocking iterator over the reports a [`StatusStore`](crate::StatusStore) emits
///
/// All clones of a store share one receiver, so every report is delivered to
/// exactly one consumer.
///
/// ```rust,ignore
/// for report in store.iter().try_iter() {
///     println!("{:?} {} = {}", report.entity_id, report.driver, report.value);
/// }
/// ```
pub struct ReportIterator<Id> {
    rx: Arc<Mutex<mpsc::Receiver<ReportEvent<Id>>>>,
}

impl<Id> ReportIterator<Id> {
    pub(crate) fn new(rx: Arc<Mutex<mpsc::Receiver<ReportEvent<Id>>>>) -> Self {
        Self { rx }
    }

    /// Block until the next report; `None` once the channel is closed
    pub fn recv(&self) -> Option<ReportEvent<Id>> {
        self.rx.lock().ok()?.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ReportEvent<Id>> {
        self.rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<ReportEvent<Id>> {
        self.rx.lock().ok()?.try_recv().ok()
    }

    /// Drain the reports currently queued without blocking
    pub fn try_iter(&self) -> TryIter<'_, Id> {
        TryIter { inner: self }
    }

    /// Iterate until no report arrives within `timeout`
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIter<'_, Id> {
        TimeoutIter {
            inner: self,
            timeout,
        }
    }
}

impl<Id> Iterator for ReportIterator<Id> {
    type Item = ReportEvent<Id>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

/// Non-blocking iterator over queued reports
pub struct TryIter<'a, Id> {
    inner: &'a ReportIterator<Id>,
}

impl<Id> Iterator for TryIter<'_, Id> {
    type Item = ReportEvent<Id>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator that stops after an idle timeout
pub struct TimeoutIter<'a, Id> {
    inner: &'a ReportIterator<Id>,
    timeout: Duration,
}

impl<Id> Iterator for TimeoutIter<'_, Id> {
    type Item = ReportEvent<Id>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}
