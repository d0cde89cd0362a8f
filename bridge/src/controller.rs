//! Controller report sink
//!
//! Drains the driver reports the status store emits and hands them to the
//! controller. Reports arrive on a blocking channel, so the sink runs on a
//! blocking thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sonos_state::{NodeAddress, NodeRegistry, StatusField};
use state_store::ReportEvent;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Running report sink
pub struct ReportSink {
    stop: Arc<AtomicBool>,
    task: JoinHandle<u64>,
}

impl ReportSink {
    pub fn spawn(registry: &NodeRegistry) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let reports = registry.reports();
        let flag = Arc::clone(&stop);

        let task = tokio::task::spawn_blocking(move || {
            let mut sent = 0;
            while !flag.load(Ordering::Relaxed) {
                for report in reports.timeout_iter(POLL_INTERVAL) {
                    send_report(&report);
                    sent += 1;
                }
            }
            // Reports written during shutdown
            for report in reports.try_iter() {
                send_report(&report);
                sent += 1;
            }
            sent
        });

        Self { stop, task }
    }

    /// Stop after draining pending reports; resolves to the number sent
    pub async fn shutdown(self) -> u64 {
        self.stop.store(true, Ordering::Relaxed);
        self.task.await.unwrap_or(0)
    }
}

fn send_report(report: &ReportEvent<NodeAddress>) {
    match StatusField::from_driver(report.driver) {
        Some(field) => info!(
            "{} {} ({}) = {} uom {}{}",
            report.entity_id,
            report.driver,
            field.name(),
            report.value,
            field.uom(),
            if report.forced { " [forced]" } else { "" }
        ),
        None => debug!("{} {} = {}", report.entity_id, report.driver, report.value),
    }
}
