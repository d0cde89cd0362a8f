//! Sync engine - the single writer of device status
//!
//! All discovery events go through one ordered queue consumed by one task.
//! Per-device events are decoded and published immediately. A topology
//! event starts a zone fetch; the fetch is the only suspension point, so
//! fetches run concurrently with the queue and every result is tagged with
//! the version of the event that started it. A result older than the last
//! applied pass is discarded.

use std::sync::Arc;

use jishi_api::{ZoneGroup, ZoneSource};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};

use crate::decoder::decode_event;
use crate::error::{Result, StateError};
use crate::event::DiscoveryEvent;
use crate::model::{AddressResolver, RinconSliceResolver, Zone};
use crate::publisher::ChangePublisher;
use crate::registry::DeviceRegistry;
use crate::topology::reconcile;

/// Engine settings
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Run one topology pass as soon as the engine starts
    pub refresh_on_start: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_on_start: true,
        }
    }
}

/// Sent after every successful reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyChanged {
    /// Version of the topology event the pass answered
    pub version: u64,
    /// Coordinator room name of each zone, in snapshot order
    pub zone_names: Vec<String>,
}

impl TopologyChanged {
    pub fn zone_count(&self) -> usize {
        self.zone_names.len()
    }
}

/// Counters reported when the engine stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub events_received: u64,
    /// Device updates written, per-device events and topology deltas alike
    pub updates_published: u64,
    pub unknown_devices: u64,
    /// Events whose identifier had no node address
    pub dropped_events: u64,
    pub topology_passes: u64,
    pub stale_passes: u64,
    pub failed_fetches: u64,
}

/// Builder for the sync engine task
pub struct SyncEngine {
    registry: Arc<dyn DeviceRegistry>,
    zone_source: Arc<dyn ZoneSource>,
    resolver: Arc<dyn AddressResolver>,
    config: EngineConfig,
    topology_subscribers: Vec<mpsc::UnboundedSender<TopologyChanged>>,
}

impl SyncEngine {
    pub fn new(registry: Arc<dyn DeviceRegistry>, zone_source: Arc<dyn ZoneSource>) -> Self {
        Self {
            registry,
            zone_source,
            resolver: Arc::new(RinconSliceResolver),
            config: EngineConfig::default(),
            topology_subscribers: Vec::new(),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn AddressResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Receive a [`TopologyChanged`] after each successful pass
    pub fn subscribe_topology(&mut self) -> mpsc::UnboundedReceiver<TopologyChanged> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.topology_subscribers.push(tx);
        rx
    }

    /// Start the engine on the current tokio runtime
    pub fn spawn(self) -> EngineHandle {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let worker = EngineWorker {
            publisher: ChangePublisher::new(Arc::clone(&self.registry)),
            registry: self.registry,
            zone_source: self.zone_source,
            resolver: self.resolver,
            subscribers: self.topology_subscribers,
            fetches: JoinSet::new(),
            next_version: 0,
            last_applied: 0,
            stats: EngineStats::default(),
        };
        let refresh_on_start = self.config.refresh_on_start;

        let task = tokio::spawn(worker.run(event_rx, shutdown_rx, refresh_on_start));

        EngineHandle {
            sender: EventSender { tx: event_tx },
            shutdown_tx,
            task,
        }
    }
}

/// Cloneable handle for queueing events
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<DiscoveryEvent>,
}

impl EventSender {
    pub fn submit(&self, event: DiscoveryEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| StateError::ChannelClosed)
    }

    /// Decode a raw notification and queue it
    pub fn submit_raw(&self, kind: &str, data: Value) -> Result<()> {
        self.submit(DiscoveryEvent::from_notification(kind, data)?)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Handle to a running engine
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown) also
/// stops the engine.
pub struct EngineHandle {
    sender: EventSender,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<EngineStats>,
}

impl EngineHandle {
    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn submit(&self, event: DiscoveryEvent) -> Result<()> {
        self.sender.submit(event)
    }

    pub fn submit_raw(&self, kind: &str, data: Value) -> Result<()> {
        self.sender.submit_raw(kind, data)
    }

    /// Stop the engine after it drains queued events and in-flight fetches
    pub async fn shutdown(self) -> Result<EngineStats> {
        // The task may already have stopped on its own
        let _ = self.shutdown_tx.send(());
        self.task
            .await
            .map_err(|e| StateError::TaskFailed(e.to_string()))
    }
}

type FetchResult = (u64, jishi_api::Result<Vec<ZoneGroup>>);

struct EngineWorker {
    registry: Arc<dyn DeviceRegistry>,
    publisher: ChangePublisher,
    zone_source: Arc<dyn ZoneSource>,
    resolver: Arc<dyn AddressResolver>,
    subscribers: Vec<mpsc::UnboundedSender<TopologyChanged>>,
    fetches: JoinSet<FetchResult>,
    next_version: u64,
    last_applied: u64,
    stats: EngineStats,
}

impl EngineWorker {
    async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<DiscoveryEvent>,
        mut shutdown: oneshot::Receiver<()>,
        refresh_on_start: bool,
    ) -> EngineStats {
        tracing::info!("sync engine started");

        if refresh_on_start {
            self.start_fetch();
        }

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => break,

                Some(joined) = self.fetches.join_next(), if !self.fetches.is_empty() => {
                    self.finish_fetch(joined);
                }

                event = events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
            }
        }

        events.close();
        while let Ok(event) = events.try_recv() {
            self.handle_event(event);
        }
        while let Some(joined) = self.fetches.join_next().await {
            self.finish_fetch(joined);
        }

        tracing::info!(stats = ?self.stats, "sync engine stopped");
        self.stats
    }

    fn handle_event(&mut self, event: DiscoveryEvent) {
        self.stats.events_received += 1;
        tracing::debug!(kind = event.kind(), uuid = ?event.platform_id(), "event");

        if let DiscoveryEvent::TopologyChange { .. } = event {
            self.start_fetch();
            return;
        }

        let Some(update) = decode_event(&event, self.resolver.as_ref()) else {
            self.stats.dropped_events += 1;
            return;
        };

        if self.publisher.publish(&update.address, &update.deltas) {
            self.stats.updates_published += 1;
        } else {
            self.stats.unknown_devices += 1;
        }
    }

    fn start_fetch(&mut self) {
        self.next_version += 1;
        let version = self.next_version;
        let source = Arc::clone(&self.zone_source);

        tracing::debug!(version, "fetching zones");
        self.fetches
            .spawn(async move { (version, source.fetch_zones().await) });
    }

    fn finish_fetch(&mut self, joined: std::result::Result<FetchResult, tokio::task::JoinError>) {
        match joined {
            Ok((version, Ok(groups))) => self.apply_topology(version, &groups),
            Ok((version, Err(e))) => {
                self.stats.failed_fetches += 1;
                tracing::warn!(version, error = %e, "zone fetch failed, topology unchanged");
            }
            Err(e) => {
                self.stats.failed_fetches += 1;
                tracing::warn!(error = %e, "zone fetch task failed, topology unchanged");
            }
        }
    }

    fn apply_topology(&mut self, version: u64, groups: &[ZoneGroup]) {
        if version <= self.last_applied {
            self.stats.stale_passes += 1;
            tracing::debug!(version, last_applied = self.last_applied, "discarding stale zone snapshot");
            return;
        }

        if groups.is_empty() {
            tracing::warn!(version, "empty zone snapshot, topology unchanged");
            return;
        }

        let zones: Vec<Zone> = groups
            .iter()
            .map(|group| Zone::from_group(group, self.resolver.as_ref()))
            .collect();

        let deltas = reconcile(&zones, &self.registry.list_all());
        let outcome = self.publisher.publish_batch(&deltas);

        self.last_applied = version;
        self.stats.topology_passes += 1;
        self.stats.updates_published += outcome.written as u64;
        self.stats.unknown_devices += outcome.unknown as u64;

        tracing::info!(version, zones = zones.len(), devices = outcome.written, "topology reconciled");

        let changed = TopologyChanged {
            version,
            zone_names: zones.into_iter().map(|zone| zone.name).collect(),
        };
        self.subscribers.retain(|tx| tx.send(changed.clone()).is_ok());
    }
}
