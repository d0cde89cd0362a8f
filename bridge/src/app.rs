//! Bridge assembly and lifecycle

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use callback_server::{CallbackServer, NotificationPayload};
use jishi_api::JishiClient;
use sonos_state::{
    EngineHandle, EngineStats, NodeRegistry, RinconSliceResolver, SyncEngine, EVENT_KINDS,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::bootstrap::discover_nodes;
use crate::catalog::spawn_catalog_listener;
use crate::config::Config;
use crate::controller::ReportSink;
use crate::forwarder::{spawn_forwarder, ForwardStats};

/// Totals collected on shutdown
#[derive(Debug, Clone, Copy, Default)]
pub struct BridgeSummary {
    pub engine: EngineStats,
    pub notifications: ForwardStats,
    pub catalog_refreshes: usize,
    pub reports_sent: u64,
}

/// A running bridge
///
/// Owns the webhook listener, the sync engine and the tasks between them.
pub struct Bridge {
    registry: NodeRegistry,
    server: CallbackServer,
    engine: EngineHandle,
    forwarder: JoinHandle<ForwardStats>,
    catalog: JoinHandle<usize>,
    reports: ReportSink,
}

impl Bridge {
    /// Register nodes, start the engine and open the webhook listener
    pub async fn start(config: &Config) -> Result<Self> {
        let client = Arc::new(
            JishiClient::with_config(config.client.clone())
                .context("Failed to create control service client")?,
        );
        let registry = NodeRegistry::new();

        if config.discover_on_start {
            match discover_nodes(client.as_ref(), &registry, &RinconSliceResolver).await {
                Ok(added) => info!("Registered {} node(s)", added),
                Err(e) => warn!("Discovery failed, starting with no nodes: {}", e),
            }
        }

        let reports = ReportSink::spawn(&registry);

        let mut engine = SyncEngine::new(Arc::new(registry.clone()), client);
        let topology = engine.subscribe_topology();
        let engine = engine.spawn();
        let catalog = spawn_catalog_listener(topology);

        let (tx, rx) = mpsc::unbounded_channel::<NotificationPayload>();
        let server = CallbackServer::new(config.port_range, tx)
            .await
            .map_err(|e| anyhow!(e))
            .context("Failed to start webhook listener")?;
        for kind in EVENT_KINDS {
            server.router().register(kind).await;
        }
        let forwarder = spawn_forwarder(rx, engine.sender());

        info!(
            "Listening for control service events; set its webhook to {}",
            server.webhook_url()
        );

        Ok(Self {
            registry,
            server,
            engine,
            forwarder,
            catalog,
            reports,
        })
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn webhook_url(&self) -> String {
        self.server.webhook_url()
    }

    pub fn port(&self) -> u16 {
        self.server.port()
    }

    /// Stop intake, let the engine drain, then stop the report sink
    pub async fn shutdown(self) -> Result<BridgeSummary> {
        if let Err(e) = self.server.shutdown().await {
            warn!("Webhook listener did not stop cleanly: {}", e);
        }

        let notifications = self.forwarder.await.context("Forwarder task failed")?;
        let engine = self.engine.shutdown().await.context("Sync engine failed")?;
        let catalog_refreshes = self.catalog.await.context("Catalog task failed")?;
        let reports_sent = self.reports.shutdown().await;

        Ok(BridgeSummary {
            engine,
            notifications,
            catalog_refreshes,
            reports_sent,
        })
    }
}
