//! Webhook notifications into the sync engine queue

use callback_server::NotificationPayload;
use sonos_state::{EventSender, StateError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardStats {
    pub forwarded: u64,
    /// Notifications whose payload did not decode
    pub rejected: u64,
}

/// Forward notifications until the intake closes or the engine stops
pub fn spawn_forwarder(
    mut notifications: mpsc::UnboundedReceiver<NotificationPayload>,
    engine: EventSender,
) -> JoinHandle<ForwardStats> {
    tokio::spawn(async move {
        let mut stats = ForwardStats::default();

        while let Some(notification) = notifications.recv().await {
            debug!(kind = %notification.event_type, "webhook notification");

            match engine.submit_raw(&notification.event_type, notification.data) {
                Ok(()) => stats.forwarded += 1,
                Err(StateError::ChannelClosed) => {
                    warn!("sync engine stopped, no longer forwarding notifications");
                    break;
                }
                Err(e) => {
                    warn!(kind = %notification.event_type, error = %e, "dropping notification");
                    stats.rejected += 1;
                }
            }
        }

        stats
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sonos_state::{EngineConfig, NodeAddress, NodeRegistry, SyncEngine};
    use std::sync::Arc;

    struct NoZones;

    #[async_trait::async_trait]
    impl jishi_api::ZoneSource for NoZones {
        async fn fetch_zones(&self) -> jishi_api::Result<Vec<jishi_api::ZoneGroup>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_forwards_and_rejects() {
        let registry = NodeRegistry::new();
        registry.add_node(NodeAddress::new("aaaaaaa"), "Kitchen");

        let engine = SyncEngine::new(Arc::new(registry.clone()), Arc::new(NoZones))
            .with_config(EngineConfig {
                refresh_on_start: false,
            })
            .spawn();

        let (tx, rx) = mpsc::unbounded_channel();
        let forwarder = spawn_forwarder(rx, engine.sender());

        tx.send(NotificationPayload {
            event_type: "volume-change".to_string(),
            data: json!({ "uuid": "RINCON_000E5AAAAAAA01400", "newVolume": 12 }),
        })
        .unwrap();
        tx.send(NotificationPayload {
            event_type: "volume-change".to_string(),
            data: json!({ "uuid": "RINCON_000E5AAAAAAA01400" }),
        })
        .unwrap();
        drop(tx);

        let stats = forwarder.await.unwrap();
        assert_eq!(stats, ForwardStats { forwarded: 1, rejected: 1 });

        engine.shutdown().await.unwrap();
        assert_eq!(
            registry.status(&NodeAddress::new("aaaaaaa")).unwrap().player_volume,
            Some(12)
        );
    }
}
