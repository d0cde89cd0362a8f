//! Zone name catalog refreshed after each topology pass

use sonos_state::TopologyChanged;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// `ZONE-<n>` entries for the controller's zone list, numbered from 0
pub fn zone_entries(changed: &TopologyChanged) -> Vec<(String, String)> {
    changed
        .zone_names
        .iter()
        .enumerate()
        .map(|(n, name)| (format!("ZONE-{}", n), name.clone()))
        .collect()
}

/// Log the regenerated catalog for every topology change
///
/// Resolves to the number of refreshes once the engine stops.
pub fn spawn_catalog_listener(
    mut changes: mpsc::UnboundedReceiver<TopologyChanged>,
) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut refreshes = 0;
        while let Some(changed) = changes.recv().await {
            refreshes += 1;
            info!(
                "Zone catalog refresh (topology v{}, {} zone(s))",
                changed.version,
                changed.zone_count()
            );
            for (key, name) in zone_entries(&changed) {
                info!("{} = {}", key, name);
            }
        }
        refreshes
    })
}
