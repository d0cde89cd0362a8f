//! Startup node registration from the zone list

use jishi_api::ZoneSource;
use sonos_state::{AddressResolver, NodeRegistry, StateError};
use tracing::{info, warn};

/// Register one node per zone member, named by room
///
/// Members without a node address are skipped. Returns the number of nodes
/// added; nodes that already exist only have their name refreshed.
pub async fn discover_nodes(
    source: &dyn ZoneSource,
    registry: &NodeRegistry,
    resolver: &dyn AddressResolver,
) -> Result<usize, StateError> {
    let zones = source.fetch_zones().await?;
    let mut added = 0;

    for zone in &zones {
        info!(
            "Zone coordinator: {} - room {}",
            zone.coordinator.uuid, zone.coordinator.room_name
        );

        for member in &zone.members {
            let address = match resolver.address_for(&member.uuid) {
                Ok(address) => address,
                Err(e) => {
                    warn!("Skipping member: {}", e);
                    continue;
                }
            };

            if registry.add_node(address, member.room_name.clone()) {
                added += 1;
            }
        }
    }

    info!("Discovery complete: {} zone(s), {} new node(s)", zones.len(), added);
    Ok(added)
}
