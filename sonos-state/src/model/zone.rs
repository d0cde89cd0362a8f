//! Zone snapshots

use jishi_api::ZoneGroup;

use super::{AddressResolver, NodeAddress};

/// One zone of a topology snapshot, addressed by node
///
/// Built fresh for every reconciliation pass and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Room name of the coordinator
    pub name: String,
    /// `None` when the coordinator's identifier could not be resolved
    pub coordinator: Option<NodeAddress>,
    /// Resolvable members in platform order
    pub members: Vec<NodeAddress>,
    /// Size of the member list as reported, resolvable or not
    pub member_count: usize,
}

impl Zone {
    pub fn from_group(group: &ZoneGroup, resolver: &dyn AddressResolver) -> Self {
        let coordinator = resolver.resolve(&group.coordinator.uuid);
        if coordinator.is_none() {
            tracing::warn!(uuid = %group.coordinator.uuid, "zone coordinator has no node address");
        }

        let members = group
            .members
            .iter()
            .filter_map(|member| {
                let address = resolver.resolve(&member.uuid);
                if address.is_none() {
                    tracing::warn!(uuid = %member.uuid, "zone member has no node address");
                }
                address
            })
            .collect();

        Self {
            name: group.name().to_string(),
            coordinator,
            members,
            member_count: group.members.len(),
        }
    }

    pub fn is_coordinator(&self, address: &NodeAddress) -> bool {
        self.coordinator.as_ref() == Some(address)
    }
}
