//! Zone topology reconciliation
//!
//! A topology snapshot is the full current list of zones, not a diff. Every
//! registered device is checked against it; devices that appear in no zone
//! keep whatever grouping fields they had.

use std::collections::HashMap;

use crate::model::{Device, FieldDelta, NodeAddress, StatusField, Zone};

/// A device's role in the current snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub is_coordinator: bool,
    /// Zone size for coordinators, 0 for members
    pub member_count: usize,
}

impl Membership {
    fn deltas(self) -> Vec<FieldDelta> {
        vec![
            FieldDelta::flag(StatusField::IsCoordinator, self.is_coordinator),
            FieldDelta::new(
                StatusField::GroupMemberCount,
                i32::try_from(self.member_count).unwrap_or(i32::MAX),
            ),
        ]
    }
}

/// Build the address → membership table for a snapshot
///
/// Only member lists are walked. An address listed in more than one zone
/// keeps its coordinator entry if it has one; otherwise the last entry wins.
pub fn memberships(zones: &[Zone]) -> HashMap<NodeAddress, Membership> {
    let mut table = HashMap::new();

    for zone in zones {
        for member in &zone.members {
            let membership = if zone.is_coordinator(member) {
                Membership {
                    is_coordinator: true,
                    member_count: zone.member_count,
                }
            } else {
                Membership {
                    is_coordinator: false,
                    member_count: 0,
                }
            };

            match table.get(member) {
                Some(Membership { is_coordinator: true, .. }) if !membership.is_coordinator => {
                    tracing::debug!(address = %member, zone = %zone.name, "address already coordinates another zone");
                }
                _ => {
                    table.insert(member.clone(), membership);
                }
            }
        }
    }

    table
}

/// Compute grouping deltas for every registered device
///
/// Devices absent from the snapshot get no deltas. An empty snapshot yields
/// nothing at all.
pub fn reconcile(zones: &[Zone], devices: &[Device]) -> Vec<(NodeAddress, Vec<FieldDelta>)> {
    if zones.is_empty() {
        tracing::debug!("empty zone snapshot, skipping reconciliation");
        return Vec::new();
    }

    let table = memberships(zones);
    devices
        .iter()
        .filter_map(|device| match table.get(&device.address) {
            Some(membership) => Some((device.address.clone(), membership.deltas())),
            None => {
                tracing::debug!(address = %device.address, "device not in any zone, leaving grouping unchanged");
                None
            }
        })
        .collect()
}
