//! Device registry gateway
//!
//! The engine never owns devices. It looks them up and writes their status
//! through [`DeviceRegistry`]; [`NodeRegistry`] is the in-process
//! implementation backed by a [`StatusStore`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use state_store::{DriverWrite, ReportIterator, StatusStore};

use crate::model::{Device, DeviceStatus, NodeAddress};

/// Lookup and status writes for managed devices
pub trait DeviceRegistry: Send + Sync {
    /// Find a device; not-found is `None`, never an error
    fn lookup(&self, address: &NodeAddress) -> Option<Device>;

    /// Every registered device
    fn list_all(&self) -> Vec<Device>;

    /// Apply a batch of driver writes atomically
    ///
    /// Returns the number of devices written.
    fn write_status(&self, batch: &[(NodeAddress, Vec<DriverWrite>)]) -> usize;
}

/// Devices and their drivers held in memory
#[derive(Clone, Default)]
pub struct NodeRegistry {
    store: StatusStore<NodeAddress>,
    names: Arc<RwLock<HashMap<NodeAddress, String>>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node; an existing node only has its name updated
    ///
    /// Returns true if the node is new.
    pub fn add_node(&self, address: NodeAddress, name: impl Into<String>) -> bool {
        let name = name.into();
        match self.names.write() {
            Ok(mut names) => {
                names.insert(address.clone(), name.clone());
            }
            Err(_) => {
                tracing::warn!(address = %address, "registry lock poisoned, node not added");
                return false;
            }
        }

        let added = self.store.register(address.clone());
        if added {
            tracing::info!(address = %address, name = %name, "added node");
        }
        added
    }

    pub fn remove_node(&self, address: &NodeAddress) -> bool {
        if let Ok(mut names) = self.names.write() {
            names.remove(address);
        }
        self.store.remove(address)
    }

    /// Typed view of a node's drivers
    pub fn status(&self, address: &NodeAddress) -> Option<DeviceStatus> {
        self.store
            .drivers(address)
            .map(|drivers| DeviceStatus::from_drivers(&drivers))
    }

    pub fn len(&self) -> usize {
        self.store.entity_count()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn store(&self) -> &StatusStore<NodeAddress> {
        &self.store
    }

    /// Reports sent to the controller, in write order
    pub fn reports(&self) -> ReportIterator<NodeAddress> {
        self.store.iter()
    }
}

impl DeviceRegistry for NodeRegistry {
    fn lookup(&self, address: &NodeAddress) -> Option<Device> {
        if !self.store.contains(address) {
            return None;
        }
        let names = self.names.read().ok()?;
        let name = names.get(address).cloned().unwrap_or_default();
        Some(Device::new(address.clone(), name))
    }

    fn list_all(&self) -> Vec<Device> {
        let mut addresses = self.store.entity_ids();
        addresses.sort();
        addresses
            .into_iter()
            .filter_map(|address| self.lookup(&address))
            .collect()
    }

    fn write_status(&self, batch: &[(NodeAddress, Vec<DriverWrite>)]) -> usize {
        self.store.write_batch(batch)
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("nodes", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlaybackState;

    #[test]
    fn test_add_and_lookup() {
        let registry = NodeRegistry::new();
        let address = NodeAddress::new("8901234");

        assert!(registry.lookup(&address).is_none());
        assert!(registry.add_node(address.clone(), "Kitchen"));
        assert!(!registry.add_node(address.clone(), "Kitchen Left"));

        let device = registry.lookup(&address).unwrap();
        assert_eq!(device.name, "Kitchen Left");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_all_is_sorted() {
        let registry = NodeRegistry::new();
        registry.add_node(NodeAddress::new("bbbbbbb"), "Den");
        registry.add_node(NodeAddress::new("aaaaaaa"), "Kitchen");

        let names: Vec<_> = registry.list_all().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Kitchen", "Den"]);
    }

    #[test]
    fn test_write_status_and_read_back() {
        let registry = NodeRegistry::new();
        let address = NodeAddress::new("8901234");
        registry.add_node(address.clone(), "Kitchen");

        let written = registry.write_status(&[
            (
                address.clone(),
                vec![DriverWrite::forced("ST", 1), DriverWrite::forced("GV0", 30)],
            ),
            (NodeAddress::new("0000000"), vec![DriverWrite::forced("GV0", 5)]),
        ]);
        assert_eq!(written, 1);

        let status = registry.status(&address).unwrap();
        assert_eq!(status.playback_state, Some(PlaybackState::Playing));
        assert_eq!(status.player_volume, Some(30));

        let reports: Vec<_> = registry.reports().try_iter().collect();
        assert_eq!(reports.len(), 2);
    }

    #[test]
    fn test_remove_node() {
        let registry = NodeRegistry::new();
        let address = NodeAddress::new("8901234");
        registry.add_node(address.clone(), "Kitchen");

        assert!(registry.remove_node(&address));
        assert!(registry.lookup(&address).is_none());
        assert!(registry.is_empty());
    }
}
