//! Change publisher
//!
//! Turns field deltas into driver writes on registered devices. Every write
//! is reported and forced, so the controller sees it even when the value is
//! unchanged.

use std::sync::Arc;

use state_store::DriverWrite;

use crate::model::{FieldDelta, NodeAddress};
use crate::registry::DeviceRegistry;

/// Outcome of publishing a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Devices whose drivers were written
    pub written: usize,
    /// Addresses with no registered device
    pub unknown: usize,
}

#[derive(Clone)]
pub struct ChangePublisher {
    registry: Arc<dyn DeviceRegistry>,
}

impl ChangePublisher {
    pub fn new(registry: Arc<dyn DeviceRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<dyn DeviceRegistry> {
        &self.registry
    }

    /// Write one device's deltas; false if the device is unknown
    pub fn publish(&self, address: &NodeAddress, deltas: &[FieldDelta]) -> bool {
        self.publish_batch(&[(address.clone(), deltas.to_vec())])
            .written
            == 1
    }

    /// Write several devices' deltas as one atomic batch
    ///
    /// Unknown devices are logged and skipped; the rest of the batch is still
    /// written.
    pub fn publish_batch(&self, updates: &[(NodeAddress, Vec<FieldDelta>)]) -> PublishOutcome {
        let mut outcome = PublishOutcome::default();
        let mut batch = Vec::with_capacity(updates.len());

        for (address, deltas) in updates {
            if deltas.is_empty() {
                continue;
            }
            match self.registry.lookup(address) {
                Some(device) => {
                    tracing::debug!(address = %address, name = %device.name, ?deltas, "publishing");
                    batch.push((address.clone(), to_writes(deltas)));
                }
                None => {
                    tracing::warn!(address = %address, "unknown device, dropping update");
                    outcome.unknown += 1;
                }
            }
        }

        if !batch.is_empty() {
            outcome.written = self.registry.write_status(&batch);
        }
        outcome
    }
}

impl std::fmt::Debug for ChangePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePublisher").finish_non_exhaustive()
    }
}

fn to_writes(deltas: &[FieldDelta]) -> Vec<DriverWrite> {
    deltas
        .iter()
        .map(|delta| DriverWrite::forced(delta.field.driver(), delta.value))
        .collect()
}
