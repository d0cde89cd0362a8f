//! Driver storage and status management
//!
//! This module provides the core storage primitives for node status:
//! - `DriverBag`: integer driver values for a single node
//! - `StatusStore<Id>`: collection of registered nodes with their driver bags

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::{mpsc, Arc, Mutex, RwLock};

use crate::driver::{DriverCode, DriverWrite};
use crate::event::ReportEvent;
use crate::iter::ReportIterator;

// ============================================================================
// DriverBag - driver values for a single node
// ============================================================================

/// Driver values for one node
///
/// # Example
///
/// ```rust
/// use state_store::DriverBag;
///
/// let mut bag = DriverBag::new();
/// assert_eq!(bag.get("GV0"), None);
///
/// // First set returns true (value changed)
/// assert!(bag.set("GV0", 50));
///
/// // Same value returns false
/// assert!(!bag.set("GV0", 50));
///
/// assert_eq!(bag.get("GV0"), Some(50));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverBag {
    values: HashMap<DriverCode, i32>,
}

impl DriverBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, driver: &str) -> Option<i32> {
        self.values.get(driver).copied()
    }

    /// Set a driver value, returning whether the value changed
    ///
    /// A driver that was never set counts as changed.
    pub fn set(&mut self, driver: DriverCode, value: i32) -> bool {
        match self.values.insert(driver, value) {
            Some(previous) => previous != value,
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sorted snapshot of all driver values
    pub fn snapshot(&self) -> BTreeMap<DriverCode, i32> {
        self.values.iter().map(|(k, v)| (*k, *v)).collect()
    }
}

// ============================================================================
// StatusStore<Id> - driver storage for registered nodes
// ============================================================================

/// Status store for registered controller nodes
///
/// Nodes must be registered before their drivers can be written; writes
/// addressed to an unknown node are ignored. Every write that passes its
/// [`ReportPolicy`](crate::ReportPolicy) emits a [`ReportEvent`] which can be
/// consumed through [`StatusStore::iter`].
///
/// Batches are applied under a single write lock, so readers never observe a
/// half-applied batch. Reports are emitted after the lock is released.
///
/// # Example
///
/// ```rust
/// use state_store::{DriverWrite, StatusStore};
///
/// let store = StatusStore::<String>::new();
/// let node = "8901234".to_string();
///
/// store.register(node.clone());
/// store.write(&node, &[DriverWrite::forced("GV0", 42)]);
///
/// assert_eq!(store.get(&node, "GV0"), Some(42));
/// ```
pub struct StatusStore<Id>
where
    Id: Clone + Eq + Hash + Send + Sync + 'static,
{
    /// Node driver storage: node id -> DriverBag
    entities: Arc<RwLock<HashMap<Id, DriverBag>>>,

    /// Channel sender for report events
    event_tx: mpsc::Sender<ReportEvent<Id>>,

    /// Channel receiver for report events (wrapped for cloning)
    event_rx: Arc<Mutex<mpsc::Receiver<ReportEvent<Id>>>>,
}

impl<Id> StatusStore<Id>
where
    Id: Clone + Eq + Hash + Send + Sync + 'static,
{
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        Self {
            entities: Arc::new(RwLock::new(HashMap::new())),
            event_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    /// Register a node, returning false if it already existed
    pub fn register(&self, entity_id: Id) -> bool {
        let mut entities = match self.entities.write() {
            Ok(e) => e,
            Err(_) => {
                tracing::warn!("status store lock poisoned, node not registered");
                return false;
            }
        };

        if entities.contains_key(&entity_id) {
            return false;
        }
        entities.insert(entity_id, DriverBag::new());
        true
    }

    pub fn contains(&self, entity_id: &Id) -> bool {
        self.entities
            .read()
            .map(|e| e.contains_key(entity_id))
            .unwrap_or(false)
    }

    /// Get a single driver value
    ///
    /// Returns `None` if the node isn't registered or the driver was never written.
    pub fn get(&self, entity_id: &Id, driver: &str) -> Option<i32> {
        let entities = self.entities.read().ok()?;
        entities.get(entity_id)?.get(driver)
    }

    /// Snapshot of every driver value on a node
    pub fn drivers(&self, entity_id: &Id) -> Option<BTreeMap<DriverCode, i32>> {
        let entities = self.entities.read().ok()?;
        entities.get(entity_id).map(DriverBag::snapshot)
    }

    /// Write drivers on a single node
    ///
    /// Returns false if the node is not registered.
    pub fn write(&self, entity_id: &Id, writes: &[DriverWrite]) -> bool {
        let reports = {
            let mut entities = match self.entities.write() {
                Ok(e) => e,
                Err(_) => {
                    tracing::warn!("status store lock poisoned, write dropped");
                    return false;
                }
            };
            match entities.get_mut(entity_id) {
                Some(bag) => apply_writes(entity_id, bag, writes),
                None => return false,
            }
        };

        self.emit(reports);
        true
    }

    /// Apply writes to many nodes under one lock
    ///
    /// Unregistered nodes are skipped. Returns the number of nodes written.
    pub fn write_batch(&self, batch: &[(Id, Vec<DriverWrite>)]) -> usize {
        let mut reports = Vec::new();
        let mut applied = 0;

        {
            let mut entities = match self.entities.write() {
                Ok(e) => e,
                Err(_) => {
                    tracing::warn!("status store lock poisoned, batch dropped");
                    return 0;
                }
            };

            for (entity_id, writes) in batch {
                if let Some(bag) = entities.get_mut(entity_id) {
                    reports.extend(apply_writes(entity_id, bag, writes));
                    applied += 1;
                }
            }
        }

        self.emit(reports);
        applied
    }

    /// Remove a node and all its drivers
    pub fn remove(&self, entity_id: &Id) -> bool {
        self.entities
            .write()
            .map(|mut e| e.remove(entity_id).is_some())
            .unwrap_or(false)
    }

    pub fn entity_ids(&self) -> Vec<Id> {
        self.entities
            .read()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }

    /// Create a blocking iterator over report events
    pub fn iter(&self) -> ReportIterator<Id> {
        ReportIterator::new(Arc::clone(&self.event_rx))
    }

    /// Get the report sender for external injection (mostly useful in tests)
    pub fn report_sender(&self) -> mpsc::Sender<ReportEvent<Id>> {
        self.event_tx.clone()
    }

    fn emit(&self, reports: Vec<ReportEvent<Id>>) {
        for report in reports {
            // The receiver lives as long as the store, so send only fails on teardown
            let _ = self.event_tx.send(report);
        }
    }
}

fn apply_writes<Id: Clone>(
    entity_id: &Id,
    bag: &mut DriverBag,
    writes: &[DriverWrite],
) -> Vec<ReportEvent<Id>> {
    let mut reports = Vec::new();
    for write in writes {
        let changed = bag.set(write.driver, write.value);
        if write.policy.should_report(changed) {
            reports.push(ReportEvent::new(
                entity_id.clone(),
                write.driver,
                write.value,
                !changed,
            ));
        }
    }
    reports
}

impl<Id> Default for StatusStore<Id>
where
    Id: Clone + Eq + Hash + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Id> Clone for StatusStore<Id>
where
    Id: Clone + Eq + Hash + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            entities: Arc::clone(&self.entities),
            event_tx: self.event_tx.clone(),
            event_rx: Arc::clone(&self.event_rx),
        }
    }
}

impl<Id> std::fmt::Debug for StatusStore<Id>
where
    Id: Clone + Eq + Hash + Send + Sync + std::fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusStore")
            .field("entity_count", &self.entity_count())
            .finish()
    }
}
