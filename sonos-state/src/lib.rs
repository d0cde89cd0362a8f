//! Sonos State Sync
//!
//! Mirrors Sonos player state onto controller nodes: volume, playback,
//! equalizer and grouping.
//!
//! # Architecture
//!
//! ```text
//! webhook events → EventSender → SyncEngine ─┬─ decoder ──────────┐
//!                                            └─ zone fetch        │
//!                                               → topology ───────┴→ ChangePublisher → DeviceRegistry
//!                                                                                    → TopologyChanged
//! ```
//!
//! Each event names a player by its platform identifier. An
//! [`AddressResolver`] turns that into the node address the registry knows.
//! Per-device events are decoded into field deltas and written at once.
//! Topology events trigger a fetch of the full zone list, which is
//! reconciled against every registered device.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jishi_api::JishiClient;
//! use sonos_state::{NodeAddress, NodeRegistry, SyncEngine};
//!
//! let registry = NodeRegistry::new();
//! registry.add_node(NodeAddress::new("8901234"), "Kitchen");
//!
//! let mut engine = SyncEngine::new(Arc::new(registry.clone()), Arc::new(JishiClient::new()?));
//! let mut topology = engine.subscribe_topology();
//! let handle = engine.spawn();
//!
//! handle.submit_raw("volume-change", serde_json::json!({
//!     "uuid": "RINCON_000E58901234501400",
//!     "newVolume": 42
//! }))?;
//!
//! let stats = handle.shutdown().await?;
//! ```

pub mod decoder;
pub mod engine;
pub mod error;
pub mod event;
pub mod logging;
pub mod model;
pub mod publisher;
pub mod registry;
pub mod topology;

pub use decoder::{decode_event, StatusUpdate};
pub use engine::{
    EngineConfig, EngineHandle, EngineStats, EventSender, SyncEngine, TopologyChanged,
};
pub use error::{Result, StateError};
pub use event::{DiscoveryEvent, EVENT_KINDS};
pub use model::{
    AddressResolver, Device, DeviceStatus, FieldDelta, NodeAddress, PlaybackState,
    RinconSliceResolver, StatusField, Zone,
};
pub use publisher::{ChangePublisher, PublishOutcome};
pub use registry::{DeviceRegistry, NodeRegistry};
pub use topology::{reconcile, Membership};
