//! Discovery events and their payloads
//!
//! The control service reports three kinds of events. Payloads are decoded
//! leniently: only the identifier (and, for volume changes, the new volume)
//! is required; every other field may be absent or of an unexpected type and
//! is handled by the projector.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, StateError};

pub const VOLUME_CHANGE: &str = "volume-change";
pub const TRANSPORT_STATE: &str = "transport-state";
pub const TOPOLOGY_CHANGE: &str = "topology-change";

/// Event kinds the engine consumes
pub const EVENT_KINDS: [&str; 3] = [VOLUME_CHANGE, TRANSPORT_STATE, TOPOLOGY_CHANGE];

/// One notification from the discovery subsystem
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryEvent {
    VolumeChange(VolumeChange),
    TransportState(TransportState),
    /// The zone layout changed; the payload is informational only, the
    /// engine always fetches a fresh snapshot
    TopologyChange { zone_count: Option<usize> },
}

impl DiscoveryEvent {
    /// Decode a notification by kind
    pub fn from_notification(kind: &str, data: Value) -> Result<Self> {
        match kind {
            VOLUME_CHANGE => Ok(DiscoveryEvent::VolumeChange(serde_json::from_value(data)?)),
            TRANSPORT_STATE => Ok(DiscoveryEvent::TransportState(serde_json::from_value(data)?)),
            TOPOLOGY_CHANGE => Ok(DiscoveryEvent::TopologyChange {
                zone_count: data.as_array().map(Vec::len),
            }),
            other => Err(StateError::Parse(format!("unknown event kind '{}'", other))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DiscoveryEvent::VolumeChange(_) => VOLUME_CHANGE,
            DiscoveryEvent::TransportState(_) => TRANSPORT_STATE,
            DiscoveryEvent::TopologyChange { .. } => TOPOLOGY_CHANGE,
        }
    }

    /// Platform identifier of the player the event is about
    pub fn platform_id(&self) -> Option<&str> {
        match self {
            DiscoveryEvent::VolumeChange(e) => Some(&e.uuid),
            DiscoveryEvent::TransportState(e) => Some(&e.uuid),
            DiscoveryEvent::TopologyChange { .. } => None,
        }
    }
}

/// `volume-change` payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeChange {
    pub uuid: String,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub previous_volume: Option<i64>,
    pub new_volume: i64,
}

/// `transport-state` payload: the player's full state
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportState {
    pub uuid: String,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub state: PlayerState,
    #[serde(default)]
    pub group_state: GroupState,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    #[serde(default)]
    pub volume: Option<Value>,
    #[serde(default)]
    pub mute: Option<Value>,
    #[serde(default)]
    pub playback_state: Option<Value>,
    #[serde(default)]
    pub play_mode: PlayMode,
    #[serde(default)]
    pub equalizer: Equalizer,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct GroupState {
    #[serde(default)]
    pub volume: Option<Value>,
    #[serde(default)]
    pub mute: Option<Value>,
}

/// Play mode flags; `repeat` is often a string such as `"all"`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlayMode {
    #[serde(default)]
    pub repeat: Option<Value>,
    #[serde(default)]
    pub shuffle: Option<Value>,
    #[serde(default)]
    pub crossfade: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Equalizer {
    #[serde(default)]
    pub bass: Option<Value>,
    #[serde(default)]
    pub treble: Option<Value>,
}
