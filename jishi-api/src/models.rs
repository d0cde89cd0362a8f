//! Response models for the control service
//!
//! Only the fields the bridge consumes are modelled; anything else in the
//! payload is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// One player as it appears inside a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePlayer {
    /// Platform identifier, e.g. `RINCON_000E58901234501400`
    pub uuid: String,
    #[serde(default)]
    pub room_name: String,
}

/// A zone: a group of players sharing one coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneGroup {
    #[serde(default)]
    pub uuid: String,
    pub coordinator: ZonePlayer,
    #[serde(default)]
    pub members: Vec<ZonePlayer>,
}

impl ZoneGroup {
    /// Room name of the zone coordinator
    pub fn name(&self) -> &str {
        &self.coordinator.room_name
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Parse a zone list from a raw JSON value
///
/// Topology notifications carry the same array `/zones` returns.
pub fn zones_from_value(value: serde_json::Value) -> crate::Result<Vec<ZoneGroup>> {
    Ok(serde_json::from_value(value)?)
}
