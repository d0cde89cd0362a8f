//! Managed device records

use std::collections::BTreeMap;

use serde::Serialize;
use state_store::DriverCode;

use super::{NodeAddress, PlaybackState, StatusField};

/// A managed audio endpoint as the registry knows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub address: NodeAddress,
    /// Room name shown on the controller
    pub name: String,
}

impl Device {
    pub fn new(address: NodeAddress, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
        }
    }
}

/// Typed view of a device's drivers
///
/// Fields are `None` until the driver has been written at least once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    pub playback_state: Option<PlaybackState>,
    pub player_volume: Option<i32>,
    pub group_volume: Option<i32>,
    pub player_muted: Option<bool>,
    pub group_muted: Option<bool>,
    pub repeat_on: Option<bool>,
    pub shuffle_on: Option<bool>,
    pub crossfade_on: Option<bool>,
    pub bass: Option<i32>,
    pub treble: Option<i32>,
    pub group_member_count: Option<i32>,
    pub is_coordinator: Option<bool>,
}

impl DeviceStatus {
    pub fn from_drivers(drivers: &BTreeMap<DriverCode, i32>) -> Self {
        let value = |field: StatusField| drivers.get(field.driver()).copied();
        let flag = |field: StatusField| value(field).map(|v| v != 0);

        Self {
            playback_state: value(StatusField::PlaybackState).map(PlaybackState::from_code),
            player_volume: value(StatusField::PlayerVolume),
            group_volume: value(StatusField::GroupVolume),
            player_muted: flag(StatusField::PlayerMuted),
            group_muted: flag(StatusField::GroupMuted),
            repeat_on: flag(StatusField::RepeatOn),
            shuffle_on: flag(StatusField::ShuffleOn),
            crossfade_on: flag(StatusField::CrossfadeOn),
            bass: value(StatusField::Bass),
            treble: value(StatusField::Treble),
            group_member_count: value(StatusField::GroupMemberCount),
            is_coordinator: flag(StatusField::IsCoordinator),
        }
    }
}
