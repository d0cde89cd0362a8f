//! Event decoder - projects discovery events into node field deltas
//!
//! Projection is pure: a payload plus an address resolver yields the node the
//! event is about and the fields to write. Registry lookups happen later, in
//! the publisher.

use serde_json::Value;

use crate::event::{DiscoveryEvent, TransportState, VolumeChange};
use crate::model::{AddressResolver, FieldDelta, NodeAddress, PlaybackState, StatusField};

/// Field deltas decoded from a single per-device event
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    /// Node the deltas apply to
    pub address: NodeAddress,
    /// Deltas, written as one batch
    pub deltas: Vec<FieldDelta>,
}

/// Decode a per-device event into a status update
///
/// Returns `None` for topology events, which go through the reconciler, and
/// for events whose identifier has no node address.
pub fn decode_event(event: &DiscoveryEvent, resolver: &dyn AddressResolver) -> Option<StatusUpdate> {
    let platform_id = event.platform_id()?;
    let Some(address) = resolver.resolve(platform_id) else {
        tracing::warn!(uuid = %platform_id, kind = event.kind(), "dropping event: identifier has no node address");
        return None;
    };

    let deltas = match event {
        DiscoveryEvent::VolumeChange(change) => decode_volume_change(change),
        DiscoveryEvent::TransportState(state) => decode_transport_state(state),
        DiscoveryEvent::TopologyChange { .. } => return None,
    };

    Some(StatusUpdate { address, deltas })
}

pub fn decode_volume_change(change: &VolumeChange) -> Vec<FieldDelta> {
    vec![FieldDelta::new(
        StatusField::PlayerVolume,
        saturate(change.new_volume),
    )]
}

/// Decode a full transport state
///
/// Playback state and the five flags are always present in the result.
/// Group volume and the equalizer are included only when the payload carries
/// a numeric value for them.
pub fn decode_transport_state(state: &TransportState) -> Vec<FieldDelta> {
    let player = &state.state;
    let group = &state.group_state;

    let mut deltas = Vec::with_capacity(StatusField::ALL.len());
    deltas.push(FieldDelta::new(
        StatusField::PlaybackState,
        playback_state(player.playback_state.as_ref(), &state.uuid).code(),
    ));

    if let Some(volume) = group.volume.as_ref().and_then(number) {
        deltas.push(FieldDelta::new(StatusField::GroupVolume, volume));
    }

    deltas.extend([
        FieldDelta::flag(StatusField::PlayerMuted, is_true(player.mute.as_ref())),
        FieldDelta::flag(StatusField::GroupMuted, is_true(group.mute.as_ref())),
        FieldDelta::flag(StatusField::RepeatOn, is_true(player.play_mode.repeat.as_ref())),
        FieldDelta::flag(StatusField::ShuffleOn, is_true(player.play_mode.shuffle.as_ref())),
        FieldDelta::flag(StatusField::CrossfadeOn, is_true(player.play_mode.crossfade.as_ref())),
    ]);

    if let Some(bass) = player.equalizer.bass.as_ref().and_then(number) {
        deltas.push(FieldDelta::new(StatusField::Bass, bass));
    }
    if let Some(treble) = player.equalizer.treble.as_ref().and_then(number) {
        deltas.push(FieldDelta::new(StatusField::Treble, treble));
    }

    deltas
}

fn playback_state(raw: Option<&Value>, uuid: &str) -> PlaybackState {
    match raw.and_then(Value::as_str).and_then(PlaybackState::from_transport_state) {
        Some(state) => state,
        None => {
            tracing::warn!(uuid = %uuid, raw = ?raw, "unrecognized playback state, reporting idle");
            PlaybackState::Idle
        }
    }
}

/// Only a JSON `true` counts
fn is_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

/// Integer value of a number or numeric string
fn number(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .map(saturate),
        Value::String(s) => s.trim().parse::<i64>().ok().map(saturate),
        _ => None,
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
