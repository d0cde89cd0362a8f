//! Status fields and the drivers they are reported on

use state_store::DriverCode;

/// A status field mirrored onto a controller node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusField {
    PlaybackState,
    PlayerVolume,
    GroupVolume,
    PlayerMuted,
    GroupMuted,
    RepeatOn,
    ShuffleOn,
    CrossfadeOn,
    Bass,
    Treble,
    GroupMemberCount,
    IsCoordinator,
}

impl StatusField {
    pub const ALL: [StatusField; 12] = [
        StatusField::PlaybackState,
        StatusField::PlayerVolume,
        StatusField::GroupVolume,
        StatusField::PlayerMuted,
        StatusField::GroupMuted,
        StatusField::RepeatOn,
        StatusField::ShuffleOn,
        StatusField::CrossfadeOn,
        StatusField::Bass,
        StatusField::Treble,
        StatusField::GroupMemberCount,
        StatusField::IsCoordinator,
    ];

    /// Driver the field is reported on
    pub fn driver(self) -> DriverCode {
        match self {
            StatusField::PlaybackState => "ST",
            StatusField::PlayerVolume => "GV0",
            StatusField::GroupVolume => "GV1",
            StatusField::PlayerMuted => "GV2",
            StatusField::GroupMuted => "GV3",
            StatusField::RepeatOn => "GV4",
            StatusField::ShuffleOn => "GV5",
            StatusField::CrossfadeOn => "GV6",
            StatusField::Bass => "GV7",
            StatusField::Treble => "GV8",
            StatusField::GroupMemberCount => "GV9",
            StatusField::IsCoordinator => "GV10",
        }
    }

    /// Controller unit of measure: 25 index, 51 percent, 2 boolean, 56 raw value
    pub fn uom(self) -> u16 {
        match self {
            StatusField::PlaybackState => 25,
            StatusField::PlayerVolume | StatusField::GroupVolume => 51,
            StatusField::PlayerMuted
            | StatusField::GroupMuted
            | StatusField::RepeatOn
            | StatusField::ShuffleOn
            | StatusField::CrossfadeOn
            | StatusField::IsCoordinator => 2,
            StatusField::Bass | StatusField::Treble | StatusField::GroupMemberCount => 56,
        }
    }

    pub fn from_driver(driver: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.driver() == driver)
    }

    pub fn name(self) -> &'static str {
        match self {
            StatusField::PlaybackState => "playbackState",
            StatusField::PlayerVolume => "playerVolume",
            StatusField::GroupVolume => "groupVolume",
            StatusField::PlayerMuted => "playerMuted",
            StatusField::GroupMuted => "groupMuted",
            StatusField::RepeatOn => "repeatOn",
            StatusField::ShuffleOn => "shuffleOn",
            StatusField::CrossfadeOn => "crossfadeOn",
            StatusField::Bass => "bass",
            StatusField::Treble => "treble",
            StatusField::GroupMemberCount => "groupMemberCount",
            StatusField::IsCoordinator => "isCoordinator",
        }
    }
}

/// One field value to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDelta {
    pub field: StatusField,
    pub value: i32,
}

impl FieldDelta {
    pub fn new(field: StatusField, value: i32) -> Self {
        Self { field, value }
    }

    pub fn flag(field: StatusField, on: bool) -> Self {
        Self::new(field, i32::from(on))
    }
}
