//! Playback state enumeration

use serde::{Deserialize, Serialize};

/// Playback state as reported on the `ST` driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum PlaybackState {
    /// No known state
    #[default]
    Idle = 0,
    Playing = 1,
    Transitioning = 2,
    Paused = 3,
    Stopped = 4,
}

impl PlaybackState {
    /// Parse from a control service transport state string
    ///
    /// Returns `None` for anything outside `PLAYING`, `TRANSITIONING`,
    /// `PAUSED_PLAYBACK` and `STOPPED`. Matching is exact.
    pub fn from_transport_state(state: &str) -> Option<Self> {
        match state {
            "PLAYING" => Some(PlaybackState::Playing),
            "TRANSITIONING" => Some(PlaybackState::Transitioning),
            "PAUSED_PLAYBACK" => Some(PlaybackState::Paused),
            "STOPPED" => Some(PlaybackState::Stopped),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            1 => PlaybackState::Playing,
            2 => PlaybackState::Transitioning,
            3 => PlaybackState::Paused,
            4 => PlaybackState::Stopped,
            _ => PlaybackState::Idle,
        }
    }
}
