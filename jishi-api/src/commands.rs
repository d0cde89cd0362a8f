//! Commands understood by the control service
//!
//! Every command maps to a single GET path. Player commands are addressed
//! to a room (`/{room}/volume/30`), system commands to the whole household
//! (`/pauseall/10`).

use crate::error::{ApiError, Result};

/// Valid range for player and group volume
pub const VOLUME_RANGE: std::ops::RangeInclusive<u8> = 0..=100;

/// Valid range for bass and treble
pub const EQ_RANGE: std::ops::RangeInclusive<i32> = -10..=10;

/// A command addressed to one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Play,
    Pause,
    Next,
    Previous,
    Volume(u8),
    GroupVolume(u8),
    Mute,
    Unmute,
    GroupMute,
    GroupUnmute,
    Bass(i32),
    Treble(i32),
    Repeat(bool),
    Shuffle(bool),
    Crossfade(bool),
    Favorite(String),
    Playlist(String),
    Say(String),
    Clip(String),
    /// Join the zone that `room` belongs to
    Join(String),
    Leave,
}

/// A command addressed to every player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemCommand {
    /// Pause all zones, optionally resuming after the given minutes
    PauseAll(Option<u32>),
    /// Resume all zones, optionally pausing after the given minutes
    ResumeAll(Option<u32>),
    SayAll(String),
    ClipAll(String),
}

fn on_off(flag: bool) -> String {
    if flag { "on" } else { "off" }.to_string()
}

fn check_volume(name: &str, value: u8) -> Result<String> {
    if VOLUME_RANGE.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(ApiError::InvalidParameter(format!(
            "{} {} is out of range [0, 100]",
            name, value
        )))
    }
}

fn check_eq(name: &str, value: i32) -> Result<String> {
    if EQ_RANGE.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(ApiError::InvalidParameter(format!(
            "{} {} is out of range [-10, 10]",
            name, value
        )))
    }
}

fn non_empty(name: &str, value: &str) -> Result<String> {
    if value.trim().is_empty() {
        Err(ApiError::InvalidParameter(format!("{} must not be empty", name)))
    } else {
        Ok(value.to_string())
    }
}

impl PlayerCommand {
    /// Path segments following the room name
    pub fn path_segments(&self) -> Result<Vec<String>> {
        let action = |s: &str| s.to_string();
        Ok(match self {
            PlayerCommand::Play => vec![action("play")],
            PlayerCommand::Pause => vec![action("pause")],
            PlayerCommand::Next => vec![action("next")],
            PlayerCommand::Previous => vec![action("previous")],
            PlayerCommand::Volume(v) => vec![action("volume"), check_volume("volume", *v)?],
            PlayerCommand::GroupVolume(v) => {
                vec![action("groupVolume"), check_volume("group volume", *v)?]
            }
            PlayerCommand::Mute => vec![action("mute")],
            PlayerCommand::Unmute => vec![action("unmute")],
            PlayerCommand::GroupMute => vec![action("groupMute")],
            PlayerCommand::GroupUnmute => vec![action("groupUnmute")],
            PlayerCommand::Bass(v) => vec![action("bass"), check_eq("bass", *v)?],
            PlayerCommand::Treble(v) => vec![action("treble"), check_eq("treble", *v)?],
            PlayerCommand::Repeat(on) => vec![action("repeat"), on_off(*on)],
            PlayerCommand::Shuffle(on) => vec![action("shuffle"), on_off(*on)],
            PlayerCommand::Crossfade(on) => vec![action("crossfade"), on_off(*on)],
            PlayerCommand::Favorite(name) => vec![action("favorite"), non_empty("favorite", name)?],
            PlayerCommand::Playlist(name) => vec![action("playlist"), non_empty("playlist", name)?],
            PlayerCommand::Say(text) => vec![action("say"), non_empty("phrase", text)?],
            PlayerCommand::Clip(file) => vec![action("clip"), non_empty("clip", file)?],
            PlayerCommand::Join(room) => vec![action("join"), non_empty("room", room)?],
            PlayerCommand::Leave => vec![action("leave")],
        })
    }
}

impl SystemCommand {
    pub fn path_segments(&self) -> Result<Vec<String>> {
        let with_timeout = |name: &str, timeout: &Option<u32>| {
            let mut segments = vec![name.to_string()];
            if let Some(minutes) = timeout {
                segments.push(minutes.to_string());
            }
            segments
        };

        Ok(match self {
            SystemCommand::PauseAll(timeout) => with_timeout("pauseall", timeout),
            SystemCommand::ResumeAll(timeout) => with_timeout("resumeall", timeout),
            SystemCommand::SayAll(text) => vec!["sayall".to_string(), non_empty("phrase", text)?],
            SystemCommand::ClipAll(file) => vec!["clipall".to_string(), non_empty("clip", file)?],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PlayerCommand::Play, vec!["play"])]
    #[case(PlayerCommand::Previous, vec!["previous"])]
    #[case(PlayerCommand::Volume(30), vec!["volume", "30"])]
    #[case(PlayerCommand::GroupVolume(0), vec!["groupVolume", "0"])]
    #[case(PlayerCommand::GroupUnmute, vec!["groupUnmute"])]
    #[case(PlayerCommand::Bass(-4), vec!["bass", "-4"])]
    #[case(PlayerCommand::Repeat(true), vec!["repeat", "on"])]
    #[case(PlayerCommand::Crossfade(false), vec!["crossfade", "off"])]
    #[case(PlayerCommand::Favorite("Jazz FM".into()), vec!["favorite", "Jazz FM"])]
    #[case(PlayerCommand::Join("Kitchen".into()), vec!["join", "Kitchen"])]
    fn test_player_paths(#[case] command: PlayerCommand, #[case] expected: Vec<&str>) {
        assert_eq!(command.path_segments().unwrap(), expected);
    }

    #[rstest]
    #[case(SystemCommand::PauseAll(None), vec!["pauseall"])]
    #[case(SystemCommand::PauseAll(Some(15)), vec!["pauseall", "15"])]
    #[case(SystemCommand::ResumeAll(Some(5)), vec!["resumeall", "5"])]
    #[case(SystemCommand::SayAll("dinner".into()), vec!["sayall", "dinner"])]
    fn test_system_paths(#[case] command: SystemCommand, #[case] expected: Vec<&str>) {
        assert_eq!(command.path_segments().unwrap(), expected);
    }

    #[rstest]
    #[case(PlayerCommand::Volume(101))]
    #[case(PlayerCommand::Treble(11))]
    #[case(PlayerCommand::Bass(-11))]
    #[case(PlayerCommand::Say("  ".into()))]
    fn test_invalid_parameters(#[case] command: PlayerCommand) {
        assert!(matches!(
            command.path_segments(),
            Err(ApiError::InvalidParameter(_))
        ));
    }
}
