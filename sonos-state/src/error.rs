//! Error types for sonos-state

use std::fmt;

/// Result type for sonos-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors surfaced by the sync engine's public API
///
/// Nothing inside a running engine is fatal; these only reach callers that
/// submit events, parse notifications or manage the engine's lifecycle.
#[derive(Debug)]
pub enum StateError {
    /// Error from the control service client
    Api(jishi_api::ApiError),

    /// The engine's event queue is closed
    ChannelClosed,

    /// A notification payload could not be parsed
    Parse(String),

    /// A platform identifier has no node address
    InvalidAddress(String),

    /// The engine task panicked or was cancelled
    TaskFailed(String),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Api(err) => write!(f, "API error: {}", err),
            StateError::ChannelClosed => write!(f, "Engine event queue is closed"),
            StateError::Parse(msg) => write!(f, "Parse error: {}", msg),
            StateError::InvalidAddress(id) => write!(f, "No node address for identifier: {}", id),
            StateError::TaskFailed(msg) => write!(f, "Engine task failed: {}", msg),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<jishi_api::ApiError> for StateError {
    fn from(err: jishi_api::ApiError) -> Self {
        StateError::Api(err)
    }
}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        StateError::Parse(err.to_string())
    }
}
