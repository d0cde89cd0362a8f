use thiserror::Error;

/// Errors returned by the control API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network communication error
    ///
    /// The control service could not be reached: connection refused,
    /// timeouts, or the request was aborted mid-flight.
    #[error("Network error: {0}")]
    Network(String),

    /// The control service answered with a non-success HTTP status
    #[error("HTTP {status} from {path}")]
    Status { status: u16, path: String },

    /// Response parsing error
    ///
    /// The service answered but the body was not the JSON shape we expect.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid parameter value
    ///
    /// Volume out of range, equalizer level out of range, or a base URL
    /// that cannot carry path segments.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Parse(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Parse(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let error = ApiError::Status {
            status: 500,
            path: "/zones".to_string(),
        };
        assert_eq!(error.to_string(), "HTTP 500 from /zones");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<Vec<u8>>("{not json").unwrap_err();
        let api_error: ApiError = json_error.into();
        assert!(matches!(api_error, ApiError::Parse(_)));
    }
}
