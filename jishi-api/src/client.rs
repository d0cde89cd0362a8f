use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::commands::{PlayerCommand, SystemCommand};
use crate::error::{ApiError, Result};
use crate::models::ZoneGroup;

/// Default address of a locally running control service
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5005/";

/// Configuration for [`JishiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the node-sonos-http-api control service
///
/// Every call is a GET against the configured base URL. Room names and other
/// free-text arguments are sent as percent-encoded path segments.
///
/// ```rust,no_run
/// use jishi_api::{JishiClient, PlayerCommand};
///
/// # async fn run() -> jishi_api::Result<()> {
/// let client = JishiClient::new()?;
/// for zone in client.zones().await? {
///     println!("{} ({} members)", zone.name(), zone.member_count());
/// }
/// client.player("Living Room", &PlayerCommand::Volume(25)).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JishiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl JishiClient {
    /// Create a client against the default local service
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ApiError::InvalidParameter(format!("base url '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidParameter(format!(
                "base url '{}' cannot carry paths",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Current zone topology
    pub async fn zones(&self) -> Result<Vec<ZoneGroup>> {
        self.get_json(&["zones"]).await
    }

    /// Names of the household's favorites
    pub async fn favorites(&self) -> Result<Vec<String>> {
        self.get_json(&["favorites"]).await
    }

    /// Names of the household's saved playlists
    pub async fn playlists(&self) -> Result<Vec<String>> {
        self.get_json(&["playlists"]).await
    }

    /// Send a command to one room
    pub async fn player(&self, room: &str, command: &PlayerCommand) -> Result<()> {
        if room.trim().is_empty() {
            return Err(ApiError::InvalidParameter("room must not be empty".to_string()));
        }
        let mut segments = vec![room.to_string()];
        segments.extend(command.path_segments()?);
        self.get(&segments).await.map(|_| ())
    }

    /// Send a household-wide command
    pub async fn system(&self, command: &SystemCommand) -> Result<()> {
        let segments = command.path_segments()?;
        self.get(&segments).await.map(|_| ())
    }

    /// Build the URL for a list of path segments
    pub fn endpoint<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidParameter("base url cannot carry paths".to_string()))?
            .pop_if_empty()
            .extend(segments.iter().map(AsRef::as_ref));
        Ok(url)
    }

    async fn get<S: AsRef<str>>(&self, segments: &[S]) -> Result<reqwest::Response> {
        let url = self.endpoint(segments)?;
        tracing::debug!(url = %url, "GET");

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "control service rejected request");
            return Err(ApiError::Status {
                status: status.as_u16(),
                path: url.path().to_string(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned, S: AsRef<str>>(&self, segments: &[S]) -> Result<T> {
        let body = self.get(segments).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_endpoint_encodes_room_names() {
        let client = JishiClient::new().unwrap();
        let url = client.endpoint(&["Living Room", "say", "hello/world"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5005/Living%20Room/say/hello%2Fworld"
        );
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let config = ClientConfig::default().with_base_url("http://sonos.local:5005/api");
        let client = JishiClient::with_config(config).unwrap();
        let url = client.endpoint(&["zones"]).unwrap();
        assert_eq!(url.as_str(), "http://sonos.local:5005/api/zones");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::default().with_base_url("not a url");
        assert!(matches!(
            JishiClient::with_config(config),
            Err(ApiError::InvalidParameter(_))
        ));

        let config = ClientConfig::default().with_base_url("mailto:someone@example.com");
        assert!(matches!(
            JishiClient::with_config(config),
            Err(ApiError::InvalidParameter(_))
        ));
    }
}
