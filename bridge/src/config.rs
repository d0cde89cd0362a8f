use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use jishi_api::{ClientConfig, DEFAULT_BASE_URL};
use sonos_state::logging::LoggingMode;
use tracing::info;

/// Sonos node bridge
///
/// Registers one controller node per Sonos player, listens for the control
/// service's webhook events and keeps each node's status in sync.
#[derive(Parser, Debug, Clone)]
#[command(name = "sonos-bridge")]
#[command(about = "Mirror Sonos player state onto controller nodes")]
#[command(version)]
pub struct Args {
    /// Base URL of the node-sonos-http-api control service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Webhook listener port range start
    #[arg(long, default_value = "3500")]
    pub port_start: u16,

    /// Webhook listener port range end
    #[arg(long, default_value = "3600")]
    pub port_end: u16,

    /// Control service request timeout in seconds
    #[arg(long, default_value = "10")]
    pub request_timeout: u64,

    /// Do not register nodes from the zone list at startup
    #[arg(long)]
    pub skip_discovery: bool,

    /// Log filter directives, e.g. `info` or `info,sonos_state=debug`
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log output mode (silent, development, debug); defaults to BRIDGE_LOG_MODE
    #[arg(long)]
    pub log_mode: Option<String>,
}

impl Args {
    pub fn request_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Validate command line arguments
    pub fn validate(&self) -> Result<()> {
        if self.port_start == 0 || self.port_end == 0 {
            return Err(anyhow!("Port range must not include port 0"));
        }

        if self.port_start > self.port_end {
            return Err(anyhow!(
                "Invalid port range: start ({}) > end ({})",
                self.port_start,
                self.port_end
            ));
        }

        if self.request_timeout == 0 {
            return Err(anyhow!("Request timeout must be positive"));
        }

        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow!(
                "Invalid API URL '{}': expected an http:// or https:// URL",
                self.api_url
            ));
        }

        if let Some(mode) = &self.log_mode {
            LoggingMode::from_name(mode).with_context(|| {
                format!(
                    "Invalid log mode '{}'. Valid modes: silent, development, debug",
                    mode
                )
            })?;
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct Config {
    pub client: ClientConfig,
    pub port_range: (u16, u16),
    pub discover_on_start: bool,
    /// `None` defers to the environment
    pub log_mode: Option<LoggingMode>,
    pub log_filter: Option<String>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let timeout = args.request_timeout_duration();

        Self {
            client: ClientConfig::default()
                .with_base_url(args.api_url)
                .with_timeout(timeout),
            port_range: (args.port_start, args.port_end),
            discover_on_start: !args.skip_discovery,
            log_mode: args.log_mode.as_deref().and_then(LoggingMode::from_name),
            log_filter: args.log_level,
        }
    }
}

impl Config {
    /// Parse and validate the process arguments
    pub fn from_args() -> Result<Self> {
        let args = Args::parse();
        args.validate()?;
        Ok(Config::from(args))
    }

    pub fn print_summary(&self) {
        info!("Configuration:");
        info!("  Control service: {}", self.client.base_url);
        info!("  Request timeout: {}s", self.client.timeout.as_secs());
        info!("  Webhook port range: {}-{}", self.port_range.0, self.port_range.1);
        info!("  Discover on start: {}", self.discover_on_start);
    }
}
