//! Client for the node-sonos-http-api control service
//!
//! The control service exposes Sonos households over plain HTTP GETs:
//! topology and catalogs as JSON (`/zones`, `/favorites`, `/playlists`) and
//! one path per player or household command (`/Kitchen/volume/30`,
//! `/pauseall/10`).
//!
//! ```rust,no_run
//! use jishi_api::{ClientConfig, JishiClient, SystemCommand};
//! use std::time::Duration;
//!
//! # async fn run() -> jishi_api::Result<()> {
//! let client = JishiClient::with_config(
//!     ClientConfig::default().with_timeout(Duration::from_secs(5)),
//! )?;
//! client.system(&SystemCommand::PauseAll(Some(30))).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod commands;
pub mod error;
pub mod models;
pub mod source;

pub use client::{ClientConfig, JishiClient, DEFAULT_BASE_URL};
pub use commands::{PlayerCommand, SystemCommand};
pub use error::{ApiError, Result};
pub use models::{zones_from_value, ZoneGroup, ZonePlayer};
pub use source::ZoneSource;
