//! Sonos node bridge
//!
//! Wires the workspace crates into one process:
//!
//! - [`bootstrap`]: registers a node per player from the control service's
//!   zone list
//! - [`forwarder`]: feeds webhook notifications into the sync engine
//! - [`catalog`]: regenerates the `ZONE-<n>` list after topology changes
//! - [`controller`]: hands driver reports to the controller
//! - [`app`]: starts and stops all of the above

pub mod app;
pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod forwarder;

pub use app::{Bridge, BridgeSummary};
pub use config::{Args, Config};
