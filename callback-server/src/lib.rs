//! Webhook listener for control service event notifications.
//!
//! The control service (node-sonos-http-api) can post every event it sees to
//! a configured webhook URL. This crate provides the receiving end:
//!
//! - [`CallbackServer`]: binds to a local port and accepts webhook `POST`s
//!   carrying a `{"type": ..., "data": ...}` envelope.
//! - [`EventRouter`]: forwards notifications whose type has been registered
//!   to a channel and drops the rest.
//! - [`NotificationPayload`]: the event type plus the raw JSON `data`.
//!
//! The crate has no knowledge of what the events mean; interpreting the
//! payload is left to the consumer.
//!
//! # Example
//!
//! ```no_run
//! use callback_server::{CallbackServer, NotificationPayload};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), String> {
//!     let (tx, mut rx) = mpsc::unbounded_channel::<NotificationPayload>();
//!     let server = CallbackServer::new((3500, 3600), tx).await?;
//!
//!     for kind in ["volume-change", "transport-state", "topology-change"] {
//!         server.router().register(kind).await;
//!     }
//!
//!     tokio::spawn(async move {
//!         while let Some(notification) = rx.recv().await {
//!             println!("{} event", notification.event_type);
//!         }
//!     });
//!
//!     server.shutdown().await
//! }
//! ```

pub mod router;
mod server;

pub use router::{EventRouter, NotificationPayload};
pub use server::CallbackServer;
