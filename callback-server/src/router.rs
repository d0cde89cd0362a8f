//! Event routing for webhook notifications.
//!
//! The `EventRouter` keeps the set of event types the consumer cares about
//! and forwards matching notifications to a channel.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// A webhook notification as posted by the control service.
///
/// The service wraps every event in an envelope of the form
/// `{"type": "<kind>", "data": {...}}`. The payload is left as raw JSON;
/// interpreting it is up to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPayload {
    /// Event kind, e.g. `volume-change` or `topology-change`
    pub event_type: String,
    /// The unparsed `data` member of the envelope
    pub data: serde_json::Value,
}

/// Routes webhook notifications to a channel by event type.
#[derive(Clone)]
pub struct EventRouter {
    /// Event types that are forwarded
    event_types: Arc<RwLock<HashSet<String>>>,
    event_sender: mpsc::UnboundedSender<NotificationPayload>,
}

impl EventRouter {
    /// Create a router with no registered event types.
    ///
    /// ```
    /// use tokio::sync::mpsc;
    /// use callback_server::router::{EventRouter, NotificationPayload};
    ///
    /// let (tx, _rx) = mpsc::unbounded_channel::<NotificationPayload>();
    /// let router = EventRouter::new(tx);
    /// ```
    pub fn new(event_sender: mpsc::UnboundedSender<NotificationPayload>) -> Self {
        Self {
            event_types: Arc::new(RwLock::new(HashSet::new())),
            event_sender,
        }
    }

    /// Start forwarding notifications of `event_type`.
    ///
    /// ```
    /// # use tokio::sync::mpsc;
    /// # use callback_server::router::{EventRouter, NotificationPayload};
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let (tx, _rx) = mpsc::unbounded_channel::<NotificationPayload>();
    /// # let router = EventRouter::new(tx);
    /// router.register("volume-change").await;
    /// assert!(router.is_registered("volume-change").await);
    /// # }
    /// ```
    pub async fn register(&self, event_type: impl Into<String>) {
        let mut types = self.event_types.write().await;
        types.insert(event_type.into());
    }

    pub async fn unregister(&self, event_type: &str) {
        let mut types = self.event_types.write().await;
        types.remove(event_type);
    }

    pub async fn is_registered(&self, event_type: &str) -> bool {
        self.event_types.read().await.contains(event_type)
    }

    /// Forward a notification if its type is registered.
    ///
    /// Returns `false` when the type is not registered and the notification
    /// was dropped.
    pub async fn route_event(&self, event_type: String, data: serde_json::Value) -> bool {
        let types = self.event_types.read().await;

        if !types.contains(&event_type) {
            return false;
        }

        let payload = NotificationPayload { event_type, data };
        if self.event_sender.send(payload).is_err() {
            tracing::debug!("notification receiver dropped");
        }
        true
    }
}
