//! HTTP server for receiving webhook notifications.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener};
use std::sync::Arc;
use serde::Deserialize;
use tokio::sync::mpsc;
use warp::Filter;

use super::router::{EventRouter, NotificationPayload};

/// Largest webhook body accepted; topology payloads for big households are a few hundred KB
const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024;

/// Webhook envelope posted by the control service.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// HTTP listener for control service webhooks.
///
/// Binds to the first free port in a range and accepts `POST` requests on any
/// path. Each body must be a JSON envelope; registered event types are routed
/// through the [`EventRouter`] to a channel.
///
/// Responses:
/// - `200` the notification was routed
/// - `400` the body is not a valid envelope
/// - `404` the event type is not registered
///
/// # Example
///
/// ```no_run
/// use tokio::sync::mpsc;
/// use callback_server::{CallbackServer, NotificationPayload};
///
/// #[tokio::main]
/// async fn main() -> Result<(), String> {
///     let (tx, mut rx) = mpsc::unbounded_channel::<NotificationPayload>();
///     let server = CallbackServer::new((3500, 3600), tx).await?;
///     server.router().register("volume-change").await;
///
///     println!("point the webhook at {}", server.webhook_url());
///     while let Some(notification) = rx.recv().await {
///         println!("{}: {}", notification.event_type, notification.data);
///     }
///     Ok(())
/// }
/// ```
pub struct CallbackServer {
    port: u16,
    base_url: String,
    event_router: Arc<EventRouter>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    server_handle: Option<tokio::task::JoinHandle<()>>,
}

impl CallbackServer {
    /// Create and start the webhook listener.
    ///
    /// # Arguments
    ///
    /// * `port_range` - Range of ports to try binding to (start, end), inclusive
    /// * `event_sender` - Channel receiving routed notifications
    ///
    /// Returns an error if no port in the range is free or the server fails
    /// to start.
    pub async fn new(
        port_range: (u16, u16),
        event_sender: mpsc::UnboundedSender<NotificationPayload>,
    ) -> Result<Self, String> {
        let port = Self::find_available_port(port_range.0, port_range.1).ok_or_else(|| {
            format!(
                "No available port found in range {}-{}",
                port_range.0, port_range.1
            )
        })?;

        let local_ip = Self::detect_local_ip().unwrap_or_else(|| {
            tracing::warn!("could not detect local IP, advertising loopback");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        });

        let base_url = format!("http://{local_ip}:{port}");
        let event_router = Arc::new(EventRouter::new(event_sender));

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let (ready_tx, mut ready_rx) = mpsc::channel::<()>(1);

        let server_handle = Self::start_server(port, event_router.clone(), shutdown_rx, ready_tx);

        ready_rx
            .recv()
            .await
            .ok_or_else(|| "Server failed to start".to_string())?;

        Ok(Self {
            port,
            base_url,
            event_router,
            shutdown_tx: Some(shutdown_tx),
            server_handle: Some(server_handle),
        })
    }

    /// Base URL of the listener, `http://<local_ip>:<port>`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL to configure as the control service's webhook target.
    pub fn webhook_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn router(&self) -> &Arc<EventRouter> {
        &self.event_router
    }

    /// Stop accepting requests and wait for in-flight ones to finish.
    pub async fn shutdown(mut self) -> Result<(), String> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }

        if let Some(handle) = self.server_handle.take() {
            handle
                .await
                .map_err(|e| format!("server task failed: {e}"))?;
        }

        tracing::info!(port = self.port, "callback server stopped");
        Ok(())
    }

    fn find_available_port(start: u16, end: u16) -> Option<u16> {
        (start..=end).find(|&port| Self::is_port_available(port))
    }

    fn is_port_available(port: u16) -> bool {
        TcpListener::bind(SocketAddr::new(
            IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port,
        ))
        .is_ok()
    }

    /// Local address used for outbound traffic.
    ///
    /// A UDP socket is connected but nothing is sent; the OS only picks a route.
    fn detect_local_ip() -> Option<IpAddr> {
        let socket = std::net::UdpSocket::bind("0.0.0.0:0").ok()?;
        socket.connect("8.8.8.8:80").ok()?;
        let local_addr = socket.local_addr().ok()?;
        Some(local_addr.ip())
    }

    fn start_server(
        port: u16,
        event_router: Arc<EventRouter>,
        mut shutdown_rx: mpsc::Receiver<()>,
        ready_tx: mpsc::Sender<()>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let webhook_route = warp::post()
                .and(warp::path::full())
                .and(warp::body::content_length_limit(MAX_BODY_BYTES))
                .and(warp::body::bytes())
                .and_then({
                    let router = event_router.clone();
                    move |path: warp::path::FullPath, body: bytes::Bytes| {
                        let router = router.clone();
                        async move {
                            let envelope = Self::parse_envelope(&body).map_err(|e| {
                                tracing::warn!(path = path.as_str(), error = %e, "malformed webhook body");
                                warp::reject::custom(InvalidEnvelope)
                            })?;

                            tracing::debug!(
                                path = path.as_str(),
                                event_type = %envelope.event_type,
                                bytes = body.len(),
                                "webhook received"
                            );

                            if router.route_event(envelope.event_type, envelope.data).await {
                                Ok::<_, warp::Rejection>(warp::reply::with_status(
                                    "",
                                    warp::http::StatusCode::OK,
                                ))
                            } else {
                                Err(warp::reject::not_found())
                            }
                        }
                    }
                });

            let routes = webhook_route.recover(handle_rejection);

            let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(
                SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), port),
                async move {
                    shutdown_rx.recv().await;
                },
            );

            tracing::info!(%addr, "callback server listening");
            let _ = ready_tx.send(()).await;
            server.await;
        })
    }

    /// Decode a webhook envelope. The event type must be a non-empty string.
    fn parse_envelope(body: &[u8]) -> Result<Envelope, String> {
        let envelope: Envelope = serde_json::from_slice(body).map_err(|e| e.to_string())?;
        if envelope.event_type.trim().is_empty() {
            return Err("empty event type".to_string());
        }
        Ok(envelope)
    }
}

/// Rejection for bodies that are not a valid webhook envelope.
#[derive(Debug)]
struct InvalidEnvelope;

impl warp::reject::Reject for InvalidEnvelope {}

async fn handle_rejection(
    err: warp::Rejection,
) -> Result<impl warp::Reply, std::convert::Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Event type not registered";
    } else if err.find::<InvalidEnvelope>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid webhook envelope";
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = warp::http::StatusCode::PAYLOAD_TOO_LARGE;
        message = "Payload too large";
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method not allowed";
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal server error";
    }

    Ok(warp::reply::with_status(message, code))
}
