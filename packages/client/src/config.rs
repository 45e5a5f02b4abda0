//! Client configuration.

use std::time::Duration;

/// Tunables for the chat session.
///
/// `Default` carries the production values; the binary overrides a subset
/// from command-line arguments.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Chat server authority, e.g. `localhost:8080`
    pub host: String,
    /// Base delay of the linear reconnect backoff
    pub reconnect_base_delay: Duration,
    /// Reconnect attempts allowed before giving up
    pub max_reconnect_attempts: u32,
    /// Maximum events held while the chat view is not mounted
    pub queue_capacity: usize,
    /// Broadcasts arriving closer together than this are treated as duplicates
    pub broadcast_dedup_window: Duration,
    /// Lifetime of a new-message notification
    pub notification_ttl: Duration,
    /// Delay of the second presence-list request after the connection opens
    pub presence_resync_delay: Duration,
    /// Outbound messages whose delivery status is retained
    pub outbox_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost:8080".to_string(),
            reconnect_base_delay: Duration::from_secs(5),
            max_reconnect_attempts: 5,
            queue_capacity: 20,
            broadcast_dedup_window: Duration::from_millis(100),
            notification_ttl: Duration::from_secs(10),
            presence_resync_delay: Duration::from_secs(6),
            outbox_capacity: 50,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given server authority with default tunables
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// WebSocket endpoint for the given credential
    pub fn ws_url(&self, token: &str) -> String {
        format!("ws://{}/ws?token={}", self.host, token)
    }

    /// Base URL of the HTTP API (chat history)
    pub fn http_base_url(&self) -> String {
        format!("http://{}", self.host)
    }
}
