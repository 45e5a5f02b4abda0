//! Error types for the chat synchronization client.

use thiserror::Error;

use crate::domain::ConnectionState;

/// Client-side errors surfaced by the chat session
#[derive(Debug, Error)]
pub enum ClientError {
    /// Tried to use the connection while it is not open
    #[error("Not connected (connection is {0})")]
    NotConnected(ConnectionState),

    /// Credential or user id is absent
    #[error("Missing credentials: a token and a user id are required")]
    MissingCredentials,

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Outbound payload could not be serialized
    #[error("Failed to serialize outbound frame: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while decoding an inbound frame
#[derive(Debug, Error)]
pub enum FrameError {
    /// Frame is not valid JSON or does not match the envelope shape
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A known event type is missing a required field
    #[error("'{kind}' event is missing field '{field}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// `userStatusChange` arrived without a user entry
    #[error("'userStatusChange' event carries no user")]
    EmptyStatusChange,
}

/// Errors returned by the chat-history collaborator
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Request could not be sent or the body could not be read
    #[error("History request failed: {0}")]
    Request(String),

    /// Server answered with a non-success status
    #[error("History request returned status {0}")]
    Status(u16),

    /// Response body did not match the expected shape
    #[error("Failed to decode history response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for HistoryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}
