//! HTTP API response DTOs.

use serde::Deserialize;

/// One row of `GET /chat-history`.
///
/// The server also sends ids and receiver fields; they are not needed here.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntryDto {
    #[serde(rename = "senderUsername", default)]
    pub sender_username: Option<String>,
    #[serde(default)]
    pub message_content: Option<String>,
    #[serde(default)]
    pub sent_at: Option<String>,
}
