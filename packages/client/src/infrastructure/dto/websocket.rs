//! WebSocket frame DTOs.

use serde::{Deserialize, Serialize};

/// Known frame types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    Broadcast,
    Private,
    OnlineUsers,
    UserStatusChange,
}

/// Envelope of every frame pushed by the server.
///
/// `type` is kept as a raw string so that unknown tags survive decoding and
/// can be logged instead of failing the whole frame. Which of the optional
/// fields are populated depends on the type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundFrame {
    pub r#type: String,
    #[serde(default)]
    pub sender_id: Option<i64>,
    #[serde(default)]
    pub sender_username: Option<String>,
    #[serde(default)]
    pub receiver_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub sent_at: Option<String>,
    /// Snapshot for `onlineUsers`; a single entry for `userStatusChange`
    #[serde(default)]
    pub online_users: Option<Vec<UserStatus>>,
}

/// Presence entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    pub user_id: i64,
    pub username: String,
    pub is_online: bool,
}

/// Chat message sent by this client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundFrame {
    pub r#type: MessageType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<i64>,
    pub sender_id: i64,
    pub sender_username: String,
}

/// Request for a full presence snapshot: `{"type":"onlineUsers"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRequest {
    pub r#type: MessageType,
}

impl Default for PresenceRequest {
    fn default() -> Self {
        Self {
            r#type: MessageType::OnlineUsers,
        }
    }
}
