//! Conversion logic between DTOs and domain entities.

use crate::{
    domain::{ChatEvent, ChatMessage, HistoryEntry, MessageKind, OutboundMessage, UserPresence},
    error::FrameError,
    infrastructure::dto::{http as http_dto, websocket as dto},
};

/// Zero timestamp the server sends when `sentAt` was never set
const ZERO_TIME_PREFIX: &str = "0001-01-01";

// ========================================
// Wire text → Domain
// ========================================

/// Decode a text frame into a typed event.
///
/// Unknown `type` tags decode successfully to [`ChatEvent::Unknown`].
pub fn decode_chat_event(text: &str) -> Result<ChatEvent, FrameError> {
    let frame: dto::InboundFrame = serde_json::from_str(text)?;
    ChatEvent::try_from(frame)
}

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::InboundFrame> for ChatEvent {
    type Error = FrameError;

    fn try_from(frame: dto::InboundFrame) -> Result<Self, Self::Error> {
        match frame.r#type.as_str() {
            "broadcast" => chat_message(MessageKind::Broadcast, frame).map(ChatEvent::Message),
            "private" => chat_message(MessageKind::Private, frame).map(ChatEvent::Message),
            "onlineUsers" => {
                let users = frame.online_users.ok_or(FrameError::MissingField {
                    kind: "onlineUsers",
                    field: "onlineUsers",
                })?;
                Ok(ChatEvent::OnlineUsers(
                    users.into_iter().map(UserPresence::from).collect(),
                ))
            }
            "userStatusChange" => {
                let user = frame
                    .online_users
                    .and_then(|users| users.into_iter().next())
                    .ok_or(FrameError::EmptyStatusChange)?;
                Ok(ChatEvent::UserStatusChange(user.into()))
            }
            _ => Ok(ChatEvent::Unknown(frame.r#type)),
        }
    }
}

fn chat_message(kind: MessageKind, frame: dto::InboundFrame) -> Result<ChatMessage, FrameError> {
    let missing = |field: &'static str| FrameError::MissingField {
        kind: kind.as_str(),
        field,
    };

    Ok(ChatMessage {
        kind,
        sender_id: frame.sender_id.ok_or_else(|| missing("senderId"))?,
        sender_username: frame
            .sender_username
            .ok_or_else(|| missing("senderUsername"))?,
        message: frame.message.ok_or_else(|| missing("message"))?,
        receiver_id: frame.receiver_id,
        sent_at: frame
            .sent_at
            .filter(|sent_at| !sent_at.starts_with(ZERO_TIME_PREFIX)),
    })
}

impl From<dto::UserStatus> for UserPresence {
    fn from(dto: dto::UserStatus) -> Self {
        Self {
            user_id: dto.user_id,
            username: dto.username,
            is_online: dto.is_online,
        }
    }
}

impl From<http_dto::HistoryEntryDto> for HistoryEntry {
    fn from(dto: http_dto::HistoryEntryDto) -> Self {
        Self {
            sender_username: dto.sender_username.unwrap_or_else(|| "Unknown".to_string()),
            message_content: dto
                .message_content
                .unwrap_or_else(|| "No message content".to_string()),
            sent_at: dto.sent_at.unwrap_or_default(),
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<MessageKind> for dto::MessageType {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Broadcast => Self::Broadcast,
            MessageKind::Private => Self::Private,
        }
    }
}

impl From<&OutboundMessage> for dto::OutboundFrame {
    fn from(model: &OutboundMessage) -> Self {
        Self {
            r#type: model.kind.into(),
            message: model.message.clone(),
            receiver_id: match model.kind {
                MessageKind::Private => model.receiver_id,
                MessageKind::Broadcast => None,
            },
            sender_id: model.sender_id,
            sender_username: model.sender_username.clone(),
        }
    }
}

/// Serialize an outbound chat message
pub fn encode_outbound(message: &OutboundMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::OutboundFrame::from(message))
}

/// Serialize a presence snapshot request
pub fn encode_presence_request() -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::PresenceRequest::default())
}
