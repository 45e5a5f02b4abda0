//! Core chat entities.

/// Numeric user identifier assigned by the server
pub type UserId = i64;

/// Last-known presence of a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPresence {
    pub user_id: UserId,
    pub username: String,
    pub is_online: bool,
}

impl UserPresence {
    pub fn new(user_id: UserId, username: impl Into<String>, is_online: bool) -> Self {
        Self {
            user_id,
            username: username.into(),
            is_online,
        }
    }
}

/// Audience of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Delivered to every connected user
    Broadcast,
    /// Addressed to one recipient
    Private,
}

impl MessageKind {
    /// Wire tag of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Broadcast => "broadcast",
            Self::Private => "private",
        }
    }
}

/// A chat message received from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub kind: MessageKind,
    pub sender_id: UserId,
    pub sender_username: String,
    pub message: String,
    pub receiver_id: Option<UserId>,
    /// Server-side send time (RFC 3339), when provided
    pub sent_at: Option<String>,
}

/// Typed inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// `broadcast` or `private` message
    Message(ChatMessage),
    /// Full presence snapshot (`onlineUsers`)
    OnlineUsers(Vec<UserPresence>),
    /// Presence delta for one user (`userStatusChange`)
    UserStatusChange(UserPresence),
    /// Any other tag; kept so it can be logged and dropped
    Unknown(String),
}

impl ChatEvent {
    /// Wire tag of the event
    pub fn type_name(&self) -> &str {
        match self {
            Self::Message(message) => message.kind.as_str(),
            Self::OnlineUsers(_) => "onlineUsers",
            Self::UserStatusChange(_) => "userStatusChange",
            Self::Unknown(tag) => tag,
        }
    }
}

/// An inbound event stamped with its arrival time (Unix milliseconds)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub event: ChatEvent,
    pub received_at: i64,
}

impl InboundEvent {
    pub fn new(event: ChatEvent, received_at: i64) -> Self {
        Self { event, received_at }
    }
}

/// A message composed locally and sent to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub kind: MessageKind,
    pub message: String,
    /// Present iff `kind` is `Private`
    pub receiver_id: Option<UserId>,
    pub sender_id: UserId,
    pub sender_username: String,
}

impl OutboundMessage {
    /// Message for every connected user
    pub fn broadcast(
        message: impl Into<String>,
        sender_id: UserId,
        sender_username: impl Into<String>,
    ) -> Self {
        Self {
            kind: MessageKind::Broadcast,
            message: message.into(),
            receiver_id: None,
            sender_id,
            sender_username: sender_username.into(),
        }
    }

    /// Message for a single recipient
    pub fn private(
        message: impl Into<String>,
        receiver_id: UserId,
        sender_id: UserId,
        sender_username: impl Into<String>,
    ) -> Self {
        Self {
            kind: MessageKind::Private,
            message: message.into(),
            receiver_id: Some(receiver_id),
            sender_id,
            sender_username: sender_username.into(),
        }
    }
}

/// The peer the local user is actively chatting with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveConversation {
    pub peer_user_id: UserId,
    pub peer_username: String,
}

/// One line of a private conversation's history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub sender_username: String,
    pub message_content: String,
    /// RFC 3339 timestamp as sent by the server
    pub sent_at: String,
}

/// Identity supplied by the authentication collaborator
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub user_id: Option<UserId>,
    /// Display name used as `senderUsername` on outbound messages
    pub username: Option<String>,
}

impl Credentials {
    pub fn authenticated(
        token: impl Into<String>,
        user_id: UserId,
        username: impl Into<String>,
    ) -> Self {
        Self {
            token: Some(token.into()),
            user_id: Some(user_id),
            username: Some(username.into()),
        }
    }

    /// Both the token and the user id are present
    pub fn is_complete(&self) -> bool {
        self.token.is_some() && self.user_id.is_some()
    }

    pub fn display_name(&self) -> String {
        match (&self.username, self.user_id) {
            (Some(username), _) => username.clone(),
            (None, Some(user_id)) => format!("user-{}", user_id),
            (None, None) => "anonymous".to_string(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .finish()
    }
}
