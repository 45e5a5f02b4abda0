//! Events consumed by the session loop.

use crate::{
    domain::{HistoryEntry, NotificationId, UserId},
    transport::TransportEvent,
};

/// Everything the session reacts to, funneled through a single channel
#[derive(Debug)]
pub enum SessionEvent {
    /// Something happened on a connection of the given generation
    Transport { generation: u64, event: TransportEvent },
    /// Backoff elapsed for the reconnect scheduled after losing `generation`
    ReconnectDue { generation: u64 },
    /// Delayed presence-list request after the connection opened
    ResyncDue,
    /// A notification reached the end of its lifetime
    NotificationExpired(NotificationId),
    /// History request number `request` for `peer_user_id` finished
    HistoryLoaded {
        request: u64,
        peer_user_id: UserId,
        result: Result<Vec<HistoryEntry>, String>,
    },
    /// Input from the user
    User(UserAction),
}

/// User-initiated actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Show the chat view and connect
    EnterChat,
    /// Navigate away from the chat view and close the connection
    LeaveChat,
    /// Send a message to the active conversation, or broadcast
    SendText(String),
    /// Focus or unfocus a private conversation
    ToggleConversation {
        peer_user_id: UserId,
        peer_username: String,
    },
    /// Connect again, e.g. after reconnect attempts were exhausted
    Reconnect,
    /// Tear down the session and stop the loop
    Quit,
}

/// Whether the session loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}
