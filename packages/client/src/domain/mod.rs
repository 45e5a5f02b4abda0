//! Domain model of the chat synchronization engine.
//!
//! Everything in this module is plain data plus pure state transitions.
//! I/O lives in `infrastructure`, orchestration in `session`.

pub mod connection;
pub mod conversation;
pub mod history;
pub mod model;
pub mod notification;
pub mod outbox;
pub mod presence;
pub mod queue;

pub use connection::{ConnectionState, DELIBERATE_CLOSE_CODE, ScheduledReconnect, next_reconnect};
pub use conversation::{ConversationTracker, ToggleOutcome};
pub use history::HistoryApi;
pub use model::{
    ActiveConversation, ChatEvent, ChatMessage, Credentials, HistoryEntry, InboundEvent, MessageKind,
    OutboundMessage, UserId, UserPresence,
};
pub use notification::{Notification, NotificationCenter, NotificationId};
pub use outbox::{DeliveryStatus, MessageId, Outbox};
pub use presence::{MergeOutcome, PresenceRegistry};
pub use queue::{MessageQueue, QueuedEvent};
