//! Routes decoded inbound events to the presence registry and the view.

use std::time::Duration;

use crate::{
    domain::{
        ChatEvent, ChatMessage, InboundEvent, MergeOutcome, MessageKind, PresenceRegistry, UserId,
    },
    ui::ChatView,
};

/// What the dispatcher did with an event, so the session can follow up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// Message rendered; a notification is due
    Rendered(ChatMessage),
    /// Broadcast suppressed by the dedup window
    DuplicateBroadcast,
    /// Roster replaced, holding this many users
    RosterReplaced(usize),
    /// One roster entry updated in place
    RosterUpdated(UserId),
    /// Status change for a user the roster does not know; a full resync is due
    ResyncRequired(UserId),
    /// Unknown event type, dropped
    Ignored(String),
}

#[derive(Debug)]
pub struct Dispatcher {
    dedup_window_ms: i64,
    /// Arrival time of the last rendered broadcast
    last_broadcast_at: Option<i64>,
}

impl Dispatcher {
    pub fn new(dedup_window: Duration) -> Self {
        Self {
            dedup_window_ms: i64::try_from(dedup_window.as_millis()).unwrap_or(i64::MAX),
            last_broadcast_at: None,
        }
    }

    pub fn dispatch<V: ChatView + ?Sized>(
        &mut self,
        inbound: InboundEvent,
        presence: &mut PresenceRegistry,
        view: &mut V,
    ) -> Dispatched {
        let InboundEvent { event, received_at } = inbound;
        match event {
            ChatEvent::Message(message) => {
                if message.kind == MessageKind::Broadcast {
                    if self.is_duplicate_broadcast(received_at) {
                        tracing::debug!(
                            "Suppressing duplicate broadcast from {}",
                            message.sender_username
                        );
                        return Dispatched::DuplicateBroadcast;
                    }
                    self.last_broadcast_at = Some(received_at);
                }
                view.render_message(&message, received_at);
                Dispatched::Rendered(message)
            }
            ChatEvent::OnlineUsers(users) => {
                presence.replace_all(users);
                view.render_roster(presence.users());
                tracing::debug!(
                    "Roster replaced: {} users, {} online",
                    presence.len(),
                    presence.online_count()
                );
                Dispatched::RosterReplaced(presence.len())
            }
            ChatEvent::UserStatusChange(user) => match presence.merge_one(user) {
                MergeOutcome::Updated(user) => {
                    view.update_roster_entry(&user);
                    Dispatched::RosterUpdated(user.user_id)
                }
                MergeOutcome::Unknown(user_id) => {
                    tracing::info!("User {} not in roster, requesting full list", user_id);
                    Dispatched::ResyncRequired(user_id)
                }
            },
            ChatEvent::Unknown(tag) => {
                tracing::warn!("Unknown message type: {}", tag);
                Dispatched::Ignored(tag)
            }
        }
    }

    /// An arrival earlier than the reference means the clock stepped back; not a duplicate
    fn is_duplicate_broadcast(&self, received_at: i64) -> bool {
        self.last_broadcast_at.is_some_and(|last| {
            let elapsed = received_at.saturating_sub(last);
            (0..self.dedup_window_ms).contains(&elapsed)
        })
    }
}
