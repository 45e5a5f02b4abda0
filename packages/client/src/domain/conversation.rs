//! Tracks the active private conversation.

use super::model::{ActiveConversation, OutboundMessage, UserId};

/// Result of toggling a peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Same peer selected again: conversation cleared
    Cleared,
    /// A new peer became active; its history should be loaded
    Focused(ActiveConversation),
}

/// Focus/unfocus toggle for the 1:1 recipient (not a stack)
#[derive(Debug, Default)]
pub struct ConversationTracker {
    active: Option<ActiveConversation>,
}

impl ConversationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, peer_user_id: UserId, peer_username: &str) -> ToggleOutcome {
        if self.active_peer() == Some(peer_user_id) {
            self.active = None;
            return ToggleOutcome::Cleared;
        }

        let active = ActiveConversation {
            peer_user_id,
            peer_username: peer_username.to_string(),
        };
        self.active = Some(active.clone());
        ToggleOutcome::Focused(active)
    }

    pub fn active(&self) -> Option<&ActiveConversation> {
        self.active.as_ref()
    }

    pub fn active_peer(&self) -> Option<UserId> {
        self.active.as_ref().map(|a| a.peer_user_id)
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Address an outbound message: private to the active peer, otherwise broadcast
    pub fn address(
        &self,
        text: &str,
        sender_id: UserId,
        sender_username: &str,
    ) -> OutboundMessage {
        match &self.active {
            Some(active) => {
                OutboundMessage::private(text, active.peer_user_id, sender_id, sender_username)
            }
            None => OutboundMessage::broadcast(text, sender_id, sender_username),
        }
    }
}
