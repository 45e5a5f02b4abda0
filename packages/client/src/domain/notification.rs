//! Transient new-message notifications.

use super::model::{ChatMessage, MessageKind};

pub type NotificationId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub text: String,
    pub created_at: i64,
}

impl Notification {
    /// Notification text for a received chat message
    pub fn text_for(message: &ChatMessage) -> String {
        match message.kind {
            MessageKind::Private => format!("New message from {}", message.sender_username),
            MessageKind::Broadcast => {
                format!("Broadcast message from {}", message.sender_username)
            }
        }
    }
}

/// Currently visible notifications. Expiry is driven externally by timers.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    next_id: NotificationId,
    active: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: String, now_millis: i64) -> Notification {
        self.next_id += 1;
        let notification = Notification {
            id: self.next_id,
            text,
            created_at: now_millis,
        };
        self.active.push(notification.clone());
        notification
    }

    /// Remove an expired notification. Returns `false` if it was already gone.
    pub fn expire(&mut self, id: NotificationId) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        self.active.len() != before
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn active(&self) -> &[Notification] {
        &self.active
    }
}
