//! The seam between the chat session and whatever renders it.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::domain::{
    ActiveConversation, ChatMessage, DeliveryStatus, HistoryEntry, MessageId, Notification,
    NotificationId, OutboundMessage, UserPresence,
};

/// Whether the chat view is mounted and able to render.
///
/// Owned and flipped by the view; the session only reads it.
#[derive(Debug, Clone, Default)]
pub struct ReadinessFlag(Arc<AtomicBool>);

impl ReadinessFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, ready: bool) {
        self.0.store(ready, Ordering::Release);
    }
}

/// Rendering surface driven by the session.
///
/// `mount` must flip the shared [`ReadinessFlag`] to `true` and `unmount`
/// back to `false`.
pub trait ChatView {
    fn mount(&mut self);
    fn unmount(&mut self);

    /// Inbound message, with its arrival time in Unix milliseconds
    fn render_message(&mut self, message: &ChatMessage, received_at: i64);
    /// Locally composed message, shown before the transport confirms it
    fn render_outgoing(&mut self, id: MessageId, message: &OutboundMessage);
    fn mark_outgoing(&mut self, id: MessageId, status: DeliveryStatus);

    /// Replace the whole roster
    fn render_roster(&mut self, users: &[UserPresence]);
    /// Update one roster row in place
    fn update_roster_entry(&mut self, user: &UserPresence);

    /// `None` means no conversation is focused
    fn set_conversation(&mut self, active: Option<&ActiveConversation>);
    fn clear_messages(&mut self);
    fn render_history(&mut self, entries: &[HistoryEntry]);
    fn render_history_error(&mut self, error: &str);

    fn show_notification(&mut self, notification: &Notification);
    fn dismiss_notification(&mut self, id: NotificationId);

    /// Connection-level notice such as "reconnect attempts exhausted"
    fn show_connection_notice(&mut self, notice: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_flag_is_shared_between_clones() {
        // テスト項目: クローンしたフラグは同じ状態を共有する
        // given (前提条件):
        let owner = ReadinessFlag::new();
        let reader = owner.clone();

        // when (操作):
        owner.set(true);

        // then (期待する結果):
        assert!(reader.is_ready());
        owner.set(false);
        assert!(!reader.is_ready());
    }
}
