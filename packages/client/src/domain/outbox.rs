//! Delivery status of locally composed messages.
//!
//! Outbound messages are rendered before the send result is known. The outbox
//! records what happened to each of them so the view can reflect failures
//! instead of leaving a message that was never delivered looking sent.

use std::collections::VecDeque;

use uuid::Uuid;

use super::model::OutboundMessage;

pub type MessageId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Rendered, not yet handed to the transport
    Pending,
    /// Handed to the live transport
    Sent,
    /// The send was rejected (e.g. not connected)
    Failed,
}

#[derive(Debug, Clone)]
pub struct OutgoingEntry {
    pub id: MessageId,
    pub message: OutboundMessage,
    pub status: DeliveryStatus,
}

/// Bounded log of outbound messages and their status
#[derive(Debug)]
pub struct Outbox {
    entries: VecDeque<OutgoingEntry>,
    capacity: usize,
}

impl Outbox {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Start tracking a message as `Pending`
    pub fn track(&mut self, message: OutboundMessage) -> MessageId {
        let id = Uuid::new_v4();
        self.entries.push_back(OutgoingEntry {
            id,
            message,
            status: DeliveryStatus::Pending,
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        id
    }

    /// Update the status of a tracked message. Returns `false` if unknown.
    pub fn mark(&mut self, id: MessageId, status: DeliveryStatus) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }

    pub fn status(&self, id: MessageId) -> Option<DeliveryStatus> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.status)
    }

    pub fn failed(&self) -> impl Iterator<Item = &OutgoingEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == DeliveryStatus::Failed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outbound(text: &str) -> OutboundMessage {
        OutboundMessage::broadcast(text, 1, "alice")
    }

    #[test]
    fn test_track_starts_pending() {
        // テスト項目: 追跡開始時のステータスは Pending
        // given (前提条件):
        let mut outbox = Outbox::new(10);

        // when (操作):
        let id = outbox.track(outbound("hi"));

        // then (期待する結果):
        assert_eq!(outbox.status(id), Some(DeliveryStatus::Pending));
    }

    #[test]
    fn test_mark_updates_status() {
        // テスト項目: ステータスを Failed に更新できる
        // given (前提条件):
        let mut outbox = Outbox::new(10);
        let id = outbox.track(outbound("hi"));

        // when (操作):
        let updated = outbox.mark(id, DeliveryStatus::Failed);

        // then (期待する結果):
        assert!(updated);
        assert_eq!(outbox.status(id), Some(DeliveryStatus::Failed));
        assert_eq!(outbox.failed().count(), 1);
    }

    #[test]
    fn test_mark_unknown_id() {
        // テスト項目: 未知の ID の更新は false を返す
        // given (前提条件):
        let mut outbox = Outbox::new(10);

        // when (操作):
        let updated = outbox.mark(Uuid::new_v4(), DeliveryStatus::Sent);

        // then (期待する結果):
        assert!(!updated);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        // テスト項目: 上限を超えると最も古いエントリが破棄される
        // given (前提条件):
        let mut outbox = Outbox::new(2);
        let first = outbox.track(outbound("1"));

        // when (操作):
        outbox.track(outbound("2"));
        outbox.track(outbound("3"));

        // then (期待する結果):
        assert_eq!(outbox.len(), 2);
        assert_eq!(outbox.status(first), None);
    }
}
