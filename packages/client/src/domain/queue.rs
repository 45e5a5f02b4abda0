//! Bounded FIFO for inbound events that arrive before the chat view is mounted.

use std::collections::VecDeque;

use super::model::InboundEvent;

/// An inbound event plus its arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedEvent {
    pub sequence: u64,
    pub inbound: InboundEvent,
}

/// Drop-oldest queue; recent events are worth more than stale ones
#[derive(Debug)]
pub struct MessageQueue {
    events: VecDeque<QueuedEvent>,
    capacity: usize,
    next_sequence: u64,
}

impl MessageQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            next_sequence: 0,
        }
    }

    /// Append an event, evicting the oldest entry when over capacity.
    ///
    /// Returns the evicted entry, if any.
    pub fn enqueue(&mut self, inbound: InboundEvent) -> Option<QueuedEvent> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.events.push_back(QueuedEvent { sequence, inbound });

        if self.events.len() > self.capacity {
            self.events.pop_front()
        } else {
            None
        }
    }

    /// Remove and return every queued event in arrival order
    pub fn drain(&mut self) -> Vec<QueuedEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
