//! Background work owned by the session: timers and in-flight requests.
//!
//! Tasks never touch session state. They post a [`SessionEvent`] when they
//! finish, and the session keeps their abort handles so teardown can cancel
//! them.

use std::{collections::HashMap, future::Future, time::Duration};

use tokio::{sync::mpsc, task::AbortHandle};

use crate::domain::NotificationId;

use super::event::SessionEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKey {
    /// Reconnect backoff timer
    Reconnect,
    /// Delayed presence-list request
    PresenceResync,
    /// Expiry of one notification
    Notification(NotificationId),
    /// In-flight chat-history request
    History,
}

#[derive(Debug)]
pub struct PendingTasks {
    events: mpsc::UnboundedSender<SessionEvent>,
    handles: HashMap<TaskKey, AbortHandle>,
}

impl PendingTasks {
    pub fn new(events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            events,
            handles: HashMap::new(),
        }
    }

    /// Post `event` after `delay`. Replaces (and cancels) a task with the same key.
    pub fn schedule(&mut self, key: TaskKey, delay: Duration, event: SessionEvent) {
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        });
        self.insert(key, handle.abort_handle());
    }

    /// Run `work` and post the event it resolves to. Replaces a task with the same key.
    pub fn spawn<F>(&mut self, key: TaskKey, work: F)
    where
        F: Future<Output = SessionEvent> + Send + 'static,
    {
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            let event = work.await;
            let _ = events.send(event);
        });
        self.insert(key, handle.abort_handle());
    }

    /// Abort a pending task. Returns `true` if one was registered.
    pub fn cancel(&mut self, key: TaskKey) -> bool {
        match self.handles.remove(&key) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Forget a task whose event has been delivered
    pub fn complete(&mut self, key: TaskKey) {
        self.handles.remove(&key);
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }

    pub fn is_pending(&self, key: TaskKey) -> bool {
        self.handles.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    fn insert(&mut self, key: TaskKey, handle: AbortHandle) {
        if let Some(previous) = self.handles.insert(key, handle) {
            previous.abort();
        }
    }
}
