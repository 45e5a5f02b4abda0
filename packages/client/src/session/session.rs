//! The chat session: connection lifecycle, inbound routing, outbound sends.
//!
//! A [`ChatSession`] is owned by exactly one loop and mutated only through
//! [`ChatSession::handle`] (plus the direct operations the loop may call).
//! Transport I/O, timers and history requests run as tokio tasks that post
//! [`SessionEvent`]s back into the loop's channel.

use std::sync::Arc;

use irori_shared::time::Clock;
use tokio::sync::mpsc;

use super::{
    dispatcher::{Dispatched, Dispatcher},
    event::{Flow, SessionEvent, UserAction},
    tasks::{PendingTasks, TaskKey},
};
use crate::{
    config::ClientConfig,
    domain::{
        ChatMessage, ConnectionState, ConversationTracker, Credentials, DELIBERATE_CLOSE_CODE,
        DeliveryStatus, HistoryApi, HistoryEntry, InboundEvent, MessageId, MessageQueue,
        Notification, NotificationCenter, NotificationId, OutboundMessage, Outbox,
        PresenceRegistry, ScheduledReconnect, ToggleOutcome, UserId, next_reconnect,
    },
    error::ClientError,
    infrastructure::dto::{decode_chat_event, encode_outbound, encode_presence_request},
    transport::{Connector, Link, OpenRequest, TransportEvent, TransportSink},
    ui::{ChatView, ReadinessFlag},
};

const RECONNECT_EXHAUSTED_NOTICE: &str =
    "Connection lost. Maximum reconnection attempts reached; use /reconnect to try again.";

/// Result of a connect request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A new connection attempt was started
    Started,
    /// Already open or connecting; nothing was done
    AlreadyActive,
    /// No token or user id; nothing was done
    MissingCredentials,
}

/// Everything the session talks to
pub struct Collaborators<V> {
    pub connector: Arc<dyn Connector>,
    pub history: Arc<dyn HistoryApi>,
    pub clock: Arc<dyn Clock>,
    pub view: V,
    /// The flag `view` flips on mount and unmount
    pub readiness: ReadinessFlag,
}

pub struct ChatSession<V: ChatView> {
    config: ClientConfig,
    credentials: Credentials,
    connector: Arc<dyn Connector>,
    history: Arc<dyn HistoryApi>,
    clock: Arc<dyn Clock>,
    view: V,
    readiness: ReadinessFlag,
    events: mpsc::UnboundedSender<SessionEvent>,
    tasks: PendingTasks,

    state: ConnectionState,
    generation: u64,
    link: Option<Link>,
    reconnect_attempts: u32,
    scheduled_reconnect: Option<ScheduledReconnect>,
    history_request: u64,

    queue: MessageQueue,
    dispatcher: Dispatcher,
    presence: PresenceRegistry,
    conversation: ConversationTracker,
    notifications: NotificationCenter,
    outbox: Outbox,
}

impl<V: ChatView> ChatSession<V> {
    pub fn create(
        config: ClientConfig,
        credentials: Credentials,
        collaborators: Collaborators<V>,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let Collaborators {
            connector,
            history,
            clock,
            view,
            readiness,
        } = collaborators;

        Self {
            queue: MessageQueue::new(config.queue_capacity),
            dispatcher: Dispatcher::new(config.broadcast_dedup_window),
            outbox: Outbox::new(config.outbox_capacity),
            presence: PresenceRegistry::new(),
            conversation: ConversationTracker::new(),
            notifications: NotificationCenter::new(),
            tasks: PendingTasks::new(events.clone()),
            state: ConnectionState::Idle,
            generation: 0,
            link: None,
            reconnect_attempts: 0,
            scheduled_reconnect: None,
            history_request: 0,
            config,
            credentials,
            connector,
            history,
            clock,
            view,
            readiness,
            events,
        }
    }

    /// Apply one event. Returns [`Flow::Exit`] once the session has been torn down.
    pub fn handle(&mut self, event: SessionEvent) -> Flow {
        match event {
            SessionEvent::Transport { generation, event } => self.on_transport(generation, event),
            SessionEvent::ReconnectDue { generation } => self.on_reconnect_due(generation),
            SessionEvent::ResyncDue => self.on_resync_due(),
            SessionEvent::NotificationExpired(id) => self.on_notification_expired(id),
            SessionEvent::HistoryLoaded {
                request,
                peer_user_id,
                result,
            } => self.on_history_loaded(request, peer_user_id, result),
            SessionEvent::User(action) => return self.on_user_action(action),
        }
        Flow::Continue
    }

    /// Start a connection unless one is already open or in progress
    pub fn connect(&mut self, credentials: Credentials) -> ConnectOutcome {
        if self.state.is_active() {
            tracing::debug!("Connection is already {}, ignoring connect", self.state);
            return ConnectOutcome::AlreadyActive;
        }
        if !credentials.is_complete() {
            tracing::error!("Cannot connect: token or user id is missing, please log in");
            return ConnectOutcome::MissingCredentials;
        }

        self.credentials = credentials;
        self.cancel_reconnect();
        if self.state == ConnectionState::Failed {
            self.reconnect_attempts = 0;
        }
        self.open_transport();
        ConnectOutcome::Started
    }

    /// Close the connection on purpose. Never followed by a reconnect.
    pub fn disconnect(&mut self) {
        self.cancel_reconnect();
        self.tasks.cancel(TaskKey::PresenceResync);

        match self.state {
            ConnectionState::Open => match self.link.take() {
                Some(link) => {
                    tracing::info!("Closing chat connection");
                    self.state = ConnectionState::Closing;
                    if let Err(e) = link.close(DELIBERATE_CLOSE_CODE, "navigating away") {
                        tracing::debug!("Connection already gone: {}", e);
                        self.state = ConnectionState::Closed;
                    }
                }
                None => self.state = ConnectionState::Closed,
            },
            ConnectionState::Connecting => {
                tracing::info!("Abandoning connection attempt {}", self.generation);
                // A late `Opened` for this generation is now stale and gets closed
                self.generation += 1;
                self.state = ConnectionState::Closed;
            }
            ConnectionState::Closed | ConnectionState::Failed => {
                self.state = ConnectionState::Closed;
            }
            ConnectionState::Idle | ConnectionState::Closing => {}
        }
    }

    /// Write one message to the live connection
    pub fn send(&self, message: &OutboundMessage) -> Result<(), ClientError> {
        if self.state != ConnectionState::Open || self.link.is_none() {
            return Err(ClientError::NotConnected(self.state));
        }
        let json = encode_outbound(message)?;
        self.write_frame(json)
    }

    /// Address `text` to the active conversation (or everyone), render it
    /// optimistically and send it. Returns `None` for blank input.
    pub fn send_text(&mut self, text: &str) -> Option<MessageId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let Some(user_id) = self.credentials.user_id else {
            tracing::error!("Cannot send: current user id is missing");
            return None;
        };

        let message = self
            .conversation
            .address(text, user_id, &self.credentials.display_name());
        let id = self.outbox.track(message.clone());
        self.view.render_outgoing(id, &message);

        let status = match self.send(&message) {
            Ok(()) => DeliveryStatus::Sent,
            Err(e) => {
                tracing::error!("Error sending message: {}", e);
                DeliveryStatus::Failed
            }
        };
        self.outbox.mark(id, status);
        self.view.mark_outgoing(id, status);
        Some(id)
    }

    /// Focus a private conversation, or clear it when `peer_user_id` is already focused
    pub fn toggle_conversation(&mut self, peer_user_id: UserId, peer_username: &str) -> ToggleOutcome {
        let outcome = self.conversation.toggle(peer_user_id, peer_username);
        match &outcome {
            ToggleOutcome::Cleared => {
                self.tasks.cancel(TaskKey::History);
                self.view.clear_messages();
                self.view.set_conversation(None);
            }
            ToggleOutcome::Focused(active) => {
                self.view.clear_messages();
                self.view.set_conversation(Some(active));
                self.load_history(active.peer_user_id);
            }
        }
        outcome
    }

    /// Mount the view, replay queued events and connect
    pub fn enter_chat(&mut self) {
        self.view.mount();
        if self.readiness.is_ready() {
            self.drain_queue();
        } else {
            tracing::warn!("Chat view did not signal readiness; events stay queued");
        }

        let was_open = self.state == ConnectionState::Open;
        self.connect(self.credentials.clone());
        if was_open {
            self.request_presence();
        }
    }

    /// Unmount the view first so later events are queued, then close
    pub fn leave_chat(&mut self) {
        self.view.unmount();
        self.disconnect();
    }

    /// Close everything and cancel all background work
    pub fn teardown(&mut self) {
        self.view.unmount();
        self.disconnect();
        self.tasks.cancel_all();
        self.notifications.clear();
        tracing::info!("Chat session torn down");
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts
    }

    pub fn scheduled_reconnect(&self) -> Option<ScheduledReconnect> {
        self.scheduled_reconnect
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    pub fn conversation(&self) -> &ConversationTracker {
        &self.conversation
    }

    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.active()
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    fn on_user_action(&mut self, action: UserAction) -> Flow {
        match action {
            UserAction::EnterChat => self.enter_chat(),
            UserAction::LeaveChat => self.leave_chat(),
            UserAction::SendText(text) => {
                self.send_text(&text);
            }
            UserAction::ToggleConversation {
                peer_user_id,
                peer_username,
            } => {
                self.toggle_conversation(peer_user_id, &peer_username);
            }
            UserAction::Reconnect => {
                self.connect(self.credentials.clone());
            }
            UserAction::Quit => {
                self.teardown();
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    fn open_transport(&mut self) {
        let Some(token) = self.credentials.token.as_deref() else {
            tracing::error!("Cannot connect: token is missing");
            return;
        };

        self.generation += 1;
        self.state = ConnectionState::Connecting;
        tracing::info!(
            "Connecting to {} (generation {})",
            self.config.host,
            self.generation
        );

        let request = OpenRequest {
            url: self.config.ws_url(token),
            generation: self.generation,
        };
        let sink = TransportSink::new(self.generation, self.events.clone());
        self.connector.open(request, sink);
    }

    fn on_transport(&mut self, generation: u64, event: TransportEvent) {
        if generation != self.generation {
            tracing::debug!(
                "Ignoring event from stale connection {} (current {})",
                generation,
                self.generation
            );
            if let TransportEvent::Opened(link) = event {
                let _ = link.close(DELIBERATE_CLOSE_CODE, "superseded");
            }
            return;
        }

        match event {
            TransportEvent::Opened(link) => self.on_open(link),
            TransportEvent::Frame(text) => self.on_frame(&text),
            TransportEvent::Closed { code, reason } => self.on_close(code, &reason),
            TransportEvent::Failed(error) => self.on_close(None, &error),
        }
    }

    fn on_open(&mut self, link: Link) {
        if self.state != ConnectionState::Connecting {
            tracing::warn!("Connection opened while {}, closing it", self.state);
            let _ = link.close(DELIBERATE_CLOSE_CODE, "unexpected open");
            return;
        }

        tracing::info!("Chat connection established");
        self.state = ConnectionState::Open;
        self.link = Some(link);
        self.reconnect_attempts = 0;
        self.scheduled_reconnect = None;

        self.request_presence();
        self.tasks.schedule(
            TaskKey::PresenceResync,
            self.config.presence_resync_delay,
            SessionEvent::ResyncDue,
        );
    }

    fn on_close(&mut self, code: Option<u16>, reason: &str) {
        self.link = None;
        self.tasks.cancel(TaskKey::PresenceResync);

        match self.state {
            ConnectionState::Closing => {
                tracing::info!("Chat connection closed");
                self.state = ConnectionState::Closed;
            }
            ConnectionState::Open | ConnectionState::Connecting => {
                tracing::warn!("Connection lost (code {:?}): {}", code, reason);
                self.state = ConnectionState::Closed;
                self.schedule_reconnect();
            }
            ConnectionState::Idle | ConnectionState::Closed | ConnectionState::Failed => {
                tracing::debug!("Close reported while {}, ignoring", self.state);
            }
        }
    }

    fn schedule_reconnect(&mut self) {
        match next_reconnect(
            self.reconnect_attempts,
            self.config.max_reconnect_attempts,
            self.config.reconnect_base_delay,
        ) {
            Some(plan) => {
                tracing::info!(
                    "Reconnecting in {:?} (attempt {}/{})",
                    plan.delay,
                    plan.attempt,
                    self.config.max_reconnect_attempts
                );
                self.reconnect_attempts = plan.attempt;
                self.scheduled_reconnect = Some(plan);
                self.tasks.schedule(
                    TaskKey::Reconnect,
                    plan.delay,
                    SessionEvent::ReconnectDue {
                        generation: self.generation,
                    },
                );
            }
            None => {
                tracing::error!(
                    "Failed to reconnect after {} attempts",
                    self.config.max_reconnect_attempts
                );
                self.state = ConnectionState::Failed;
                self.scheduled_reconnect = None;
                self.view.show_connection_notice(RECONNECT_EXHAUSTED_NOTICE);
            }
        }
    }

    fn on_reconnect_due(&mut self, generation: u64) {
        let current = generation == self.generation
            && self.state == ConnectionState::Closed
            && self.scheduled_reconnect.is_some();
        if !current {
            tracing::debug!("Ignoring stale reconnect timer for connection {}", generation);
            return;
        }

        self.tasks.complete(TaskKey::Reconnect);
        self.scheduled_reconnect = None;
        tracing::info!(
            "Attempting to reconnect ({}/{})",
            self.reconnect_attempts,
            self.config.max_reconnect_attempts
        );
        self.open_transport();
    }

    fn cancel_reconnect(&mut self) {
        if self.tasks.cancel(TaskKey::Reconnect) {
            tracing::debug!("Cancelled pending reconnect");
        }
        self.scheduled_reconnect = None;
    }

    fn on_resync_due(&mut self) {
        self.tasks.complete(TaskKey::PresenceResync);
        if self.state == ConnectionState::Open && self.readiness.is_ready() {
            tracing::debug!("Sending delayed request for online users");
            self.request_presence();
        }
    }

    fn on_frame(&mut self, text: &str) {
        let received_at = self.clock.now_millis();
        let event = match decode_chat_event(text) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Discarding inbound frame: {}", e);
                return;
            }
        };
        let inbound = InboundEvent::new(event, received_at);

        if self.readiness.is_ready() {
            self.dispatch(inbound);
        } else {
            tracing::debug!(
                "Chat view not ready, queueing '{}' event",
                inbound.event.type_name()
            );
            if let Some(evicted) = self.queue.enqueue(inbound) {
                tracing::debug!("Queue full, dropped oldest event #{}", evicted.sequence);
            }
        }
    }

    fn drain_queue(&mut self) {
        let queued = self.queue.drain();
        if !queued.is_empty() {
            tracing::info!("Replaying {} queued events", queued.len());
        }
        for entry in queued {
            self.dispatch(entry.inbound);
        }
    }

    fn dispatch(&mut self, inbound: InboundEvent) {
        match self
            .dispatcher
            .dispatch(inbound, &mut self.presence, &mut self.view)
        {
            Dispatched::Rendered(message) => self.notify(&message),
            Dispatched::ResyncRequired(_) => self.request_presence(),
            Dispatched::DuplicateBroadcast
            | Dispatched::RosterReplaced(_)
            | Dispatched::RosterUpdated(_)
            | Dispatched::Ignored(_) => {}
        }
    }

    fn notify(&mut self, message: &ChatMessage) {
        let notification = self
            .notifications
            .push(Notification::text_for(message), self.clock.now_millis());
        self.view.show_notification(&notification);
        self.tasks.schedule(
            TaskKey::Notification(notification.id),
            self.config.notification_ttl,
            SessionEvent::NotificationExpired(notification.id),
        );
    }

    fn on_notification_expired(&mut self, id: NotificationId) {
        self.tasks.complete(TaskKey::Notification(id));
        if self.notifications.expire(id) {
            self.view.dismiss_notification(id);
        }
    }

    fn request_presence(&mut self) {
        let result = encode_presence_request()
            .map_err(ClientError::from)
            .and_then(|json| self.write_frame(json));
        if let Err(e) = result {
            tracing::error!("Unable to request online users: {}", e);
        }
    }

    fn write_frame(&self, json: String) -> Result<(), ClientError> {
        match (&self.state, &self.link) {
            (ConnectionState::Open, Some(link)) => link.send_text(json),
            _ => Err(ClientError::NotConnected(self.state)),
        }
    }

    fn load_history(&mut self, peer_user_id: UserId) {
        let Some(local_user_id) = self.credentials.user_id else {
            tracing::error!("Current user id is missing, cannot load chat history");
            return;
        };

        self.history_request += 1;
        let request = self.history_request;
        let history = Arc::clone(&self.history);
        self.tasks.spawn(TaskKey::History, async move {
            let result = history
                .fetch_history(local_user_id, peer_user_id)
                .await
                .map_err(|e| e.to_string());
            SessionEvent::HistoryLoaded {
                request,
                peer_user_id,
                result,
            }
        });
    }

    fn on_history_loaded(
        &mut self,
        request: u64,
        peer_user_id: UserId,
        result: Result<Vec<HistoryEntry>, String>,
    ) {
        // Refocusing the same peer issues a new request, so the peer alone is not enough
        if request != self.history_request || self.conversation.active_peer() != Some(peer_user_id) {
            tracing::debug!(
                "Discarding history request {} for user {}: conversation changed",
                request,
                peer_user_id
            );
            return;
        }

        self.tasks.complete(TaskKey::History);
        match result {
            Ok(entries) => self.view.render_history(&entries),
            Err(e) => {
                tracing::warn!("Error fetching chat history: {}", e);
                self.view.render_history_error(&e);
            }
        }
    }
}
