//! Shared fixtures: an in-process axum chat server and a recording view.

#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{
        Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use irori_client::{
    domain::{
        ActiveConversation, ChatMessage, DeliveryStatus, HistoryEntry, MessageId, Notification,
        NotificationId, OutboundMessage, UserPresence,
    },
    session::{ChatSession, SessionEvent},
    ui::{ChatView, ReadinessFlag},
};
use serde::Deserialize;
use tokio::sync::mpsc;

pub const ROSTER: &str = r#"{"type":"onlineUsers","onlineUsers":[{"userId":1,"username":"alice","isOnline":true},{"userId":5,"username":"eve","isOnline":false}]}"#;

/// What the server observed from its clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen {
    Frame(String),
    Closed(Option<u16>),
}

#[derive(Clone)]
struct ServerState {
    seen: mpsc::UnboundedSender<Seen>,
    connections: Arc<AtomicUsize>,
    drop_first_connection: bool,
}

/// Chat server running on an ephemeral port for the duration of a test
pub struct TestServer {
    pub addr: SocketAddr,
    pub seen: mpsc::UnboundedReceiver<Seen>,
    pub connections: Arc<AtomicUsize>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(false).await
    }

    /// The first WebSocket connection is closed by the server right after the upgrade
    pub async fn start_dropping_first_connection() -> Self {
        Self::start_with(true).await
    }

    async fn start_with(drop_first_connection: bool) -> Self {
        let (seen_tx, seen) = mpsc::unbounded_channel();
        let connections = Arc::new(AtomicUsize::new(0));
        let state = ServerState {
            seen: seen_tx,
            connections: Arc::clone(&connections),
            drop_first_connection,
        };

        let app = Router::new()
            .route("/ws", get(websocket_handler))
            .route("/chat-history", get(history_handler))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            seen,
            connections,
        }
    }

    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    pub fn ws_url(&self, token: &str) -> String {
        format!("ws://{}/ws?token={}", self.addr, token)
    }

    pub fn http_base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Wait for the next thing the server saw
    pub async fn next_seen(&mut self) -> Seen {
        tokio::time::timeout(Duration::from_secs(5), self.seen.recv())
            .await
            .expect("server saw nothing in time")
            .expect("server channel closed")
    }
}

#[derive(Debug, Deserialize)]
struct ConnectQuery {
    token: String,
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    if query.token != "valid-token" {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let connection = state.connections.fetch_add(1, Ordering::SeqCst) + 1;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection)))
}

async fn handle_socket(mut socket: WebSocket, state: ServerState, connection: usize) {
    if state.drop_first_connection && connection == 1 {
        let _ = socket
            .send(Message::Close(Some(CloseFrame {
                code: 1011,
                reason: "restarting".into(),
            })))
            .await;
        return;
    }

    while let Some(Ok(message)) = socket.recv().await {
        match message {
            Message::Text(text) => {
                let text = text.as_str().to_string();
                let value: serde_json::Value = serde_json::from_str(&text).unwrap_or_default();
                let _ = state.seen.send(Seen::Frame(text));
                if value["type"] == "onlineUsers" {
                    let _ = socket.send(Message::Text(ROSTER.into())).await;
                }
            }
            Message::Close(frame) => {
                let _ = state.seen.send(Seen::Closed(frame.map(|f| f.code)));
                break;
            }
            _ => {}
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryQuery {
    sender_id: i64,
    receiver_id: i64,
}

async fn history_handler(Query(query): Query<HistoryQuery>) -> Response {
    match query.receiver_id {
        5 => Json(serde_json::json!([
            {
                "id": 1,
                "senderUsername": "eve",
                "message_content": "hi alice",
                "sent_at": "2024-03-15T12:30:00Z"
            },
            {
                "id": 2,
                "senderUsername": "alice",
                "message_content": format!("reply from {}", query.sender_id),
                "sent_at": "2024-03-15T12:31:00Z"
            }
        ]))
        .into_response(),
        6 => Json(serde_json::Value::Null).into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// View that records what it was asked to render
#[derive(Default)]
pub struct RecordingView {
    pub readiness: ReadinessFlag,
    pub messages: Vec<String>,
    pub rosters: Vec<Vec<UserPresence>>,
    pub outgoing: Vec<(MessageId, DeliveryStatus)>,
    pub history: Vec<Vec<HistoryEntry>>,
    pub history_errors: Vec<String>,
    pub notices: Vec<String>,
}

impl RecordingView {
    pub fn new(readiness: ReadinessFlag) -> Self {
        Self {
            readiness,
            ..Self::default()
        }
    }
}

impl ChatView for RecordingView {
    fn mount(&mut self) {
        self.readiness.set(true);
    }
    fn unmount(&mut self) {
        self.readiness.set(false);
    }
    fn render_message(&mut self, message: &ChatMessage, _received_at: i64) {
        self.messages.push(message.message.clone());
    }
    fn render_outgoing(&mut self, _id: MessageId, _message: &OutboundMessage) {}
    fn mark_outgoing(&mut self, id: MessageId, status: DeliveryStatus) {
        self.outgoing.push((id, status));
    }
    fn render_roster(&mut self, users: &[UserPresence]) {
        self.rosters.push(users.to_vec());
    }
    fn update_roster_entry(&mut self, _user: &UserPresence) {}
    fn set_conversation(&mut self, _active: Option<&ActiveConversation>) {}
    fn clear_messages(&mut self) {
        self.messages.clear();
    }
    fn render_history(&mut self, entries: &[HistoryEntry]) {
        self.history.push(entries.to_vec());
    }
    fn render_history_error(&mut self, error: &str) {
        self.history_errors.push(error.to_string());
    }
    fn show_notification(&mut self, _notification: &Notification) {}
    fn dismiss_notification(&mut self, _id: NotificationId) {}
    fn show_connection_notice(&mut self, notice: &str) {
        self.notices.push(notice.to_string());
    }
}

/// Feed session events into `session` until `done` holds
pub async fn drive_until<V, F>(
    session: &mut ChatSession<V>,
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
    mut done: F,
) where
    V: ChatView,
    F: FnMut(&ChatSession<V>) -> bool,
{
    let result = tokio::time::timeout(Duration::from_secs(5), async {
        while !done(session) {
            let event = events.recv().await.expect("session channel closed");
            session.handle(event);
        }
    })
    .await;
    assert!(result.is_ok(), "condition not reached in time");
}
