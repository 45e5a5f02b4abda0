//! WebSocket implementation of [`Connector`].
//!
//! Each connection runs as its own task:
//! - a writer task drains the [`Link`] command channel into the socket sink
//! - the connection task reads the socket stream and posts frames to the session
//!
//! When the read side ends, the writer is aborted and a single
//! [`TransportEvent::Closed`] is posted.

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::protocol::{CloseFrame, Message, frame::coding::CloseCode},
};

use crate::transport::{Connector, Link, LinkCommand, OpenRequest, TransportEvent, TransportSink};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens chat connections with `tokio-tungstenite`
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl WebSocketConnector {
    pub fn new() -> Self {
        Self
    }
}

impl Connector for WebSocketConnector {
    fn open(&self, request: OpenRequest, sink: TransportSink) {
        tokio::spawn(run_connection(request, sink));
    }
}

async fn run_connection(request: OpenRequest, sink: TransportSink) {
    let ws_stream = match connect_async(request.url.as_str()).await {
        Ok((ws_stream, _response)) => ws_stream,
        Err(e) => {
            tracing::warn!(
                "Failed to connect to chat server (generation {}): {}",
                request.generation,
                e
            );
            sink.emit(TransportEvent::Failed(e.to_string()));
            return;
        }
    };

    tracing::info!(
        "Connected to chat server (generation {})",
        request.generation
    );

    let (write, read) = ws_stream.split();
    let (link, commands) = Link::channel();
    if !sink.emit(TransportEvent::Opened(link)) {
        tracing::debug!("Session is gone, dropping new connection");
        return;
    }

    let writer = writer_loop(commands, write);
    let closed = reader_loop(read, &sink).await;
    writer.abort();

    if let Some(closed) = closed {
        sink.emit(closed);
    }
}

/// Spawns a task that forwards link commands to the WebSocket sink.
fn writer_loop(
    mut commands: mpsc::UnboundedReceiver<LinkCommand>,
    mut write: SplitSink<WsStream, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(command) = commands.recv().await {
            match command {
                LinkCommand::Frame(text) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        tracing::warn!("Failed to send frame: {}", e);
                        break;
                    }
                }
                LinkCommand::Close { code, reason } => {
                    let frame = CloseFrame {
                        code: CloseCode::from(code),
                        reason: reason.into(),
                    };
                    if let Err(e) = write.send(Message::Close(Some(frame))).await {
                        tracing::debug!("Failed to send close frame: {}", e);
                    }
                    break;
                }
            }
        }
    })
}

/// Reads until the connection ends.
///
/// Returns the closing event, or `None` if the session went away first.
async fn reader_loop(
    mut read: SplitStream<WsStream>,
    sink: &TransportSink,
) -> Option<TransportEvent> {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => {
                if !sink.emit(TransportEvent::Frame(text.as_str().to_string())) {
                    return None;
                }
            }
            Ok(Message::Binary(data)) => {
                tracing::debug!("Ignoring {} bytes of binary data", data.len());
            }
            Ok(Message::Close(frame)) => {
                let (code, reason) = match frame {
                    Some(frame) => (Some(u16::from(frame.code)), frame.reason.as_str().to_string()),
                    None => (None, String::new()),
                };
                tracing::info!("Server closed the connection (code: {:?})", code);
                return Some(TransportEvent::Closed { code, reason });
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                return Some(TransportEvent::Closed {
                    code: None,
                    reason: e.to_string(),
                });
            }
        }
    }

    Some(TransportEvent::Closed {
        code: None,
        reason: "connection ended".to_string(),
    })
}
