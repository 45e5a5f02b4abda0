//! Transport seam between the chat session and the network.
//!
//! A [`Connector`] opens connections in the background and reports everything
//! that happens on them as [`TransportEvent`]s posted to the session's event
//! channel. The session writes through a [`Link`], a thin handle over the
//! connection's outbound command channel.

use tokio::sync::mpsc;

use crate::{error::ClientError, session::SessionEvent};

/// Parameters of a single connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    /// Full endpoint URL including the credential
    pub url: String,
    /// Attempt generation; events of older generations are stale
    pub generation: u64,
}

/// What a connection reports back to the session
#[derive(Debug)]
pub enum TransportEvent {
    /// Handshake complete; frames can be written through the link
    Opened(Link),
    /// Text frame received
    Frame(String),
    /// Connection closed (by either side, or dropped)
    Closed { code: Option<u16>, reason: String },
    /// Connection could not be established
    Failed(String),
}

/// Commands accepted by a live connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkCommand {
    /// Write a text frame
    Frame(String),
    /// Start the closing handshake
    Close { code: u16, reason: String },
}

/// Write half of a live connection
#[derive(Debug)]
pub struct Link {
    commands: mpsc::UnboundedSender<LinkCommand>,
}

impl Link {
    pub fn new(commands: mpsc::UnboundedSender<LinkCommand>) -> Self {
        Self { commands }
    }

    /// Create a link together with the receiving end of its command channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LinkCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Queue a text frame for the connection's writer
    pub fn send_text(&self, text: String) -> Result<(), ClientError> {
        self.commands
            .send(LinkCommand::Frame(text))
            .map_err(|_| ClientError::ConnectionError("connection writer has stopped".to_string()))
    }

    /// Request a closing handshake and give up the link
    pub fn close(self, code: u16, reason: &str) -> Result<(), ClientError> {
        self.commands
            .send(LinkCommand::Close {
                code,
                reason: reason.to_string(),
            })
            .map_err(|_| ClientError::ConnectionError("connection writer has stopped".to_string()))
    }
}

/// Posts transport events for one connection generation into the session channel
#[derive(Debug, Clone)]
pub struct TransportSink {
    generation: u64,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl TransportSink {
    pub fn new(generation: u64, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { generation, events }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Post an event. Returns `false` once the session has gone away.
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.events
            .send(SessionEvent::Transport {
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}

/// Opens chat connections.
///
/// `open` must not block: implementations spawn the connection and report its
/// progress through the sink.
#[cfg_attr(test, mockall::automock)]
pub trait Connector: Send + Sync {
    fn open(&self, request: OpenRequest, sink: TransportSink);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_link_send_text_forwards_frame() {
        // テスト項目: Link から送信したフレームがコマンドチャネルに届く
        // given (前提条件):
        let (link, mut rx) = Link::channel();

        // when (操作):
        let result = link.send_text("hello".to_string());

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some(LinkCommand::Frame("hello".to_string())));
    }

    #[tokio::test]
    async fn test_link_send_after_writer_stopped_fails() {
        // テスト項目: 書き込み側が終了した後の送信はエラーになる
        // given (前提条件):
        let (link, rx) = Link::channel();
        drop(rx);

        // when (操作):
        let result = link.send_text("hello".to_string());

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_sink_tags_events_with_generation() {
        // テスト項目: TransportSink はイベントに世代番号を付与する
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = TransportSink::new(7, tx);

        // when (操作):
        let delivered = sink.emit(TransportEvent::Frame("{}".to_string()));

        // then (期待する結果):
        assert!(delivered);
        match rx.recv().await {
            Some(SessionEvent::Transport { generation, event }) => {
                assert_eq!(generation, 7);
                assert!(matches!(event, TransportEvent::Frame(ref text) if text == "{}"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
