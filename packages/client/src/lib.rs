//! Real-time chat synchronization client.
//!
//! Keeps one WebSocket connection to the chat server alive, reconnecting with
//! a linear backoff, and routes inbound events (messages, presence snapshots
//! and presence deltas) to a view. Events that arrive while the view is not
//! mounted are held in a bounded queue and replayed in order.
//!
//! - [`domain`]: plain data and pure state transitions
//! - [`infrastructure`]: wire DTOs, the WebSocket connector, the HTTP history client
//! - [`session`]: the [`session::ChatSession`] state machine and its event loop types
//! - [`ui`]: the [`ui::ChatView`] seam and the terminal front end

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod runner;
pub mod session;
pub mod transport;
pub mod ui;

pub use config::ClientConfig;
pub use runner::run_client;
