//! Infrastructure layer: wire formats and network implementations of the
//! domain's collaborator traits.

pub mod dto;
pub mod history;
pub mod websocket;

pub use history::HttpHistoryApi;
pub use websocket::WebSocketConnector;
