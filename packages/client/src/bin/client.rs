//! Terminal chat client.
//!
//! Connects to the chat server's WebSocket endpoint with an auth token,
//! shows the user roster and incoming messages, and sends what you type.
//! Reconnects automatically when the connection drops (linear backoff,
//! 5 attempts by default).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-client -- --token <token> --user-id 1 --username alice
//! cargo run --bin irori-client -- -H chat.example.com:8080 -t <token> -i 2 -u bob
//! ```

use std::time::Duration;

use clap::Parser;

use irori_client::{ClientConfig, domain::Credentials};
use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori-client")]
#[command(about = "Real-time chat client with presence and private conversations", long_about = None)]
struct Args {
    /// Chat server host and port
    #[arg(short = 'H', long, default_value = "localhost:8080")]
    host: String,

    /// Session token issued at login
    #[arg(short = 't', long)]
    token: String,

    /// Numeric id of the logged-in user
    #[arg(short = 'i', long)]
    user_id: i64,

    /// Display name sent with outbound messages
    #[arg(short = 'u', long)]
    username: String,

    /// Base delay of the reconnect backoff, in seconds
    #[arg(long, default_value_t = 5)]
    reconnect_delay_secs: u64,

    /// Reconnect attempts before giving up
    #[arg(long, default_value_t = 5)]
    max_reconnect_attempts: u32,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = ClientConfig {
        reconnect_base_delay: Duration::from_secs(args.reconnect_delay_secs),
        max_reconnect_attempts: args.max_reconnect_attempts,
        ..ClientConfig::with_host(args.host)
    };
    let credentials = Credentials::authenticated(args.token, args.user_id, args.username);

    if let Err(e) = irori_client::run_client(config, credentials).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
