//! Wires the terminal client together and runs the session loop.

use std::sync::Arc;

use irori_shared::time::SystemClock;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    config::ClientConfig,
    domain::Credentials,
    error::ClientError,
    infrastructure::{HttpHistoryApi, WebSocketConnector},
    session::{ChatSession, Collaborators, Flow, SessionEvent, UserAction},
    ui::{
        InputError, ReadinessFlag, TerminalView, input::HELP, parse_input, prompt::prompt_for,
    },
};

/// Run the interactive chat client until the user quits
pub async fn run_client(
    config: ClientConfig,
    credentials: Credentials,
) -> Result<(), Box<dyn std::error::Error>> {
    if !credentials.is_complete() {
        return Err(Box::new(ClientError::MissingCredentials));
    }

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let readiness = ReadinessFlag::new();
    let username = credentials.display_name();

    let collaborators = Collaborators {
        connector: Arc::new(WebSocketConnector::new()),
        history: Arc::new(HttpHistoryApi::new(config.http_base_url())),
        clock: Arc::new(SystemClock),
        view: TerminalView::new(readiness.clone(), credentials.user_id, username.clone()),
        readiness,
    };
    let mut session = ChatSession::create(config, credentials, collaborators, events_tx.clone());

    spawn_input_thread(username, events_tx.clone());
    events_tx.send(SessionEvent::User(UserAction::EnterChat))?;

    while let Some(event) = events_rx.recv().await {
        if session.handle(event) == Flow::Exit {
            break;
        }
    }

    tracing::info!("Client session ended");
    Ok(())
}

/// Read lines on a blocking thread (rustyline is synchronous) and forward
/// them as user actions. Ctrl+C and Ctrl+D quit.
fn spawn_input_thread(username: String, events: mpsc::UnboundedSender<SessionEvent>) {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                let _ = events.send(SessionEvent::User(UserAction::Quit));
                return;
            }
        };

        let prompt = prompt_for(&username);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line).ok();

                    let action = match parse_input(line) {
                        Ok(action) => action,
                        Err(InputError::Help) => {
                            println!("{}", HELP);
                            continue;
                        }
                        Err(e) => {
                            println!("{}", e);
                            continue;
                        }
                    };
                    let quit = action == UserAction::Quit;
                    if events.send(SessionEvent::User(action)).is_err() || quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    tracing::info!("Input closed, quitting");
                    let _ = events.send(SessionEvent::User(UserAction::Quit));
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    let _ = events.send(SessionEvent::User(UserAction::Quit));
                    break;
                }
            }
        }
    });
}
