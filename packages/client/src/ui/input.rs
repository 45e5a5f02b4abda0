//! Parsing of terminal input lines into user actions.

use thiserror::Error;

use crate::{domain::UserId, session::UserAction};

/// Help text listing the available commands
pub const HELP: &str = "Commands:
  /chat <user id> <username>  focus a private conversation (again to leave it)
  /enter                      show the chat view and connect
  /leave                      leave the chat view and disconnect
  /reconnect                  connect again after the connection failed
  /quit                       exit
Anything else is sent as a message.";

/// Errors for input lines that cannot be turned into an action
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown command '/{0}'. Type /help for the list of commands.")]
    UnknownCommand(String),

    #[error("Usage: /chat <user id> <username>")]
    ChatUsage,

    #[error("Invalid user id '{0}'")]
    InvalidUserId(String),

    /// The caller prints [`HELP`]
    #[error("help requested")]
    Help,
}

/// Turn one line of input into a [`UserAction`]
pub fn parse_input(line: &str) -> Result<UserAction, InputError> {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Ok(UserAction::SendText(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    match name {
        "chat" => {
            let Some(id) = parts.next() else {
                return Err(InputError::ChatUsage);
            };
            let peer_username = parts.collect::<Vec<_>>().join(" ");
            if peer_username.is_empty() {
                return Err(InputError::ChatUsage);
            }
            let peer_user_id: UserId = id
                .parse()
                .map_err(|_| InputError::InvalidUserId(id.to_string()))?;
            Ok(UserAction::ToggleConversation {
                peer_user_id,
                peer_username,
            })
        }
        "enter" => Ok(UserAction::EnterChat),
        "leave" => Ok(UserAction::LeaveChat),
        "reconnect" => Ok(UserAction::Reconnect),
        "quit" | "exit" => Ok(UserAction::Quit),
        "help" => Err(InputError::Help),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_sent() {
        // テスト項目: コマンドでない入力はメッセージとして送信される
        // given (前提条件):
        let line = "  hello there  ";

        // when (操作):
        let result = parse_input(line);

        // then (期待する結果):
        assert_eq!(result, Ok(UserAction::SendText("hello there".to_string())));
    }

    #[test]
    fn test_chat_command_toggles_conversation() {
        // テスト項目: /chat はユーザーIDと名前で会話をトグルする
        // given (前提条件):
        let line = "/chat 5 eve smith";

        // when (操作):
        let result = parse_input(line);

        // then (期待する結果):
        assert_eq!(
            result,
            Ok(UserAction::ToggleConversation {
                peer_user_id: 5,
                peer_username: "eve smith".to_string(),
            })
        );
    }

    #[test]
    fn test_chat_command_requires_id_and_name() {
        // テスト項目: /chat の引数が足りない場合は使い方を返す
        // given (前提条件):
        // when (操作):
        // then (期待する結果):
        assert_eq!(parse_input("/chat"), Err(InputError::ChatUsage));
        assert_eq!(parse_input("/chat 5"), Err(InputError::ChatUsage));
    }

    #[test]
    fn test_chat_command_rejects_non_numeric_id() {
        // テスト項目: 数値でないユーザーIDはエラーになる
        // given (前提条件):
        let line = "/chat eve 5";

        // when (操作):
        let result = parse_input(line);

        // then (期待する結果):
        assert_eq!(result, Err(InputError::InvalidUserId("eve".to_string())));
    }

    #[test]
    fn test_simple_commands() {
        // テスト項目: 引数なしのコマンドが対応するアクションになる
        // given (前提条件):
        // when (操作):
        // then (期待する結果):
        assert_eq!(parse_input("/enter"), Ok(UserAction::EnterChat));
        assert_eq!(parse_input("/leave"), Ok(UserAction::LeaveChat));
        assert_eq!(parse_input("/reconnect"), Ok(UserAction::Reconnect));
        assert_eq!(parse_input("/quit"), Ok(UserAction::Quit));
        assert_eq!(parse_input("/exit"), Ok(UserAction::Quit));
        assert_eq!(parse_input("/help"), Err(InputError::Help));
    }

    #[test]
    fn test_unknown_command() {
        // テスト項目: 未知のコマンドはエラーになる
        // given (前提条件):
        let line = "/dance";

        // when (操作):
        let result = parse_input(line);

        // then (期待する結果):
        assert_eq!(result, Err(InputError::UnknownCommand("dance".to_string())));
    }
}
