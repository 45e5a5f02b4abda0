//! Message formatting utilities for terminal display.

use irori_shared::time::{format_rfc3339_local, timestamp_to_local_time};

use crate::domain::{
    ActiveConversation, ChatMessage, DeliveryStatus, HistoryEntry, MessageKind, Notification,
    OutboundMessage, UserId, UserPresence,
};

const RULE: &str = "------------------------------------------------------------";
const DOUBLE_RULE: &str = "============================================================";

/// Message formatter for terminal display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the full roster
    ///
    /// # Arguments
    ///
    /// * `users` - Users in roster order
    /// * `me` - The local user's id (to mark as "me")
    ///
    /// # Returns
    ///
    /// A formatted block listing every user with their online status
    pub fn format_roster(users: &[UserPresence], me: Option<UserId>) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", DOUBLE_RULE));
        output.push_str("Users:\n");

        if users.is_empty() {
            output.push_str("(No users)\n");
        } else {
            for user in users {
                output.push_str(&Self::format_roster_entry(user, me));
                output.push('\n');
            }
        }

        output.push_str(DOUBLE_RULE);
        output.push('\n');
        output
    }

    /// One roster row, e.g. `[5] bob (Online)`
    pub fn format_roster_entry(user: &UserPresence, me: Option<UserId>) -> String {
        let status = if user.is_online { "Online" } else { "Offline" };
        let me_suffix = if me == Some(user.user_id) { " (me)" } else { "" };
        format!(
            "[{}] {}{} ({})",
            user.user_id, user.username, me_suffix, status
        )
    }

    /// Format a single presence change
    pub fn format_presence_update(user: &UserPresence) -> String {
        let (marker, status) = if user.is_online {
            ('+', "online")
        } else {
            ('-', "offline")
        };
        format!("\n{} {} is now {}\n", marker, user.username, status)
    }

    /// Format an inbound chat message
    ///
    /// # Arguments
    ///
    /// * `message` - The received message
    /// * `received_at` - Unix timestamp of arrival (milliseconds)
    ///
    /// # Returns
    ///
    /// A formatted block with the sender, content and time
    pub fn format_incoming(message: &ChatMessage, received_at: i64) -> String {
        let time = message
            .sent_at
            .as_deref()
            .and_then(format_rfc3339_local)
            .unwrap_or_else(|| timestamp_to_local_time(received_at));
        let scope = match message.kind {
            MessageKind::Broadcast => "",
            MessageKind::Private => "[private] ",
        };
        format!(
            "\n\n{}\n{}@{}: {}\nat {}\n{}\n",
            RULE, scope, message.sender_username, message.message, time, RULE
        )
    }

    /// Format a locally composed message before delivery is known
    pub fn format_outgoing(message: &OutboundMessage) -> String {
        match message.receiver_id {
            Some(receiver_id) => format!("you -> [{}]: {}", receiver_id, message.message),
            None => format!("you -> everyone: {}", message.message),
        }
    }

    /// Format a delivery status change
    ///
    /// # Arguments
    ///
    /// * `status` - The new delivery status
    /// * `at` - Unix timestamp of the change (milliseconds)
    pub fn format_delivery_status(status: DeliveryStatus, at: i64) -> String {
        let time = timestamp_to_local_time(at);
        match status {
            DeliveryStatus::Pending => format!("sending... ({})\n", time),
            DeliveryStatus::Sent => format!("sent at {}\n", time),
            DeliveryStatus::Failed => format!("failed to send at {} (not connected)\n", time),
        }
    }

    /// Header label for the active conversation
    pub fn format_conversation_label(active: Option<&ActiveConversation>) -> String {
        match active {
            Some(active) => format!("Chat with {}", active.peer_username),
            None => "No active chat".to_string(),
        }
    }

    /// Format a conversation's history, oldest first
    pub fn format_history(entries: &[HistoryEntry]) -> String {
        if entries.is_empty() {
            return "No previous conversations.\n".to_string();
        }

        let mut output = String::new();
        for entry in entries {
            let time = format_rfc3339_local(&entry.sent_at).unwrap_or_else(|| entry.sent_at.clone());
            output.push_str(&format!(
                "{}: {} ({})\n",
                entry.sender_username, entry.message_content, time
            ));
        }
        output
    }

    pub fn format_history_error() -> String {
        "Failed to load chat history.\n".to_string()
    }

    pub fn format_notification(notification: &Notification) -> String {
        format!("\n[!] {}\n", notification.text)
    }

    pub fn format_connection_notice(notice: &str) -> String {
        format!("\n{}\n{}\n{}\n", DOUBLE_RULE, notice, DOUBLE_RULE)
    }
}
