//! Terminal rendering of the chat view.

use std::collections::HashMap;

use irori_shared::time::get_timestamp_millis;

use super::{
    formatter::MessageFormatter,
    prompt::redisplay_prompt,
    view::{ChatView, ReadinessFlag},
};
use crate::domain::{
    ActiveConversation, ChatMessage, DeliveryStatus, HistoryEntry, MessageId, Notification,
    NotificationId, OutboundMessage, UserId, UserPresence,
};

/// Prints the chat to stdout and redisplays the input prompt after each update
pub struct TerminalView {
    readiness: ReadinessFlag,
    user_id: Option<UserId>,
    username: String,
    /// Outgoing messages whose delivery status is still pending
    pending: HashMap<MessageId, String>,
}

impl TerminalView {
    pub fn new(readiness: ReadinessFlag, user_id: Option<UserId>, username: impl Into<String>) -> Self {
        Self {
            readiness,
            user_id,
            username: username.into(),
            pending: HashMap::new(),
        }
    }

    fn print(&self, text: &str) {
        print!("{}", text);
        redisplay_prompt(&self.username);
    }
}

impl ChatView for TerminalView {
    fn mount(&mut self) {
        self.readiness.set(true);
        println!(
            "\nYou are '{}'. Type messages and press Enter to send. /help lists commands.\n",
            self.username
        );
    }

    fn unmount(&mut self) {
        self.readiness.set(false);
        println!("\nLeft the chat. Type /enter to come back.\n");
    }

    fn render_message(&mut self, message: &ChatMessage, received_at: i64) {
        self.print(&MessageFormatter::format_incoming(message, received_at));
    }

    fn render_outgoing(&mut self, id: MessageId, message: &OutboundMessage) {
        self.pending
            .insert(id, MessageFormatter::format_outgoing(message));
    }

    fn mark_outgoing(&mut self, id: MessageId, status: DeliveryStatus) {
        let line = match status {
            DeliveryStatus::Pending => return,
            DeliveryStatus::Sent | DeliveryStatus::Failed => self.pending.remove(&id),
        };
        let status_line = MessageFormatter::format_delivery_status(status, get_timestamp_millis());
        match line {
            Some(line) => self.print(&format!("{}\n{}", line, status_line)),
            None => self.print(&status_line),
        }
    }

    fn render_roster(&mut self, users: &[UserPresence]) {
        self.print(&MessageFormatter::format_roster(users, self.user_id));
    }

    fn update_roster_entry(&mut self, user: &UserPresence) {
        self.print(&MessageFormatter::format_presence_update(user));
    }

    fn set_conversation(&mut self, active: Option<&ActiveConversation>) {
        self.print(&format!(
            "\n== {} ==\n",
            MessageFormatter::format_conversation_label(active)
        ));
    }

    fn clear_messages(&mut self) {
        // ANSI clear screen and home cursor
        print!("\x1B[2J\x1B[H");
    }

    fn render_history(&mut self, entries: &[HistoryEntry]) {
        self.print(&MessageFormatter::format_history(entries));
    }

    fn render_history_error(&mut self, error: &str) {
        tracing::debug!("History error shown to user: {}", error);
        self.print(&MessageFormatter::format_history_error());
    }

    fn show_notification(&mut self, notification: &Notification) {
        self.print(&MessageFormatter::format_notification(notification));
    }

    fn dismiss_notification(&mut self, id: NotificationId) {
        // Terminal output cannot be retracted
        tracing::trace!("Notification {} expired", id);
    }

    fn show_connection_notice(&mut self, notice: &str) {
        self.print(&MessageFormatter::format_connection_notice(notice));
    }
}
