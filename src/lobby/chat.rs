//! Chat log kept for newly connected sessions

use std::collections::VecDeque;

use crate::ws::protocol::ChatMessage;

/// Longest chat message body, in characters
pub const MAX_MESSAGE_CHARS: usize = 255;
/// Messages retained in the visible history
pub const HISTORY_LEN: usize = 12;

pub fn truncate_message(message: &str) -> String {
    message.chars().take(MAX_MESSAGE_CHARS).collect()
}

#[derive(Debug)]
pub struct ChatLog {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl ChatLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, evicting the oldest message when full
    pub fn push(&mut self, message: ChatMessage) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    pub fn history(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new(HISTORY_LEN)
    }
}
