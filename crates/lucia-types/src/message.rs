//! Direct message type.
//!
//! Messages are immutable once created and ordered within a conversation by
//! append order. The `Display` impl is the transcript rendering used by the
//! `/open` command.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// A single direct message between two users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped with the current time.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender: sender.into(),
            content: content.into(),
            sent_at: Utc::now(),
        }
    }
}

impl fmt::Display for ChatMessage {
    /// Transcript line: `[HH:MM:SS] sender: content`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.sent_at.format("%H:%M:%S"),
            self.sender,
            self.content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let msg = ChatMessage::new("alice", "hello bob");
        let rendered = msg.to_string();
        assert!(rendered.starts_with('['));
        assert!(rendered.ends_with("] alice: hello bob"));
        // [HH:MM:SS] prefix is exactly 10 characters.
        assert_eq!(rendered.find(']'), Some(9));
    }

    #[test]
    fn test_messages_get_distinct_ids() {
        let a = ChatMessage::new("alice", "one");
        let b = ChatMessage::new("alice", "one");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serde_roundtrip() {
        let msg = ChatMessage::new("bob", "hi");
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }
}
