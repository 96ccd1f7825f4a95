//! Conversations and their normalized lookup keys.
//!
//! A conversation is the ordered, append-only message log between exactly
//! two users. The key stores the participants in lexicographic order so a
//! lookup is independent of which side is the sender.

use serde::{Deserialize, Serialize};

use crate::error::ConversationError;
use crate::message::ChatMessage;

/// Normalized identifier for the conversation between two users.
///
/// Participants are stored sorted, so `ConversationKey::new("bob", "alice")`
/// and `ConversationKey::new("alice", "bob")` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey([String; 2]);

impl ConversationKey {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b { Self([a, b]) } else { Self([b, a]) }
    }

    pub fn participants(&self) -> (&str, &str) {
        (&self.0[0], &self.0[1])
    }

    pub fn contains(&self, username: &str) -> bool {
        self.0[0] == username || self.0[1] == username
    }

    /// The participant that is not `username`, if `username` is one of the two.
    pub fn other(&self, username: &str) -> Option<&str> {
        if self.0[0] == username {
            Some(&self.0[1])
        } else if self.0[1] == username {
            Some(&self.0[0])
        } else {
            None
        }
    }
}

/// The message log between two users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    key: ConversationKey,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(key: ConversationKey) -> Self {
        Self {
            key,
            messages: Vec::new(),
        }
    }

    pub fn key(&self) -> &ConversationKey {
        &self.key
    }

    /// Append a message, validating that the sender is a participant.
    pub fn push(
        &mut self,
        sender: &str,
        content: &str,
    ) -> Result<&ChatMessage, ConversationError> {
        if !self.key.contains(sender) {
            return Err(ConversationError::NotParticipant {
                sender: sender.to_string(),
            });
        }
        self.messages.push(ChatMessage::new(sender, content));
        Ok(self.messages.last().expect("just pushed"))
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalizes_order() {
        let ab = ConversationKey::new("alice", "bob");
        let ba = ConversationKey::new("bob", "alice");
        assert_eq!(ab, ba);
        assert_eq!(ab.participants(), ("alice", "bob"));
    }

    #[test]
    fn test_key_other_participant() {
        let key = ConversationKey::new("alice", "bob");
        assert_eq!(key.other("alice"), Some("bob"));
        assert_eq!(key.other("bob"), Some("alice"));
        assert_eq!(key.other("carol"), None);
    }

    #[test]
    fn test_push_from_participant() {
        let mut conv = Conversation::new(ConversationKey::new("alice", "bob"));
        let msg = conv.push("alice", "hi").unwrap();
        assert_eq!(msg.sender, "alice");
        assert_eq!(msg.content, "hi");
        assert_eq!(conv.len(), 1);
    }

    #[test]
    fn test_push_from_outsider_rejected() {
        let mut conv = Conversation::new(ConversationKey::new("alice", "bob"));
        let err = conv.push("mallory", "hi").unwrap_err();
        assert!(matches!(
            err,
            ConversationError::NotParticipant { ref sender } if sender == "mallory"
        ));
        assert!(conv.is_empty());
    }

    #[test]
    fn test_messages_keep_append_order() {
        let mut conv = Conversation::new(ConversationKey::new("alice", "bob"));
        conv.push("alice", "one").unwrap();
        conv.push("bob", "two").unwrap();
        conv.push("alice", "three").unwrap();
        let contents: Vec<&str> = conv.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three"]);
    }
}
