//! In-memory conversation store.
//!
//! One conversation per normalized user pair, created lazily on first
//! message or explicit `/new`. Conversations live for the process lifetime
//! only (durability across restarts is out of scope).

use dashmap::DashMap;
use lucia_types::{ChatMessage, Conversation, ConversationError, ConversationKey};

/// All conversations on the server, keyed by normalized user pair.
///
/// `DashMap::entry` makes get-or-create atomic per key; there are no
/// cross-key operations, so no outer lock is needed.
#[derive(Default)]
pub struct ConversationStore {
    conversations: DashMap<ConversationKey, Conversation>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the conversation between `a` and `b` exists. Idempotent:
    /// repeat calls leave the existing log untouched.
    pub fn get_or_create(&self, a: &str, b: &str) {
        let key = ConversationKey::new(a, b);
        self.conversations
            .entry(key.clone())
            .or_insert_with(|| Conversation::new(key));
    }

    /// Append a message from `sender` to the pair's conversation, creating
    /// it on first use. Returns the stored message.
    pub fn append(
        &self,
        sender: &str,
        recipient: &str,
        content: &str,
    ) -> Result<ChatMessage, ConversationError> {
        let key = ConversationKey::new(sender, recipient);
        let mut entry = self
            .conversations
            .entry(key.clone())
            .or_insert_with(|| Conversation::new(key));
        entry.push(sender, content).cloned()
    }

    /// Snapshot of the conversation between `a` and `b`, if it exists.
    pub fn get(&self, a: &str, b: &str) -> Option<Conversation> {
        self.conversations
            .get(&ConversationKey::new(a, b))
            .map(|entry| entry.clone())
    }

    /// Remove the pair's conversation. Returns whether one existed.
    pub fn delete(&self, a: &str, b: &str) -> bool {
        self.conversations
            .remove(&ConversationKey::new(a, b))
            .is_some()
    }

    /// Sorted usernames with whom `username` has a conversation.
    ///
    /// Linear scan over all keys; a per-user reverse index is the scale-up
    /// path if the store ever grows past reference scale.
    pub fn contacts(&self, username: &str) -> Vec<String> {
        let mut contacts: Vec<String> = self
            .conversations
            .iter()
            .filter_map(|entry| entry.key().other(username).map(str::to_string))
            .collect();
        contacts.sort();
        contacts
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}
