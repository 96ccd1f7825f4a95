//! Shared server state.
//!
//! One `ServerState` is built at startup and shared (as an `Arc`) across
//! every connection handler -- there are no ambient globals. Its lifecycle
//! is bound to the process.

use crate::registry::UserRegistry;
use crate::store::ConversationStore;

/// Process-wide state shared by all sessions.
pub struct ServerState {
    pub registry: UserRegistry,
    pub store: ConversationStore,
    /// Shared authentication secret presented by returning users.
    /// A single static value; hardening is explicitly out of scope.
    pub secret: String,
}

impl ServerState {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            registry: UserRegistry::new(),
            store: ConversationStore::new(),
            secret: secret.into(),
        }
    }
}
