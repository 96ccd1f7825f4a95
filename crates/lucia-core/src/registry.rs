//! Known-user set and connected-session registry.
//!
//! One mutex guards both collections so the handshake's check-and-register
//! runs as a single critical section: under concurrent duplicate logins for
//! the same username, exactly one attempt wins. The known-user set is
//! append-only for the process lifetime; the connected map holds the
//! outbound mailbox of each authenticated session.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::debug;

/// Outbound mailbox of a connected session. Records sent here are written
/// to that session's stream by its writer task.
pub type Mailbox = mpsc::Sender<String>;

/// Atomic decision taken when a connection presents a username.
#[derive(Debug, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// Username was unknown: it is now registered and connected.
    Registered,
    /// Username is known and offline: the caller must present the password.
    PasswordRequired,
    /// Username is known and already connected: reject.
    AlreadyConnected,
}

#[derive(Default)]
struct RegistryInner {
    known: BTreeSet<String>,
    connected: HashMap<String, Mailbox>,
}

/// Process-wide user registry shared by all connection handlers.
#[derive(Default)]
pub struct UserRegistry {
    inner: Mutex<RegistryInner>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve a presented username in one critical section.
    ///
    /// An unknown name is added to the known set and connected immediately;
    /// a known, offline name gets a password challenge; a known, connected
    /// name is rejected without touching the registry.
    pub fn begin_handshake(&self, username: &str, mailbox: Mailbox) -> HandshakeOutcome {
        let mut inner = self.lock();
        if !inner.known.contains(username) {
            inner.known.insert(username.to_string());
            inner.connected.insert(username.to_string(), mailbox);
            debug!(%username, "registered new user");
            HandshakeOutcome::Registered
        } else if inner.connected.contains_key(username) {
            HandshakeOutcome::AlreadyConnected
        } else {
            HandshakeOutcome::PasswordRequired
        }
    }

    /// Claim the connected-session slot after a correct password.
    ///
    /// Re-checks under the lock: between the challenge and the response a
    /// concurrent login may already have claimed the name. Returns `false`
    /// in that case and the caller must close without a registry entry.
    pub fn complete_login(&self, username: &str, mailbox: Mailbox) -> bool {
        let mut inner = self.lock();
        if inner.connected.contains_key(username) {
            return false;
        }
        inner.connected.insert(username.to_string(), mailbox);
        debug!(%username, "session authenticated");
        true
    }

    /// Remove the connected-session entry. The username stays known.
    pub fn disconnect(&self, username: &str) -> bool {
        let removed = self.lock().connected.remove(username).is_some();
        if removed {
            debug!(%username, "session disconnected");
        }
        removed
    }

    pub fn is_known(&self, username: &str) -> bool {
        self.lock().known.contains(username)
    }

    pub fn is_connected(&self, username: &str) -> bool {
        self.lock().connected.contains_key(username)
    }

    /// Outbound mailbox of a connected user, if any.
    pub fn mailbox(&self, username: &str) -> Option<Mailbox> {
        self.lock().connected.get(username).cloned()
    }

    /// Currently connected usernames, sorted.
    pub fn connected_users(&self) -> Vec<String> {
        let mut users: Vec<String> = self.lock().connected.keys().cloned().collect();
        users.sort();
        users
    }

    pub fn known_count(&self) -> usize {
        self.lock().known.len()
    }

    pub fn connected_count(&self) -> usize {
        self.lock().connected.len()
    }
}
