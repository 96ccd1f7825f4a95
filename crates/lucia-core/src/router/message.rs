//! Direct message parsing, persistence, and forwarding.
//!
//! A non-command record is `<recipient>: <content>`, split once on the
//! first `:`. The message is appended to the pair's conversation before any
//! delivery attempt, so a failed forward never loses the message. The
//! sender gets exactly one reply per record.

use lucia_types::{DeliveryError, NotFoundError, ProtocolError};
use tracing::debug;

use crate::state::ServerState;

use super::RouteError;

/// Split a message record into `(recipient, content)`.
fn split(record: &str) -> Result<(&str, &str), ProtocolError> {
    let (recipient, content) = record
        .split_once(':')
        .ok_or(ProtocolError::MissingSeparator)?;
    let recipient = recipient.trim();
    if recipient.is_empty() {
        return Err(ProtocolError::MissingSeparator);
    }
    Ok((recipient, content.trim()))
}

/// Route one direct-message record from `sender`.
pub fn route(sender: &str, record: &str, state: &ServerState) -> Result<String, RouteError> {
    let (recipient, content) = split(record)?;

    if recipient == sender {
        return Err(ProtocolError::SelfAddressed.into());
    }
    if !state.registry.is_known(recipient) {
        return Err(NotFoundError::UnknownUser(recipient.to_string()).into());
    }

    // Persist first; delivery is best-effort on top of the stored log.
    state.store.append(sender, recipient, content)?;

    match state.registry.mailbox(recipient) {
        Some(mailbox) => match mailbox.try_send(format!("from {sender}: {content}")) {
            Ok(()) => Ok(format!("Message delivered to '{recipient}'.")),
            Err(err) => {
                debug!(%recipient, %err, "forward failed, message kept in store");
                Err(DeliveryError(recipient.to_string()).into())
            }
        },
        None => Ok(format!("Message stored for '{recipient}' (offline).")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Mailbox;
    use tokio::sync::mpsc;

    fn mailbox() -> Mailbox {
        mpsc::channel(8).0
    }

    fn state_with(users: &[&str]) -> ServerState {
        let state = ServerState::new("secret");
        for user in users {
            state.registry.begin_handshake(user, mailbox());
        }
        state
    }

    #[test]
    fn missing_separator_is_protocol_error() {
        let state = state_with(&["alice"]);
        for record in ["hello there", "", "   "] {
            let err = route("alice", record, &state).unwrap_err();
            assert_eq!(err, RouteError::Protocol(ProtocolError::MissingSeparator));
        }
    }

    #[test]
    fn self_addressed_is_rejected() {
        let state = state_with(&["alice"]);
        let err = route("alice", "alice: hi me", &state).unwrap_err();
        assert_eq!(err, RouteError::Protocol(ProtocolError::SelfAddressed));
        assert!(state.store.is_empty());
    }

    #[test]
    fn unknown_recipient_is_not_found_and_not_persisted() {
        let state = state_with(&["alice"]);
        let err = route("alice", "bob: hello", &state).unwrap_err();
        assert_eq!(
            err,
            RouteError::NotFound(NotFoundError::UnknownUser("bob".to_string()))
        );
        assert!(state.store.is_empty());
    }

    #[tokio::test]
    async fn connected_recipient_gets_forwarded_record() {
        let state = ServerState::new("secret");
        state.registry.begin_handshake("alice", mailbox());
        let (tx, mut rx) = mpsc::channel(8);
        state.registry.begin_handshake("bob", tx);

        let reply = route("alice", "bob: hi bob", &state).unwrap();
        assert_eq!(reply, "Message delivered to 'bob'.");
        assert_eq!(rx.recv().await.unwrap(), "from alice: hi bob");

        let conv = state.store.get("alice", "bob").unwrap();
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.messages()[0].content, "hi bob");
    }

    #[test]
    fn offline_recipient_is_stored_only() {
        let state = state_with(&["alice", "bob"]);
        state.registry.disconnect("bob");

        let reply = route("alice", "bob: are you there?", &state).unwrap();
        assert_eq!(reply, "Message stored for 'bob' (offline).");
        assert_eq!(state.store.get("bob", "alice").unwrap().len(), 1);
    }

    #[test]
    fn failed_forward_keeps_persisted_message() {
        let state = ServerState::new("secret");
        state.registry.begin_handshake("alice", mailbox());
        // A closed mailbox models a writer task that died mid-session.
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        state.registry.begin_handshake("bob", tx);

        let err = route("alice", "bob: hi", &state).unwrap_err();
        assert_eq!(err, RouteError::Delivery(DeliveryError("bob".to_string())));
        assert_eq!(state.store.get("alice", "bob").unwrap().len(), 1);
    }

    #[test]
    fn content_is_trimmed_and_may_contain_colons() {
        let state = state_with(&["alice", "bob"]);
        state.registry.disconnect("bob");
        route("alice", "bob:   see: this one   ", &state).unwrap();
        let conv = state.store.get("alice", "bob").unwrap();
        assert_eq!(conv.messages()[0].content, "see: this one");
    }
}
