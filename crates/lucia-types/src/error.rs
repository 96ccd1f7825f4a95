//! Error taxonomy reported to clients.
//!
//! Each enum's `Display` output is the text placed after the `ERROR: ` tag
//! in the single reply record sent for the offending input. Transport
//! failures are not represented here; they surface as `io::Error` or
//! end-of-stream at the codec layer and terminate only the affected session.

use thiserror::Error;

/// Malformed input or an unknown command.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    #[error("unknown command '{0}' (see /help)")]
    UnknownCommand(String),

    #[error("expected '<recipient>: <message>' or a /command")]
    MissingSeparator,

    #[error("'{0}' requires a username argument")]
    MissingArgument(&'static str),

    #[error("you cannot address yourself")]
    SelfAddressed,
}

/// Handshake failures. These terminate the session without retry.
#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("'{0}' is already connected")]
    AlreadyConnected(String),

    #[error("incorrect password")]
    BadPassword,
}

/// A referenced user or conversation does not exist.
#[derive(Debug, Error, PartialEq)]
pub enum NotFoundError {
    #[error("user '{0}' does not exist")]
    UnknownUser(String),

    #[error("no conversation with '{0}'")]
    NoConversation(String),
}

/// A forward attempt failed although the recipient was believed connected.
/// The message is already persisted when this is raised.
#[derive(Debug, Error, PartialEq)]
#[error("could not deliver to '{0}' (message stored)")]
pub struct DeliveryError(pub String);

/// Invalid operation against a conversation log.
#[derive(Debug, Error, PartialEq)]
pub enum ConversationError {
    #[error("'{sender}' is not a participant in this conversation")]
    NotParticipant { sender: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::UnknownCommand("/frobnicate".to_string());
        assert_eq!(err.to_string(), "unknown command '/frobnicate' (see /help)");
    }

    #[test]
    fn test_auth_error_display() {
        assert_eq!(
            AuthError::AlreadyConnected("alice".to_string()).to_string(),
            "'alice' is already connected"
        );
        assert_eq!(AuthError::BadPassword.to_string(), "incorrect password");
    }

    #[test]
    fn test_not_found_error_display() {
        assert_eq!(
            NotFoundError::UnknownUser("bob".to_string()).to_string(),
            "user 'bob' does not exist"
        );
    }

    #[test]
    fn test_delivery_error_display() {
        assert_eq!(
            DeliveryError("bob".to_string()).to_string(),
            "could not deliver to 'bob' (message stored)"
        );
    }
}
