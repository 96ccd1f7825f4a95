//! Slash command parsing and execution.
//!
//! The verb is the first whitespace-delimited token, matched
//! case-insensitively. Commands operate on the registry and the
//! conversation store and reply with exactly one record; multi-line replies
//! (`/open`, `/help`) are flattened with the segment delimiter.

use lucia_types::{NotFoundError, ProtocolError};

use crate::codec::join_segments;
use crate::state::ServerState;

use super::RouteError;

/// A parsed slash command.
#[derive(Debug, PartialEq)]
pub enum Command {
    /// List currently connected users.
    List,
    /// List users the caller has a conversation with.
    Contacts,
    /// Create (or confirm) a conversation with a user.
    New(String),
    /// Render the transcript of a conversation.
    Open(String),
    /// Delete a conversation.
    Delete(String),
    /// Show usage text.
    Help,
}

/// Parse a record that starts with the command marker.
pub fn parse(input: &str) -> Result<Command, ProtocolError> {
    let mut parts = input.trim().splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or("").to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    let with_user = |cmd: &'static str, make: fn(String) -> Command| {
        arg.map(|a| make(a.to_string()))
            .ok_or(ProtocolError::MissingArgument(cmd))
    };

    match verb.as_str() {
        "/list" => Ok(Command::List),
        "/contacts" => Ok(Command::Contacts),
        "/help" => Ok(Command::Help),
        "/new" => with_user("/new", Command::New),
        "/open" => with_user("/open", Command::Open),
        "/delete" => with_user("/delete", Command::Delete),
        other => Err(ProtocolError::UnknownCommand(other.to_string())),
    }
}

/// Parse and execute one command record for `caller`.
pub fn dispatch(caller: &str, input: &str, state: &ServerState) -> Result<String, RouteError> {
    match parse(input)? {
        Command::List => Ok(format!(
            "Connected users: {}",
            state.registry.connected_users().join(", ")
        )),

        Command::Contacts => {
            let contacts = state.store.contacts(caller);
            if contacts.is_empty() {
                Ok("You have no contacts yet.".to_string())
            } else {
                Ok(format!("Contacts: {}", contacts.join(", ")))
            }
        }

        Command::New(target) => {
            if target == caller {
                return Err(ProtocolError::SelfAddressed.into());
            }
            if !state.registry.is_known(&target) {
                return Err(NotFoundError::UnknownUser(target).into());
            }
            state.store.get_or_create(caller, &target);
            Ok(format!("Conversation with '{target}' is ready."))
        }

        Command::Open(target) => open_transcript(caller, &target, state),

        Command::Delete(target) => {
            if state.store.delete(caller, &target) {
                Ok(format!("Conversation with '{target}' deleted."))
            } else {
                Ok(format!("No conversation with '{target}' to delete."))
            }
        }

        Command::Help => Ok(help_text()),
    }
}

/// Render a conversation as one segment-joined record:
/// header, one line per message, footer.
fn open_transcript(caller: &str, target: &str, state: &ServerState) -> Result<String, RouteError> {
    let conversation = state
        .store
        .get(caller, target)
        .ok_or_else(|| NotFoundError::NoConversation(target.to_string()))?;

    let mut segments = vec![format!("--- Conversation with {target} ---")];
    if conversation.is_empty() {
        segments.push("(no messages yet)".to_string());
    } else {
        segments.extend(conversation.messages().iter().map(ToString::to_string));
    }
    segments.push("--- end of conversation ---".to_string());
    Ok(join_segments(&segments))
}

fn help_text() -> String {
    join_segments(&[
        "Available commands:",
        "/list - show connected users",
        "/contacts - show users you have a conversation with",
        "/new <user> - start a conversation",
        "/open <user> - show a conversation transcript",
        "/delete <user> - delete a conversation",
        "/help - show this text",
        "Anything else is sent as '<recipient>: <message>'",
    ])
}
