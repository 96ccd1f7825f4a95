//! Record routing for authenticated sessions.
//!
//! A record starting with `/` goes to the command router, everything else to
//! the message router. Both return `Result<String, RouteError>` so the
//! session loop has a single reply-emission point: the `Ok` payload, or one
//! `ERROR: `-tagged record rendering the error. Errors are only ever sent to
//! the issuing session.

pub mod command;
pub mod message;

use lucia_types::{ConversationError, DeliveryError, NotFoundError, ProtocolError};
use thiserror::Error;

/// Reserved marker introducing a slash command.
pub const COMMAND_MARKER: char = '/';

/// Everything a routed record can fail with. One variant per taxonomy
/// category; `Display` is the text after the `ERROR: ` tag.
#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Conversation(#[from] ConversationError),
}

/// Route one authenticated-phase record to the right router.
pub fn route(sender: &str, record: &str, state: &crate::ServerState) -> Result<String, RouteError> {
    if record.starts_with(COMMAND_MARKER) {
        command::dispatch(sender, record, state)
    } else {
        message::route(sender, record, state)
    }
}
