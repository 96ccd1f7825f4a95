//! Shared domain types for Lucia.
//!
//! This crate contains the core domain types used across the Lucia chat
//! service: messages, conversations, conversation keys, and the error
//! taxonomy reported back to clients.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod conversation;
pub mod error;
pub mod message;

pub use conversation::{Conversation, ConversationKey};
pub use error::{AuthError, ConversationError, DeliveryError, NotFoundError, ProtocolError};
pub use message::ChatMessage;
