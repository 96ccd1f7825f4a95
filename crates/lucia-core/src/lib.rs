//! Business logic and protocol plumbing for the Lucia chat service.
//!
//! This crate owns everything between the accepted byte stream and the
//! domain types: the line codec, the user registry, the conversation store,
//! the command and message routers, and the per-connection session state
//! machine. It depends only on `lucia-types` and tokio -- the listening
//! socket and process configuration live in `lucia-server`.

pub mod codec;
pub mod registry;
pub mod router;
pub mod session;
pub mod state;
pub mod store;

pub use state::ServerState;
