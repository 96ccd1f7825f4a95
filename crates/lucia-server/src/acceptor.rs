//! TCP accept loop.
//!
//! One independent task per accepted connection, each running the session
//! state machine to completion. No worker pool and no connection bound --
//! an accepted limitation of the design, not something to fix silently.
//! Shutdown stops accepting but never terminates in-flight sessions;
//! process exit reclaims them.

use std::sync::Arc;

use lucia_core::{ServerState, session};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Accept connections until `shutdown` is cancelled.
///
/// A failed accept or a faulting session never stops the loop.
pub async fn serve(listener: TcpListener, state: Arc<ServerState>, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("shutdown requested, no longer accepting connections");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    debug!(%peer, "accepted connection");
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        session::run(stream, state).await;
                        debug!(%peer, "session finished");
                    });
                }
                Err(err) => {
                    warn!(%err, "accept failed");
                }
            },
        }
    }
}
