//! Lucia chat server entry point.
//!
//! Binary name: `luciad`
//!
//! Parses the CLI, initializes tracing, builds the shared server state, and
//! runs the TCP accept loop until Ctrl+C or SIGTERM.

mod acceptor;
mod config;

use std::sync::Arc;

use clap::Parser;
use lucia_core::ServerState;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_filter()))
        .with_target(false)
        .init();

    let state = Arc::new(ServerState::new(config::SHARED_SECRET));

    let addr = cli.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("server listening on {addr}");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.cancel();
        }
    });

    acceptor::serve(listener, state, shutdown).await;
    info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
