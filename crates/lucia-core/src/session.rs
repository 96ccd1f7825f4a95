//! Per-connection session lifecycle.
//!
//! Each accepted connection runs [`run`] to completion:
//! `AwaitingUsername -> AwaitingPassword -> Authenticated -> Closed`.
//! The write half is handed to a dedicated writer task that drains this
//! session's mailbox, so the session's own replies and records forwarded by
//! other sessions share the outbound stream without ever interleaving
//! mid-record. On close, the connected-session entry is removed iff this
//! session ever registered one.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::codec::{RecordReader, RecordWriter};
use crate::registry::HandshakeOutcome;
use crate::router;
use crate::state::ServerState;

use lucia_types::AuthError;

/// Capacity of the per-session outbound mailbox.
const MAILBOX_BUFFER: usize = 64;

/// States of the per-connection state machine. `Closed` is terminal.
#[derive(Debug)]
enum SessionPhase {
    AwaitingUsername,
    AwaitingPassword { username: String },
    Authenticated { username: String },
    Closed,
}

/// Drive one connection from accept to close.
///
/// Generic over the stream so tests can use `tokio::io::duplex`; the
/// acceptor passes a `TcpStream`.
pub async fn run<S>(stream: S, state: Arc<ServerState>)
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let mut reader = RecordReader::new(read_half);

    let (mailbox, outbound) = mpsc::channel(MAILBOX_BUFFER);
    let writer = tokio::spawn(write_loop(RecordWriter::new(write_half), outbound));

    // Username under which this session holds a connected-session entry.
    let mut registered: Option<String> = None;

    let mut phase = SessionPhase::AwaitingUsername;
    loop {
        phase = match phase {
            SessionPhase::AwaitingUsername => match reader.read_record().await {
                None => SessionPhase::Closed,
                Some(record) => {
                    let username = record.trim().to_string();
                    if username.is_empty() {
                        SessionPhase::Closed
                    } else {
                        match state.registry.begin_handshake(&username, mailbox.clone()) {
                            HandshakeOutcome::Registered => {
                                registered = Some(username.clone());
                                info!(%username, "new user registered");
                                let welcome =
                                    format!("Welcome, {username}! You are now registered.");
                                if !say(&mailbox, welcome).await {
                                    SessionPhase::Closed
                                } else {
                                    SessionPhase::Authenticated { username }
                                }
                            }
                            HandshakeOutcome::PasswordRequired => {
                                if !say(&mailbox, "Enter password:").await {
                                    SessionPhase::Closed
                                } else {
                                    SessionPhase::AwaitingPassword { username }
                                }
                            }
                            HandshakeOutcome::AlreadyConnected => {
                                let err = AuthError::AlreadyConnected(username);
                                say(&mailbox, format!("ERROR: {err}")).await;
                                SessionPhase::Closed
                            }
                        }
                    }
                }
            },

            SessionPhase::AwaitingPassword { username } => match reader.read_record().await {
                None => SessionPhase::Closed,
                Some(password) if password == state.secret => {
                    // The name may have been claimed while we waited.
                    if state.registry.complete_login(&username, mailbox.clone()) {
                        registered = Some(username.clone());
                        info!(%username, "returning user authenticated");
                        if !say(&mailbox, "Authenticated successfully.").await {
                            SessionPhase::Closed
                        } else {
                            SessionPhase::Authenticated { username }
                        }
                    } else {
                        let err = AuthError::AlreadyConnected(username);
                        say(&mailbox, format!("ERROR: {err}")).await;
                        SessionPhase::Closed
                    }
                }
                Some(_) => {
                    debug!(%username, "password mismatch");
                    say(&mailbox, format!("ERROR: {}", AuthError::BadPassword)).await;
                    SessionPhase::Closed
                }
            },

            SessionPhase::Authenticated { username } => match reader.read_record().await {
                None => SessionPhase::Closed,
                Some(record) => {
                    // Single reply-emission point: one record in, one reply out.
                    let reply = match router::route(&username, record.trim(), &state) {
                        Ok(reply) => reply,
                        Err(err) => {
                            debug!(%username, %err, "request rejected");
                            format!("ERROR: {err}")
                        }
                    };
                    if !say(&mailbox, reply).await {
                        SessionPhase::Closed
                    } else {
                        SessionPhase::Authenticated { username }
                    }
                }
            },

            SessionPhase::Closed => break,
        };
    }

    if let Some(username) = registered {
        state.registry.disconnect(&username);
    }
    // Dropping our mailbox sender lets the writer drain and exit once every
    // forwarding sender (registry clone) is gone too.
    drop(mailbox);
    let _ = writer.await;
}

/// Queue one outbound record. Returns `false` when the writer task is gone,
/// which the state machine treats as a transport failure.
async fn say(mailbox: &mpsc::Sender<String>, record: impl Into<String>) -> bool {
    mailbox.send(record.into()).await.is_ok()
}

/// Writer task: sole owner of the connection's write half.
async fn write_loop<W>(mut writer: RecordWriter<W>, mut outbound: mpsc::Receiver<String>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(record) = outbound.recv().await {
        if let Err(err) = writer.write_record(&record).await {
            debug!(%err, "outbound write failed, closing writer");
            break;
        }
    }
}
