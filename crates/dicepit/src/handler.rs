//! Per-connection handler: admission, line decoding, and routing.
//!
//! Each accepted connection gets its own Tokio task running this handler,
//! plus a writer task that owns the outbound side. The flow is:
//!   1. Start the writer task draining the connection's event queue
//!   2. Admit the participant (or send `INFO:Server is full` and close)
//!   3. Loop: receive lines → decode → submit to the live match
//!   4. On QUIT or end of stream, free the seat and tell the match

use std::sync::Arc;

use dicepit_match::EventSender;
use dicepit_protocol::{Command, Event};
use dicepit_rules::ParticipantId;
use dicepit_session::{SessionRegistry, release};
use dicepit_transport::{Connection, TransportError};
use tokio::sync::{Mutex, mpsc};

use crate::DicepitError;
use crate::server::ServerState;

/// Reply to commands sent before a match is running.
const NOT_STARTED: &str = "The match has not started yet, waiting for players";

/// Drop guard that frees a participant's seat when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a task for the async lock.
struct SeatGuard {
    participant: ParticipantId,
    registry: Arc<Mutex<SessionRegistry>>,
}

impl Drop for SeatGuard {
    fn drop(&mut self) {
        let participant = self.participant;
        let registry = Arc::clone(&self.registry);
        tokio::spawn(async move {
            if let Err(e) = release(&registry, participant).await {
                tracing::debug!(%participant, error = %e, "seat already released");
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C>(
    conn: C,
    state: Arc<ServerState>,
) -> Result<(), DicepitError>
where
    C: Connection<Error = TransportError>,
{
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, peer = %conn.peer_addr(), "handling new connection");

    let (outbound, events) = mpsc::unbounded_channel();
    tokio::spawn(write_events(Arc::clone(&conn), Arc::clone(&state), events));

    // The writer closes the connection once every sender is gone, which
    // for a refused connection is right after the notice.
    let admitted = state.registry.lock().await.admit(outbound.clone());
    let participant = match admitted {
        Ok(participant) => participant,
        Err(e) => {
            tracing::info!(%conn_id, error = %e, "connection refused");
            // The writer holds the receiver until this sender drops, so
            // the notice is flushed before the close.
            let _ = outbound.send(Event::info(e.to_string()));
            return Ok(());
        }
    };
    let _guard = SeatGuard {
        participant,
        registry: Arc::clone(&state.registry),
    };
    tracing::info!(%conn_id, %participant, "participant connected");

    loop {
        let line = match conn.recv().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::info!(%participant, "connection closed cleanly");
                break;
            }
            Err(e) if e.is_recoverable() => {
                tracing::debug!(%participant, error = %e, "unreadable line");
                reply(&outbound, e.to_string());
                continue;
            }
            Err(e) => {
                tracing::debug!(%participant, error = %e, "recv error");
                break;
            }
        };

        let command = match state.codec.decode_command(&line) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!(%participant, error = %e, "undecodable line");
                reply(&outbound, e.to_string());
                continue;
            }
        };

        if command == Command::Quit {
            tracing::info!(%participant, "participant quit");
            break;
        }

        // Clone the handle so the registry lock isn't held while the
        // actor's channel applies backpressure.
        let handle = state.registry.lock().await.match_handle().cloned();
        let submitted = match handle {
            Some(handle) => handle.submit(participant, command).await.is_ok(),
            None => false,
        };
        if !submitted {
            reply(&outbound, NOT_STARTED);
        }
    }

    // _guard drops here → seat release fires.
    Ok(())
}

fn reply(outbound: &EventSender, text: impl Into<String>) {
    let _ = outbound.send(Event::info(text));
}

/// Drains a connection's event queue in order, then closes it.
///
/// Ends when every sender (handler, registry seat, match actor) is gone,
/// or when a write fails.
async fn write_events<C>(
    conn: Arc<C>,
    state: Arc<ServerState>,
    mut events: mpsc::UnboundedReceiver<Event>,
) where
    C: Connection<Error = TransportError>,
{
    let conn_id = conn.id();
    while let Some(event) = events.recv().await {
        let line = match state.codec.encode_event(&event) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "failed to encode event");
                continue;
            }
        };
        if let Err(e) = conn.send(&line).await {
            tracing::debug!(%conn_id, error = %e, "send failed, dropping writer");
            return;
        }
    }

    if let Err(e) = conn.close().await {
        tracing::debug!(%conn_id, error = %e, "close failed");
    }
    tracing::debug!(%conn_id, "connection writer finished");
}
