//! The lobby loop and the departure path.

use std::sync::Arc;

use dicepit_match::MatchConfig;
use dicepit_rules::{DiceSource, ParticipantId};
use tokio::sync::Mutex;

use crate::{RosterStatus, SessionError, SessionRegistry};

/// Starts a match every time the roster becomes ready.
///
/// Waits on the registry's status channel rather than polling. Readiness
/// is re-checked under the lock before starting, so a participant who left
/// between the notification and the lock cancels the start. `dice` is
/// called once per match.
///
/// Runs until the status channel closes; the server aborts it on shutdown.
pub async fn run_lobby<D, F>(registry: Arc<Mutex<SessionRegistry>>, config: MatchConfig, mut dice: F)
where
    D: DiceSource,
    F: FnMut() -> D + Send + 'static,
{
    let mut status = registry.lock().await.subscribe();
    let capacity = status.borrow().capacity;
    tracing::debug!(capacity, "lobby started");

    loop {
        if status.wait_for(RosterStatus::is_ready).await.is_err() {
            break;
        }

        let mut guard = registry.lock().await;
        if !guard.is_ready() {
            continue;
        }
        if let Err(err) = guard.start_match(config.clone(), dice()) {
            tracing::warn!(error = %err, "match start refused");
        }
    }

    tracing::debug!("lobby stopped");
}

/// Removes a participant and reports the departure to their match.
///
/// The whole sequence runs under the registry lock: the seat is freed, the
/// match (if any) is told and has queued its notices, and only then are the
/// remaining participants told the registry is waiting again.
///
/// # Errors
/// Returns [`SessionError::NotFound`] if the seat was already free.
pub async fn release(
    registry: &Mutex<SessionRegistry>,
    participant: ParticipantId,
) -> Result<(), SessionError> {
    let mut registry = registry.lock().await;
    if let Some(handle) = registry.remove(participant)? {
        // The actor may already have stopped (e.g. after a QUIT).
        if let Err(err) = handle.disconnect(participant).await {
            tracing::debug!(%participant, error = %err, "match already stopped");
        }
    }
    registry.announce_waiting();
    Ok(())
}
