//! Match actor: an isolated Tokio task that owns one [`MatchCoordinator`].
//!
//! Connection handlers never touch match state. They push commands into
//! the actor's channel through a [`MatchHandle`], and the actor pushes
//! events back out through each participant's [`EventSender`].

use std::collections::BTreeMap;
use std::fmt;

use dicepit_protocol::{Command, Event, Recipient};
use dicepit_rules::{DiceSource, ParticipantId};
use tokio::sync::{mpsc, oneshot};

use crate::{MatchConfig, MatchCoordinator, MatchError, Outbound, Phase};

/// Capacity of the command channel. Senders wait when it is full.
const COMMAND_CHANNEL_SIZE: usize = 64;

/// Identifier of a match, assigned by whoever spawns it. Used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

/// Channel for delivering events to one participant's connection.
pub type EventSender = mpsc::UnboundedSender<Event>;

enum MatchCommand {
    /// A decoded command from a participant (fire-and-forget).
    Submit {
        sender: ParticipantId,
        command: Command,
    },

    /// The participant's connection is gone. The reply fires after the
    /// resulting notices have been queued to the others.
    Disconnect {
        participant: ParticipantId,
        reply: oneshot::Sender<()>,
    },

    GetInfo {
        reply: oneshot::Sender<MatchInfo>,
    },

    Shutdown,
}

/// A snapshot of match metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    pub match_id: MatchId,
    pub phase: Phase,
    pub round: u32,
    /// Whose turn it is.
    pub current: ParticipantId,
    /// Participants still in the match, in seat order.
    pub active: Vec<ParticipantId>,
    pub restart_votes: usize,
}

/// Handle to a running match actor. Cheap to clone.
#[derive(Clone)]
pub struct MatchHandle {
    match_id: MatchId,
    sender: mpsc::Sender<MatchCommand>,
}

impl fmt::Debug for MatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchHandle")
            .field("match_id", &self.match_id)
            .finish_non_exhaustive()
    }
}

impl MatchHandle {
    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Returns `false` once the actor has stopped.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Queues a command from `sender`. Any reply arrives as events on the
    /// sender's [`EventSender`].
    pub async fn submit(&self, sender: ParticipantId, command: Command) -> Result<(), MatchError> {
        self.sender
            .send(MatchCommand::Submit { sender, command })
            .await
            .map_err(|_| MatchError::Unavailable)
    }

    /// Reports a lost connection and waits until the actor has handled it.
    pub async fn disconnect(&self, participant: ParticipantId) -> Result<(), MatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(MatchCommand::Disconnect {
                participant,
                reply: reply_tx,
            })
            .await
            .map_err(|_| MatchError::Unavailable)?;
        reply_rx.await.map_err(|_| MatchError::Unavailable)
    }

    pub async fn info(&self) -> Result<MatchInfo, MatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(MatchCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| MatchError::Unavailable)?;
        reply_rx.await.map_err(|_| MatchError::Unavailable)
    }

    /// Stops the actor without notifying participants.
    pub async fn shutdown(&self) -> Result<(), MatchError> {
        self.sender
            .send(MatchCommand::Shutdown)
            .await
            .map_err(|_| MatchError::Unavailable)
    }
}

struct MatchActor<D: DiceSource> {
    match_id: MatchId,
    coordinator: MatchCoordinator<D>,
    senders: BTreeMap<ParticipantId, EventSender>,
    receiver: mpsc::Receiver<MatchCommand>,
}

impl<D: DiceSource> MatchActor<D> {
    async fn run(mut self) {
        tracing::info!(
            match_id = %self.match_id,
            players = self.senders.len(),
            "match actor started"
        );
        let opening = self.coordinator.start();
        self.dispatch(opening);

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                MatchCommand::Submit { sender, command } => {
                    let out = self.coordinator.handle(sender, command);
                    self.dispatch(out);
                }
                MatchCommand::Disconnect { participant, reply } => {
                    let out = self.coordinator.disconnect(participant);
                    self.dispatch(out);
                    self.senders.remove(&participant);
                    let _ = reply.send(());
                }
                MatchCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
                MatchCommand::Shutdown => {
                    tracing::info!(match_id = %self.match_id, "match shutting down");
                    break;
                }
            }

            if self.coordinator.phase().is_terminal() {
                tracing::info!(match_id = %self.match_id, "match abandoned");
                break;
            }
        }

        tracing::info!(match_id = %self.match_id, "match actor stopped");
    }

    /// Queues events in order. `All` means every participant still in
    /// the match.
    fn dispatch(&self, out: Outbound) {
        for (recipient, event) in out {
            match recipient {
                Recipient::All => {
                    for participant in self.coordinator.active() {
                        self.send_to(participant, event.clone());
                    }
                }
                Recipient::Participant(participant) => {
                    self.send_to(participant, event);
                }
            }
        }
    }

    /// Drops the event if the participant's connection is already gone.
    fn send_to(&self, participant: ParticipantId, event: Event) {
        if let Some(sender) = self.senders.get(&participant) {
            let _ = sender.send(event);
        }
    }

    fn info(&self) -> MatchInfo {
        MatchInfo {
            match_id: self.match_id,
            phase: self.coordinator.phase(),
            round: self.coordinator.state().round(),
            current: self.coordinator.state().current(),
            active: self.coordinator.active().collect(),
            restart_votes: self.coordinator.restart_votes(),
        }
    }
}

/// Spawns a match actor for `roster` and returns a handle to it.
///
/// Participant ids in `roster` must be the seats `0..roster.len()`; seat 0
/// moves first. The opening announcement is queued before any command is
/// processed.
pub fn spawn_match<D: DiceSource>(
    match_id: MatchId,
    config: MatchConfig,
    roster: Vec<(ParticipantId, EventSender)>,
    dice: D,
) -> MatchHandle {
    let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
    let seats = roster.len();

    let actor = MatchActor {
        match_id,
        coordinator: MatchCoordinator::new(config, seats, dice),
        senders: roster.into_iter().collect(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    MatchHandle {
        match_id,
        sender: tx,
    }
}
