//! The turn state machine.
//!
//! [`MatchCoordinator`] is plain synchronous code: it takes one command,
//! validates it completely, and only then mutates the match. It returns
//! the events to send as `(Recipient, Event)` pairs and leaves delivery to
//! the actor (see [`crate::spawn_match`]), which makes it easy to test
//! without a runtime.
//!
//! There is no per-command timeout. An active participant who never sends
//! anything keeps the match in `AwaitingRoll`/`AwaitingMove` until they
//! act or disconnect.

use std::collections::BTreeSet;

use dicepit_protocol::{Command, Event, Recipient};
use dicepit_rules::{
    Category, Dice, DiceSource, HoldMask, MatchState, Outcome, ParticipantId, score,
};

use crate::{MatchConfig, MatchError, Phase};

/// Events produced by one step of the coordinator, in delivery order.
pub type Outbound = Vec<(Recipient, Event)>;

/// Owns one match and applies commands to it, one at a time.
pub struct MatchCoordinator<D: DiceSource> {
    config: MatchConfig,
    seats: usize,
    active: BTreeSet<ParticipantId>,
    state: MatchState,
    phase: Phase,
    rolls_this_turn: u32,
    restart_votes: BTreeSet<ParticipantId>,
    dice: D,
}

impl<D: DiceSource> MatchCoordinator<D> {
    /// Creates a coordinator for participants `0..seats`, seat 0 to move.
    pub fn new(config: MatchConfig, seats: usize, dice: D) -> Self {
        Self {
            config,
            seats,
            active: (0..seats as u32).map(ParticipantId).collect(),
            state: MatchState::new(seats),
            phase: Phase::AwaitingRoll,
            rolls_this_turn: 0,
            restart_votes: BTreeSet::new(),
            dice,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Read-only view of the match state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Participants still in the match, in seat order.
    pub fn active(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.active.iter().copied()
    }

    pub fn restart_votes(&self) -> usize {
        self.restart_votes.len()
    }

    /// Announcement sent once the actor starts.
    pub fn start(&self) -> Outbound {
        let mut out = vec![(
            Recipient::All,
            Event::info("All players connected. Game starting!"),
        )];
        self.announce_turn(&mut out);
        out
    }

    /// Applies one command from `sender`.
    ///
    /// Never fails: a rejected command becomes a single `INFO:` event for
    /// the sender and leaves the match exactly as it was.
    pub fn handle(&mut self, sender: ParticipantId, command: Command) -> Outbound {
        match self.apply(sender, command) {
            Ok(out) => out,
            Err(err) => {
                tracing::debug!(
                    participant = %sender,
                    phase = %self.phase,
                    error = %err,
                    "command rejected"
                );
                vec![(Recipient::Participant(sender), Event::info(err.to_string()))]
            }
        }
    }

    fn apply(&mut self, sender: ParticipantId, command: Command) -> Result<Outbound, MatchError> {
        if !self.active.contains(&sender) {
            return Err(MatchError::NotAParticipant {
                participant: sender,
            });
        }

        match command {
            Command::Roll { hold } => self.roll(sender, hold),
            Command::Move {
                category,
                dice,
                row,
                col,
            } => self.commit(sender, category, dice, row, col),
            Command::Restart => self.vote_restart(sender),
            Command::Quit => Ok(self.disconnect(sender)),
        }
    }

    fn ensure_turn(&self, sender: ParticipantId) -> Result<(), MatchError> {
        match self.phase {
            Phase::MatchOver => return Err(MatchError::MatchOver),
            Phase::Abandoned => return Err(MatchError::MatchAbandoned),
            Phase::AwaitingRoll | Phase::AwaitingMove => {}
        }
        let current = self.state.current();
        if sender != current {
            return Err(MatchError::OutOfTurn { current });
        }
        Ok(())
    }

    fn roll(&mut self, sender: ParticipantId, hold: HoldMask) -> Result<Outbound, MatchError> {
        self.ensure_turn(sender)?;
        let limit = self.config.max_rolls_per_turn;
        if limit > 0 && self.rolls_this_turn >= limit {
            return Err(MatchError::NoRollsLeft { limit });
        }

        let dice = self.state.roll_dice(sender, hold, &mut self.dice)?;
        self.rolls_this_turn += 1;
        self.phase = Phase::AwaitingMove;

        let recipient = if self.config.share_dice {
            Recipient::All
        } else {
            Recipient::Participant(sender)
        };
        Ok(vec![(recipient, Event::Dice { dice })])
    }

    fn commit(
        &mut self,
        sender: ParticipantId,
        category: Category,
        echoed: Dice,
        row: u32,
        col: u32,
    ) -> Result<Outbound, MatchError> {
        self.ensure_turn(sender)?;
        if self.phase == Phase::AwaitingRoll {
            return Err(MatchError::NoDiceRolledYet);
        }
        let stored = *self
            .state
            .dice(sender)
            .ok_or(MatchError::NoDiceRolledYet)?;
        let used = self
            .state
            .sheet(sender)
            .is_some_and(|sheet| sheet.is_used(category));
        if used {
            return Err(MatchError::CategoryAlreadyUsed(category));
        }

        if echoed != stored {
            tracing::warn!(
                participant = %sender,
                echoed = %echoed,
                stored = %stored,
                "echoed dice differ from server dice, scoring server dice"
            );
        }

        // Validation is complete; from here on the command is applied.
        let points = score(category, &stored);
        self.state.record_score(sender, category, points)?;
        self.state.advance_turn();
        self.rolls_this_turn = 0;

        let mut out = vec![(
            Recipient::All,
            Event::Score {
                row,
                col,
                score: points,
            },
        )];

        if self.state.is_complete() {
            self.phase = Phase::MatchOver;
            tracing::info!(round = self.state.round(), "match over");
            self.summarize(&mut out);
        } else {
            self.phase = Phase::AwaitingRoll;
            self.announce_turn(&mut out);
        }
        Ok(out)
    }

    fn vote_restart(&mut self, sender: ParticipantId) -> Result<Outbound, MatchError> {
        match self.phase {
            Phase::MatchOver => {}
            Phase::Abandoned => return Err(MatchError::MatchAbandoned),
            Phase::AwaitingRoll | Phase::AwaitingMove => {
                return Err(MatchError::RestartNotAllowed);
            }
        }

        let required = self.seats;
        if !self.restart_votes.insert(sender) {
            return Ok(vec![(
                Recipient::Participant(sender),
                Event::info(format!(
                    "Your restart vote is already counted ({}/{required})",
                    self.restart_votes.len()
                )),
            )]);
        }

        if self.restart_votes.len() < required {
            return Ok(vec![(
                Recipient::All,
                Event::info(format!(
                    "Player {} wants a rematch ({}/{required})",
                    sender.0,
                    self.restart_votes.len()
                )),
            )]);
        }

        // A fresh state replaces the old one wholesale.
        self.state = MatchState::new(self.seats);
        self.restart_votes.clear();
        self.rolls_this_turn = 0;
        self.phase = Phase::AwaitingRoll;
        tracing::info!(seats = self.seats, "match restarted");

        let mut out = vec![(
            Recipient::All,
            Event::info("New game starting. Please wait."),
        )];
        self.announce_turn(&mut out);
        Ok(out)
    }

    /// Removes a participant from play (QUIT or a dropped connection).
    ///
    /// If fewer participants remain than seats the match was started with,
    /// the match is abandoned and everyone left is told. Unknown or
    /// already-removed participants are ignored.
    pub fn disconnect(&mut self, participant: ParticipantId) -> Outbound {
        if !self.active.remove(&participant) {
            return Vec::new();
        }
        self.restart_votes.remove(&participant);

        tracing::info!(
            %participant,
            phase = %self.phase,
            remaining = self.active.len(),
            "participant left match"
        );

        if self.phase.is_terminal() {
            return Vec::new();
        }

        let notice = MatchError::ParticipantDisconnected { participant }.to_string();
        let was_over = self.phase == Phase::MatchOver;
        self.phase = Phase::Abandoned;
        let ending = if was_over {
            "No rematch is possible."
        } else {
            "The match has ended without a winner."
        };
        vec![(Recipient::All, Event::info(format!("{notice}. {ending}")))]
    }

    fn announce_turn(&self, out: &mut Outbound) {
        let current = self.state.current();
        out.push((Recipient::All, Event::Turn { participant: current }));
        out.push((
            Recipient::Participant(current),
            Event::info("Your turn: send ROLL to roll the dice."),
        ));
    }

    /// Final standings, recomputed from the sheets.
    fn summarize(&self, out: &mut Outbound) {
        out.push((Recipient::All, Event::GameOverSummary));
        out.push((
            Recipient::All,
            Event::info("Game over! Final standings:"),
        ));
        for standing in self.state.standings() {
            out.push((
                Recipient::All,
                Event::info(format!(
                    "Player {}: {} points (upper {} + bonus {})",
                    standing.participant.0,
                    standing.total,
                    standing.upper_subtotal,
                    standing.upper_bonus
                )),
            ));
        }

        let verdict = match self.state.outcome() {
            Some(Outcome::Winner { participant, total }) => {
                format!("Winner: Player {} with {total} points", participant.0)
            }
            Some(Outcome::Tie {
                participants,
                total,
            }) => {
                let names: Vec<String> = participants.iter().map(|p| p.0.to_string()).collect();
                format!("Tie between players {} at {total} points", names.join(", "))
            }
            None => "No result".to_string(),
        };
        out.push((Recipient::All, Event::info(verdict)));
        out.push((
            Recipient::All,
            Event::info("Send RESTART to vote for a rematch."),
        ));
    }
}
