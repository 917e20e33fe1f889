//! The session registry: who holds which seat, and the live match.
//!
//! # Concurrency note
//!
//! `SessionRegistry` is plain data with `&mut self` methods. The server
//! owns it behind a `tokio::sync::Mutex`, and every admission, departure
//! and match start happens under that lock, so seat changes never
//! interleave. Readiness is published through a `watch` channel so the
//! lobby can wait for it without polling.

use std::time::Instant;

use dicepit_match::{EventSender, MatchConfig, MatchHandle, MatchId, spawn_match};
use dicepit_protocol::Event;
use dicepit_rules::{DiceSource, ParticipantId};
use tokio::sync::watch;

use crate::SessionError;

/// A snapshot of seat occupancy, published on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterStatus {
    pub seated: usize,
    pub capacity: usize,
    /// A match is running with the current roster.
    pub in_match: bool,
}

impl RosterStatus {
    /// Every seat is filled and nothing is being played yet.
    pub fn is_ready(&self) -> bool {
        !self.in_match && self.seated == self.capacity
    }
}

/// One connected participant.
#[derive(Debug)]
struct Seat {
    id: ParticipantId,
    outbound: EventSender,
    connected_at: Instant,
}

/// Tracks seated participants and the match they are playing.
///
/// ## Lifecycle
///
/// ```text
/// admit() ×capacity ──→ [ready] ──→ start_match() ──→ [in match]
///     ↑                                                   │
///     └──────────── remove() (anyone leaves) ─────────────┘
/// ```
///
/// A departure during a match never lets a newcomer into that match: the
/// match handle is taken out and the registry waits for the seat to be
/// filled again before starting a new one.
pub struct SessionRegistry {
    capacity: usize,
    seats: Vec<Option<Seat>>,
    live_match: Option<MatchHandle>,
    next_match_id: u64,
    status: watch::Sender<RosterStatus>,
}

impl SessionRegistry {
    /// Creates an empty registry with `capacity` seats (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (status, _) = watch::channel(RosterStatus {
            seated: 0,
            capacity,
            in_match: false,
        });
        Self {
            capacity,
            seats: (0..capacity).map(|_| None).collect(),
            live_match: None,
            next_match_id: 1,
            status,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn seated(&self) -> usize {
        self.seats.iter().flatten().count()
    }

    pub fn is_seated(&self, participant: ParticipantId) -> bool {
        self.seat(participant).is_some()
    }

    pub fn in_match(&self) -> bool {
        self.live_match.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.roster_status().is_ready()
    }

    pub fn roster_status(&self) -> RosterStatus {
        RosterStatus {
            seated: self.seated(),
            capacity: self.capacity,
            in_match: self.in_match(),
        }
    }

    /// Subscribes to roster changes. The current status counts as seen.
    pub fn subscribe(&self) -> watch::Receiver<RosterStatus> {
        self.status.subscribe()
    }

    /// The running match, if any.
    pub fn match_handle(&self) -> Option<&MatchHandle> {
        self.live_match.as_ref()
    }

    /// Seats a new connection in the lowest free seat.
    ///
    /// The participant is sent `INDEX:<id>` and a waiting notice.
    ///
    /// # Errors
    /// Returns [`SessionError::Full`] if every seat is taken.
    pub fn admit(&mut self, outbound: EventSender) -> Result<ParticipantId, SessionError> {
        let index = self
            .seats
            .iter()
            .position(Option::is_none)
            .ok_or(SessionError::Full {
                capacity: self.capacity,
            })?;
        let id = ParticipantId(index as u32);

        let _ = outbound.send(Event::Index { participant: id });
        self.seats[index] = Some(Seat {
            id,
            outbound,
            connected_at: Instant::now(),
        });
        self.publish();

        tracing::info!(
            participant = %id,
            seated = self.seated(),
            capacity = self.capacity,
            "participant admitted"
        );
        self.announce_waiting();
        Ok(id)
    }

    /// Frees a participant's seat.
    ///
    /// Returns the live match handle, taken out of the registry, if a match
    /// was running; the caller reports the departure to it. The registry is
    /// back to waiting either way.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the seat is already empty.
    pub fn remove(&mut self, participant: ParticipantId) -> Result<Option<MatchHandle>, SessionError> {
        let seat = self
            .seats
            .get_mut(participant.index())
            .and_then(Option::take)
            .ok_or(SessionError::NotFound { participant })?;

        let live_match = self.live_match.take();
        self.publish();

        tracing::info!(
            participant = %seat.id,
            connected_secs = seat.connected_at.elapsed().as_secs(),
            seated = self.seated(),
            ended_match = live_match.is_some(),
            "participant removed"
        );
        Ok(live_match)
    }

    /// Tells every seated participant how many seats are filled.
    ///
    /// Does nothing once the roster is full; the match announces itself.
    pub fn announce_waiting(&self) {
        if self.in_match() || self.seated() == self.capacity {
            return;
        }
        let text = format!(
            "Waiting for players ({}/{})",
            self.seated(),
            self.capacity
        );
        for seat in self.seats.iter().flatten() {
            let _ = seat.outbound.send(Event::info(text.clone()));
        }
    }

    /// Spawns a match for the full roster.
    ///
    /// # Errors
    /// Returns [`SessionError::NotReady`] unless every seat is filled and
    /// no match is running.
    pub fn start_match<D: DiceSource>(
        &mut self,
        config: MatchConfig,
        dice: D,
    ) -> Result<MatchHandle, SessionError> {
        if !self.is_ready() {
            return Err(SessionError::NotReady {
                seated: self.seated(),
                capacity: self.capacity,
            });
        }

        let roster: Vec<(ParticipantId, EventSender)> = self
            .seats
            .iter()
            .flatten()
            .map(|seat| (seat.id, seat.outbound.clone()))
            .collect();

        let match_id = MatchId(self.next_match_id);
        self.next_match_id += 1;
        let handle = spawn_match(match_id, config, roster, dice);
        self.live_match = Some(handle.clone());
        self.publish();

        tracing::info!(%match_id, players = self.capacity, "match started");
        Ok(handle)
    }

    fn seat(&self, participant: ParticipantId) -> Option<&Seat> {
        self.seats.get(participant.index())?.as_ref()
    }

    fn publish(&self) {
        self.status.send_replace(self.roster_status());
    }
}

#[cfg(test)]
mod tests {
    use dicepit_rules::SequenceDice;
    use tokio::sync::mpsc;

    use super::*;

    fn channel() -> (EventSender, mpsc::UnboundedReceiver<Event>) {
        mpsc::unbounded_channel()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_admit_assigns_lowest_free_seat() {
        let mut reg = SessionRegistry::new(3);
        let (tx, mut rx) = channel();
        assert_eq!(reg.admit(tx).unwrap(), ParticipantId(0));
        assert_eq!(
            drain(&mut rx),
            vec![
                Event::Index {
                    participant: ParticipantId(0)
                },
                Event::info("Waiting for players (1/3)"),
            ]
        );

        assert_eq!(reg.admit(channel().0).unwrap(), ParticipantId(1));
        assert_eq!(reg.admit(channel().0).unwrap(), ParticipantId(2));

        reg.remove(ParticipantId(1)).unwrap();
        assert_eq!(reg.admit(channel().0).unwrap(), ParticipantId(1));
    }

    #[test]
    fn test_admit_refuses_when_full() {
        let mut reg = SessionRegistry::new(1);
        reg.admit(channel().0).unwrap();
        assert_eq!(
            reg.admit(channel().0),
            Err(SessionError::Full { capacity: 1 })
        );
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let reg = SessionRegistry::new(0);
        assert_eq!(reg.capacity(), 1);
    }

    #[test]
    fn test_remove_unknown_seat() {
        let mut reg = SessionRegistry::new(2);
        let err = reg.remove(ParticipantId(5)).unwrap_err();
        assert_eq!(
            err,
            SessionError::NotFound {
                participant: ParticipantId(5)
            }
        );
    }

    #[test]
    fn test_roster_status_follows_seats() {
        let mut reg = SessionRegistry::new(2);
        let status = reg.subscribe();
        assert!(!status.borrow().is_ready());

        reg.admit(channel().0).unwrap();
        reg.admit(channel().0).unwrap();
        assert!(status.borrow().is_ready());

        // A departure while waiting cancels readiness.
        reg.remove(ParticipantId(0)).unwrap();
        assert_eq!(
            *status.borrow(),
            RosterStatus {
                seated: 1,
                capacity: 2,
                in_match: false
            }
        );
    }

    #[test]
    fn test_start_match_requires_full_roster() {
        let mut reg = SessionRegistry::new(2);
        reg.admit(channel().0).unwrap();
        let err = reg
            .start_match(MatchConfig::default(), SequenceDice::new(vec![1]).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::NotReady {
                seated: 1,
                capacity: 2
            }
        );
    }

    #[tokio::test]
    async fn test_departure_takes_live_match() {
        let mut reg = SessionRegistry::new(2);
        let (tx0, mut rx0) = channel();
        reg.admit(tx0).unwrap();
        reg.admit(channel().0).unwrap();

        let handle = reg
            .start_match(MatchConfig::default(), SequenceDice::new(vec![1]).unwrap())
            .unwrap();
        assert!(reg.in_match());
        assert!(!reg.is_ready());
        assert_eq!(
            reg.admit(channel().0),
            Err(SessionError::Full { capacity: 2 })
        );

        let taken = reg.remove(ParticipantId(1)).unwrap().unwrap();
        assert_eq!(taken.match_id(), handle.match_id());
        assert!(!reg.in_match());
        assert!(reg.is_seated(ParticipantId(0)));
        assert!(!reg.is_seated(ParticipantId(1)));

        drain(&mut rx0);
        reg.announce_waiting();
        assert_eq!(drain(&mut rx0), vec![Event::info("Waiting for players (1/2)")]);
    }
}
