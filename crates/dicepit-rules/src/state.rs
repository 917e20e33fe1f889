//! Match state: turn order, rounds, hands and sheets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Category, DICE_COUNT, Dice, DiceSource, HoldMask, RulesError, ScoreSheet,
};

/// A participant's seat index, stable for the lifetime of a match.
///
/// Seat indices are dense: a match with `n` participants uses ids
/// `0..n`, and the turn index is simply the id of the active seat.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(pub u32);

impl ParticipantId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Final (or current) figures for one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    pub participant: ParticipantId,
    pub upper_subtotal: u32,
    pub upper_bonus: u32,
    pub total: u32,
}

/// Who won, computed from standings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Winner { participant: ParticipantId, total: u32 },
    /// Two or more participants share the top total.
    Tie { participants: Vec<ParticipantId>, total: u32 },
}

/// Everything that changes while a match is played.
///
/// A restart never resets this in place; the coordinator builds a fresh
/// `MatchState` and drops the old one.
#[derive(Debug, Clone)]
pub struct MatchState {
    current: usize,
    round: u32,
    dice: Vec<Option<Dice>>,
    sheets: Vec<ScoreSheet>,
}

impl MatchState {
    /// A new match for `participants` seats: seat 0 to move, round 1.
    pub fn new(participants: usize) -> Self {
        Self {
            current: 0,
            round: 1,
            dice: vec![None; participants],
            sheets: vec![ScoreSheet::new(); participants],
        }
    }

    pub fn participant_count(&self) -> usize {
        self.sheets.len()
    }

    /// The participant whose move is accepted.
    pub fn current(&self) -> ParticipantId {
        ParticipantId(self.current as u32)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// The participant's hand this turn, if they have rolled.
    pub fn dice(&self, participant: ParticipantId) -> Option<&Dice> {
        self.dice.get(participant.index()).and_then(Option::as_ref)
    }

    pub fn sheet(&self, participant: ParticipantId) -> Option<&ScoreSheet> {
        self.sheets.get(participant.index())
    }

    /// Rolls for `participant`, keeping held positions from their previous
    /// hand. Without a previous hand every position is rolled fresh and
    /// the mask is ignored.
    pub fn roll_dice(
        &mut self,
        participant: ParticipantId,
        hold: HoldMask,
        source: &mut impl DiceSource,
    ) -> Result<Dice, RulesError> {
        let slot = self
            .dice
            .get_mut(participant.index())
            .ok_or(RulesError::UnknownParticipant(participant))?;

        let previous = slot.map(|d| d.faces());
        let mut faces = [0u8; DICE_COUNT];
        for (position, face) in faces.iter_mut().enumerate() {
            *face = match previous {
                Some(prev) if hold.holds(position) => prev[position],
                _ => source.roll_die().clamp(1, 6),
            };
        }

        let rolled = Dice::new(faces)?;
        *slot = Some(rolled);
        Ok(rolled)
    }

    /// # Errors
    /// - [`RulesError::UnknownParticipant`] for a seat outside the match
    /// - [`RulesError::CategoryAlreadyUsed`] if the category is taken
    pub fn record_score(
        &mut self,
        participant: ParticipantId,
        category: Category,
        score: u32,
    ) -> Result<(), RulesError> {
        self.sheets
            .get_mut(participant.index())
            .ok_or(RulesError::UnknownParticipant(participant))?
            .record(category, score)
    }

    /// Passes the turn to the next seat, wrapping to seat 0 and starting a
    /// new round. The outgoing participant's hand is cleared so their next
    /// turn starts with a fresh roll.
    pub fn advance_turn(&mut self) {
        if self.sheets.is_empty() {
            return;
        }
        self.dice[self.current] = None;
        self.current = (self.current + 1) % self.sheets.len();
        if self.current == 0 {
            self.round += 1;
        }
    }

    /// `true` iff every participant has all 13 categories scored.
    pub fn is_complete(&self) -> bool {
        !self.sheets.is_empty() && self.sheets.iter().all(ScoreSheet::is_full)
    }

    pub fn total_score(&self, participant: ParticipantId) -> Option<u32> {
        self.sheet(participant).map(ScoreSheet::total)
    }

    /// Standings in seat order, recomputed from the sheets every call.
    pub fn standings(&self) -> Vec<Standing> {
        self.sheets
            .iter()
            .enumerate()
            .map(|(seat, sheet)| Standing {
                participant: ParticipantId(seat as u32),
                upper_subtotal: sheet.upper_subtotal(),
                upper_bonus: sheet.upper_bonus(),
                total: sheet.total(),
            })
            .collect()
    }

    /// Highest total wins; a shared maximum is a tie.
    pub fn outcome(&self) -> Option<Outcome> {
        let standings = self.standings();
        let best = standings.iter().map(|s| s.total).max()?;
        let leaders: Vec<ParticipantId> = standings
            .iter()
            .filter(|s| s.total == best)
            .map(|s| s.participant)
            .collect();

        Some(match leaders.as_slice() {
            [only] => Outcome::Winner {
                participant: *only,
                total: best,
            },
            _ => Outcome::Tie {
                participants: leaders,
                total: best,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SequenceDice;

    fn pid(id: u32) -> ParticipantId {
        ParticipantId(id)
    }

    #[test]
    fn test_new_state_starts_at_seat_zero_round_one() {
        let state = MatchState::new(3);
        assert_eq!(state.current(), pid(0));
        assert_eq!(state.round(), 1);
        assert_eq!(state.participant_count(), 3);
        assert!(state.dice(pid(0)).is_none());
        assert!(!state.is_complete());
    }

    #[test]
    fn test_advance_turn_wraps_and_counts_rounds() {
        let mut state = MatchState::new(2);
        state.advance_turn();
        assert_eq!(state.current(), pid(1));
        assert_eq!(state.round(), 1);
        state.advance_turn();
        assert_eq!(state.current(), pid(0));
        assert_eq!(state.round(), 2);
    }

    #[test]
    fn test_first_roll_ignores_hold_mask() {
        let mut state = MatchState::new(1);
        let mut source = SequenceDice::new(vec![1, 2, 3, 4, 5]).unwrap();
        let hold = HoldMask::from_indices([0, 1, 2, 3, 4]);
        let dice = state.roll_dice(pid(0), hold, &mut source).unwrap();
        assert_eq!(dice.faces(), [1, 2, 3, 4, 5]);
        assert_eq!(state.dice(pid(0)), Some(&dice));
    }

    #[test]
    fn test_reroll_keeps_held_positions() {
        let mut state = MatchState::new(1);
        let mut source = SequenceDice::new(vec![2, 2, 2, 2, 2, 6, 6, 6]).unwrap();
        state.roll_dice(pid(0), HoldMask::NONE, &mut source).unwrap();

        let hold = HoldMask::from_indices([0, 2, 9]);
        let dice = state.roll_dice(pid(0), hold, &mut source).unwrap();
        assert_eq!(dice.faces(), [2, 6, 2, 6, 6]);
    }

    #[test]
    fn test_roll_unknown_participant() {
        let mut state = MatchState::new(2);
        let mut source = SequenceDice::new(vec![1]).unwrap();
        let err = state
            .roll_dice(pid(5), HoldMask::NONE, &mut source)
            .unwrap_err();
        assert_eq!(err, RulesError::UnknownParticipant(pid(5)));
    }

    #[test]
    fn test_advance_turn_clears_outgoing_hand() {
        let mut state = MatchState::new(2);
        let mut source = SequenceDice::new(vec![4]).unwrap();
        state.roll_dice(pid(0), HoldMask::NONE, &mut source).unwrap();
        state.advance_turn();
        assert!(state.dice(pid(0)).is_none());
    }

    #[test]
    fn test_record_score_is_write_once() {
        let mut state = MatchState::new(2);
        state.record_score(pid(1), Category::Yahtzee, 50).unwrap();
        let err = state.record_score(pid(1), Category::Yahtzee, 0).unwrap_err();
        assert_eq!(err, RulesError::CategoryAlreadyUsed(Category::Yahtzee));
        assert_eq!(state.total_score(pid(1)), Some(50));
        assert_eq!(state.total_score(pid(0)), Some(0));
    }

    #[test]
    fn test_complete_only_when_every_sheet_is_full() {
        let mut state = MatchState::new(2);
        for category in Category::ALL {
            state.record_score(pid(0), category, 1).unwrap();
        }
        assert!(!state.is_complete());
        for category in Category::ALL {
            state.record_score(pid(1), category, 1).unwrap();
        }
        assert!(state.is_complete());
    }

    /// Fills a sheet so that it totals exactly 245 (with the upper bonus).
    fn fill_245(state: &mut MatchState, participant: ParticipantId) {
        let scores = [
            (Category::Ones, 3),
            (Category::Twos, 6),
            (Category::Threes, 9),
            (Category::Fours, 12),
            (Category::Fives, 15),
            (Category::Sixes, 18),
            (Category::ThreeOfAKind, 20),
            (Category::FourOfAKind, 0),
            (Category::FullHouse, 25),
            (Category::SmallStraight, 30),
            (Category::LargeStraight, 0),
            (Category::Yahtzee, 50),
            (Category::Chance, 22),
        ];
        for (category, score) in scores {
            state.record_score(participant, category, score).unwrap();
        }
    }

    #[test]
    fn test_equal_totals_are_a_tie() {
        let mut state = MatchState::new(2);
        fill_245(&mut state, pid(0));
        fill_245(&mut state, pid(1));
        assert!(state.is_complete());
        assert_eq!(state.total_score(pid(0)), Some(245));
        assert_eq!(
            state.outcome(),
            Some(Outcome::Tie {
                participants: vec![pid(0), pid(1)],
                total: 245
            })
        );
    }

    #[test]
    fn test_highest_total_wins() {
        let mut state = MatchState::new(2);
        fill_245(&mut state, pid(0));
        state.record_score(pid(1), Category::Chance, 30).unwrap();
        assert_eq!(
            state.outcome(),
            Some(Outcome::Winner {
                participant: pid(0),
                total: 245
            })
        );
    }
}
