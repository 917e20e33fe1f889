//! Dice hands, hold masks and sources of randomness.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::RulesError;

/// Number of dice in a hand.
pub const DICE_COUNT: usize = 5;

/// A hand of five dice, each showing a face in `1..=6`.
///
/// The only way to build one is through [`Dice::new`] (or a roll), so a
/// `Dice` value is always a legal hand and scoring never has to guard
/// against malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 5]", into = "[u8; 5]")]
pub struct Dice([u8; DICE_COUNT]);

impl Dice {
    /// Validates and wraps five faces.
    pub fn new(faces: [u8; DICE_COUNT]) -> Result<Self, RulesError> {
        if let Some(bad) = faces.iter().find(|f| !(1..=6).contains(*f)) {
            return Err(RulesError::InvalidDie(*bad));
        }
        Ok(Self(faces))
    }

    pub fn faces(&self) -> [u8; DICE_COUNT] {
        self.0
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&f| u32::from(f)).sum()
    }

    /// Occurrences of each face, indexed by face value (index 0 unused).
    pub fn counts(&self) -> [u8; 7] {
        let mut counts = [0u8; 7];
        for &face in &self.0 {
            counts[usize::from(face)] += 1;
        }
        counts
    }

    /// Length of the longest run of consecutive distinct faces.
    pub fn longest_run(&self) -> usize {
        let counts = self.counts();
        let mut best = 0;
        let mut run = 0;
        for face in 1..=6 {
            if counts[face] > 0 {
                run += 1;
                best = best.max(run);
            } else {
                run = 0;
            }
        }
        best
    }
}

impl TryFrom<[u8; DICE_COUNT]> for Dice {
    type Error = RulesError;

    fn try_from(faces: [u8; DICE_COUNT]) -> Result<Self, Self::Error> {
        Self::new(faces)
    }
}

impl From<Dice> for [u8; DICE_COUNT] {
    fn from(dice: Dice) -> Self {
        dice.0
    }
}

/// Space-separated faces, the `DICE:` payload format.
impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e] = self.0;
        write!(f, "{a} {b} {c} {d} {e}")
    }
}

// ---------------------------------------------------------------------------
// HoldMask
// ---------------------------------------------------------------------------

/// Which dice positions keep their value on a re-roll.
///
/// Built from whatever indices a client sent; anything outside `0..=4` is
/// an invalid position and is dropped rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<i64>", into = "Vec<i64>")]
pub struct HoldMask(u8);

impl HoldMask {
    /// Holds nothing: every die is re-rolled.
    pub const NONE: HoldMask = HoldMask(0);

    pub fn from_indices<I: IntoIterator<Item = i64>>(indices: I) -> Self {
        let mut mask = 0u8;
        for index in indices {
            if (0..DICE_COUNT as i64).contains(&index) {
                mask |= 1 << index;
            }
        }
        Self(mask)
    }

    pub fn holds(&self, position: usize) -> bool {
        position < DICE_COUNT && self.0 & (1 << position) != 0
    }

    /// The held positions in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..DICE_COUNT).filter(|&p| self.holds(p))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl From<Vec<i64>> for HoldMask {
    fn from(indices: Vec<i64>) -> Self {
        Self::from_indices(indices)
    }
}

impl From<HoldMask> for Vec<i64> {
    fn from(mask: HoldMask) -> Self {
        mask.indices().map(|p| p as i64).collect()
    }
}

// ---------------------------------------------------------------------------
// DiceSource
// ---------------------------------------------------------------------------

/// Produces die faces for rolls.
///
/// The match coordinator owns one of these. Production code uses
/// [`RandomDice`]; tests and replays use [`SequenceDice`] so every roll is
/// known in advance.
pub trait DiceSource: Send + 'static {
    /// Returns one face. Values outside `1..=6` are clamped by the caller.
    fn roll_die(&mut self) -> u8;
}

/// Uniformly random faces from a seedable PRNG.
#[derive(Debug, Clone)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    /// Seeds from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic dice, for replaying a session.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceSource for RandomDice {
    fn roll_die(&mut self) -> u8 {
        self.rng.random_range(1..=6)
    }
}

/// Cycles through a fixed list of faces forever.
#[derive(Debug, Clone)]
pub struct SequenceDice {
    faces: Vec<u8>,
    next: usize,
}

impl SequenceDice {
    /// # Errors
    /// Returns [`RulesError::InvalidDie`] for a face outside `1..=6`, and
    /// for an empty list (reported as face 0).
    pub fn new(faces: Vec<u8>) -> Result<Self, RulesError> {
        if faces.is_empty() {
            return Err(RulesError::InvalidDie(0));
        }
        if let Some(bad) = faces.iter().find(|f| !(1..=6).contains(*f)) {
            return Err(RulesError::InvalidDie(*bad));
        }
        Ok(Self { faces, next: 0 })
    }
}

impl DiceSource for SequenceDice {
    fn roll_die(&mut self) -> u8 {
        let face = self.faces[self.next];
        self.next = (self.next + 1) % self.faces.len();
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dice_rejects_out_of_range_faces() {
        assert_eq!(Dice::new([1, 2, 3, 4, 7]), Err(RulesError::InvalidDie(7)));
        assert_eq!(Dice::new([0, 2, 3, 4, 5]), Err(RulesError::InvalidDie(0)));
        assert!(Dice::new([6, 6, 6, 6, 6]).is_ok());
    }

    #[test]
    fn test_counts_and_runs() {
        let dice = Dice::new([3, 4, 4, 5, 6]).unwrap();
        assert_eq!(dice.counts(), [0, 0, 0, 1, 2, 1, 1]);
        assert_eq!(dice.longest_run(), 4);
        assert_eq!(dice.sum(), 22);
        assert_eq!(dice.to_string(), "3 4 4 5 6");
    }

    #[test]
    fn test_hold_mask_ignores_invalid_indices() {
        let mask = HoldMask::from_indices([0, 4, 5, -1, 2, 2]);
        assert_eq!(mask.indices().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert!(!mask.holds(1));
        assert!(!mask.holds(9));
        assert!(HoldMask::from_indices([7, 8]).is_empty());
    }

    #[test]
    fn test_sequence_dice_cycles() {
        let mut dice = SequenceDice::new(vec![1, 6]).unwrap();
        let rolled: Vec<u8> = (0..5).map(|_| dice.roll_die()).collect();
        assert_eq!(rolled, vec![1, 6, 1, 6, 1]);
        assert!(SequenceDice::new(vec![]).is_err());
        assert!(SequenceDice::new(vec![2, 9]).is_err());
    }

    #[test]
    fn test_seeded_random_dice_is_repeatable_and_in_range() {
        let mut a = RandomDice::seeded(7);
        let mut b = RandomDice::seeded(7);
        for _ in 0..100 {
            let face = a.roll_die();
            assert!((1..=6).contains(&face));
            assert_eq!(face, b.roll_die());
        }
    }
}
