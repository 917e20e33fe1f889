//! The scoring engine.
//!
//! [`score`] is a pure function: no state, no I/O, same input → same
//! output. Because [`Category`] is a closed enum and [`Dice`] is always a
//! legal hand, the function is total and has no error path.

use crate::{Category, Dice};

pub const FULL_HOUSE_SCORE: u32 = 25;
pub const SMALL_STRAIGHT_SCORE: u32 = 30;
pub const LARGE_STRAIGHT_SCORE: u32 = 40;
pub const YAHTZEE_SCORE: u32 = 50;

/// Upper-section subtotal needed for the bonus.
pub const UPPER_BONUS_THRESHOLD: u32 = 63;
pub const UPPER_BONUS: u32 = 35;

/// Points the hand is worth in the given category.
pub fn score(category: Category, dice: &Dice) -> u32 {
    let counts = dice.counts();

    match category {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => {
            let face = category.face().unwrap_or_default();
            u32::from(counts[usize::from(face)]) * u32::from(face)
        }
        Category::ThreeOfAKind => of_a_kind(dice, &counts, 3),
        Category::FourOfAKind => of_a_kind(dice, &counts, 4),
        // Exactly one triple and one pair. Five of a kind has neither.
        Category::FullHouse => {
            if counts.contains(&3) && counts.contains(&2) {
                FULL_HOUSE_SCORE
            } else {
                0
            }
        }
        Category::SmallStraight => {
            if dice.longest_run() >= 4 {
                SMALL_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::LargeStraight => {
            if dice.longest_run() >= 5 {
                LARGE_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::Yahtzee => {
            if counts.contains(&5) {
                YAHTZEE_SCORE
            } else {
                0
            }
        }
        Category::Chance => dice.sum(),
    }
}

/// Sum of all five dice if any face shows at least `n` times.
fn of_a_kind(dice: &Dice, counts: &[u8; 7], n: u8) -> u32 {
    if counts.iter().any(|&c| c >= n) {
        dice.sum()
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dice(faces: [u8; 5]) -> Dice {
        Dice::new(faces).unwrap()
    }

    #[test]
    fn test_four_of_a_kind_is_not_a_full_house() {
        let hand = dice([5, 5, 5, 5, 2]);
        assert_eq!(score(Category::FullHouse, &hand), 0);
        assert_eq!(score(Category::FourOfAKind, &hand), 22);
        assert_eq!(score(Category::ThreeOfAKind, &hand), 22);
    }

    #[test]
    fn test_straights() {
        let hand = dice([1, 2, 3, 4, 5]);
        assert_eq!(score(Category::LargeStraight, &hand), 40);
        assert_eq!(score(Category::SmallStraight, &hand), 30);

        // Order and duplicates don't matter for a small straight.
        let hand = dice([6, 4, 3, 4, 5]);
        assert_eq!(score(Category::SmallStraight, &hand), 30);
        assert_eq!(score(Category::LargeStraight, &hand), 0);

        let hand = dice([1, 2, 3, 5, 6]);
        assert_eq!(score(Category::SmallStraight, &hand), 0);
    }

    #[test]
    fn test_full_house() {
        assert_eq!(score(Category::FullHouse, &dice([3, 3, 3, 2, 2])), 25);
        assert_eq!(score(Category::FullHouse, &dice([2, 3, 2, 3, 3])), 25);
        assert_eq!(score(Category::FullHouse, &dice([3, 3, 3, 2, 1])), 0);
    }

    #[test]
    fn test_five_of_a_kind_scores_zero_as_full_house() {
        let hand = dice([6, 6, 6, 6, 6]);
        assert_eq!(score(Category::FullHouse, &hand), 0);
    }

    #[test]
    fn test_yahtzee_hand() {
        let hand = dice([6, 6, 6, 6, 6]);
        assert_eq!(score(Category::Yahtzee, &hand), 50);
        assert_eq!(score(Category::Sixes, &hand), 30);
        assert_eq!(score(Category::Chance, &hand), 30);
        assert_eq!(score(Category::Ones, &hand), 0);
    }

    #[test]
    fn test_upper_section_counts_matching_faces() {
        let hand = dice([2, 2, 5, 2, 1]);
        assert_eq!(score(Category::Ones, &hand), 1);
        assert_eq!(score(Category::Twos, &hand), 6);
        assert_eq!(score(Category::Fives, &hand), 5);
        assert_eq!(score(Category::Threes, &hand), 0);
    }

    #[test]
    fn test_of_a_kind_misses_score_zero() {
        let hand = dice([1, 1, 2, 2, 3]);
        assert_eq!(score(Category::ThreeOfAKind, &hand), 0);
        assert_eq!(score(Category::FourOfAKind, &hand), 0);
        assert_eq!(score(Category::Yahtzee, &hand), 0);
        assert_eq!(score(Category::Chance, &hand), 9);
    }

    #[test]
    fn test_score_is_deterministic_over_every_hand() {
        // All 7776 ordered hands, every category, scored twice.
        for n in 0..6u32.pow(5) {
            let mut faces = [0u8; 5];
            let mut rest = n;
            for face in &mut faces {
                *face = (rest % 6) as u8 + 1;
                rest /= 6;
            }
            let hand = dice(faces);
            for category in Category::ALL {
                assert_eq!(score(category, &hand), score(category, &hand));
            }
        }
    }
}
