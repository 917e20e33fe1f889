//! The 13 scoring categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RulesError;

/// Which half of the score sheet a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Upper,
    Lower,
}

/// One of the fixed scoring rules.
///
/// Categories are a closed set: the protocol layer parses names into this
/// enum once, so nothing past the wire ever deals with raw strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

impl Category {
    /// Number of categories on a full sheet.
    pub const COUNT: usize = 13;

    /// Every category in sheet order.
    pub const ALL: [Category; Self::COUNT] = [
        Self::Ones,
        Self::Twos,
        Self::Threes,
        Self::Fours,
        Self::Fives,
        Self::Sixes,
        Self::ThreeOfAKind,
        Self::FourOfAKind,
        Self::FullHouse,
        Self::SmallStraight,
        Self::LargeStraight,
        Self::Yahtzee,
        Self::Chance,
    ];

    pub fn section(self) -> Section {
        if self.face().is_some() {
            Section::Upper
        } else {
            Section::Lower
        }
    }

    /// The face value counted by an upper-section category.
    pub fn face(self) -> Option<u8> {
        match self {
            Self::Ones => Some(1),
            Self::Twos => Some(2),
            Self::Threes => Some(3),
            Self::Fours => Some(4),
            Self::Fives => Some(5),
            Self::Sixes => Some(6),
            _ => None,
        }
    }

    /// Canonical wire key, e.g. `full_house`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Ones => "ones",
            Self::Twos => "twos",
            Self::Threes => "threes",
            Self::Fours => "fours",
            Self::Fives => "fives",
            Self::Sixes => "sixes",
            Self::ThreeOfAKind => "three_of_a_kind",
            Self::FourOfAKind => "four_of_a_kind",
            Self::FullHouse => "full_house",
            Self::SmallStraight => "small_straight",
            Self::LargeStraight => "large_straight",
            Self::Yahtzee => "yahtzee",
            Self::Chance => "chance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Parses a category name, ignoring case, surrounding whitespace and word
/// separators. `Full House`, `full-house` and `FULL_HOUSE` are all the
/// same category; the article in `three of a kind` is optional.
impl FromStr for Category {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-' | '\t'))
            .flat_map(char::to_lowercase)
            .collect();

        let category = match folded.as_str() {
            "ones" => Self::Ones,
            "twos" => Self::Twos,
            "threes" => Self::Threes,
            "fours" => Self::Fours,
            "fives" => Self::Fives,
            "sixes" => Self::Sixes,
            "threeofakind" | "threeofkind" => Self::ThreeOfAKind,
            "fourofakind" | "fourofkind" => Self::FourOfAKind,
            "fullhouse" => Self::FullHouse,
            "smallstraight" => Self::SmallStraight,
            "largestraight" => Self::LargeStraight,
            "yahtzee" => Self::Yahtzee,
            "chance" => Self::Chance,
            _ => return Err(RulesError::UnknownCategory(s.trim().to_string())),
        };
        Ok(category)
    }
}

impl TryFrom<String> for Category {
    type Error = RulesError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_and_separator_insensitive() {
        assert_eq!("full_house".parse(), Ok(Category::FullHouse));
        assert_eq!("  Full House ".parse(), Ok(Category::FullHouse));
        assert_eq!("FULL-HOUSE".parse(), Ok(Category::FullHouse));
        assert_eq!("three of a kind".parse(), Ok(Category::ThreeOfAKind));
        assert_eq!("three-of-kind".parse(), Ok(Category::ThreeOfAKind));
        assert_eq!("Four_Of_A_Kind".parse(), Ok(Category::FourOfAKind));
    }

    #[test]
    fn test_parse_unknown_category() {
        let err = "bonus".parse::<Category>().unwrap_err();
        assert_eq!(err, RulesError::UnknownCategory("bonus".into()));
    }

    #[test]
    fn test_every_key_round_trips() {
        for category in Category::ALL {
            assert_eq!(category.key().parse(), Ok(category));
        }
    }

    #[test]
    fn test_sections() {
        let upper = Category::ALL
            .iter()
            .filter(|c| c.section() == Section::Upper)
            .count();
        assert_eq!(upper, 6);
        assert_eq!(Category::Sixes.face(), Some(6));
        assert_eq!(Category::Chance.face(), None);
    }
}
