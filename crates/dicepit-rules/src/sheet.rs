//! Per-participant score sheets.

use std::collections::BTreeMap;

use crate::{Category, RulesError, Section, UPPER_BONUS, UPPER_BONUS_THRESHOLD};

/// A write-once table of category → score.
///
/// Once a category has an entry it can never be overwritten; the only
/// mutator is [`ScoreSheet::record`], which refuses a second write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreSheet {
    entries: BTreeMap<Category, u32>,
}

impl ScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a score for an unused category.
    ///
    /// # Errors
    /// [`RulesError::CategoryAlreadyUsed`] if the category already has an
    /// entry. The existing score is left untouched.
    pub fn record(&mut self, category: Category, score: u32) -> Result<(), RulesError> {
        if self.entries.contains_key(&category) {
            return Err(RulesError::CategoryAlreadyUsed(category));
        }
        self.entries.insert(category, score);
        Ok(())
    }

    pub fn get(&self, category: Category) -> Option<u32> {
        self.entries.get(&category).copied()
    }

    pub fn is_used(&self, category: Category) -> bool {
        self.entries.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` once all 13 categories hold a score.
    pub fn is_full(&self) -> bool {
        self.entries.len() == Category::COUNT
    }

    /// Categories still open, in sheet order.
    pub fn remaining(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| !self.is_used(*c))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        self.entries.iter().map(|(c, s)| (*c, *s))
    }

    /// Sum of the six upper-section entries.
    pub fn upper_subtotal(&self) -> u32 {
        self.iter()
            .filter(|(c, _)| c.section() == Section::Upper)
            .map(|(_, s)| s)
            .sum()
    }

    pub fn upper_bonus(&self) -> u32 {
        if self.upper_subtotal() >= UPPER_BONUS_THRESHOLD {
            UPPER_BONUS
        } else {
            0
        }
    }

    /// Every recorded score plus the upper bonus.
    ///
    /// There is no extra-Yahtzee bonus: a second Yahtzee is worth
    /// whatever category it is written into, nothing more.
    pub fn total(&self) -> u32 {
        self.entries.values().sum::<u32>() + self.upper_bonus()
    }
}
