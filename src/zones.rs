//! Card zones: the deck and the hand
//!
//! The board is not a card zone. Minions on it are entities with handles,
//! held by [`crate::core::Player`].

use crate::core::{Card, CardName};
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Maximum cards in hand; a card drawn into a full hand is burned
pub const MAX_HAND_SIZE: usize = 10;

/// A card sitting in a deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCard(pub Arc<Card>);

/// A card sitting in a hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandCard(pub Arc<Card>);

impl DeckCard {
    pub fn card(&self) -> &Card {
        &self.0
    }

}

impl HandCard {
    pub fn card(&self) -> &Card {
        &self.0
    }

    pub fn name(&self) -> &CardName {
        &self.0.name
    }

    pub fn cost(&self) -> u8 {
        self.0.cost
    }

    pub fn into_deck(self) -> DeckCard {
        DeckCard(self.0)
    }
}

/// Positional reference into a hand: 1 is the most recently drawn card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandIndex(pub usize);

impl HandIndex {
    /// Vector slot for this index in a hand of `len` cards
    pub fn slot(&self, len: usize) -> Option<usize> {
        if self.0 >= 1 && self.0 <= len {
            Some(len - self.0)
        } else {
            None
        }
    }

    /// The index that names `slot` in a hand of `len` cards
    pub fn from_slot(slot: usize, len: usize) -> Self {
        HandIndex(len - slot)
    }
}

impl fmt::Display for HandIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered draw pile. The top is the last element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<DeckCard>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Arc<Card>>) -> Self {
        Deck {
            cards: cards.into_iter().map(DeckCard).collect(),
        }
    }

    pub fn cards(&self) -> &[DeckCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn draw_top(&mut self) -> Option<DeckCard> {
        self.cards.pop()
    }

    pub fn add_to_bottom(&mut self, card: DeckCard) {
        self.cards.insert(0, card);
    }

    /// Reorder so that position `i` holds the card previously at `order[i]`.
    ///
    /// `order` must be a permutation of `0..len`; anything else is rejected
    /// and the deck is left as it was.
    pub fn apply_permutation(&mut self, order: &[usize]) -> Result<()> {
        validate_permutation(order, self.cards.len())?;
        let reordered = order.iter().map(|&i| self.cards[i].clone()).collect();
        self.cards = reordered;
        Ok(())
    }
}

/// Check that `order` names every index in `0..len` exactly once
pub fn validate_permutation(order: &[usize], len: usize) -> Result<()> {
    if order.len() != len {
        return Err(EngineError::InvalidDecision(format!(
            "shuffle returned {} positions for {len} cards",
            order.len()
        )));
    }
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len || seen[i] {
            return Err(EngineError::InvalidDecision(format!(
                "shuffle is not a permutation (bad or repeated index {i})"
            )));
        }
        seen[i] = true;
    }
    Ok(())
}

/// Cards in hand, in acquisition order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<HandCard>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[HandCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Whether the hand already holds `limit` cards
    pub fn is_full(&self, limit: usize) -> bool {
        self.cards.len() >= limit
    }

    /// Add a card, handing it back if the hand already holds `limit` cards
    pub fn add(&mut self, card: HandCard, limit: usize) -> std::result::Result<(), HandCard> {
        if self.is_full(limit) {
            return Err(card);
        }
        self.cards.push(card);
        Ok(())
    }

    pub fn get(&self, index: HandIndex) -> Option<&HandCard> {
        index.slot(self.cards.len()).map(|slot| &self.cards[slot])
    }

    pub fn remove(&mut self, index: HandIndex) -> Result<HandCard> {
        let slot = index.slot(self.cards.len()).ok_or_else(|| {
            EngineError::InvalidReference(format!(
                "hand index {index} out of range (hand has {} cards)",
                self.cards.len()
            ))
        })?;
        Ok(self.cards.remove(slot))
    }

    /// Remove by vector slot (acquisition order)
    pub fn remove_slot(&mut self, slot: usize) -> Option<HandCard> {
        (slot < self.cards.len()).then(|| self.cards.remove(slot))
    }

    /// Indices naming each card, paired with it, most recent first
    pub fn indexed(&self) -> impl Iterator<Item = (HandIndex, &HandCard)> {
        let len = self.cards.len();
        self.cards
            .iter()
            .enumerate()
            .rev()
            .map(move |(slot, card)| (HandIndex::from_slot(slot, len), card))
    }
}
