//! Card database for looking up card definitions
//!
//! Lookup is by catalog key: the name transliterated to ASCII and
//! lowercased, so "Sen’jin Shieldmasta" and "sen'jin shieldmasta" are the
//! same card.

use crate::core::{catalog_key, Card};
use crate::loader::catalog::builtin_cards;
use crate::loader::deck::DeckList;
use crate::zones::Deck;
use crate::{EngineError, Result};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Database of card definitions
#[derive(Debug, Clone, Default)]
pub struct CardDatabase {
    cards: FxHashMap<String, Arc<Card>>,
}

impl CardDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in basic set
    pub fn builtin() -> Self {
        let mut db = Self::new();
        for card in builtin_cards() {
            db.add_card(card);
        }
        db
    }

    /// Parse a JSON array of card definitions
    pub fn parse_json(json: &str) -> Result<Vec<Card>> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        for card in &cards {
            if card.name.as_str().trim().is_empty() {
                return Err(EngineError::InvalidCardFormat("card with an empty name".to_string()));
            }
        }
        Ok(cards)
    }

    /// Add every card of a JSON array, replacing same-named cards
    pub fn add_json(&mut self, json: &str) -> Result<usize> {
        let cards = Self::parse_json(json)?;
        let count = cards.len();
        for card in cards {
            self.add_card(card);
        }
        Ok(count)
    }

    /// Add a single card definition to the database
    pub fn add_card(&mut self, card: Card) {
        self.cards.insert(card.name.catalog_key(), Arc::new(card));
    }

    /// Look up a card by name
    pub fn get_card(&self, name: &str) -> Option<Arc<Card>> {
        self.cards.get(&catalog_key(name)).cloned()
    }

    /// Check if a card exists in the database
    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(&catalog_key(name))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All cards, sorted by name
    pub fn cards(&self) -> Vec<Arc<Card>> {
        let mut cards: Vec<Arc<Card>> = self.cards.values().cloned().collect();
        cards.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        cards
    }

    /// Instantiate a deck list, in list order (the last card ends up on top
    /// until the deck is shuffled)
    pub fn build_deck(&self, list: &DeckList) -> Result<Deck> {
        let mut cards = Vec::with_capacity(list.total_cards());
        for entry in &list.main_deck {
            let card = self.get_card(&entry.card_name).ok_or_else(|| {
                EngineError::InvalidCardFormat(format!("Card not found in database: {}", entry.card_name))
            })?;
            cards.extend(std::iter::repeat(card).take(entry.count as usize));
        }
        Ok(Deck::from_cards(cards))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DeckEntry;

    #[test]
    fn test_lookup_ignores_case_and_unicode_quotes() {
        let db = CardDatabase::builtin();
        let card = db.get_card("SEN\u{2019}JIN SHIELDMASTA").unwrap();
        assert_eq!(card.name.as_str(), "Sen'jin Shieldmasta");
        assert!(db.contains("wisp"));
        assert!(!db.contains("Lightning Bolt"));
    }

    #[test]
    fn test_add_json() {
        let mut db = CardDatabase::new();
        let json = r#"[
            {"name": "Goldshire Footman", "cost": 1,
             "kind": {"type": "Minion", "attack": 1, "health": 2, "keywords": ["Taunt"]}},
            {"name": "Moonfire", "cost": 0, "text": "Deal 1 damage to the enemy hero.",
             "kind": {"type": "Spell", "effects": [{"DealDamage": {"target": "EnemyHero", "amount": 1}}]}}
        ]"#;
        assert_eq!(db.add_json(json).unwrap(), 2);
        let footman = db.get_card("goldshire footman").unwrap();
        assert_eq!(footman.as_minion().unwrap().health, 2);
        assert!(!db.get_card("Moonfire").unwrap().is_minion());
    }

    #[test]
    fn test_bad_json() {
        let mut db = CardDatabase::new();
        assert!(matches!(db.add_json("{"), Err(EngineError::SerializationError(_))));
        assert!(matches!(
            db.add_json(r#"[{"name": " ", "cost": 0, "kind": {"type": "Spell", "effects": []}}]"#),
            Err(EngineError::InvalidCardFormat(_))
        ));
    }

    #[test]
    fn test_build_deck() {
        let db = CardDatabase::builtin();
        let list = DeckList {
            name: None,
            hero: None,
            main_deck: vec![
                DeckEntry { card_name: "Wisp".to_string(), count: 2 },
                DeckEntry { card_name: "Core Hound".to_string(), count: 1 },
            ],
        };
        let deck = db.build_deck(&list).unwrap();
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.cards().last().unwrap().card().name.as_str(), "Core Hound");

        let missing = DeckList {
            main_deck: vec![DeckEntry { card_name: "Nonexistent Card".to_string(), count: 1 }],
            ..list
        };
        assert!(matches!(db.build_deck(&missing), Err(EngineError::InvalidCardFormat(_))));
    }
}
