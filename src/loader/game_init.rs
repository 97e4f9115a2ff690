//! Game initialization from decks
//!
//! Creates matches from deck lists and a card database. The match is
//! returned unstarted: [`crate::game::Game::start`] (or the game loop) does
//! the shuffling, dealing and mulligans through the decision channel.

use crate::core::{Hero, HeroClass};
use crate::game::{Game, GameState, PlayerSetup, RulesConfig};
use crate::loader::catalog::class_deck;
use crate::loader::{CardDatabase, DeckList};
use crate::{EngineError, Result};

/// Game builder for initializing games from decks
#[derive(Debug, Clone)]
pub struct GameInitializer {
    card_db: CardDatabase,
    config: RulesConfig,
}

impl Default for GameInitializer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameInitializer {
    /// Built-in card set, default rules
    pub fn new() -> Self {
        Self::with_database(CardDatabase::builtin())
    }

    pub fn with_database(card_db: CardDatabase) -> Self {
        GameInitializer {
            card_db,
            config: RulesConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RulesConfig) -> Self {
        self.config = config;
        self
    }

    pub fn database(&self) -> &CardDatabase {
        &self.card_db
    }

    pub fn database_mut(&mut self) -> &mut CardDatabase {
        &mut self.card_db
    }

    /// Seat one player
    pub fn player(&self, name: &str, class: HeroClass, deck: &DeckList) -> Result<PlayerSetup> {
        Ok(PlayerSetup::new(name, Hero::new(class), self.card_db.build_deck(deck)?))
    }

    /// Initialize a two-player game from two seated players
    pub fn init_game(&self, first: PlayerSetup, second: PlayerSetup) -> Result<Game> {
        Ok(Game::new(GameState::new(first, second, self.config.clone())))
    }

    /// Two deck files facing each other, heroes taken from their metadata
    pub fn deck_match(&self, first: &DeckList, second: &DeckList) -> Result<Game> {
        let seat = |deck: &DeckList, n: usize| -> Result<PlayerSetup> {
            let class = deck.hero.ok_or_else(|| {
                EngineError::InvalidDeckFormat(format!("{} has no Hero= line", deck.display_name()))
            })?;
            self.player(&format!("Player {n} ({})", deck.display_name()), class, deck)
        };
        self.init_game(seat(first, 1)?, seat(second, 2)?)
    }

    /// Built-in class decks facing each other
    pub fn builtin_match(&self, first: HeroClass, second: HeroClass) -> Result<Game> {
        let p1 = self.player(&format!("Player 1 ({first})"), first, &class_deck(first))?;
        let p2 = self.player(&format!("Player 2 ({second})"), second, &class_deck(second))?;
        self.init_game(p1, p2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{DeckEntry, DeckLoader};

    #[test]
    fn test_builtin_match() {
        let game = GameInitializer::new()
            .builtin_match(HeroClass::Mage, HeroClass::Priest)
            .unwrap();
        let [p1, p2] = game.player_handles();
        assert_eq!(game.player(p1).unwrap().deck.len(), 30);
        assert_eq!(game.player(p2).unwrap().hero.class, HeroClass::Priest);
        assert_eq!(game.state().turn_number(), 0);
        assert!(game.events().is_empty());
    }

    #[test]
    fn test_deck_match_needs_hero() {
        let deck = DeckLoader::parse("[metadata]\nHero=Hunter\n[Main]\n30 Wisp\n").unwrap();
        let game = GameInitializer::new().deck_match(&deck, &deck).unwrap();
        let [_, p2] = game.player_handles();
        assert_eq!(game.player(p2).unwrap().hero.class, HeroClass::Hunter);

        let heroless = DeckList {
            name: None,
            hero: None,
            main_deck: vec![DeckEntry { card_name: "Wisp".to_string(), count: 30 }],
        };
        assert!(matches!(
            GameInitializer::new().deck_match(&heroless, &deck),
            Err(EngineError::InvalidDeckFormat(_))
        ));
    }

    #[test]
    fn test_missing_card_error() {
        let deck = DeckLoader::parse("[metadata]\nHero=Mage\n[Main]\n1 Nonexistent Card\n").unwrap();
        let result = GameInitializer::new().deck_match(&deck, &deck);
        assert!(matches!(result, Err(EngineError::InvalidCardFormat(_))));
    }
}
