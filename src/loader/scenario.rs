//! Mid-match scenarios for tests and demos
//!
//! Builds a [`Game`] that is already in progress: turn 1 under way for the
//! chosen seat, with hands, boards, mana and hero stats set directly and no
//! events recorded yet. Minions placed on the board get fresh handles and
//! are ready to attack unless asked otherwise.

use crate::core::{Card, Hero, HeroClass, ManaCrystals, Minion};
use crate::game::{Game, GameState, PlayerSetup, RulesConfig};
use crate::loader::CardDatabase;
use crate::zones::{Deck, HandCard};
use crate::{EngineError, Result};
use std::sync::Arc;

/// Builder for an in-progress match
#[derive(Debug, Clone)]
pub struct Scenario {
    state: GameState,
    card_db: CardDatabase,
}

impl Scenario {
    /// Two heroes with empty decks and hands; seat 0 to act on turn 1
    pub fn new(first: HeroClass, second: HeroClass) -> Self {
        Self::with_database(first, second, CardDatabase::builtin())
    }

    pub fn with_database(first: HeroClass, second: HeroClass, card_db: CardDatabase) -> Self {
        Self::with_parts(first, second, card_db, RulesConfig::default())
    }

    /// Built-in cards under non-default rules
    pub fn with_rules(first: HeroClass, second: HeroClass, config: RulesConfig) -> Self {
        Self::with_parts(first, second, CardDatabase::builtin(), config)
    }

    fn with_parts(
        first: HeroClass,
        second: HeroClass,
        card_db: CardDatabase,
        config: RulesConfig,
    ) -> Self {
        let mut state = GameState::new(
            PlayerSetup::new("Player 1", Hero::new(first), Deck::new()),
            PlayerSetup::new("Player 2", Hero::new(second), Deck::new()),
            config,
        );
        state.advance_turn_counter();
        Scenario { state, card_db }
    }

    fn card(&self, name: &str) -> Result<Arc<Card>> {
        self.card_db
            .get_card(name)
            .ok_or_else(|| EngineError::InvalidCardFormat(format!("Card not found in database: {name}")))
    }

    fn check_seat(seat: usize) -> Result<()> {
        if seat < 2 {
            Ok(())
        } else {
            Err(EngineError::InvalidReference(format!("no seat {seat}")))
        }
    }

    /// Whose turn it is
    pub fn active(mut self, seat: usize) -> Result<Self> {
        Self::check_seat(seat)?;
        self.state.set_active_seat(seat);
        Ok(self)
    }

    /// Append cards to a hand; the last one listed is hand index 1
    pub fn hand(mut self, seat: usize, names: &[&str]) -> Result<Self> {
        Self::check_seat(seat)?;
        let limit = self.state.config().max_hand_size;
        for name in names {
            let card = self.card(name)?;
            self.state
                .player_at_mut(seat)
                .hand
                .add(HandCard(card), limit)
                .map_err(|c| EngineError::IllegalState(format!("hand full, cannot add {}", c.name())))?;
        }
        Ok(self)
    }

    /// Put cards on top of a deck, the last one listed drawn first
    pub fn deck(mut self, seat: usize, names: &[&str]) -> Result<Self> {
        Self::check_seat(seat)?;
        let mut cards: Vec<Arc<Card>> = self
            .state
            .player_at(seat)
            .deck
            .cards()
            .iter()
            .map(|c| Arc::clone(&c.0))
            .collect();
        for name in names {
            cards.push(self.card(name)?);
        }
        self.state.player_at_mut(seat).deck = Deck::from_cards(cards);
        Ok(self)
    }

    /// Place a ready minion at the right end of a board
    pub fn minion(self, seat: usize, name: &str) -> Result<Self> {
        let card = self.card(name)?;
        self.place(seat, card, false)
    }

    /// Place a minion that was played this turn
    pub fn sick_minion(self, seat: usize, name: &str) -> Result<Self> {
        let card = self.card(name)?;
        self.place(seat, card, true)
    }

    /// Place a ready minion from a card outside the database
    pub fn custom_minion(self, seat: usize, card: Card) -> Result<Self> {
        self.place(seat, card.into_shared(), false)
    }

    fn place(mut self, seat: usize, card: Arc<Card>, summoning_sick: bool) -> Result<Self> {
        Self::check_seat(seat)?;
        if self.state.player_at(seat).minions.len() >= self.state.config().max_board_size {
            return Err(EngineError::IllegalState(format!("board {seat} is full")));
        }
        let owner = self.state.player_at(seat).handle;
        let handle = self.state.registry_mut().allocate_minion(owner);
        let mut minion = Minion::from_card(handle, Arc::clone(&card))
            .ok_or_else(|| EngineError::InvalidCardFormat(format!("{} is not a minion", card.name)))?;
        minion.summoning_sick = summoning_sick;
        self.state.player_at_mut(seat).minions.push(minion);
        Ok(self)
    }

    /// Set crystals; `empty` is clamped to `total`
    pub fn mana(mut self, seat: usize, total: u8, empty: u8) -> Result<Self> {
        Self::check_seat(seat)?;
        self.state.player_at_mut(seat).mana = ManaCrystals::with(total, empty);
        Ok(self)
    }

    pub fn hero_health(mut self, seat: usize, health: i32) -> Result<Self> {
        Self::check_seat(seat)?;
        let hero = &mut self.state.player_at_mut(seat).hero;
        hero.health = health;
        hero.max_health = hero.max_health.max(health);
        Ok(self)
    }

    pub fn hero_armor(mut self, seat: usize, armor: i32) -> Result<Self> {
        Self::check_seat(seat)?;
        self.state.player_at_mut(seat).hero.armor = armor;
        Ok(self)
    }

    pub fn hero_attack(mut self, seat: usize, attack: i32) -> Result<Self> {
        Self::check_seat(seat)?;
        self.state.player_at_mut(seat).hero.attack = attack;
        Ok(self)
    }

    pub fn build(self) -> Game {
        Game::new(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CharacterHandle;
    use crate::game::Action;

    #[test]
    fn test_scenario_board() {
        let game = Scenario::new(HeroClass::Mage, HeroClass::Warrior)
            .minion(0, "Bloodfen Raptor")
            .unwrap()
            .sick_minion(0, "Wisp")
            .unwrap()
            .hero_armor(1, 2)
            .unwrap()
            .mana(0, 3, 1)
            .unwrap()
            .build();

        let [p1, p2] = game.player_handles();
        let me = game.player(p1).unwrap();
        assert_eq!(me.minions.len(), 2);
        assert_eq!(me.mana.current(), 2);
        assert_eq!(game.player(p2).unwrap().hero.armor, 2);
        assert_eq!(game.state().turn_number(), 1);

        let raptor = CharacterHandle::Minion(me.minions[0].handle);
        let wisp = CharacterHandle::Minion(me.minions[1].handle);
        let face = CharacterHandle::Player(p2);
        assert!(game.speculate(&Action::Attack { attacker: raptor, defender: face }));
        assert!(!game.speculate(&Action::Attack { attacker: wisp, defender: face }));
    }

    #[test]
    fn test_deck_order() {
        let game = Scenario::new(HeroClass::Mage, HeroClass::Mage)
            .deck(0, &["Wisp", "Core Hound"])
            .unwrap()
            .build();
        let [p1, _] = game.player_handles();
        let top_first: Vec<String> = game.player(p1).unwrap().deck.cards().iter().rev()
            .map(|c| c.card().name.to_string())
            .collect();
        assert_eq!(top_first, vec!["Core Hound", "Wisp"]);
    }

    #[test]
    fn test_unknown_card_and_seat() {
        assert!(Scenario::new(HeroClass::Mage, HeroClass::Mage).hand(0, &["Nope"]).is_err());
        assert!(Scenario::new(HeroClass::Mage, HeroClass::Mage).active(2).is_err());
        assert!(Scenario::new(HeroClass::Mage, HeroClass::Mage).minion(0, "Arcane Intellect").is_err());
    }
}
