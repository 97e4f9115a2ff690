//! Main game state structure
//!
//! `GameState` is the single owner of every player, hero, minion and card
//! instance in a match. Anything outside the resolver reads it through the
//! public query methods; mutation is crate-private.

use crate::core::{
    CharacterHandle, EntityRef, HandleRegistry, Hero, Minion, MinionHandle, Player,
    PlayerHandle, PlayerName,
};
use crate::core::player::MAX_BOARD_SIZE;
use crate::game::combat::Combatant;
use crate::game::game_loop::GameResult;
use crate::zones::{Deck, MAX_HAND_SIZE};
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Tunable rule constants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Cards drawn before the mulligan, by seat
    pub opening_hand: [usize; 2],
    pub max_hand_size: usize,
    pub max_board_size: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            opening_hand: [3, 4],
            max_hand_size: MAX_HAND_SIZE,
            max_board_size: MAX_BOARD_SIZE,
        }
    }
}

/// Everything needed to seat one player
#[derive(Debug, Clone)]
pub struct PlayerSetup {
    pub name: PlayerName,
    pub hero: Hero,
    pub deck: Deck,
}

impl PlayerSetup {
    pub fn new(name: impl Into<PlayerName>, hero: Hero, deck: Deck) -> Self {
        PlayerSetup {
            name: name.into(),
            hero,
            deck,
        }
    }
}

/// Complete game state
///
/// Cheap enough to clone that speculation works on a full copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    players: [Player; 2],
    /// Seat of the player whose turn it is
    active: usize,
    turn_number: u32,
    registry: HandleRegistry,
    result: Option<GameResult>,
    config: RulesConfig,
}

impl GameState {
    /// Seat two players. No cards are drawn until the match is started.
    pub fn new(first: PlayerSetup, second: PlayerSetup, config: RulesConfig) -> Self {
        let mut registry = HandleRegistry::new();
        let h1 = registry.allocate_player(0);
        let h2 = registry.allocate_player(1);
        GameState {
            players: [
                Player::new(h1, first.name, first.hero, first.deck),
                Player::new(h2, second.name, second.hero, second.deck),
            ],
            active: 0,
            turn_number: 0,
            registry,
            result: None,
            config,
        }
    }

    pub fn player_handles(&self) -> [PlayerHandle; 2] {
        [self.players[0].handle, self.players[1].handle]
    }

    pub fn active_player_handle(&self) -> PlayerHandle {
        self.players[self.active].handle
    }

    pub fn non_active_player_handle(&self) -> PlayerHandle {
        self.players[1 - self.active].handle
    }

    pub fn active_seat(&self) -> usize {
        self.active
    }

    pub fn player(&self, handle: PlayerHandle) -> Result<&Player> {
        let seat = self.seat_of(handle)?;
        Ok(&self.players[seat])
    }

    /// Seat 0 moves first
    pub fn player_at(&self, seat: usize) -> &Player {
        &self.players[seat]
    }

    pub fn active_player(&self) -> &Player {
        &self.players[self.active]
    }

    pub fn opponent_of(&self, handle: PlayerHandle) -> Result<PlayerHandle> {
        let seat = self.seat_of(handle)?;
        Ok(self.players[1 - seat].handle)
    }

    pub fn seat_of(&self, handle: PlayerHandle) -> Result<usize> {
        self.registry
            .resolve_player(handle)
            .ok_or_else(|| EngineError::InvalidReference(format!("unknown player {handle}")))
    }

    /// Turns begun so far (0 before the match starts)
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    pub fn minion(&self, handle: MinionHandle) -> Option<&Minion> {
        let owner = self.registry.resolve_minion(handle)?;
        let seat = self.registry.resolve_player(owner)?;
        self.players[seat].minion(handle)
    }

    pub fn minion_owner(&self, handle: MinionHandle) -> Option<PlayerHandle> {
        self.registry.resolve_minion(handle)
    }

    /// Combat-relevant stats for a hero or minion, if the handle is live
    pub fn combatant(&self, handle: CharacterHandle) -> Option<Combatant> {
        match self.registry.resolve(handle)? {
            EntityRef::Player { seat } => {
                let player = &self.players[seat];
                let hero = &player.hero;
                Some(Combatant {
                    handle,
                    owner: player.handle,
                    attack: hero.attack,
                    health: hero.health,
                    armor: hero.armor,
                    taunt: false,
                    divine_shield: false,
                    summoning_sick: false,
                    attacks_this_turn: hero.attacks_this_turn,
                    max_attacks: 1,
                })
            }
            EntityRef::Minion { owner } => {
                let minion = self.minion(handle.as_minion()?)?;
                Some(Combatant {
                    handle,
                    owner,
                    attack: minion.attack,
                    health: minion.health,
                    armor: 0,
                    taunt: minion.taunt,
                    divine_shield: minion.divine_shield,
                    summoning_sick: minion.summoning_sick && !minion.charge,
                    attacks_this_turn: minion.attacks_this_turn,
                    max_attacks: minion.max_attacks(),
                })
            }
        }
    }

    // ---- crate-private mutation, used by the resolver ----

    pub(crate) fn player_at_mut(&mut self, seat: usize) -> &mut Player {
        &mut self.players[seat]
    }

    pub(crate) fn minion_mut(&mut self, handle: MinionHandle) -> Option<&mut Minion> {
        let owner = self.registry.resolve_minion(handle)?;
        let seat = self.registry.resolve_player(owner)?;
        self.players[seat].minion_mut(handle)
    }

    pub(crate) fn registry_mut(&mut self) -> &mut HandleRegistry {
        &mut self.registry
    }

    pub(crate) fn set_active_seat(&mut self, seat: usize) {
        self.active = seat;
    }

    pub(crate) fn advance_turn_counter(&mut self) -> u32 {
        self.turn_number += 1;
        self.turn_number
    }

    pub(crate) fn set_result(&mut self, result: GameResult) {
        self.result = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HeroClass;

    fn two_players() -> GameState {
        GameState::new(
            PlayerSetup::new("Alice", Hero::new(HeroClass::Mage), Deck::new()),
            PlayerSetup::new("Bob", Hero::new(HeroClass::Warrior), Deck::new()),
            RulesConfig::default(),
        )
    }

    #[test]
    fn test_handles_and_seats() {
        let state = two_players();
        let [p1, p2] = state.player_handles();
        assert_ne!(p1, p2);
        assert_eq!(state.active_player_handle(), p1);
        assert_eq!(state.non_active_player_handle(), p2);
        assert_eq!(state.player(p2).unwrap().name.as_str(), "Bob");
        assert_eq!(state.opponent_of(p1).unwrap(), p2);
        assert_eq!(state.turn_number(), 0);
        assert!(!state.is_over());
    }

    #[test]
    fn test_hero_combatant() {
        let state = two_players();
        let p1 = state.active_player_handle();
        let c = state.combatant(p1.into()).unwrap();
        assert_eq!(c.owner, p1);
        assert_eq!(c.health, 30);
        assert_eq!(c.attack, 0);
    }
}
