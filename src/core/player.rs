//! Player representation

use crate::core::{Hero, ManaCrystals, Minion, MinionHandle, PlayerHandle, PlayerName};
use crate::zones::{Deck, Hand};
use serde::{Deserialize, Serialize};

/// Maximum minions on one side of the board
pub const MAX_BOARD_SIZE: usize = 7;

/// Represents a player in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub handle: PlayerHandle,
    pub name: PlayerName,
    pub hero: Hero,
    pub deck: Deck,
    pub hand: Hand,
    /// Board, left to right
    pub minions: Vec<Minion>,
    pub mana: ManaCrystals,
    /// Damage the next empty-deck draw will deal
    pub fatigue: i32,
}

impl Player {
    pub fn new(handle: PlayerHandle, name: impl Into<PlayerName>, hero: Hero, deck: Deck) -> Self {
        Player {
            handle,
            name: name.into(),
            hero,
            deck,
            hand: Hand::new(),
            minions: Vec::new(),
            mana: ManaCrystals::new(),
            fatigue: 0,
        }
    }

    pub fn minion(&self, handle: MinionHandle) -> Option<&Minion> {
        self.minions.iter().find(|m| m.handle == handle)
    }

    pub fn minion_mut(&mut self, handle: MinionHandle) -> Option<&mut Minion> {
        self.minions.iter_mut().find(|m| m.handle == handle)
    }

    /// Board position of a minion
    pub fn position_of(&self, handle: MinionHandle) -> Option<usize> {
        self.minions.iter().position(|m| m.handle == handle)
    }

    pub fn has_taunt(&self) -> bool {
        self.minions.iter().any(|m| m.taunt && !m.is_dead())
    }

    /// Handles of minions still standing, in board order
    pub fn living_minions(&self) -> impl Iterator<Item = MinionHandle> + '_ {
        self.minions.iter().filter(|m| !m.is_dead()).map(|m| m.handle)
    }
}
