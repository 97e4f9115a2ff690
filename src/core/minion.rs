//! Minions on the board

use crate::core::{Card, Keyword, MinionHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A minion instance
///
/// Keyword flags are copied off the card when the minion is summoned so
/// that silencing can clear them without touching the shared definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minion {
    pub handle: MinionHandle,
    pub card: Arc<Card>,
    pub attack: i32,
    pub health: i32,
    pub max_health: i32,
    pub taunt: bool,
    pub divine_shield: bool,
    pub charge: bool,
    pub windfury: bool,
    pub silenced: bool,
    /// Played this turn (cannot attack unless it has charge)
    pub summoning_sick: bool,
    pub attacks_this_turn: u8,
}

impl Minion {
    /// Summon from a minion card. Returns None for spell cards.
    pub fn from_card(handle: MinionHandle, card: Arc<Card>) -> Option<Self> {
        let stats = card.as_minion()?;
        let has = |k: Keyword| stats.keywords.contains(&k);
        Some(Minion {
            handle,
            attack: stats.attack,
            health: stats.health,
            max_health: stats.health,
            taunt: has(Keyword::Taunt),
            divine_shield: has(Keyword::DivineShield),
            charge: has(Keyword::Charge),
            windfury: has(Keyword::Windfury),
            silenced: false,
            summoning_sick: true,
            attacks_this_turn: 0,
            card,
        })
    }

    pub fn name(&self) -> &str {
        self.card.name.as_str()
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Attacks allowed per turn
    pub fn max_attacks(&self) -> u8 {
        if self.windfury {
            2
        } else {
            1
        }
    }

    /// Strip keywords. Stat changes from buffs stay.
    pub fn silence(&mut self) {
        self.taunt = false;
        self.divine_shield = false;
        self.charge = false;
        self.windfury = false;
        self.silenced = true;
    }

    pub fn buff(&mut self, attack: i32, health: i32) {
        self.attack = (self.attack + attack).max(0);
        self.health += health;
        self.max_health += health;
    }

    pub fn restore(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + amount.max(0)).min(self.max_health).max(before);
        self.health - before
    }
}

impl fmt::Display for Minion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.name(), self.attack, self.health)?;
        if self.taunt {
            write!(f, " [Taunt]")?;
        }
        if self.divine_shield {
            write!(f, " [Shield]")?;
        }
        if self.summoning_sick && !self.charge {
            write!(f, " zzz")?;
        }
        Ok(())
    }
}
