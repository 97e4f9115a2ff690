//! Card effects
//!
//! Effects are static data. The resolver interprets them; cards only carry
//! lists of them. Spells are untargeted, so every effect names its victims
//! through a [`Selector`] relative to the player resolving it.

use crate::core::{Card, CrystalVariety};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which characters an effect touches, seen from the resolving player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    FriendlyHero,
    EnemyHero,
    AllFriendlyMinions,
    AllEnemyMinions,
    AllMinions,
    /// Enemy hero and every enemy minion
    AllEnemyCharacters,
    /// One enemy minion, picked through the decision channel
    RandomEnemyMinion,
    /// One enemy character (hero included), picked through the decision channel
    RandomEnemyCharacter,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Selector::FriendlyHero => "your hero",
            Selector::EnemyHero => "the enemy hero",
            Selector::AllFriendlyMinions => "all friendly minions",
            Selector::AllEnemyMinions => "all enemy minions",
            Selector::AllMinions => "all minions",
            Selector::AllEnemyCharacters => "all enemies",
            Selector::RandomEnemyMinion => "a random enemy minion",
            Selector::RandomEnemyCharacter => "a random enemy",
        };
        write!(f, "{s}")
    }
}

/// A single step of a spell, battlecry or hero power
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    DealDamage { target: Selector, amount: i32 },
    RestoreHealth { target: Selector, amount: i32 },
    /// Armor for the resolving player's hero
    GainArmor { amount: i32 },
    DrawCards { count: u8 },
    Silence { target: Selector },
    Destroy { target: Selector },
    Buff { target: Selector, attack: i32, health: i32 },
    /// Put a fresh copy of `card` on the right end of the resolving player's board
    Summon { card: Arc<Card> },
    GainManaCrystal { variety: CrystalVariety },
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::DealDamage { target, amount } => write!(f, "Deal {amount} damage to {target}"),
            Effect::RestoreHealth { target, amount } => write!(f, "Restore {amount} health to {target}"),
            Effect::GainArmor { amount } => write!(f, "Gain {amount} armor"),
            Effect::DrawCards { count } => write!(f, "Draw {count} card(s)"),
            Effect::Silence { target } => write!(f, "Silence {target}"),
            Effect::Destroy { target } => write!(f, "Destroy {target}"),
            Effect::Buff { target, attack, health } => write!(f, "Give {target} +{attack}/+{health}"),
            Effect::Summon { card } => write!(f, "Summon a {}", card.name),
            Effect::GainManaCrystal { variety } => write!(f, "Gain an {variety} mana crystal"),
        }
    }
}
