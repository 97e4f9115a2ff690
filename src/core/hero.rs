//! Heroes and hero powers

use crate::core::{Card, Effect, Selector};
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Starting (and maximum) hero health
pub const HERO_STARTING_HEALTH: i32 = 30;

/// Hero power cost shared by every class
pub const HERO_POWER_COST: u8 = 2;

/// Hero identity: decides the hero power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroClass {
    Mage,
    Warrior,
    Hunter,
    Paladin,
    Warlock,
    Priest,
}

impl HeroClass {
    pub const ALL: [HeroClass; 6] = [
        HeroClass::Mage,
        HeroClass::Warrior,
        HeroClass::Hunter,
        HeroClass::Paladin,
        HeroClass::Warlock,
        HeroClass::Priest,
    ];

    pub fn hero_power(&self) -> HeroPower {
        let (name, effects) = match self {
            HeroClass::Mage => (
                "Fireblast",
                vec![Effect::DealDamage { target: Selector::RandomEnemyCharacter, amount: 1 }],
            ),
            HeroClass::Warrior => ("Armor Up!", vec![Effect::GainArmor { amount: 2 }]),
            HeroClass::Hunter => (
                "Steady Shot",
                vec![Effect::DealDamage { target: Selector::EnemyHero, amount: 2 }],
            ),
            HeroClass::Paladin => (
                "Reinforce",
                vec![Effect::Summon { card: silver_hand_recruit().into_shared() }],
            ),
            HeroClass::Warlock => (
                "Life Tap",
                vec![
                    Effect::DrawCards { count: 1 },
                    Effect::DealDamage { target: Selector::FriendlyHero, amount: 2 },
                ],
            ),
            HeroClass::Priest => (
                "Lesser Heal",
                vec![Effect::RestoreHealth { target: Selector::FriendlyHero, amount: 2 }],
            ),
        };
        HeroPower {
            name: name.to_string(),
            cost: HERO_POWER_COST,
            effects,
            used_this_turn: false,
        }
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl FromStr for HeroClass {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        HeroClass::ALL
            .iter()
            .copied()
            .find(|class| class.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::ParseError(format!("Unknown hero class: {s}")))
    }
}

/// The 1/1 token summoned by the paladin power
pub fn silver_hand_recruit() -> Card {
    Card::minion("Silver Hand Recruit", 1, 1, 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroPower {
    pub name: String,
    pub cost: u8,
    pub effects: Vec<Effect>,
    pub used_this_turn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub class: HeroClass,
    pub attack: i32,
    pub health: i32,
    pub max_health: i32,
    pub armor: i32,
    pub power: HeroPower,
    pub attacks_this_turn: u8,
}

impl Hero {
    pub fn new(class: HeroClass) -> Self {
        Hero {
            class,
            attack: 0,
            health: HERO_STARTING_HEALTH,
            max_health: HERO_STARTING_HEALTH,
            armor: 0,
            power: class.hero_power(),
            attacks_this_turn: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Heal up to max health, returning the amount actually restored
    pub fn restore(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + amount.max(0)).min(self.max_health).max(before);
        self.health - before
    }
}
