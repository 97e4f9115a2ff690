//! Card types and definitions

use crate::core::{CardName, Effect};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardType {
    Minion,
    Spell,
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardType::Minion => write!(f, "Minion"),
            CardType::Spell => write!(f, "Spell"),
        }
    }
}

/// Minion keyword abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// Enemies must attack this minion first
    Taunt,
    /// Can attack the turn it is played
    Charge,
    /// The first damage taken is ignored
    DivineShield,
    /// Can attack twice per turn
    Windfury,
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keyword::Taunt => write!(f, "Taunt"),
            Keyword::Charge => write!(f, "Charge"),
            Keyword::DivineShield => write!(f, "Divine Shield"),
            Keyword::Windfury => write!(f, "Windfury"),
        }
    }
}

/// Stats printed on a minion card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinionCard {
    pub attack: i32,
    pub health: i32,
    #[serde(default)]
    pub keywords: SmallVec<[Keyword; 2]>,
    /// Effects resolved when the minion is played from hand
    #[serde(default)]
    pub battlecry: Vec<Effect>,
}

/// Effects a spell card resolves, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellCard {
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CardKind {
    Minion(MinionCard),
    Spell(SpellCard),
}

/// Immutable card definition
///
/// Cards are shared between zones via `Arc<Card>`; two copies of the same
/// card in a deck point at the same definition, while each minion played
/// from them gets its own handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: CardName,
    pub cost: u8,
    #[serde(default)]
    pub text: String,
    pub kind: CardKind,
}

impl Card {
    pub fn minion(name: impl Into<CardName>, cost: u8, attack: i32, health: i32) -> Self {
        Card {
            name: name.into(),
            cost,
            text: String::new(),
            kind: CardKind::Minion(MinionCard {
                attack,
                health,
                keywords: SmallVec::new(),
                battlecry: Vec::new(),
            }),
        }
    }

    pub fn spell(name: impl Into<CardName>, cost: u8, effects: Vec<Effect>) -> Self {
        Card {
            name: name.into(),
            cost,
            text: String::new(),
            kind: CardKind::Spell(SpellCard { effects }),
        }
    }

    /// Add a keyword (no-op on spells)
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        if let CardKind::Minion(m) = &mut self.kind {
            if !m.keywords.contains(&keyword) {
                m.keywords.push(keyword);
            }
        }
        self
    }

    /// Add a battlecry effect (no-op on spells)
    pub fn with_battlecry(mut self, effect: Effect) -> Self {
        if let CardKind::Minion(m) = &mut self.kind {
            m.battlecry.push(effect);
        }
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn card_type(&self) -> CardType {
        match self.kind {
            CardKind::Minion(_) => CardType::Minion,
            CardKind::Spell(_) => CardType::Spell,
        }
    }

    pub fn is_minion(&self) -> bool {
        self.card_type() == CardType::Minion
    }

    pub fn as_minion(&self) -> Option<&MinionCard> {
        match &self.kind {
            CardKind::Minion(m) => Some(m),
            CardKind::Spell(_) => None,
        }
    }

    pub fn as_spell(&self) -> Option<&SpellCard> {
        match &self.kind {
            CardKind::Spell(s) => Some(s),
            CardKind::Minion(_) => None,
        }
    }

    pub fn into_shared(self) -> Arc<Card> {
        Arc::new(self)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CardKind::Minion(m) => write!(f, "{} ({}) {}/{}", self.name, self.cost, m.attack, m.health),
            CardKind::Spell(_) => write!(f, "{} ({}) Spell", self.name, self.cost),
        }
    }
}
