//! Structured event stream
//!
//! Every state change the resolver commits is reported as a [`GameEvent`],
//! emitted right after the mutation it describes. The match keeps them in an
//! append-only [`EventLog`]; the same events are pushed through the decision
//! channel as notifications, in the same order.

use crate::core::{CardName, CharacterHandle, CrystalVariety, MinionHandle, PlayerHandle};
use crate::game::combat::AttackFailedReason;
use crate::game::game_loop::{GameResult, VerbosityLevel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawResult {
    /// Card went to hand
    Drawn,
    /// Hand was full; the card was destroyed
    Burned,
    /// Deck was empty; the hero took fatigue damage
    Fatigue { damage: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameBegins {
        players: [PlayerHandle; 2],
    },
    GameEnds {
        result: GameResult,
    },
    TurnBegins {
        player: PlayerHandle,
        turn: u32,
    },
    DeckShuffled {
        player: PlayerHandle,
    },
    Mulliganed {
        player: PlayerHandle,
        replaced: usize,
    },
    CardDrawn {
        player: PlayerHandle,
        /// None when drawing from an empty deck
        card: Option<CardName>,
        result: DrawResult,
    },
    PlayedMinion {
        player: PlayerHandle,
        minion: MinionHandle,
        card: CardName,
        position: usize,
    },
    /// A minion entered play other than from hand
    MinionSummoned {
        player: PlayerHandle,
        minion: MinionHandle,
        card: CardName,
        position: usize,
    },
    PlayedSpell {
        player: PlayerHandle,
        card: CardName,
    },
    UsedHeroPower {
        player: PlayerHandle,
        power: String,
    },
    HeroTakesDamage {
        player: PlayerHandle,
        health_before_after: (i32, i32),
        armor_before_after: (i32, i32),
    },
    MinionTakesDamage {
        minion: MinionHandle,
        damage: i32,
    },
    MinionDied {
        minion: MinionHandle,
        card: CardName,
    },
    EnactAttack {
        attacker: CharacterHandle,
        defender: CharacterHandle,
    },
    GainsManaCrystal {
        player: PlayerHandle,
        variety: CrystalVariety,
    },
    ManaCrystalsRefill {
        player: PlayerHandle,
        amount: u8,
    },
    ManaCrystalsEmpty {
        player: PlayerHandle,
        amount: u8,
    },
    LostDivineShield {
        minion: MinionHandle,
    },
    Silenced {
        minion: MinionHandle,
    },
    AttackFailed {
        reason: AttackFailedReason,
    },
    GainedArmor {
        player: PlayerHandle,
        amount: i32,
    },
    HealthRestored {
        character: CharacterHandle,
        amount: i32,
    },
    MinionBuffed {
        minion: MinionHandle,
        attack: i32,
        health: i32,
    },
}

/// Coarse grouping used for verbosity filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Match,
    Turn,
    Card,
    Combat,
    Damage,
    Mana,
    Status,
}

impl EventCategory {
    /// Lowest verbosity at which events of this category are shown
    pub fn min_verbosity(&self) -> VerbosityLevel {
        match self {
            EventCategory::Match => VerbosityLevel::Minimal,
            EventCategory::Turn | EventCategory::Card | EventCategory::Combat => {
                VerbosityLevel::Normal
            }
            EventCategory::Damage | EventCategory::Mana | EventCategory::Status => {
                VerbosityLevel::Verbose
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Match => "match",
            EventCategory::Turn => "turn",
            EventCategory::Card => "card",
            EventCategory::Combat => "combat",
            EventCategory::Damage => "damage",
            EventCategory::Mana => "mana",
            EventCategory::Status => "status",
        }
    }
}

impl GameEvent {
    pub fn category(&self) -> EventCategory {
        use GameEvent::*;
        match self {
            GameBegins { .. } | GameEnds { .. } => EventCategory::Match,
            TurnBegins { .. } | DeckShuffled { .. } | Mulliganed { .. } => EventCategory::Turn,
            CardDrawn { .. }
            | PlayedMinion { .. }
            | MinionSummoned { .. }
            | PlayedSpell { .. }
            | UsedHeroPower { .. } => EventCategory::Card,
            EnactAttack { .. } | AttackFailed { .. } => EventCategory::Combat,
            HeroTakesDamage { .. } | MinionTakesDamage { .. } | MinionDied { .. } => {
                EventCategory::Damage
            }
            GainsManaCrystal { .. } | ManaCrystalsRefill { .. } | ManaCrystalsEmpty { .. } => {
                EventCategory::Mana
            }
            LostDivineShield { .. }
            | Silenced { .. }
            | GainedArmor { .. }
            | HealthRestored { .. }
            | MinionBuffed { .. } => EventCategory::Status,
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use GameEvent::*;
        match self {
            GameBegins { players } => write!(f, "Game begins: {} vs {}", players[0], players[1]),
            GameEnds { result } => write!(f, "Game ends: {result}"),
            TurnBegins { player, turn } => write!(f, "Turn {turn} begins for {player}"),
            DeckShuffled { player } => write!(f, "{player} shuffles their deck"),
            Mulliganed { player, replaced } => write!(f, "{player} mulligans {replaced} card(s)"),
            CardDrawn { player, card, result } => match (result, card) {
                (DrawResult::Drawn, Some(card)) => write!(f, "{player} draws {card}"),
                (DrawResult::Burned, Some(card)) => write!(f, "{player} burns {card} (hand full)"),
                (DrawResult::Fatigue { damage }, _) => {
                    write!(f, "{player} is fatigued for {damage}")
                }
                (_, None) => write!(f, "{player} draws nothing"),
            },
            PlayedMinion { player, minion, card, position } => {
                write!(f, "{player} plays {card} ({minion}) at position {position}")
            }
            MinionSummoned { player, minion, card, position } => {
                write!(f, "{player} summons {card} ({minion}) at position {position}")
            }
            PlayedSpell { player, card } => write!(f, "{player} casts {card}"),
            UsedHeroPower { player, power } => write!(f, "{player} uses {power}"),
            HeroTakesDamage { player, health_before_after: (h0, h1), armor_before_after: (a0, a1) } => {
                write!(f, "{player}'s hero takes damage: health {h0} -> {h1}, armor {a0} -> {a1}")
            }
            MinionTakesDamage { minion, damage } => write!(f, "{minion} takes {damage} damage"),
            MinionDied { minion, card } => write!(f, "{card} ({minion}) dies"),
            EnactAttack { attacker, defender } => write!(f, "{attacker} attacks {defender}"),
            GainsManaCrystal { player, variety } => {
                write!(f, "{player} gains an {variety} mana crystal")
            }
            ManaCrystalsRefill { player, amount } => {
                write!(f, "{player} refills {amount} mana crystal(s)")
            }
            ManaCrystalsEmpty { player, amount } => write!(f, "{player} spends {amount} mana"),
            LostDivineShield { minion } => write!(f, "{minion} loses divine shield"),
            Silenced { minion } => write!(f, "{minion} is silenced"),
            AttackFailed { reason } => write!(f, "Attack failed: {reason}"),
            GainedArmor { player, amount } => write!(f, "{player} gains {amount} armor"),
            HealthRestored { character, amount } => {
                write!(f, "{character} restores {amount} health")
            }
            MinionBuffed { minion, attack, health } => {
                write!(f, "{minion} gets +{attack}/+{health}")
            }
        }
    }
}

/// Diagnostics that are not part of the game record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebugEvent {
    /// The resolver refused an action; the driver will ask again
    ActionRejected { player: PlayerHandle, reason: String },
    /// An effect target vanished before the effect reached it
    StaleHandle { handle: CharacterHandle, context: String },
    Diagnostic(String),
}

impl fmt::Display for DebugEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugEvent::ActionRejected { player, reason } => {
                write!(f, "{player}: action rejected: {reason}")
            }
            DebugEvent::StaleHandle { handle, context } => {
                write!(f, "stale handle {handle} during {context}")
            }
            DebugEvent::Diagnostic(msg) => write!(f, "{msg}"),
        }
    }
}

/// Append-only record of a match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Events appended after the first `start` ones
    pub fn since(&self, start: usize) -> &[GameEvent] {
        self.events.get(start..).unwrap_or(&[])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a GameEvent;
    type IntoIter = std::slice::Iter<'a, GameEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HandleRegistry;

    #[test]
    fn test_categories_gate_by_verbosity() {
        let mut registry = HandleRegistry::new();
        let p = registry.allocate_player(0);
        let begin = GameEvent::TurnBegins { player: p, turn: 1 };
        let refill = GameEvent::ManaCrystalsRefill { player: p, amount: 1 };
        assert_eq!(begin.category().min_verbosity(), VerbosityLevel::Normal);
        assert_eq!(refill.category().min_verbosity(), VerbosityLevel::Verbose);
    }

    #[test]
    fn test_log_since() {
        let mut registry = HandleRegistry::new();
        let p = registry.allocate_player(0);
        let mut log = EventLog::new();
        log.push(GameEvent::DeckShuffled { player: p });
        log.push(GameEvent::TurnBegins { player: p, turn: 1 });
        assert_eq!(log.since(1), &[GameEvent::TurnBegins { player: p, turn: 1 }]);
        assert!(log.since(5).is_empty());
    }

    #[test]
    fn test_display() {
        let mut registry = HandleRegistry::new();
        let p = registry.allocate_player(0);
        let event = GameEvent::HeroTakesDamage {
            player: p,
            health_before_after: (30, 27),
            armor_before_after: (5, 0),
        };
        assert_eq!(
            event.to_string(),
            "P#1's hero takes damage: health 30 -> 27, armor 5 -> 0"
        );
    }

    #[test]
    fn test_json_round_shape() {
        let mut registry = HandleRegistry::new();
        let p = registry.allocate_player(0);
        let event = GameEvent::ManaCrystalsEmpty { player: p, amount: 3 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"ManaCrystalsEmpty":{"player":1,"amount":3}}"#);
    }
}
