//! Combat rules
//!
//! Damage arithmetic and attack legality. The resolver owns the sequencing
//! (events, deaths); this module only answers "how much" and "is it allowed".

use crate::core::{CharacterHandle, PlayerHandle};
use crate::game::state::GameState;
use crate::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Apply `damage` to a character with `health` and `armor`.
///
/// Armor soaks damage first; whatever gets through comes off health.
/// Returns `(health_after, armor_after)`. Health may go negative.
pub fn apply_armor_damage(health: i32, armor: i32, damage: i32) -> (i32, i32) {
    let damage = damage.max(0);
    let armor_after = (armor - damage).max(0);
    let absorbed = armor - armor_after;
    (health - (damage - absorbed), armor_after)
}

/// Why an attack was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackFailedReason {
    /// Attacker is not controlled by the active player
    NotYourCharacter,
    /// Defender is not controlled by the opponent
    TargetIsFriendly,
    ZeroAttack,
    SummoningSick,
    AlreadyAttacked,
    /// The opponent has a taunt minion and the defender isn't one
    TauntBypassed,
}

impl AttackFailedReason {
    pub fn into_error(self) -> EngineError {
        match self {
            AttackFailedReason::NotYourCharacter
            | AttackFailedReason::TargetIsFriendly
            | AttackFailedReason::TauntBypassed => EngineError::IllegalTarget(self.to_string()),
            AttackFailedReason::ZeroAttack
            | AttackFailedReason::SummoningSick
            | AttackFailedReason::AlreadyAttacked => EngineError::IllegalState(self.to_string()),
        }
    }
}

impl fmt::Display for AttackFailedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttackFailedReason::NotYourCharacter => "attacker is not yours",
            AttackFailedReason::TargetIsFriendly => "cannot attack a friendly character",
            AttackFailedReason::ZeroAttack => "attacker has no attack",
            AttackFailedReason::SummoningSick => "minion was just summoned",
            AttackFailedReason::AlreadyAttacked => "attacker has already attacked this turn",
            AttackFailedReason::TauntBypassed => "a taunt minion must be attacked first",
        };
        write!(f, "{s}")
    }
}

/// Flattened view of a hero or minion for combat decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combatant {
    pub handle: CharacterHandle,
    pub owner: PlayerHandle,
    pub attack: i32,
    pub health: i32,
    pub armor: i32,
    pub taunt: bool,
    pub divine_shield: bool,
    /// Minion played this turn without charge
    pub summoning_sick: bool,
    pub attacks_this_turn: u8,
    pub max_attacks: u8,
}

/// Rule deciding which attacker/defender pairings are allowed
///
/// Both handles are already known to resolve when this is called.
pub trait AttackPolicy: fmt::Debug + Send + Sync {
    fn check(
        &self,
        state: &GameState,
        attacker: &Combatant,
        defender: &Combatant,
    ) -> Result<(), AttackFailedReason>;
}

/// Ownership, readiness and taunt
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAttackPolicy;

impl AttackPolicy for StandardAttackPolicy {
    fn check(
        &self,
        state: &GameState,
        attacker: &Combatant,
        defender: &Combatant,
    ) -> Result<(), AttackFailedReason> {
        if attacker.owner != state.active_player_handle() {
            return Err(AttackFailedReason::NotYourCharacter);
        }
        if defender.owner == attacker.owner {
            return Err(AttackFailedReason::TargetIsFriendly);
        }
        if attacker.attack <= 0 {
            return Err(AttackFailedReason::ZeroAttack);
        }
        if attacker.summoning_sick {
            return Err(AttackFailedReason::SummoningSick);
        }
        if attacker.attacks_this_turn >= attacker.max_attacks {
            return Err(AttackFailedReason::AlreadyAttacked);
        }
        let defending = state.player(defender.owner).map_err(|_| AttackFailedReason::TargetIsFriendly)?;
        if defending.has_taunt() && !defender.taunt {
            return Err(AttackFailedReason::TauntBypassed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_armor_absorbs_first() {
        assert_eq!(apply_armor_damage(30, 5, 8), (27, 0));
        assert_eq!(apply_armor_damage(5, 2, 3), (4, 0));
        assert_eq!(apply_armor_damage(10, 6, 4), (10, 2));
    }

    #[test]
    fn test_no_armor_is_direct_loss() {
        assert_eq!(apply_armor_damage(3, 0, 5), (-2, 0));
        assert_eq!(apply_armor_damage(3, 0, 0), (3, 0));
    }

    #[test]
    fn test_reason_maps_to_error_kind() {
        assert!(matches!(
            AttackFailedReason::TauntBypassed.into_error(),
            EngineError::IllegalTarget(_)
        ));
        assert!(matches!(
            AttackFailedReason::AlreadyAttacked.into_error(),
            EngineError::IllegalState(_)
        ));
    }

    proptest! {
        #[test]
        fn armor_formula_holds(h0 in -50i32..100, a0 in 0i32..50, d in 0i32..100) {
            let (h1, a1) = apply_armor_damage(h0, a0, d);
            prop_assert_eq!(a1, (a0 - d).max(0));
            prop_assert_eq!(h1, h0 - (d - (a0 - a1)));
            // Total loss across both pools equals the damage dealt
            prop_assert_eq!((h0 - h1) + (a0 - a1), d);
        }
    }
}
