//! Read-only view of a match for decision makers
//!
//! A [`Snapshot`] borrows the live state immutably. Besides plain queries it
//! can speculate: check whether an action would succeed, enumerate the legal
//! actions, and map positional [`Command`]s to handle-based [`Action`]s.

use crate::core::{CharacterHandle, Player, PlayerHandle};
use crate::game::action::{Action, CharacterRef, Command, Side};
use crate::game::combat::AttackPolicy;
use crate::game::speculate::speculate;
use crate::game::state::GameState;
use crate::zones::HandIndex;
use crate::{EngineError, Result};

#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    state: &'a GameState,
    policy: &'a dyn AttackPolicy,
}

impl<'a> Snapshot<'a> {
    pub fn new(state: &'a GameState, policy: &'a dyn AttackPolicy) -> Self {
        Snapshot { state, policy }
    }

    pub fn state(&self) -> &'a GameState {
        self.state
    }

    pub fn player_handles(&self) -> [PlayerHandle; 2] {
        self.state.player_handles()
    }

    pub fn player(&self, handle: PlayerHandle) -> Result<&'a Player> {
        self.state.player(handle)
    }

    pub fn active_player_handle(&self) -> PlayerHandle {
        self.state.active_player_handle()
    }

    pub fn non_active_player_handle(&self) -> PlayerHandle {
        self.state.non_active_player_handle()
    }

    pub fn active_player(&self) -> &'a Player {
        self.state.active_player()
    }

    pub fn opponent(&self) -> &'a Player {
        self.state.player_at(1 - self.state.active_seat())
    }

    pub fn turn_number(&self) -> u32 {
        self.state.turn_number()
    }

    /// Would `action` succeed for the active player?
    pub fn speculate(&self, action: &Action) -> bool {
        self.check(action).is_ok()
    }

    /// Like [`Snapshot::speculate`], but says why not
    pub fn check(&self, action: &Action) -> Result<()> {
        speculate(self.state, self.policy, action)
    }

    /// Every action the active player could take right now, `EndTurn` last
    pub fn legal_actions(&self) -> Vec<Action> {
        self.candidate_actions()
            .into_iter()
            .filter(|action| self.speculate(action))
            .collect()
    }

    fn candidate_actions(&self) -> Vec<Action> {
        let me = self.active_player();
        let them = self.opponent();
        let mut candidates = Vec::new();

        for (index, card) in me.hand.indexed() {
            if card.card().is_minion() {
                for position in 0..=me.minions.len() {
                    candidates.push(Action::PlayMinion { card: index, position });
                }
            } else {
                candidates.push(Action::PlaySpell { card: index });
            }
        }

        candidates.push(Action::UseHeroPower);

        let attackers = std::iter::once(CharacterHandle::Player(me.handle))
            .chain(me.minions.iter().map(|m| CharacterHandle::Minion(m.handle)));
        for attacker in attackers {
            let defenders = std::iter::once(CharacterHandle::Player(them.handle))
                .chain(them.minions.iter().map(|m| CharacterHandle::Minion(m.handle)));
            for defender in defenders {
                candidates.push(Action::Attack { attacker, defender });
            }
        }

        candidates.push(Action::EndTurn);
        candidates
    }

    /// Map a signed positional reference to a handle, from the active
    /// player's side of the table
    pub fn resolve_ref(&self, reference: CharacterRef) -> Result<CharacterHandle> {
        let player = match reference.side {
            Side::Friendly => self.active_player(),
            Side::Enemy => self.opponent(),
        };
        if reference.is_hero() {
            return Ok(CharacterHandle::Player(player.handle));
        }
        player
            .minions
            .get(reference.index - 1)
            .map(|m| CharacterHandle::Minion(m.handle))
            .ok_or_else(|| {
                EngineError::InvalidReference(format!(
                    "no character at {reference} ({} minions on that side)",
                    player.minions.len()
                ))
            })
    }

    /// Inverse of [`Snapshot::resolve_ref`]
    pub fn reference_for(&self, handle: CharacterHandle) -> Option<CharacterRef> {
        for (side, player) in [(Side::Friendly, self.active_player()), (Side::Enemy, self.opponent())] {
            match handle {
                CharacterHandle::Player(p) if p == player.handle => {
                    return Some(CharacterRef { side, index: 0 });
                }
                CharacterHandle::Minion(m) => {
                    if let Some(pos) = player.position_of(m) {
                        return Some(CharacterRef { side, index: pos + 1 });
                    }
                }
                _ => {}
            }
        }
        None
    }

    pub fn resolve_command(&self, command: &Command) -> Result<Action> {
        Ok(match *command {
            Command::PlayMinion { card, position } => Action::PlayMinion { card, position },
            Command::PlaySpell { card } => Action::PlaySpell { card },
            Command::Attack { attacker, defender } => Action::Attack {
                attacker: self.resolve_ref(attacker)?,
                defender: self.resolve_ref(defender)?,
            },
            Command::UseHeroPower => Action::UseHeroPower,
            Command::EndTurn => Action::EndTurn,
        })
    }

    /// Positional form of an action, if every character in it is on the board
    pub fn command_for(&self, action: &Action) -> Option<Command> {
        Some(match *action {
            Action::PlayMinion { card, position } => Command::PlayMinion { card, position },
            Action::PlaySpell { card } => Command::PlaySpell { card },
            Action::Attack { attacker, defender } => Command::Attack {
                attacker: self.reference_for(attacker)?,
                defender: self.reference_for(defender)?,
            },
            Action::UseHeroPower => Command::UseHeroPower,
            Action::EndTurn => Command::EndTurn,
        })
    }

    /// Human-readable action, in command syntax with names attached
    pub fn describe_action(&self, action: &Action) -> String {
        let command = self
            .command_for(action)
            .map(|c| c.to_string())
            .unwrap_or_else(|| action.to_string());
        let hand = &self.active_player().hand;
        let card_name = |index: HandIndex| {
            hand.get(index)
                .map(|c| c.name().to_string())
                .unwrap_or_else(|| "?".to_string())
        };
        match *action {
            Action::PlayMinion { card, .. } | Action::PlaySpell { card } => {
                format!("{command} ({})", card_name(card))
            }
            Action::UseHeroPower => {
                format!("{command} ({})", self.active_player().hero.power.name)
            }
            _ => command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HeroClass;
    use crate::game::channel::NullChannel;
    use crate::loader::GameInitializer;

    #[test]
    fn test_legal_actions_end_with_end_turn() {
        let mut game = GameInitializer::new()
            .builtin_match(HeroClass::Mage, HeroClass::Hunter)
            .unwrap();
        game.start(&mut NullChannel).unwrap();
        let snapshot = game.snapshot();
        let legal = snapshot.legal_actions();
        assert_eq!(legal.last(), Some(&Action::EndTurn));
        for action in &legal {
            assert!(snapshot.speculate(action));
        }
        // No one can attack on turn one with empty boards and unarmed heroes
        assert!(!legal.iter().any(|a| matches!(a, Action::Attack { .. })));
    }

    #[test]
    fn test_resolve_signed_refs() {
        let mut game = GameInitializer::new()
            .builtin_match(HeroClass::Mage, HeroClass::Hunter)
            .unwrap();
        game.start(&mut NullChannel).unwrap();
        let snapshot = game.snapshot();
        let me = snapshot.active_player_handle();
        let them = snapshot.non_active_player_handle();

        assert_eq!(
            snapshot.resolve_ref(CharacterRef::friendly(0)).unwrap(),
            CharacterHandle::Player(me)
        );
        assert_eq!(
            snapshot.resolve_ref(CharacterRef::enemy(0)).unwrap(),
            CharacterHandle::Player(them)
        );
        assert!(matches!(
            snapshot.resolve_ref(CharacterRef::enemy(1)),
            Err(EngineError::InvalidReference(_))
        ));
        assert_eq!(
            snapshot.reference_for(CharacterHandle::Player(them)),
            Some(CharacterRef::enemy(0))
        );
    }
}
