//! A match in progress: state, its event record, and the attack rule

use crate::core::{MinionHandle, Player, PlayerHandle};
use crate::game::action::Action;
use crate::game::channel::DecisionChannel;
use crate::game::combat::{AttackPolicy, StandardAttackPolicy};
use crate::game::events::EventLog;
use crate::game::game_loop::{GameEndReason, GameResult};
use crate::game::resolver::Resolver;
use crate::game::snapshot::Snapshot;
use crate::game::speculate;
use crate::game::state::GameState;
use crate::Result;
use std::sync::Arc;

/// Owns the canonical state of one match
///
/// All mutation goes through [`Game::start`], [`Game::resolve`] and
/// [`Game::end_match`], each of which records events in [`Game::events`]
/// and forwards them to the channel.
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    events: EventLog,
    policy: Arc<dyn AttackPolicy>,
}

impl Game {
    pub fn new(state: GameState) -> Self {
        Self::with_policy(state, Arc::new(StandardAttackPolicy))
    }

    /// Use a different attack legality rule
    pub fn with_policy(state: GameState, policy: Arc<dyn AttackPolicy>) -> Self {
        Game {
            state,
            events: EventLog::new(),
            policy,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn policy(&self) -> &dyn AttackPolicy {
        self.policy.as_ref()
    }

    fn resolver<'a>(&'a mut self, channel: &'a mut dyn DecisionChannel) -> Resolver<'a> {
        Resolver::new(&mut self.state, &mut self.events, channel, self.policy.as_ref())
    }

    /// Shuffle decks, deal, mulligan, and begin the first turn
    pub fn start(&mut self, channel: &mut dyn DecisionChannel) -> Result<()> {
        self.resolver(channel).start_match()
    }

    /// Validate and apply one action for the active player
    pub fn resolve(&mut self, action: &Action, channel: &mut dyn DecisionChannel) -> Result<()> {
        self.resolver(channel).resolve(action)
    }

    pub fn end_match(&mut self, reason: GameEndReason, channel: &mut dyn DecisionChannel) {
        self.resolver(channel).end_match(reason)
    }

    /// Would `action` succeed right now? Never changes anything.
    pub fn speculate(&self, action: &Action) -> bool {
        speculate::speculate(&self.state, self.policy(), action).is_ok()
    }

    /// Read-only view handed to decision makers
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(&self.state, self.policy())
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.state.result()
    }

    pub fn player(&self, handle: PlayerHandle) -> Result<&Player> {
        self.state.player(handle)
    }

    pub fn player_handles(&self) -> [PlayerHandle; 2] {
        self.state.player_handles()
    }

    pub fn active_player_handle(&self) -> PlayerHandle {
        self.state.active_player_handle()
    }

    pub fn non_active_player_handle(&self) -> PlayerHandle {
        self.state.non_active_player_handle()
    }

    /// Board minion handles of `player`, left to right
    pub fn board(&self, player: PlayerHandle) -> Result<Vec<MinionHandle>> {
        Ok(self.state.player(player)?.minions.iter().map(|m| m.handle).collect())
    }
}
