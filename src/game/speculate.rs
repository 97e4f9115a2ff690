//! Speculative evaluation
//!
//! Runs the real resolver against a private copy of the state, with a
//! throwaway event log and a silent deterministic channel. Nothing it does
//! can reach the caller's state, event log, or channel.

use crate::game::action::Action;
use crate::game::channel::NullChannel;
use crate::game::combat::AttackPolicy;
use crate::game::events::EventLog;
use crate::game::resolver::Resolver;
use crate::game::state::GameState;
use crate::Result;

/// Try `action` on a copy of `state` and report how it went
pub fn speculate(state: &GameState, policy: &dyn AttackPolicy, action: &Action) -> Result<()> {
    let mut scratch = state.clone();
    let mut events = EventLog::new();
    let mut channel = NullChannel;
    Resolver::new(&mut scratch, &mut events, &mut channel, policy).resolve(action)
}
