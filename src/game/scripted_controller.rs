//! Scripted player controller for testing and demos
//!
//! Follows a fixed list of positional [`Command`]s, resolving each against
//! the board at the moment it is played. Once the script runs out it ends
//! every turn.

use crate::core::PlayerHandle;
use crate::game::action::{parse_script, Action, Command};
use crate::game::channel::PlayerController;
use crate::game::snapshot::Snapshot;
use crate::Result;

/// A controller that follows a predetermined sequence of commands
pub struct ScriptedController {
    player: PlayerHandle,
    commands: Vec<Command>,
    current_step: usize,
    /// Rejection messages, in order, for tests to inspect
    rejections: Vec<String>,
}

impl ScriptedController {
    pub fn new(player: PlayerHandle, commands: Vec<Command>) -> Self {
        ScriptedController {
            player,
            commands,
            current_step: 0,
            rejections: Vec::new(),
        }
    }

    /// Parse a script like `"play 1 0; attack 1 -0; end"`
    pub fn from_script(player: PlayerHandle, script: &str) -> Result<Self> {
        Ok(Self::new(player, parse_script(script)?))
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_step >= self.commands.len()
    }

    pub fn rejections(&self) -> &[String] {
        &self.rejections
    }
}

impl PlayerController for ScriptedController {
    fn player(&self) -> PlayerHandle {
        self.player
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn choose_action(&mut self, snapshot: &Snapshot<'_>) -> Option<Action> {
        // Commands that name an empty board slot are skipped, not retried
        while let Some(command) = self.commands.get(self.current_step) {
            self.current_step += 1;
            match snapshot.resolve_command(command) {
                Ok(action) => return Some(action),
                Err(err) => self.rejections.push(format!("{command}: {err}")),
            }
        }
        Some(Action::EndTurn)
    }

    fn on_action_rejected(&mut self, reason: &str) {
        self.rejections.push(reason.to_string());
    }
}
