//! Game loop implementation
//!
//! Drives a match: ask the channel for the active player's action, hand it
//! to the engine, and ask again when the engine refuses it.

use crate::core::PlayerHandle;
use crate::game::engine::Game;
use crate::game::channel::DecisionChannel;
use crate::game::events::DebugEvent;
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verbosity level for game output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns, card plays and attacks (default)
    #[default]
    Normal = 2,
    /// Verbose - every state change, plus engine diagnostics
    Verbose = 3,
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Winner of the game (None if draw or game didn't complete)
    pub winner: Option<PlayerHandle>,
    /// Total number of turns played
    pub turns_played: u32,
    /// Reason the game ended
    pub end_reason: GameEndReason,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Some(winner) => write!(f, "{winner} wins after {} turns ({})", self.turns_played, self.end_reason),
            None => write!(f, "no winner after {} turns ({})", self.turns_played, self.end_reason),
        }
    }
}

/// Reason the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEndReason {
    /// One hero reached 0 health
    HeroDied { loser: PlayerHandle },
    /// Both heroes reached 0 health in the same action
    BothHeroesDied,
    /// Game reached maximum turn limit
    TurnLimit,
    /// A player stopped answering; the match was left unfinished
    Abandoned,
}

impl fmt::Display for GameEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEndReason::HeroDied { loser } => write!(f, "{loser}'s hero died"),
            GameEndReason::BothHeroesDied => write!(f, "both heroes died"),
            GameEndReason::TurnLimit => write!(f, "turn limit"),
            GameEndReason::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// Main game loop
pub struct GameLoop<'a> {
    game: &'a mut Game,
    /// Maximum turns before forcing a draw
    max_turns: u32,
    /// Consecutive refused actions tolerated before giving up
    max_rejections: u32,
}

impl<'a> GameLoop<'a> {
    /// Create a new game loop for the given game
    pub fn new(game: &'a mut Game) -> Self {
        GameLoop {
            game,
            max_turns: 200,
            max_rejections: 64,
        }
    }

    /// Set maximum turns before forcing a draw
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_max_rejections(mut self, max_rejections: u32) -> Self {
        self.max_rejections = max_rejections;
        self
    }

    /// Run the game to completion
    ///
    /// Starts the match if it has not been started. Rule rejections are
    /// reported as debug events and the same player is asked again; any other
    /// error aborts the match.
    pub fn run_game(&mut self, channel: &mut dyn DecisionChannel) -> Result<GameResult> {
        if self.game.state().turn_number() == 0 && !self.game.state().is_over() {
            self.game.start(channel)?;
        }

        let mut rejections = 0u32;
        while !self.game.state().is_over() {
            if self.game.state().turn_number() > self.max_turns {
                self.game.end_match(GameEndReason::TurnLimit, channel);
                break;
            }

            let player = self.game.state().active_player_handle();
            let action = {
                let snapshot = self.game.snapshot();
                channel.request_action(&snapshot)
            };
            let Some(action) = action else {
                return Ok(GameResult {
                    winner: None,
                    turns_played: self.game.state().turn_number(),
                    end_reason: GameEndReason::Abandoned,
                });
            };

            match self.game.resolve(&action, channel) {
                Ok(()) => rejections = 0,
                Err(err) if err.is_recoverable() => {
                    rejections += 1;
                    channel.notify_debug_event(&DebugEvent::ActionRejected {
                        player,
                        reason: err.to_string(),
                    });
                    if rejections >= self.max_rejections {
                        return Err(EngineError::InvalidDecision(format!(
                            "{player} had {rejections} actions in a row rejected (last: {err})"
                        )));
                    }
                }
                Err(err) => return Err(err),
            }
        }

        self.game
            .state()
            .result()
            .cloned()
            .ok_or_else(|| EngineError::IllegalState("match ended without a result".to_string()))
    }
}
