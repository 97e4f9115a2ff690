//! Match state, action resolution, and turn flow

pub mod action;
pub mod channel;
pub mod combat;
pub mod engine;
pub mod events;
pub mod game_loop;
pub mod interactive_controller;
pub mod logger;
pub mod random_controller;
pub mod resolver;
pub mod scripted_controller;
pub mod snapshot;
pub mod speculate;
pub mod state;
pub mod state_hash;
pub mod zero_controller;

pub use action::{parse_script, Action, CharacterRef, Command, Side};
pub use channel::{ControllerChannel, DecisionChannel, NullChannel, PlayerController};
pub use combat::{AttackFailedReason, AttackPolicy, Combatant, StandardAttackPolicy};
pub use engine::Game;
pub use events::{DebugEvent, DrawResult, EventCategory, EventLog, GameEvent};
pub use game_loop::{GameEndReason, GameLoop, GameResult, VerbosityLevel};
pub use interactive_controller::InteractiveController;
pub use logger::{GameLogger, OutputFormat, OutputMode};
pub use random_controller::RandomController;
pub use scripted_controller::ScriptedController;
pub use snapshot::Snapshot;
pub use state::{GameState, PlayerSetup, RulesConfig};
pub use state_hash::{compute_state_hash, format_hash};
pub use zero_controller::ZeroController;
