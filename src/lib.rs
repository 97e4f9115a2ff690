//! Hearth Engine - a two-player card battle rules engine
//!
//! A deterministic engine that asks for every decision and reports every
//! state change through one [`game::DecisionChannel`]. Entities are named by
//! handles resolved through a registry, and any action can be tried
//! speculatively without touching the real match.

pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod tournament;
pub mod zones;

pub use error::{EngineError, Result};
