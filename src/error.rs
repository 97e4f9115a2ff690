//! Error types for the battle engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A handle that no longer resolves, or a hand/board index out of range
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Insufficient mana: {required} required, {available} available")]
    InsufficientResource { required: u8, available: u8 },

    /// A pairing the rules disallow (e.g. attacking past a taunt)
    #[error("Illegal target: {0}")]
    IllegalTarget(String),

    /// Action attempted out of turn, twice, or after the match ended
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// The decision channel answered with something malformed
    #[error("Invalid decision: {0}")]
    InvalidDecision(String),

    #[error("Invalid card format: {0}")]
    InvalidCardFormat(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl EngineError {
    /// Game-rule rejections that the decision loop answers by asking again.
    ///
    /// Everything else is either a protocol violation by the channel or an
    /// environment failure, and ends the match.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidReference(_)
                | EngineError::InsufficientResource { .. }
                | EngineError::IllegalTarget(_)
                | EngineError::IllegalState(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
