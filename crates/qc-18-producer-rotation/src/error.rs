//! Error types for the producer rotation subsystem
//!
//! The rotation engine itself is total and never returns these. They are
//! raised by the administrative configuration action, registry mutations,
//! persistence, and the invariant checkers.

use thiserror::Error;

/// Result type alias for producer rotation operations
pub type Result<T> = std::result::Result<T, RotationError>;

/// Errors that can occur around producer rotation
#[derive(Debug, Error)]
pub enum RotationError {
    /// Invalid rotation configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Producer is not registered
    #[error("Unknown producer: {0}")]
    UnknownProducer(String),

    /// Producer is already registered
    #[error("Producer already registered: {0}")]
    DuplicateProducer(String),

    /// Rotation state storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Rotation state could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A rotation state invariant does not hold
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl RotationError {
    /// Check if error is recoverable (caller may retry on the next trigger)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<bincode::Error> for RotationError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
