//! Error types for the parley core library.

use thiserror::Error;

/// Top-level error type for all parley operations.
///
/// Note that [`crate::dialogue::DialogueManager::respond`] never returns one
/// of these: collaborator failures travel next to the reply as warnings.
#[derive(Error, Debug)]
pub enum ParleyError {
    /// An intent catalog entry violates its invariants.
    #[error("Invalid catalog entry '{intent}': {reason}")]
    Catalog {
        /// Which intent was rejected.
        intent: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A fact-extraction pattern failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// SQLite persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A memory store could not serve a read or accept a write.
    #[error("Memory store error: {0}")]
    Store(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ParleyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, ParleyError>;
