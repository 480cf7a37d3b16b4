//! Shared value types for conversation memory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Identifies one run of the responder.
///
/// Sessions are numbered by a counter that the memory store persists, so the
/// id keeps increasing across process restarts until memory is reset.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl SessionId {
    /// The session that follows this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Turns
// ---------------------------------------------------------------------------

/// One user-input / bot-reply exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Wall-clock time the turn was recorded.
    pub timestamp: DateTime<Utc>,
    /// What the user said.
    pub user_text: String,
    /// What the responder replied.
    pub bot_text: String,
    /// Session active when the turn was recorded.
    pub session_id: SessionId,
}

impl TurnRecord {
    /// Create a turn stamped with the current time.
    #[must_use]
    pub fn now(
        user_text: impl Into<String>,
        bot_text: impl Into<String>,
        session_id: SessionId,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user_text: user_text.into(),
            bot_text: bot_text.into(),
            session_id,
        }
    }
}
