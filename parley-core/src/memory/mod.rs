//! Conversation memory: turn history, user facts and the session counter.
//!
//! The dialogue layer only talks to memory through [`MemoryStore`]. Two
//! implementations ship with the crate:
//!
//! - [`InMemoryStore`]: everything in a [`ConversationMemory`] value
//! - [`sqlite::SqliteStore`]: the same contract persisted in SQLite
//!
//! Both keep at most `max_turns` turns, evicting the oldest first.

pub mod sqlite;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::facts::UserFacts;
use crate::types::{SessionId, TurnRecord};

/// Read/write contract between the responder and its memory.
pub trait MemoryStore {
    /// Up to `limit` most recent turns, oldest first.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    fn recent_turns(&self, limit: usize) -> Result<Vec<TurnRecord>>;

    /// All stored facts.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    fn facts(&self) -> Result<UserFacts>;

    /// Append a turn (evicting beyond the cap) and merge a non-empty fact
    /// update into stored facts.
    ///
    /// # Errors
    /// Returns an error if the write fails; nothing is guaranteed to have
    /// been stored in that case.
    fn record_turn(
        &mut self,
        user_text: &str,
        bot_text: &str,
        fact_update: Option<&UserFacts>,
    ) -> Result<()>;

    /// Increment and persist the session counter, returning the new session.
    ///
    /// # Errors
    /// Returns an error if the counter cannot be persisted.
    fn start_session(&mut self) -> Result<SessionId>;

    /// Session that new turns are recorded under.
    fn current_session(&self) -> SessionId;

    /// Forget all turns and facts and restart the session counter.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be cleared.
    fn reset(&mut self) -> Result<()>;

    /// Summary of what is stored.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    fn stats(&self) -> Result<MemoryStats>;
}

/// Summary returned by [`MemoryStore::stats`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStats {
    /// Stored turn count.
    pub turns: usize,
    /// Current session.
    pub session: SessionId,
    /// Everything known about the user.
    pub facts: UserFacts,
}

// ---------------------------------------------------------------------------
// ConversationMemory
// ---------------------------------------------------------------------------

/// The full memory state as a single serializable value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMemory {
    /// Turn history, oldest first.
    #[serde(default)]
    pub turns: VecDeque<TurnRecord>,
    /// Accumulated user facts.
    #[serde(default)]
    pub facts: UserFacts,
    /// Last session handed out.
    #[serde(default)]
    pub session_count: SessionId,
}

impl ConversationMemory {
    /// Append `turn`, dropping the oldest turns until at most `max_turns`
    /// remain.
    pub fn push_turn(&mut self, turn: TurnRecord, max_turns: usize) {
        self.turns.push_back(turn);
        while self.turns.len() > max_turns {
            self.turns.pop_front();
        }
    }

    /// Up to `limit` most recent turns, oldest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<TurnRecord> {
        let skip = self.turns.len().saturating_sub(limit);
        self.turns.iter().skip(skip).cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// InMemoryStore
// ---------------------------------------------------------------------------

/// Non-durable [`MemoryStore`], one per conversation.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    memory: ConversationMemory,
    max_turns: usize,
    session: SessionId,
}

impl InMemoryStore {
    /// Empty store keeping at most `max_turns` turns.
    #[must_use]
    pub fn new(max_turns: usize) -> Self {
        Self::with_memory(ConversationMemory::default(), max_turns)
    }

    /// Store seeded with existing state.
    #[must_use]
    pub fn with_memory(memory: ConversationMemory, max_turns: usize) -> Self {
        let session = memory.session_count;
        Self {
            memory,
            max_turns,
            session,
        }
    }

    /// The underlying state.
    #[must_use]
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(crate::config::ContextConfig::default().max_turns)
    }
}

impl MemoryStore for InMemoryStore {
    fn recent_turns(&self, limit: usize) -> Result<Vec<TurnRecord>> {
        Ok(self.memory.recent(limit))
    }

    fn facts(&self) -> Result<UserFacts> {
        Ok(self.memory.facts.clone())
    }

    fn record_turn(
        &mut self,
        user_text: &str,
        bot_text: &str,
        fact_update: Option<&UserFacts>,
    ) -> Result<()> {
        self.memory.push_turn(
            TurnRecord::now(user_text, bot_text, self.session),
            self.max_turns,
        );
        if let Some(update) = fact_update.filter(|u| !u.is_empty()) {
            self.memory.facts.merge(update);
        }
        Ok(())
    }

    fn start_session(&mut self) -> Result<SessionId> {
        self.memory.session_count = self.memory.session_count.next();
        self.session = self.memory.session_count;
        Ok(self.session)
    }

    fn current_session(&self) -> SessionId {
        self.session
    }

    fn reset(&mut self) -> Result<()> {
        self.memory = ConversationMemory::default();
        self.session = SessionId::default();
        info!("In-memory conversation memory cleared");
        Ok(())
    }

    fn stats(&self) -> Result<MemoryStats> {
        Ok(MemoryStats {
            turns: self.memory.turns.len(),
            session: self.session,
            facts: self.memory.facts.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{LIKES, NAME};

    #[test]
    fn turns_are_capped_fifo() {
        let mut store = InMemoryStore::new(3);
        for i in 0..5 {
            store.record_turn(&format!("u{i}"), "b", None).expect("record");
        }
        let turns = store.recent_turns(10).expect("read");
        let texts: Vec<_> = turns.iter().map(|t| t.user_text.as_str()).collect();
        assert_eq!(texts, vec!["u2", "u3", "u4"]);
    }

    #[test]
    fn recent_returns_newest_window_oldest_first() {
        let mut store = InMemoryStore::new(100);
        for i in 0..5 {
            store.record_turn(&format!("u{i}"), "b", None).expect("record");
        }
        let texts: Vec<_> = store
            .recent_turns(2)
            .expect("read")
            .into_iter()
            .map(|t| t.user_text)
            .collect();
        assert_eq!(texts, vec!["u3", "u4"]);
        assert!(store.recent_turns(0).expect("read").is_empty());
    }

    #[test]
    fn fact_updates_merge() {
        let mut store = InMemoryStore::default();
        let mut update = UserFacts::new();
        update.set_text(NAME, "Alex");
        update.push(LIKES, "cats");
        store.record_turn("a", "b", Some(&update)).expect("record");

        let mut second = UserFacts::new();
        second.push(LIKES, "dogs");
        store.record_turn("c", "d", Some(&second)).expect("record");
        store.record_turn("e", "f", Some(&UserFacts::new())).expect("record");

        let facts = store.facts().expect("facts");
        assert_eq!(facts.name(), Some("Alex"));
        assert_eq!(facts.list(LIKES), ["cats", "dogs"]);
    }

    #[test]
    fn sessions_increment_and_tag_turns() {
        let mut store = InMemoryStore::default();
        assert_eq!(store.start_session().expect("session"), SessionId(1));
        store.record_turn("a", "b", None).expect("record");
        assert_eq!(store.start_session().expect("session"), SessionId(2));
        store.record_turn("c", "d", None).expect("record");

        let turns = store.recent_turns(2).expect("read");
        assert_eq!(turns[0].session_id, SessionId(1));
        assert_eq!(turns[1].session_id, SessionId(2));
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = InMemoryStore::default();
        store.start_session().expect("session");
        let mut update = UserFacts::new();
        update.set_text(NAME, "Alex");
        store.record_turn("a", "b", Some(&update)).expect("record");

        store.reset().expect("reset");
        let stats = store.stats().expect("stats");
        assert_eq!(stats.turns, 0);
        assert_eq!(stats.session, SessionId(0));
        assert!(stats.facts.is_empty());
    }

    #[test]
    fn seeded_store_resumes_session_counter() {
        let memory = ConversationMemory {
            session_count: SessionId(4),
            ..ConversationMemory::default()
        };
        let mut store = InMemoryStore::with_memory(memory, 10);
        assert_eq!(store.current_session(), SessionId(4));
        assert_eq!(store.start_session().expect("session"), SessionId(5));
    }
}
