//! SQLite-backed [`MemoryStore`].
//!
//! Turns, facts and the session counter survive process restarts. Schema:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS turns (
//!     id         INTEGER PRIMARY KEY AUTOINCREMENT,
//!     session_id INTEGER NOT NULL,
//!     timestamp  TEXT NOT NULL,
//!     user_text  TEXT NOT NULL,
//!     bot_text   TEXT NOT NULL
//! );
//! CREATE TABLE IF NOT EXISTS facts (
//!     key        TEXT PRIMARY KEY,
//!     value      TEXT NOT NULL,
//!     updated_at TEXT NOT NULL
//! );
//! CREATE TABLE IF NOT EXISTS meta (
//!     key   TEXT PRIMARY KEY,
//!     value INTEGER NOT NULL
//! );
//! ```
//!
//! Fact values are stored as JSON so scalar and list facts share one column.
//! A turn and its fact update are written in a single transaction.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags};
use tracing::{debug, info};

use super::{MemoryStats, MemoryStore};
use crate::config::PersistenceConfig;
use crate::error::{ParleyError, Result};
use crate::facts::{FactValue, UserFacts};
use crate::types::{SessionId, TurnRecord};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS turns (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER NOT NULL,
        timestamp  TEXT NOT NULL,
        user_text  TEXT NOT NULL,
        bot_text   TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS facts (
        key        TEXT PRIMARY KEY,
        value      TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS meta (
        key   TEXT PRIMARY KEY,
        value INTEGER NOT NULL
    );";

const SESSION_KEY: &str = "session_count";

/// Durable conversation memory in a single SQLite file.
pub struct SqliteStore {
    conn: Connection,
    db_path: PathBuf,
    max_turns: usize,
    session: SessionId,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .field("max_turns", &self.max_turns)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// The schema is created if missing and the current session is read back
    /// from the stored counter.
    ///
    /// # Errors
    ///
    /// Returns [`ParleyError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(
        path: P,
        config: &PersistenceConfig,
        max_turns: usize,
    ) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&db_path, flags)?;

        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;

        let session = read_session(&conn)?;
        info!(
            path = %db_path.display(),
            wal = config.wal_mode,
            session = %session,
            "Conversation memory opened"
        );

        Ok(Self {
            conn,
            db_path,
            max_turns,
            session,
        })
    }

    /// Open a throwaway in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`ParleyError::Database`] on SQLite failures.
    pub fn open_in_memory(max_turns: usize) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn,
            db_path: PathBuf::from(":memory:"),
            max_turns,
            session: SessionId::default(),
        })
    }

    /// Path to the database file (`:memory:` for in-memory stores).
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn turn_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM turns", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

impl MemoryStore for SqliteStore {
    fn recent_turns(&self, limit: usize) -> Result<Vec<TurnRecord>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT session_id, timestamp, user_text, bot_text
             FROM turns ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![to_sql_int(limit)], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut turns = Vec::new();
        for row in rows {
            let (session, timestamp, user_text, bot_text) = row?;
            turns.push(TurnRecord {
                timestamp: parse_timestamp(&timestamp)?,
                user_text,
                bot_text,
                session_id: SessionId(u64::try_from(session).unwrap_or_default()),
            });
        }
        turns.reverse();
        Ok(turns)
    }

    fn facts(&self) -> Result<UserFacts> {
        load_facts(&self.conn)
    }

    fn record_turn(
        &mut self,
        user_text: &str,
        bot_text: &str,
        fact_update: Option<&UserFacts>,
    ) -> Result<()> {
        let start = Instant::now();
        let now = Utc::now().to_rfc3339();
        let session = to_sql_int(self.session.0);

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO turns (session_id, timestamp, user_text, bot_text)
             VALUES (?1, ?2, ?3, ?4)",
            params![session, now, user_text, bot_text],
        )?;
        let evicted = tx.execute(
            "DELETE FROM turns WHERE id NOT IN
                (SELECT id FROM turns ORDER BY id DESC LIMIT ?1)",
            params![to_sql_int(self.max_turns)],
        )?;

        let mut fact_keys = 0;
        if let Some(update) = fact_update.filter(|u| !u.is_empty()) {
            let mut merged = load_facts(&tx)?;
            merged.merge(update);
            for (key, _) in update.iter() {
                let Some(value) = merged.get(key) else {
                    continue;
                };
                let json = serde_json::to_string(value)?;
                tx.execute(
                    "INSERT INTO facts (key, value, updated_at)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at",
                    params![key, json, now],
                )?;
                fact_keys += 1;
            }
        }
        tx.commit()?;

        debug!(
            session = %self.session,
            evicted,
            fact_keys,
            elapsed_us = start.elapsed().as_micros(),
            "Recorded turn"
        );
        Ok(())
    }

    fn start_session(&mut self) -> Result<SessionId> {
        self.conn.execute(
            "INSERT INTO meta (key, value) VALUES (?1, 1)
             ON CONFLICT(key) DO UPDATE SET value = value + 1",
            params![SESSION_KEY],
        )?;
        self.session = read_session(&self.conn)?;
        info!(session = %self.session, "Started conversation session");
        Ok(self.session)
    }

    fn current_session(&self) -> SessionId {
        self.session
    }

    fn reset(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "DELETE FROM turns;
             DELETE FROM facts;
             DELETE FROM meta;",
        )?;
        tx.commit()?;
        self.session = SessionId::default();
        info!(path = %self.db_path.display(), "Conversation memory cleared");
        Ok(())
    }

    fn stats(&self) -> Result<MemoryStats> {
        Ok(MemoryStats {
            turns: self.turn_count()?,
            session: self.session,
            facts: self.facts()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Row helpers
// ---------------------------------------------------------------------------

fn load_facts(conn: &Connection) -> Result<UserFacts> {
    let mut stmt = conn.prepare_cached("SELECT key, value FROM facts ORDER BY key")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut facts = UserFacts::new();
    for row in rows {
        let (key, json) = row?;
        match serde_json::from_str::<FactValue>(&json)? {
            FactValue::Text(text) => facts.set_text(key, text),
            FactValue::List(items) => {
                for item in items {
                    facts.push(key.clone(), item);
                }
            }
        }
    }
    Ok(facts)
}

fn read_session(conn: &Connection) -> Result<SessionId> {
    let value: Option<i64> = conn
        .query_row(
            "SELECT value FROM meta WHERE key = ?1",
            params![SESSION_KEY],
            |row| row.get(0),
        )
        .optional()?;
    Ok(SessionId(
        value.and_then(|v| u64::try_from(v).ok()).unwrap_or_default(),
    ))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| ParleyError::Store(format!("bad turn timestamp '{raw}': {e}")))
}

fn to_sql_int<N: TryInto<i64>>(n: N) -> i64 {
    n.try_into().unwrap_or(i64::MAX)
}

/// Extension trait that adds an `.optional()` combinator to `rusqlite::Result`.
///
/// Converts `Err(QueryReturnedNoRows)` into `Ok(None)`.
trait OptionalExt<T> {
    /// Convert `QueryReturnedNoRows` into `Ok(None)`.
    fn optional(self) -> std::result::Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> std::result::Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
