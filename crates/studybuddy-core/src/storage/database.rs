//! SQLite-based session storage and statistics.
//!
//! Provides persistent storage for:
//! - Completed study and break sessions (append-only)
//! - Session statistics (daily and all-time)
//! - Key-value store for timer state, tasks and notes

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use super::store::KeyValueStore;
use crate::error::{DatabaseError, Result};
use crate::session::{SessionLog, StudySession};
use crate::timer::Mode;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_sessions: u64,
    pub study_sessions: u64,
    pub break_sessions: u64,
    pub total_study_min: u64,
    pub total_break_min: u64,
}

/// SQLite database for session storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/studybuddy.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("studybuddy.db"))
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    seq          INTEGER PRIMARY KEY AUTOINCREMENT,
                    id           TEXT NOT NULL,
                    session_type TEXT NOT NULL,
                    duration_min INTEGER NOT NULL,
                    completed_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Record a completed session.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(&self, session: &StudySession) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sessions (id, session_type, duration_min, completed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session.id,
                session.session_type.as_str(),
                session.duration_minutes,
                session.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// All sessions in insertion order.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored row is corrupt.
    pub fn sessions(&self) -> Result<Vec<StudySession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_type, duration_min, completed_at
             FROM sessions
             ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, kind, duration_minutes, completed_at) = row?;
            let session_type = Mode::parse(&kind).ok_or_else(|| corrupt(format!("unknown type '{kind}'")))?;
            let timestamp = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| corrupt(format!("bad timestamp '{completed_at}': {e}")))?
                .with_timezone(&Utc);
            sessions.push(StudySession {
                id,
                timestamp,
                duration_minutes,
                session_type,
            });
        }
        Ok(sessions)
    }

    pub fn stats_today(&self) -> Result<Stats> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        self.stats_since(Some(&format!("{today}T00:00:00+00:00")))
    }

    pub fn stats_all(&self) -> Result<Stats> {
        self.stats_since(None)
    }

    fn stats_since(&self, since: Option<&str>) -> Result<Stats> {
        let mut stmt = self.conn.prepare(
            "SELECT session_type, COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM sessions
             WHERE ?1 IS NULL OR completed_at >= ?1
             GROUP BY session_type",
        )?;
        let rows = stmt.query_map(params![since], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        let mut stats = Stats::default();
        for row in rows {
            let (kind, count, minutes) = row?;
            stats.total_sessions += count;
            match Mode::parse(&kind) {
                Some(Mode::Study) => {
                    stats.study_sessions += count;
                    stats.total_study_min += minutes;
                }
                Some(Mode::Break) => {
                    stats.break_sessions += count;
                    stats.total_break_min += minutes;
                }
                None => {}
            }
        }
        Ok(stats)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

fn corrupt(message: String) -> DatabaseError {
    DatabaseError::CorruptRow {
        table: "sessions".into(),
        message,
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.kv_get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.kv_set(key, value)
    }
}

impl SessionLog for Database {
    fn append(&mut self, session: &StudySession) -> Result<()> {
        self.record_session(session)
    }

    fn list(&self) -> Result<Vec<StudySession>> {
        self.sessions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_query() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_session(&StudySession::completed(Mode::Study, 25, now))
            .unwrap();
        db.record_session(&StudySession::completed(Mode::Break, 5, now))
            .unwrap();
        let stats = db.stats_all().unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.study_sessions, 1);
        assert_eq!(stats.total_study_min, 25);
        assert_eq!(stats.total_break_min, 5);
        assert_eq!(db.stats_today().unwrap(), stats);
    }

    #[test]
    fn sessions_come_back_in_insertion_order() {
        let mut db = Database::open_memory().unwrap();
        let now = Utc::now();
        let first = StudySession::completed(Mode::Study, 25, now);
        let second = StudySession::completed(Mode::Break, 5, now);
        db.append(&first).unwrap();
        db.append(&second).unwrap();

        let listed = db.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[0].session_type, Mode::Study);
        assert_eq!(listed[1].id, second.id);
        assert_eq!(listed[1].timestamp, second.timestamp);
    }

    #[test]
    fn kv_store() {
        let mut db = Database::open_memory().unwrap();
        assert!(db.get("test").unwrap().is_none());
        db.set("test", "hello").unwrap();
        db.set("test", "again").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn reopening_file_keeps_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studybuddy.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.record_session(&StudySession::completed(Mode::Study, 25, Utc::now()))
                .unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.sessions().unwrap().len(), 1);
    }
}
