//! Completed-interval records and the append-only log they go to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::timer::Mode;

/// One completed Study or Break interval. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub duration_minutes: u32,
    /// The mode that just finished, not the one that follows.
    #[serde(rename = "type")]
    pub session_type: Mode,
}

impl StudySession {
    pub fn completed(session_type: Mode, duration_minutes: u32, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: at,
            duration_minutes,
            session_type,
        }
    }
}

/// Append-only store of completed sessions.
///
/// Insertion order is chronological order; no deduplication.
pub trait SessionLog: Send {
    fn append(&mut self, session: &StudySession) -> Result<()>;

    /// All sessions, oldest first.
    fn list(&self) -> Result<Vec<StudySession>>;
}

/// In-memory log, for tests and embedders without durable storage.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionLog {
    sessions: Vec<StudySession>,
}

impl MemorySessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &[StudySession] {
        &self.sessions
    }
}

impl SessionLog for MemorySessionLog {
    fn append(&mut self, session: &StudySession) -> Result<()> {
        self.sessions.push(session.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<StudySession>> {
        Ok(self.sessions.clone())
    }
}

/// Total minutes of completed Study intervals.
pub fn total_study_minutes(sessions: &[StudySession]) -> u64 {
    sessions
        .iter()
        .filter(|s| s.session_type == Mode::Study)
        .map(|s| u64::from(s.duration_minutes))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_log_keeps_insertion_order() {
        let mut log = MemorySessionLog::new();
        let a = StudySession::completed(Mode::Study, 25, Utc::now());
        let b = StudySession::completed(Mode::Break, 5, Utc::now());
        log.append(&a).unwrap();
        log.append(&b).unwrap();
        log.append(&a).unwrap();
        let listed = log.list().unwrap();
        assert_eq!(listed, vec![a.clone(), b, a]);
    }

    #[test]
    fn ids_are_unique() {
        let now = Utc::now();
        let a = StudySession::completed(Mode::Study, 25, now);
        let b = StudySession::completed(Mode::Study, 25, now);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn study_minutes_ignore_breaks() {
        let now = Utc::now();
        let sessions = vec![
            StudySession::completed(Mode::Study, 25, now),
            StudySession::completed(Mode::Break, 5, now),
            StudySession::completed(Mode::Study, 25, now),
        ];
        assert_eq!(total_study_minutes(&sessions), 50);
    }

    #[test]
    fn serializes_type_field() {
        let s = StudySession::completed(Mode::Break, 5, Utc::now());
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["type"], "break");
        assert_eq!(json["duration_minutes"], 5);
    }
}
