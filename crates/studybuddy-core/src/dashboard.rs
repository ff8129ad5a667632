//! At-a-glance summary across tasks, notes and sessions.

use serde::{Deserialize, Serialize};

use crate::planner::{NoteBook, TaskList};
use crate::session::{total_study_minutes, StudySession};

const RECENT_SESSIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub note_count: usize,
    pub total_study_minutes: u64,
    /// Up to three most recent sessions, oldest first.
    pub recent_sessions: Vec<StudySession>,
}

impl Dashboard {
    pub fn build(tasks: &TaskList, notes: &NoteBook, sessions: &[StudySession]) -> Self {
        let recent_start = sessions.len().saturating_sub(RECENT_SESSIONS);
        Self {
            completed_tasks: tasks.completed_count(),
            total_tasks: tasks.len(),
            note_count: notes.len(),
            total_study_minutes: total_study_minutes(sessions),
            recent_sessions: sessions[recent_start..].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::timer::Mode;

    #[test]
    fn empty_everything() {
        let d = Dashboard::build(&TaskList::new(), &NoteBook::new(), &[]);
        assert_eq!(d.total_tasks, 0);
        assert_eq!(d.total_study_minutes, 0);
        assert!(d.recent_sessions.is_empty());
    }

    #[test]
    fn counts_and_recent_tail() {
        let mut tasks = TaskList::new();
        let id = tasks.add("a").unwrap().id.clone();
        tasks.add("b").unwrap();
        tasks.toggle(&id).unwrap();

        let mut notes = NoteBook::new();
        notes.add("t", "c").unwrap();

        let now = Utc::now();
        let sessions: Vec<_> = [Mode::Study, Mode::Break, Mode::Study, Mode::Break, Mode::Study]
            .into_iter()
            .map(|m| StudySession::completed(m, if m == Mode::Study { 25 } else { 5 }, now))
            .collect();

        let d = Dashboard::build(&tasks, &notes, &sessions);
        assert_eq!((d.completed_tasks, d.total_tasks), (1, 2));
        assert_eq!(d.note_count, 1);
        assert_eq!(d.total_study_minutes, 75);
        assert_eq!(d.recent_sessions, sessions[2..].to_vec());
    }
}
