use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::StudySession;
use crate::timer::{Mode, TimerState};

/// Every state change of the timer produces an Event.
/// The host re-renders from them; the session recorder consumes completions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// An interval reached zero. The clock is now paused at the start of `next_mode`.
    SessionCompleted {
        session: StudySession,
        next_mode: Mode,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        display: String,
        label: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn snapshot(state: &TimerState) -> Self {
        Event::StateSnapshot {
            state: *state,
            display: state.display(),
            label: state.mode.label().to_string(),
            at: Utc::now(),
        }
    }

    /// The completed session carried by this event, if any.
    pub fn completed_session(&self) -> Option<&StudySession> {
        match self {
            Event::SessionCompleted { session, .. } => Some(session),
            _ => None,
        }
    }
}
