//! Timer engine implementation.
//!
//! The engine is a plain state machine over [`TimerState`]. It does not use
//! internal threads or clocks - every call to `tick()` is one second of
//! countdown, and the caller decides when those seconds happen (see
//! [`TimerService`](super::TimerService) for the Tokio-driven host).
//!
//! ## State Transitions
//!
//! ```text
//! Study(paused) <-> Study(running) --00:00--> Break(paused) <-> Break(running)
//!       ^                                                            |
//!       +------------------------------00:00-------------------------+
//! ```
//!
//! Every boundary pauses the clock; the user starts the next interval.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(IntervalDurations::default());
//! engine.start();
//! // Once per second:
//! if let Some(Event::SessionCompleted { session, .. }) = engine.tick() {
//!     recorder.record(&session)?;
//! }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::state::{IntervalDurations, Mode, TimerState};
use crate::events::Event;
use crate::session::StudySession;

/// Core countdown state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    state: TimerState,
    durations: IntervalDurations,
}

impl TimerEngine {
    /// A paused engine at the start of a Study interval.
    pub fn new(durations: IntervalDurations) -> Self {
        Self {
            state: TimerState::fresh(Mode::Study, &durations),
            durations,
        }
    }

    /// Resume from a previously persisted state.
    ///
    /// Invalid states are replaced by a fresh Study interval.
    pub fn from_state(state: TimerState, durations: IntervalDurations) -> Self {
        if !state.is_valid() {
            tracing::warn!(?state, "discarding invalid timer state");
            return Self::new(durations);
        }
        Self { state, durations }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn durations(&self) -> IntervalDurations {
        self.durations
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn snapshot(&self) -> Event {
        Event::snapshot(&self.state)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        self.state.is_running = true;
        tracing::debug!(mode = %self.state.mode, remaining = %self.state.display(), "timer started");
        Some(Event::TimerStarted {
            mode: self.state.mode,
            remaining_secs: self.state.total_seconds(),
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_running = false;
        tracing::debug!(mode = %self.state.mode, remaining = %self.state.display(), "timer paused");
        Some(Event::TimerPaused {
            mode: self.state.mode,
            remaining_secs: self.state.total_seconds(),
            at: Utc::now(),
        })
    }

    /// Back to a paused Study interval. The interval in progress is dropped
    /// without being recorded.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::fresh(Mode::Study, &self.durations);
        tracing::debug!("timer reset");
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event::SessionCompleted)` when the interval finishes.
    /// Paused engines ignore ticks.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        if self.state.is_expired() {
            return Some(self.complete());
        }

        if self.state.seconds_remaining > 0 {
            self.state.seconds_remaining -= 1;
        } else {
            self.state.minutes_remaining -= 1;
            self.state.seconds_remaining = 59;
        }

        if self.state.is_expired() {
            return Some(self.complete());
        }
        None
    }

    /// Deliver up to `secs` ticks, as a host does to catch up on time that
    /// passed while nothing was ticking.
    ///
    /// Stops at the first interval boundary, since the clock pauses there,
    /// and returns its `SessionCompleted` event.
    pub fn advance(&mut self, secs: u64) -> Option<Event> {
        for _ in 0..secs {
            if !self.state.is_running {
                break;
            }
            if let Some(event) = self.tick() {
                return Some(event);
            }
        }
        None
    }

    /// Replace the interval lengths. Takes effect from the next fresh interval.
    pub fn set_durations(&mut self, durations: IntervalDurations) {
        self.durations = durations;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Event {
        let finished = self.state.mode;
        let now = Utc::now();
        let session = StudySession::completed(finished, self.durations.minutes_for(finished), now);
        let next_mode = finished.next();
        self.state = TimerState::fresh(next_mode, &self.durations);
        tracing::info!(
            finished = %finished,
            minutes = session.duration_minutes,
            next = %next_mode,
            "interval completed"
        );
        Event::SessionCompleted {
            session,
            next_mode,
            at: now,
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(IntervalDurations::default())
    }
}
