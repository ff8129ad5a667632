use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of interval the clock is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Study,
    Break,
}

impl Mode {
    /// The mode that follows this one at an interval boundary.
    pub fn next(self) -> Self {
        match self {
            Mode::Study => Mode::Break,
            Mode::Break => Mode::Study,
        }
    }

    /// Display label shown under the clock.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Study => "Study Time",
            Mode::Break => "Break Time",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Study => "study",
            Mode::Break => "break",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "study" => Some(Mode::Study),
            "break" => Some(Mode::Break),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Study => "Study",
            Mode::Break => "Break",
        })
    }
}

/// Interval lengths in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalDurations {
    pub study_minutes: u32,
    pub break_minutes: u32,
}

impl IntervalDurations {
    pub const DEFAULT_STUDY_MINUTES: u32 = 25;
    pub const DEFAULT_BREAK_MINUTES: u32 = 5;

    pub fn minutes_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Study => self.study_minutes,
            Mode::Break => self.break_minutes,
        }
    }
}

impl Default for IntervalDurations {
    fn default() -> Self {
        Self {
            study_minutes: Self::DEFAULT_STUDY_MINUTES,
            break_minutes: Self::DEFAULT_BREAK_MINUTES,
        }
    }
}

/// Countdown clock state, as rendered by the host and persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    #[serde(rename = "minutes")]
    pub minutes_remaining: u32,
    /// Always in `0..=59`.
    #[serde(rename = "seconds")]
    pub seconds_remaining: u32,
    pub is_running: bool,
    pub mode: Mode,
}

impl TimerState {
    /// A paused clock at the start of an interval of `mode`.
    pub fn fresh(mode: Mode, durations: &IntervalDurations) -> Self {
        Self {
            minutes_remaining: durations.minutes_for(mode),
            seconds_remaining: 0,
            is_running: false,
            mode,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.minutes_remaining) * 60 + u64::from(self.seconds_remaining)
    }

    pub fn is_expired(&self) -> bool {
        self.minutes_remaining == 0 && self.seconds_remaining == 0
    }

    /// Whether a state loaded from storage can be trusted.
    pub fn is_valid(&self) -> bool {
        self.seconds_remaining <= 59
    }

    /// `MM:SS`, zero-padded.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.minutes_remaining, self.seconds_remaining)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::fresh(Mode::Study, &IntervalDurations::default())
    }
}
