mod engine;
mod service;
mod state;

pub use engine::TimerEngine;
pub use service::TimerService;
pub use state::{IntervalDurations, Mode, TimerState};
