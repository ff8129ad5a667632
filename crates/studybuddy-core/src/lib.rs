//! # Student Buddy Core Library
//!
//! Core logic for Student Buddy, a study companion built around a
//! Pomodoro-style timer. The CLI is a thin host over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a study/break countdown state machine advanced one
//!   second per `tick()`, with no clock of its own
//! - **Timer Service**: Tokio host owning the engine and its single,
//!   cancellable tick source
//! - **Session Recorder**: appends completed intervals to a session log and
//!   notifies the user
//! - **Storage**: SQLite session log and key-value table, TOML configuration
//! - **Planner**: task list and notebook persisted through the key-value store
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`TimerService`]: tick-driven host with state subscriptions
//! - [`SessionRecorder`]: completed-interval sink
//! - [`Database`]: session and key-value persistence
//! - [`Config`]: application configuration management

pub mod dashboard;
pub mod error;
pub mod events;
pub mod notify;
pub mod planner;
pub mod recorder;
pub mod session;
pub mod storage;
pub mod timer;

pub use dashboard::Dashboard;
pub use error::{ConfigError, CoreError, DatabaseError, NotifyError, ValidationError};
pub use events::Event;
pub use notify::{LogNotifier, Notification, Notifier, NullNotifier};
pub use planner::{Note, NoteBook, Task, TaskList};
pub use recorder::SessionRecorder;
pub use session::{MemorySessionLog, SessionLog, StudySession};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use timer::{IntervalDurations, Mode, TimerEngine, TimerService, TimerState};
