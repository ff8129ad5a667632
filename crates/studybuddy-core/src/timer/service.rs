//! Tokio host for [`TimerEngine`].
//!
//! Owns the engine and at most one tick task. The task exists exactly while
//! the engine is running: `start()` spawns it, `pause()`/`reset()`/drop
//! cancel it, and an interval boundary ends it from the inside.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time;

use super::engine::TimerEngine;
use super::state::TimerState;
use crate::error::Result;
use crate::events::Event;
use crate::recorder::SessionRecorder;
use crate::session::StudySession;

const EVENT_CAPACITY: usize = 64;

struct Shared {
    engine: TimerEngine,
    recorder: SessionRecorder,
    /// Bumped on every cancellation. A tick task only touches the engine
    /// while the epoch it was spawned with is still current.
    epoch: u64,
    state_tx: watch::Sender<TimerState>,
    event_tx: broadcast::Sender<Event>,
}

impl Shared {
    fn publish(&self, event: Option<Event>) {
        self.state_tx.send_replace(self.engine.state());
        if let Some(event) = event {
            // No subscribers is fine.
            let _ = self.event_tx.send(event);
        }
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to the spawned tick task. Dropping it aborts the task.
struct TickHandle {
    task: JoinHandle<()>,
}

impl TickHandle {
    fn spawn(shared: Arc<Mutex<Shared>>, period: Duration, epoch: u64) -> Self {
        let task = tokio::spawn(run_ticks(shared, period, epoch));
        Self { task }
    }

    fn is_live(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_ticks(shared: Arc<Mutex<Shared>>, period: Duration, epoch: u64) {
    let mut interval = time::interval_at(time::Instant::now() + period, period);
    loop {
        interval.tick().await;

        let running = {
            let mut guard = lock(&shared);
            if guard.epoch != epoch {
                return;
            }
            let event = guard.engine.tick();
            if let Some(session) = event.as_ref().and_then(Event::completed_session) {
                if let Err(e) = guard.recorder.record(session) {
                    tracing::error!(error = %e, id = %session.id, "failed to record completed session");
                }
            }
            let running = guard.engine.is_running();
            guard.publish(event);
            running
        };
        if !running {
            tracing::debug!("tick source finished at interval boundary");
            return;
        }
    }
}

/// Timer engine driven by a cancellable 1 Hz tick source.
///
/// `start()` must be called from within a Tokio runtime.
pub struct TimerService {
    shared: Arc<Mutex<Shared>>,
    period: Duration,
    ticker: Option<TickHandle>,
}

impl TimerService {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    /// Wrap `engine`. A restored engine is always paused: no tick source
    /// survives a restart.
    pub fn new(mut engine: TimerEngine, recorder: SessionRecorder) -> Self {
        engine.pause();
        let (state_tx, _) = watch::channel(engine.state());
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Mutex::new(Shared {
                engine,
                recorder,
                epoch: 0,
                state_tx,
                event_tx,
            })),
            period: Self::DEFAULT_PERIOD,
            ticker: None,
        }
    }

    /// Override the tick period. Each tick still counts as one second.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        lock(&self.shared).engine.state()
    }

    pub fn snapshot(&self) -> Event {
        lock(&self.shared).engine.snapshot()
    }

    /// Receives the new state after every tick and command.
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        lock(&self.shared).state_tx.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<Event> {
        lock(&self.shared).event_tx.subscribe()
    }

    /// Whether a tick task is currently alive.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(TickHandle::is_live)
    }

    pub fn sessions(&self) -> Result<Vec<StudySession>> {
        lock(&self.shared).recorder.sessions()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let (event, epoch) = {
            let mut shared = lock(&self.shared);
            let event = shared.engine.start()?;
            shared.publish(Some(event.clone()));
            (event, shared.epoch)
        };
        self.ticker = Some(TickHandle::spawn(Arc::clone(&self.shared), self.period, epoch));
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.command(TimerEngine::pause)
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.command(TimerEngine::reset)
    }

    /// Cancel the tick source, then apply `f` under the same lock so no
    /// in-flight tick can land afterwards.
    fn command(&mut self, f: impl FnOnce(&mut TimerEngine) -> Option<Event>) -> Option<Event> {
        let event = {
            let mut shared = lock(&self.shared);
            shared.epoch += 1;
            let event = f(&mut shared.engine);
            if event.is_some() {
                shared.publish(event.clone());
            }
            event
        };
        self.ticker = None;
        event
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        lock(&self.shared).epoch += 1;
        self.ticker = None;
    }
}

impl std::fmt::Debug for TimerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerService")
            .field("state", &self.state())
            .field("period", &self.period)
            .field("ticking", &self.is_ticking())
            .finish()
    }
}
