use std::io::Write;

use chrono::{DateTime, TimeDelta, Utc};
use clap::Subcommand;
use studybuddy_core::storage::{load_saved_timer, save, SavedTimer};
use studybuddy_core::{
    Config, Database, Event, SessionRecorder, TimerEngine, TimerService, TimerState,
};

use super::{notifier, print_json, CliResult};

const STATE_KEY: &str = "timer_state";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the current interval
    Start,
    /// Pause the current interval
    Pause,
    /// Discard the current interval and return to a fresh study interval
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Advance a running timer by whole seconds
    Tick {
        /// Number of one-second ticks to deliver
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
    /// Count down in the foreground until the interval ends (Ctrl-C pauses)
    Run,
}

/// Restore the persisted clock and count down the seconds that passed
/// since it was last saved running.
///
/// Returns the engine and the instant it has been counted up to. Without a
/// usable saved state the engine is a fresh Study interval at the
/// configured length.
fn restore(
    db: &Database,
    config: &Config,
    recorder: &mut SessionRecorder,
    now: DateTime<Utc>,
) -> Result<(TimerEngine, DateTime<Utc>), Box<dyn std::error::Error>> {
    let Some(saved) = load_saved_timer(db, STATE_KEY) else {
        return Ok((TimerEngine::new(config.durations()), now));
    };
    let mut engine = TimerEngine::from_state(saved.state, config.durations());
    let Some(counted_at) = saved.counted_at.filter(|_| engine.is_running()) else {
        return Ok((engine, now));
    };

    let elapsed = (now - counted_at).num_seconds();
    let secs = u64::try_from(elapsed).unwrap_or(0);
    if let Some(event) = engine.advance(secs) {
        tracing::debug!(elapsed_secs = secs, "interval finished while away");
        if let Some(session) = event.completed_session() {
            recorder.record(session)?;
        }
        return Ok((engine, now));
    }
    // Keep the sub-second remainder for the next invocation.
    Ok((engine, counted_at + TimeDelta::seconds(elapsed.max(0))))
}

fn save_state(db: &mut Database, state: TimerState, counted_at: DateTime<Utc>) -> CliResult {
    save(db, STATE_KEY, &SavedTimer::new(state, counted_at))?;
    Ok(())
}

pub fn run(action: TimerAction) -> CliResult {
    let config = Config::load()?;
    let mut db = Database::open()?;
    let mut recorder = SessionRecorder::new(Database::open()?, notifier(&config));
    let (mut engine, mut counted_at) = restore(&db, &config, &mut recorder, Utc::now())?;

    match action {
        TimerAction::Start => {
            let event = match engine.start() {
                Some(event) => {
                    counted_at = Utc::now();
                    event
                }
                None => engine.snapshot(),
            };
            print_json(&event)?;
        }
        TimerAction::Pause => {
            let event = engine.pause().unwrap_or_else(|| engine.snapshot());
            print_json(&event)?;
        }
        TimerAction::Reset => {
            if let Some(event) = engine.reset() {
                print_json(&event)?;
            }
        }
        TimerAction::Status => {
            print_json(&engine.snapshot())?;
        }
        TimerAction::Tick { count } => {
            if !engine.is_running() {
                tracing::warn!("timer is paused; ticks ignored");
            }
            for _ in 0..count {
                let Some(event) = engine.tick() else {
                    continue;
                };
                if let Some(session) = event.completed_session() {
                    recorder.record(session)?;
                }
                print_json(&event)?;
            }
            print_json(&engine.snapshot())?;
        }
        TimerAction::Run => {
            drop(recorder);
            let state = run_foreground(engine, &config)?;
            save_state(&mut db, state, Utc::now())?;
            print_json(&Event::snapshot(&state))?;
            return Ok(());
        }
    }

    save_state(&mut db, engine.state(), counted_at)?;
    Ok(())
}

/// Drive the engine from a live tick source until the interval boundary or
/// Ctrl-C, re-rendering on every state change.
fn run_foreground(engine: TimerEngine, config: &Config) -> Result<TimerState, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let recorder = SessionRecorder::new(Database::open()?, notifier(config));
        let mut service = TimerService::new(engine, recorder).with_period(config.tick_interval());
        let mut updates = service.subscribe();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        service.start();
        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = *updates.borrow_and_update();
                    render(&state)?;
                    if !state.is_running {
                        break;
                    }
                }
                _ = &mut ctrl_c => {
                    service.pause();
                    break;
                }
            }
        }
        eprintln!();
        Ok::<TimerState, Box<dyn std::error::Error>>(service.state())
    })
}

fn render(state: &TimerState) -> std::io::Result<()> {
    let mut err = std::io::stderr();
    write!(err, "\r{} {}   ", state.display(), state.mode.label())?;
    err.flush()
}
