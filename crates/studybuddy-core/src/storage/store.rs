//! Generic string key-value persistence.
//!
//! Hosts load state once on start and save after every change. Bad or
//! missing data never fails a load: the caller gets `None` or a default.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::timer::TimerState;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read `key` as JSON. Absent, unreadable or malformed values give `None`.
pub fn load<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(key, error = %e, "store read failed");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed stored value");
            None
        }
    }
}

/// Like [`load`], falling back to `T::default()`.
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    load(store, key).unwrap_or_default()
}

/// Write `value` as JSON under `key`.
///
/// # Errors
/// Returns an error if serialization or the underlying write fails.
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// A persisted clock plus the wall-clock instant up to which a running
/// clock has been counted down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTimer {
    #[serde(flatten)]
    pub state: TimerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counted_at: Option<DateTime<Utc>>,
}

impl SavedTimer {
    /// `counted_at` is kept only while the clock runs.
    pub fn new(state: TimerState, counted_at: DateTime<Utc>) -> Self {
        Self {
            state,
            counted_at: state.is_running.then_some(counted_at),
        }
    }
}

/// Load a [`SavedTimer`], rejecting states that parse yet break the clock
/// invariants. `None` means the host should start a fresh interval.
pub fn load_saved_timer<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<SavedTimer> {
    let saved: SavedTimer = load(store, key)?;
    if saved.state.is_valid() {
        Some(saved)
    } else {
        tracing::warn!(key, state = ?saved.state, "stored timer state out of range");
        None
    }
}

/// The clock part of [`load_saved_timer`].
pub fn load_timer_state<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<TimerState> {
    load_saved_timer(store, key).map(|saved| saved.state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Mode;

    #[test]
    fn missing_key_yields_default() {
        let store = MemoryStore::new();
        let v: Vec<String> = load_or_default(&store, "tasks");
        assert!(v.is_empty());
    }

    #[test]
    fn malformed_json_yields_none() {
        let mut store = MemoryStore::new();
        store.set("timer", "{not json").unwrap();
        assert_eq!(load_timer_state(&store, "timer"), None);
    }

    #[test]
    fn wrong_shape_yields_none() {
        let mut store = MemoryStore::new();
        store.set("timer", r#"{"minutes":"ten"}"#).unwrap();
        assert_eq!(load_timer_state(&store, "timer"), None);
    }

    #[test]
    fn out_of_range_state_yields_none() {
        let mut store = MemoryStore::new();
        store
            .set("timer", r#"{"minutes":1,"seconds":99,"is_running":true,"mode":"break"}"#)
            .unwrap();
        assert_eq!(load_saved_timer(&store, "timer"), None);
    }

    #[test]
    fn saved_state_loads_back() {
        let mut store = MemoryStore::new();
        let state = TimerState {
            minutes_remaining: 3,
            seconds_remaining: 12,
            is_running: false,
            mode: Mode::Break,
        };
        save(&mut store, "timer", &SavedTimer::new(state, Utc::now())).unwrap();
        let loaded = load_saved_timer(&store, "timer").unwrap();
        assert_eq!(loaded.state, state);
        assert_eq!(loaded.counted_at, None);
    }

    #[test]
    fn running_state_keeps_counted_at() {
        let mut store = MemoryStore::new();
        let mut state = TimerState::default();
        state.is_running = true;
        let at = Utc::now();
        save(&mut store, "timer", &SavedTimer::new(state, at)).unwrap();
        assert_eq!(load_saved_timer(&store, "timer"), Some(SavedTimer { state, counted_at: Some(at) }));
    }

    #[test]
    fn plain_state_without_timestamp_still_loads() {
        let mut store = MemoryStore::new();
        store
            .set("timer", r#"{"minutes":7,"seconds":5,"is_running":true,"mode":"study"}"#)
            .unwrap();
        let saved = load_saved_timer(&store, "timer").unwrap();
        assert_eq!(saved.state.display(), "07:05");
        assert_eq!(saved.counted_at, None);
    }
}
