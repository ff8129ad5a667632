mod config;
pub mod database;
pub mod store;

pub use config::{Config, NotificationsConfig, TimerConfig};
pub use database::{Database, Stats};
pub use store::{
    load, load_or_default, load_saved_timer, load_timer_state, save, KeyValueStore, MemoryStore,
    SavedTimer,
};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the directory holding `config.toml` and `studybuddy.db`.
///
/// `STUDYBUDDY_DATA_DIR` wins if set. Otherwise `~/.config/studybuddy[-dev]/`,
/// with the `-dev` suffix when `STUDYBUDDY_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("STUDYBUDDY_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYBUDDY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studybuddy-dev")
            } else {
                base_dir.join("studybuddy")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
