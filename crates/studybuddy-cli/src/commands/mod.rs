pub mod config;
pub mod dashboard;
pub mod note;
pub mod session;
pub mod task;
pub mod timer;

use std::io::Write;

use studybuddy_core::{Config, Notification, Notifier, NotifyError, NullNotifier};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Prints notifications to stderr, keeping stdout for machine-readable output.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, n: &Notification) -> Result<(), NotifyError> {
        writeln!(std::io::stderr(), "{} {}", n.title, n.description)?;
        Ok(())
    }
}

/// The sink selected by `notifications.enabled`.
pub fn notifier(config: &Config) -> Box<dyn Notifier> {
    if config.notifications.enabled {
        Box::new(TerminalNotifier)
    } else {
        Box::new(NullNotifier)
    }
}

/// Show a planner toast. Failures only get logged.
pub fn toast(config: &Config, notification: Notification) {
    if let Err(e) = notifier(config).notify(&notification) {
        tracing::warn!(error = %e, "dropping notification");
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// First eight characters of an id, enough to address it from the CLI.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
