//! User-facing notifications ("toasts").
//!
//! Delivery is fire-and-forget. Callers log failures and move on.

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::timer::Mode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Names the interval that just finished and suggests the next one.
    pub fn session_completed(finished: Mode) -> Self {
        let next = match finished.next() {
            Mode::Break => "a break",
            Mode::Study => "a study session",
        };
        Self::new(
            format!("{finished} session completed!"),
            format!("Great job! Time for {next}."),
        )
    }

    pub fn task_added() -> Self {
        Self::new("Task added!", "Your new task has been added to your list.")
    }

    pub fn task_deleted() -> Self {
        Self::new("Task deleted", "Task has been removed from your list.")
    }

    pub fn note_saved() -> Self {
        Self::new("Note saved!", "Your note has been added successfully.")
    }

    pub fn note_updated() -> Self {
        Self::new("Note updated!", "Your changes have been saved.")
    }

    pub fn note_deleted() -> Self {
        Self::new("Note deleted", "Note has been removed.")
    }
}

/// A sink that shows notifications to the user.
pub trait Notifier: Send {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Emits notifications as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            title = %notification.title,
            description = %notification.description,
            "notification"
        );
        Ok(())
    }
}

/// Drops every notification. Used when notifications are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}

impl<N: Notifier + Sync + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).notify(notification)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).notify(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn study_completion_suggests_break() {
        let n = Notification::session_completed(Mode::Study);
        assert_eq!(n.title, "Study session completed!");
        assert_eq!(n.description, "Great job! Time for a break.");
    }

    #[test]
    fn builtin_sinks_never_fail() {
        let n = Notification::task_added();
        assert!(LogNotifier.notify(&n).is_ok());
        assert!(NullNotifier.notify(&n).is_ok());
        let boxed: Box<dyn Notifier> = Box::new(LogNotifier);
        assert!(boxed.notify(&Notification::note_deleted()).is_ok());
    }

    #[test]
    fn break_completion_suggests_study() {
        let n = Notification::session_completed(Mode::Break);
        assert_eq!(n.title, "Break session completed!");
        assert_eq!(n.description, "Great job! Time for a study session.");
    }
}
