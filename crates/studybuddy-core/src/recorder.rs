use crate::error::Result;
use crate::notify::{Notification, Notifier};
use crate::session::{SessionLog, StudySession};

/// Appends completed intervals to the session log and tells the user.
pub struct SessionRecorder {
    log: Box<dyn SessionLog>,
    notifier: Box<dyn Notifier>,
}

impl SessionRecorder {
    pub fn new(log: impl SessionLog + 'static, notifier: impl Notifier + 'static) -> Self {
        Self {
            log: Box::new(log),
            notifier: Box::new(notifier),
        }
    }

    /// Append `session`, then notify.
    ///
    /// # Errors
    /// Returns an error only if the append fails. Notification failures are
    /// logged and swallowed.
    pub fn record(&mut self, session: &StudySession) -> Result<()> {
        self.log.append(session)?;
        tracing::debug!(id = %session.id, kind = %session.session_type, "session recorded");

        let notification = Notification::session_completed(session.session_type);
        if let Err(e) = self.notifier.notify(&notification) {
            tracing::warn!(error = %e, "dropping session notification");
        }
        Ok(())
    }

    pub fn sessions(&self) -> Result<Vec<StudySession>> {
        self.log.list()
    }
}

impl std::fmt::Debug for SessionRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecorder").finish_non_exhaustive()
    }
}
