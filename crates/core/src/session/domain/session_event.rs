use crate::session::domain::session_error::SessionError;
use crate::validation::domain::validation_outcome::Detection;

/// How a session ended. Delivered exactly once.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutcome {
    Detected(Detection),
    /// Closed by the user, or the frame source ran out, before a detection.
    Closed,
    Failed(SessionError),
}

impl SessionOutcome {
    pub fn detection(&self) -> Option<&Detection> {
        match self {
            SessionOutcome::Detected(d) => Some(d),
            _ => None,
        }
    }
}

/// Notifications posted on the session's UI channel.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Suggestion(Option<String>),
    Finished(SessionOutcome),
}
