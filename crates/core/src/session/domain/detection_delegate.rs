use crate::session::domain::session_event::SessionOutcome;

/// Receives session notifications on the thread that drains the UI channel.
pub trait DetectionDelegate {
    /// The suggestion label changed; `None` hides it.
    fn suggestion_changed(&mut self, _suggestion: Option<&str>) {}

    /// Called once per session, after teardown has begun.
    fn detection_finished(&mut self, outcome: SessionOutcome);
}
