use std::time::{Duration, Instant};

use crate::stream::domain::stable_detection_stream::{StableDetectionStream, StableEvent};
use crate::stream::domain::suggestion_stream::SuggestionStream;
use crate::validation::domain::validation_outcome::{Detection, ValidationOutcome};

/// Output of [`DetectionResultStream`], in the order it should be applied.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamUpdate {
    /// New text for the suggestion label; `None` hides it.
    Suggestion(Option<String>),
    /// A stable detection. The session ends on the first one.
    Detected(Detection),
    /// The frame source stopped without a detection.
    Completed,
}

/// Turns per-frame validation results into the two display streams:
/// suggestions for the user and stable detections for the session.
#[derive(Debug)]
pub struct DetectionResultStream {
    suggestions: SuggestionStream,
    stable: StableDetectionStream,
}

impl DetectionResultStream {
    pub fn new(stable_skip: usize, stable_interval: Duration, suggestion_interval: Duration) -> Self {
        Self {
            suggestions: SuggestionStream::new(suggestion_interval),
            stable: StableDetectionStream::new(stable_skip, stable_interval),
        }
    }

    /// Feeds the outcome of one validated frame.
    pub fn push_outcome(&mut self, outcome: ValidationOutcome, now: Instant) -> Vec<StreamUpdate> {
        let suggestion = outcome
            .rejection()
            .map(|r| r.recovery_suggestion().to_string());
        let mut updates = Vec::new();
        updates.extend(self.stable.push(Some(outcome), now).map(stable_update));
        updates.extend(self.suggestions.push(suggestion, now).map(StreamUpdate::Suggestion));
        updates
    }

    /// Feeds a frame that could not be examined; `message` is shown as is.
    pub fn push_failure(&mut self, message: String, now: Instant) -> Vec<StreamUpdate> {
        let mut updates = Vec::new();
        updates.extend(self.stable.push(None, now).map(stable_update));
        updates.extend(self.suggestions.push(Some(message), now).map(StreamUpdate::Suggestion));
        updates
    }

    /// Releases throttled values whose window has closed.
    pub fn tick(&mut self, now: Instant) -> Vec<StreamUpdate> {
        let mut updates = Vec::new();
        updates.extend(self.stable.flush(now).map(stable_update));
        updates.extend(self.suggestions.flush(now).map(StreamUpdate::Suggestion));
        updates
    }

    /// Earliest instant at which [`tick`](Self::tick) could produce output.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.stable.deadline(), self.suggestions.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Completes the stream. Held values are discarded.
    pub fn close(&mut self) -> Vec<StreamUpdate> {
        self.suggestions.cancel();
        self.stable.close().map(stable_update).into_iter().collect()
    }

    pub fn is_closed(&self) -> bool {
        self.stable.is_closed()
    }
}

impl Default for DetectionResultStream {
    fn default() -> Self {
        Self {
            suggestions: SuggestionStream::default(),
            stable: StableDetectionStream::default(),
        }
    }
}

fn stable_update(event: StableEvent) -> StreamUpdate {
    match event {
        StableEvent::Detected(detection) => StreamUpdate::Detected(detection),
        StableEvent::Completed => StreamUpdate::Completed,
    }
}
