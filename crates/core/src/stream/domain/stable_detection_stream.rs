use std::time::{Duration, Instant};

use crate::shared::constants::{STABLE_DETECTION_INTERVAL, STABLE_DETECTION_SKIP};
use crate::stream::domain::throttle::Throttle;
use crate::validation::domain::validation_outcome::{Detection, ValidationOutcome};

/// What the stable-detection stream produces.
#[derive(Clone, Debug, PartialEq)]
pub enum StableEvent {
    /// An accepted frame that survived debounce and throttle.
    Detected(Detection),
    /// The frame source stopped. Nothing follows.
    Completed,
}

/// Debounced, throttled accepted outcomes.
///
/// Rejections and idle ticks are ignored. The first `skip` accepted
/// outcomes are discarded, after which accepted outcomes go through a
/// latest-value throttle. Consumers treat the first `Detected` as the end
/// of the session.
#[derive(Debug)]
pub struct StableDetectionStream {
    remaining_skip: usize,
    throttle: Throttle<Detection>,
    closed: bool,
}

impl StableDetectionStream {
    pub fn new(skip: usize, interval: Duration) -> Self {
        Self {
            remaining_skip: skip,
            throttle: Throttle::new(interval),
            closed: false,
        }
    }

    /// Feeds one frame's outcome; `None` is an idle tick.
    pub fn push(&mut self, outcome: Option<ValidationOutcome>, now: Instant) -> Option<StableEvent> {
        if self.closed {
            return None;
        }
        let detection = outcome?.into_detection()?;
        if self.remaining_skip > 0 {
            self.remaining_skip -= 1;
            return None;
        }
        self.throttle
            .push(detection, now)
            .map(StableEvent::Detected)
    }

    pub fn flush(&mut self, now: Instant) -> Option<StableEvent> {
        if self.closed {
            return None;
        }
        self.throttle.flush(now).map(StableEvent::Detected)
    }

    /// Signals that no more frames will arrive. A held detection is
    /// dropped. Returns `Completed` the first time only.
    pub fn close(&mut self) -> Option<StableEvent> {
        if self.closed {
            return None;
        }
        self.closed = true;
        self.throttle.cancel();
        Some(StableEvent::Completed)
    }

    pub fn deadline(&self) -> Option<Instant> {
        if self.closed {
            None
        } else {
            self.throttle.deadline()
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Default for StableDetectionStream {
    fn default() -> Self {
        Self::new(STABLE_DETECTION_SKIP, STABLE_DETECTION_INTERVAL)
    }
}
