use std::time::{Duration, Instant};

/// Rate limiter that keeps the latest value.
///
/// The first value passes immediately. Values arriving less than
/// `interval` after the last emission are held back, each replacing the
/// previous one, and the newest is released by [`Throttle::flush`] once the
/// interval has elapsed. Emissions are therefore at least `interval` apart
/// and never reordered.
#[derive(Debug)]
pub struct Throttle<T> {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) -> Option<T> {
        if self.window_open(now) {
            self.pending = None;
            self.last_emit = Some(now);
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Releases the held value if its window has closed.
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.window_open(now) {
            self.last_emit = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// When the held value becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        match (&self.pending, self.last_emit) {
            (Some(_), Some(last)) => Some(last + self.interval),
            _ => None,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops any held value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    fn window_open(&self, now: Instant) -> bool {
        match self.last_emit {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }
}
