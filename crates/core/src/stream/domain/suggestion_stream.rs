use std::time::{Duration, Instant};

use crate::shared::constants::SUGGESTION_INTERVAL;
use crate::stream::domain::throttle::Throttle;

/// Throttled, de-duplicated text for the suggestion label.
///
/// `None` clears the label. Throttling happens first, then a value equal
/// to the one last delivered is swallowed.
#[derive(Debug)]
pub struct SuggestionStream {
    throttle: Throttle<Option<String>>,
    last_delivered: Option<Option<String>>,
}

impl SuggestionStream {
    pub fn new(interval: Duration) -> Self {
        Self {
            throttle: Throttle::new(interval),
            last_delivered: None,
        }
    }

    pub fn push(&mut self, suggestion: Option<String>, now: Instant) -> Option<Option<String>> {
        let value = self.throttle.push(suggestion, now)?;
        self.deliver(value)
    }

    pub fn flush(&mut self, now: Instant) -> Option<Option<String>> {
        let value = self.throttle.flush(now)?;
        self.deliver(value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.throttle.deadline()
    }

    pub fn cancel(&mut self) {
        self.throttle.cancel();
    }

    fn deliver(&mut self, value: Option<String>) -> Option<Option<String>> {
        if self.last_delivered.as_ref() == Some(&value) {
            return None;
        }
        self.last_delivered = Some(value.clone());
        Some(value)
    }
}

impl Default for SuggestionStream {
    fn default() -> Self {
        Self::new(SUGGESTION_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(base: Instant, offset: u64) -> Instant {
        base + Duration::from_millis(offset)
    }

    fn text(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_first_suggestion_delivered() {
        let t0 = Instant::now();
        let mut stream = SuggestionStream::default();
        assert_eq!(stream.push(text("Smile Please!"), t0), Some(text("Smile Please!")));
    }

    #[test]
    fn test_identical_suggestions_within_window_produce_one_update() {
        let t0 = Instant::now();
        let mut stream = SuggestionStream::default();
        let mut updates = Vec::new();
        updates.extend(stream.push(text("Smile Please!"), t0));
        updates.extend(stream.push(text("Smile Please!"), ms(t0, 100)));
        updates.extend(stream.flush(ms(t0, 300)));

        assert_eq!(updates, vec![text("Smile Please!")]);
    }

    #[test]
    fn test_identical_suggestions_across_windows_are_suppressed() {
        let t0 = Instant::now();
        let mut stream = SuggestionStream::default();
        assert!(stream.push(text("No smile"), t0).is_some());
        assert_eq!(stream.push(text("No smile"), ms(t0, 500)), None);
        assert_eq!(stream.push(text("No smile"), ms(t0, 1000)), None);
    }

    #[test]
    fn test_latest_suggestion_wins_at_window_end() {
        let t0 = Instant::now();
        let mut stream = SuggestionStream::default();
        stream.push(text("a"), t0);
        assert_eq!(stream.push(text("b"), ms(t0, 100)), None);
        assert_eq!(stream.push(text("c"), ms(t0, 200)), None);
        assert_eq!(stream.flush(ms(t0, 300)), Some(text("c")));
    }

    #[test]
    fn test_clearing_is_an_update() {
        let t0 = Instant::now();
        let mut stream = SuggestionStream::default();
        stream.push(text("a"), t0);
        assert_eq!(stream.push(None, ms(t0, 400)), Some(None));
        assert_eq!(stream.push(None, ms(t0, 800)), None);
    }

    #[test]
    fn test_alternating_values_are_not_duplicates() {
        let t0 = Instant::now();
        let mut stream = SuggestionStream::default();
        let updates: Vec<_> = [("a", 0), ("b", 300), ("a", 600)]
            .into_iter()
            .filter_map(|(s, t)| stream.push(text(s), ms(t0, t)))
            .collect();
        assert_eq!(updates, vec![text("a"), text("b"), text("a")]);
    }

    #[test]
    fn test_deadline_reflects_held_value() {
        let t0 = Instant::now();
        let mut stream = SuggestionStream::default();
        stream.push(text("a"), t0);
        assert_eq!(stream.deadline(), None);
        stream.push(text("b"), ms(t0, 10));
        assert_eq!(stream.deadline(), Some(ms(t0, 300)));
        stream.cancel();
        assert_eq!(stream.deadline(), None);
    }
}
