use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for capture-session events.
///
/// Keeps the session loop independent of where its diagnostics go
/// (log crate, a UI overlay, nowhere).
pub trait SessionLogger: Send {
    /// Count one validated frame under `outcome` (`accepted` or a
    /// rejection key).
    fn outcome(&mut self, outcome: &str);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. dropped frames).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything. Used by tests and embedders with their own
/// reporting.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn outcome(&mut self, _outcome: &str) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Keeps outcome counts, stage timings and metrics, and logs a summary
/// when the session is torn down.
pub struct StatsSessionLogger {
    outcomes: BTreeMap<String, usize>,
    timings: BTreeMap<String, Vec<f64>>,
    metrics: BTreeMap<String, Vec<f64>>,
    start_time: Instant,
    messages: Vec<String>,
}

impl StatsSessionLogger {
    pub fn new() -> Self {
        Self {
            outcomes: BTreeMap::new(),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            messages: Vec::new(),
        }
    }

    pub fn frames(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count_for(&self, outcome: &str) -> usize {
        self.outcomes.get(outcome).copied().unwrap_or(0)
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    /// Returns the formatted summary, or `None` if no frame was seen.
    pub fn summary_string(&self) -> Option<String> {
        let frames = self.frames();
        if frames == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Session summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        )];

        for (outcome, count) in &self.outcomes {
            let pct = *count as f64 / frames as f64 * 100.0;
            lines.push(format!("  {outcome:18}: {count:5}  ({pct:4.1}%)"));
        }

        for (stage, durations) in &self.timings {
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len().max(1) as f64;
            lines.push(format!(
                "  {stage:18}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        for (name, values) in &self.metrics {
            let avg = values.iter().sum::<f64>() / values.len().max(1) as f64;
            lines.push(format!("  {name}: avg {avg:.1}"));
        }

        for message in &self.messages {
            lines.push(format!("  - {message}"));
        }

        if elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }
}

impl Default for StatsSessionLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLogger for StatsSessionLogger {
    fn outcome(&mut self, outcome: &str) {
        *self.outcomes.entry(outcome.to_string()).or_default() += 1;
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullSessionLogger;
        logger.outcome("accepted");
        logger.timing("validate", 5.0);
        logger.metric("frames_dropped", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_outcomes_are_counted() {
        let mut logger = StatsSessionLogger::new();
        logger.outcome("no_smile");
        logger.outcome("no_smile");
        logger.outcome("accepted");

        assert_eq!(logger.frames(), 3);
        assert_eq!(logger.count_for("no_smile"), 2);
        assert_eq!(logger.count_for("accepted"), 1);
        assert_eq!(logger.count_for("too_many_faces"), 0);
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = StatsSessionLogger::new();
        logger.timing("validate", 20.0);
        logger.timing("validate", 30.0);

        let values = logger.timings_for("validate").unwrap();
        assert_eq!(values.len(), 2);
        assert_relative_eq!(values.iter().sum::<f64>() / 2.0, 25.0);
        assert!(logger.timings_for("detect").is_none());
    }

    #[test]
    fn test_summary_lists_outcomes_timings_and_metrics() {
        let mut logger = StatsSessionLogger::new();
        logger.outcome("no_face_detected");
        logger.outcome("accepted");
        logger.timing("validate", 10.0);
        logger.metric("frames_dropped", 4.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Session summary (2 frames"));
        assert!(summary.contains("no_face_detected"));
        assert!(summary.contains("validate"));
        assert!(summary.contains("frames_dropped: avg 4.0"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let mut logger = StatsSessionLogger::new();
        logger.timing("validate", 1.0);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_info_messages_appear_in_summary() {
        let mut logger = StatsSessionLogger::new();
        logger.info("Capturing 1920x1080 frames");
        logger.outcome("accepted");

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("  - Capturing 1920x1080 frames"));
    }
}
