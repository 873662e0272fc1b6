use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capture::domain::capture_device::CameraPosition;
use crate::shared::constants::{
    CENTER_TOLERANCE, FRAME_QUEUE_CAPACITY, STABLE_DETECTION_INTERVAL, STABLE_DETECTION_SKIP,
    SUGGESTION_INTERVAL,
};

/// Tunables for one capture session. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub center_tolerance: f64,
    pub stable_skip_count: usize,
    pub stable_interval_ms: u64,
    pub suggestion_interval_ms: u64,
    pub frame_queue_capacity: usize,
    /// Drop frames that arrive while the queue is full instead of blocking
    /// the camera.
    pub discard_late_frames: bool,
    pub camera_position: CameraPosition,
}

impl SessionConfig {
    pub fn stable_interval(&self) -> Duration {
        Duration::from_millis(self.stable_interval_ms)
    }

    pub fn suggestion_interval(&self) -> Duration {
        Duration::from_millis(self.suggestion_interval_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.center_tolerance.is_finite() && self.center_tolerance > 0.0) {
            return Err(format!(
                "Center tolerance must be a positive number, got {}",
                self.center_tolerance
            ));
        }
        if self.frame_queue_capacity == 0 {
            return Err("Frame queue capacity must be at least 1".into());
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            center_tolerance: CENTER_TOLERANCE,
            stable_skip_count: STABLE_DETECTION_SKIP,
            stable_interval_ms: STABLE_DETECTION_INTERVAL.as_millis() as u64,
            suggestion_interval_ms: SUGGESTION_INTERVAL.as_millis() as u64,
            frame_queue_capacity: FRAME_QUEUE_CAPACITY,
            discard_late_frames: true,
            camera_position: CameraPosition::Front,
        }
    }
}
