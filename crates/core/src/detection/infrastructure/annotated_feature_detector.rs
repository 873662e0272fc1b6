use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::detection::domain::face_detector::{FaceFeatureDetector, FeatureOptions};
use crate::detection::domain::face_feature::FaceFeature;
use crate::shared::frame::Frame;

/// Replays face features recorded per frame index.
///
/// Annotations are sparse: a frame without its own entry reuses the most
/// recent earlier entry, and frames before the first entry have no faces.
/// The file format is a JSON object keyed by frame index:
///
/// ```json
/// { "0": [], "12": [{ "bounds": { "x": 700, "y": 300, "width": 600, "height": 600 },
///                    "has_smile": true }] }
/// ```
pub struct AnnotatedFeatureDetector {
    annotations: Arc<BTreeMap<usize, Vec<FaceFeature>>>,
}

impl AnnotatedFeatureDetector {
    pub fn new(annotations: Arc<BTreeMap<usize, Vec<FaceFeature>>>) -> Self {
        Self { annotations }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read annotations {}: {e}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let annotations: BTreeMap<usize, Vec<FaceFeature>> = serde_json::from_str(json)?;
        log::debug!("Loaded face annotations for {} frames", annotations.len());
        Ok(Self::new(Arc::new(annotations)))
    }
}

impl FaceFeatureDetector for AnnotatedFeatureDetector {
    fn features(
        &mut self,
        frame: &Frame,
        _options: &FeatureOptions,
    ) -> Result<Vec<FaceFeature>, Box<dyn std::error::Error>> {
        Ok(self
            .annotations
            .range(..=frame.index())
            .next_back()
            .map(|(_, features)| features.clone())
            .unwrap_or_default())
    }
}
