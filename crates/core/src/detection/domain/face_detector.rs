use crate::detection::domain::face_feature::FaceFeature;
use crate::shared::frame::Frame;
use crate::shared::orientation::ExifOrientation;

/// What the detector is asked to report for each face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureOptions {
    pub smile: bool,
    pub eye_blink: bool,
    pub return_sub_features: bool,
    /// How the frame pixels are rotated relative to upright. The detector
    /// corrects for it; the frame itself is left untouched.
    pub orientation: ExifOrientation,
}

impl FeatureOptions {
    pub fn with_orientation(self, orientation: ExifOrientation) -> Self {
        Self {
            orientation,
            ..self
        }
    }
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            smile: true,
            eye_blink: true,
            return_sub_features: true,
            orientation: ExifOrientation::Up,
        }
    }
}

/// Face-feature detection capability provided by the host platform.
///
/// Implementations may be stateful (e.g., tracking across frames),
/// hence `&mut self`.
pub trait FaceFeatureDetector: Send {
    fn features(
        &mut self,
        frame: &Frame,
        options: &FeatureOptions,
    ) -> Result<Vec<FaceFeature>, Box<dyn std::error::Error>>;
}
