use crate::detection::domain::face_detector::{FaceFeatureDetector, FeatureOptions};
use crate::detection::domain::face_feature::FaceFeature;
use crate::shared::constants::CENTER_TOLERANCE;
use crate::shared::frame::Frame;
use crate::shared::orientation::ExifOrientation;
use crate::shared::rect::Rect;
use crate::validation::domain::frame_validator::FrameValidator;
use crate::validation::domain::rejection::Rejection;
use crate::validation::domain::validation_outcome::{Detection, ValidationOutcome};

/// Accepts exactly one smiling, open-eyed face near the frame center.
///
/// Checks run in a fixed order: face count, smile, eyes, centering. The
/// first failing check decides the rejection. The orientation is only
/// passed to the detector; the image is re-oriented once it is accepted.
pub struct SmilingValidator {
    detector: Box<dyn FaceFeatureDetector>,
    options: FeatureOptions,
    center_tolerance: f64,
}

impl SmilingValidator {
    pub fn new(detector: Box<dyn FaceFeatureDetector>) -> Self {
        Self {
            detector,
            options: FeatureOptions::default(),
            center_tolerance: CENTER_TOLERANCE,
        }
    }

    pub fn with_options(mut self, options: FeatureOptions) -> Self {
        self.options = options;
        self
    }

    /// Half extent, in pixels, of the centered window.
    pub fn with_center_tolerance(mut self, tolerance: f64) -> Self {
        self.center_tolerance = tolerance;
        self
    }

    fn check_feature(&self, feature: &FaceFeature, frame: &Frame) -> Result<(), Rejection> {
        if !feature.has_smile {
            return Err(Rejection::NoSmile);
        }
        if !feature.eyes_open() {
            return Err(Rejection::EyesClosed);
        }

        let image_center = (frame.width() as f64 / 2.0, frame.height() as f64 / 2.0);
        let window = Rect::around(image_center, self.center_tolerance);
        if !window.contains(feature.bounds.center()) {
            return Err(Rejection::FaceNotCentered);
        }
        Ok(())
    }
}

impl FrameValidator for SmilingValidator {
    fn validate(
        &mut self,
        frame: &Frame,
        orientation: ExifOrientation,
    ) -> Result<ValidationOutcome, Box<dyn std::error::Error>> {
        let options = self.options.with_orientation(orientation);
        let mut features = self.detector.features(frame, &options)?;

        let feature = match features.len() {
            0 => return Ok(ValidationOutcome::Rejected(Rejection::NoFaceDetected)),
            1 => features.remove(0),
            _ => return Ok(ValidationOutcome::Rejected(Rejection::TooManyFaces)),
        };

        if let Err(rejection) = self.check_feature(&feature, frame) {
            return Ok(ValidationOutcome::Rejected(rejection));
        }

        let image = orientation.apply(frame)?;
        Ok(ValidationOutcome::Accepted(Detection { image, feature }))
    }
}
