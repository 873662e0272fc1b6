use crate::shared::frame::Frame;
use crate::shared::orientation::ExifOrientation;
use crate::validation::domain::validation_outcome::ValidationOutcome;

/// Classifies a single camera frame.
///
/// `Err` means the frame could not be examined at all (detector failure);
/// a frame that was examined and found wanting is `Ok(Rejected(_))`.
pub trait FrameValidator: Send {
    fn validate(
        &mut self,
        frame: &Frame,
        orientation: ExifOrientation,
    ) -> Result<ValidationOutcome, Box<dyn std::error::Error>>;
}
