use thiserror::Error;

/// Why a single frame was not accepted. Recoverable: the next frame is
/// simply validated again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum Rejection {
    #[error("No face detected. Try to move the camera to your face.")]
    NoFaceDetected,

    #[error("Too many faces. One face at a time please.")]
    TooManyFaces,

    #[error("Eyes are closed. Please open both eyes.")]
    EyesClosed,

    #[error("No smile. Smile Please!")]
    NoSmile,

    #[error("Face detected was not in the center. Please move the face to center.")]
    FaceNotCentered,
}

impl Rejection {
    pub const ALL: [Rejection; 5] = [
        Rejection::NoFaceDetected,
        Rejection::TooManyFaces,
        Rejection::EyesClosed,
        Rejection::NoSmile,
        Rejection::FaceNotCentered,
    ];

    pub fn failure_reason(self) -> &'static str {
        match self {
            Rejection::NoFaceDetected => "No face detected.",
            Rejection::TooManyFaces => "Too many faces.",
            Rejection::EyesClosed => "Eyes are closed.",
            Rejection::NoSmile => "No smile.",
            Rejection::FaceNotCentered => "Face detected was not in the center.",
        }
    }

    /// Short instruction shown to the user while the session keeps running.
    pub fn recovery_suggestion(self) -> &'static str {
        match self {
            Rejection::NoFaceDetected => "Try to move the camera to your face.",
            Rejection::TooManyFaces => "One face at a time please.",
            Rejection::EyesClosed => "Please open both eyes.",
            Rejection::NoSmile => "Smile Please!",
            Rejection::FaceNotCentered => "Please move the face to center.",
        }
    }

    /// Stable snake_case key, used for logging and counters.
    pub fn key(self) -> &'static str {
        match self {
            Rejection::NoFaceDetected => "no_face_detected",
            Rejection::TooManyFaces => "too_many_faces",
            Rejection::EyesClosed => "eyes_closed",
            Rejection::NoSmile => "no_smile",
            Rejection::FaceNotCentered => "face_not_centered",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_reason_and_suggestion() {
        for rejection in Rejection::ALL {
            assert_eq!(
                rejection.to_string(),
                format!(
                    "{} {}",
                    rejection.failure_reason(),
                    rejection.recovery_suggestion()
                )
            );
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: std::collections::HashSet<_> = Rejection::ALL.iter().map(|r| r.key()).collect();
        assert_eq!(keys.len(), Rejection::ALL.len());
    }

    #[test]
    fn test_suggestion_text() {
        assert_eq!(Rejection::NoSmile.recovery_suggestion(), "Smile Please!");
        assert_eq!(
            Rejection::TooManyFaces.recovery_suggestion(),
            "One face at a time please."
        );
    }
}
