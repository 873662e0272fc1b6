use serde::{Deserialize, Serialize};

use crate::shared::rect::Rect;

/// One face found by the detector, with the expression flags the
/// validator cares about.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceFeature {
    pub bounds: Rect,
    #[serde(default)]
    pub has_smile: bool,
    #[serde(default)]
    pub left_eye_closed: bool,
    #[serde(default)]
    pub right_eye_closed: bool,
    /// Sub-feature positions, present when the detector was asked for them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_eye_position: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_eye_position: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouth_position: Option<(f64, f64)>,
}

impl FaceFeature {
    pub fn eyes_open(&self) -> bool {
        !self.left_eye_closed && !self.right_eye_closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, false, true)]
    #[case(true, false, false)]
    #[case(false, true, false)]
    #[case(true, true, false)]
    fn test_eyes_open(#[case] left: bool, #[case] right: bool, #[case] expected: bool) {
        let feature = FaceFeature {
            left_eye_closed: left,
            right_eye_closed: right,
            ..Default::default()
        };
        assert_eq!(feature.eyes_open(), expected);
    }

    #[test]
    fn test_deserialize_with_missing_flags() {
        let json = r#"{"bounds": {"x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0}, "has_smile": true}"#;
        let feature: FaceFeature = serde_json::from_str(json).unwrap();
        assert!(feature.has_smile);
        assert!(feature.eyes_open());
        assert_eq!(feature.bounds, Rect::new(1.0, 2.0, 3.0, 4.0));
        assert!(feature.mouth_position.is_none());
    }
}
