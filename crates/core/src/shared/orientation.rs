use serde::{Deserialize, Serialize};

use crate::shared::frame::Frame;

/// The eight EXIF orientation tags.
///
/// The discriminant is the raw EXIF value. Each tag describes how the stored
/// pixels must be transformed to be displayed upright.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExifOrientation {
    #[default]
    Up = 1,
    UpMirrored = 2,
    Down = 3,
    DownMirrored = 4,
    LeftMirrored = 5,
    Right = 6,
    RightMirrored = 7,
    Left = 8,
}

impl ExifOrientation {
    pub const ALL: [ExifOrientation; 8] = [
        ExifOrientation::Up,
        ExifOrientation::UpMirrored,
        ExifOrientation::Down,
        ExifOrientation::DownMirrored,
        ExifOrientation::LeftMirrored,
        ExifOrientation::Right,
        ExifOrientation::RightMirrored,
        ExifOrientation::Left,
    ];

    /// Parses a raw EXIF value; anything outside `1..=8` is rejected.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.raw() == raw)
    }

    pub fn raw(self) -> u32 {
        self as u32
    }

    /// Whether applying this orientation swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            ExifOrientation::LeftMirrored
                | ExifOrientation::Right
                | ExifOrientation::RightMirrored
                | ExifOrientation::Left
        )
    }

    /// Returns a copy of `frame` transformed so that it displays upright.
    pub fn apply(self, frame: &Frame) -> Result<Frame, Box<dyn std::error::Error>> {
        if self == ExifOrientation::Up {
            return Ok(frame.clone());
        }
        let image = frame.to_image()?;
        let oriented = match self {
            ExifOrientation::Up => image,
            ExifOrientation::UpMirrored => image.fliph(),
            ExifOrientation::Down => image.rotate180(),
            ExifOrientation::DownMirrored => image.flipv(),
            // transpose
            ExifOrientation::LeftMirrored => image.rotate90().fliph(),
            ExifOrientation::Right => image.rotate90(),
            // transverse
            ExifOrientation::RightMirrored => image.rotate270().fliph(),
            ExifOrientation::Left => image.rotate270(),
        };
        Ok(Frame::from_image(oriented, frame.index()))
    }
}

/// Physical orientation of the device holding the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceOrientation {
    #[default]
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

impl DeviceOrientation {
    /// Orientation hint handed to the face detector for frames captured
    /// while the device is held this way.
    pub fn detector_orientation(self) -> ExifOrientation {
        match self {
            DeviceOrientation::Portrait => ExifOrientation::Right,
            DeviceOrientation::PortraitUpsideDown => ExifOrientation::UpMirrored,
            DeviceOrientation::LandscapeLeft => ExifOrientation::Down,
            DeviceOrientation::LandscapeRight => ExifOrientation::DownMirrored,
            _ => ExifOrientation::Up,
        }
    }
}

impl std::str::FromStr for DeviceOrientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(DeviceOrientation::Unknown),
            "portrait" => Ok(DeviceOrientation::Portrait),
            "portrait-upside-down" => Ok(DeviceOrientation::PortraitUpsideDown),
            "landscape-left" => Ok(DeviceOrientation::LandscapeLeft),
            "landscape-right" => Ok(DeviceOrientation::LandscapeRight),
            "face-up" => Ok(DeviceOrientation::FaceUp),
            "face-down" => Ok(DeviceOrientation::FaceDown),
            other => Err(format!("Unknown device orientation '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// 3x2 RGB frame whose red channel encodes the pixel position:
    /// row 0 = [1, 2, 3], row 1 = [4, 5, 6].
    fn numbered_frame() -> Frame {
        let mut data = Vec::new();
        for v in 1..=6u8 {
            data.extend_from_slice(&[v, 0, 0]);
        }
        Frame::new(data, 3, 2, 3, 9)
    }

    fn reds(frame: &Frame) -> Vec<u8> {
        frame.data().chunks(3).map(|px| px[0]).collect()
    }

    #[rstest]
    #[case(0, None)]
    #[case(1, Some(ExifOrientation::Up))]
    #[case(2, Some(ExifOrientation::UpMirrored))]
    #[case(5, Some(ExifOrientation::LeftMirrored))]
    #[case(6, Some(ExifOrientation::Right))]
    #[case(8, Some(ExifOrientation::Left))]
    #[case(9, None)]
    fn test_from_raw(#[case] raw: u32, #[case] expected: Option<ExifOrientation>) {
        assert_eq!(ExifOrientation::from_raw(raw), expected);
    }

    #[test]
    fn test_raw_roundtrip_for_all_tags() {
        for o in ExifOrientation::ALL {
            assert_eq!(ExifOrientation::from_raw(o.raw()), Some(o));
        }
    }

    #[rstest]
    #[case(ExifOrientation::Up, 3, 2, vec![1, 2, 3, 4, 5, 6])]
    #[case(ExifOrientation::UpMirrored, 3, 2, vec![3, 2, 1, 6, 5, 4])]
    #[case(ExifOrientation::Down, 3, 2, vec![6, 5, 4, 3, 2, 1])]
    #[case(ExifOrientation::DownMirrored, 3, 2, vec![4, 5, 6, 1, 2, 3])]
    #[case(ExifOrientation::LeftMirrored, 2, 3, vec![1, 4, 2, 5, 3, 6])]
    #[case(ExifOrientation::Right, 2, 3, vec![4, 1, 5, 2, 6, 3])]
    #[case(ExifOrientation::RightMirrored, 2, 3, vec![6, 3, 5, 2, 4, 1])]
    #[case(ExifOrientation::Left, 2, 3, vec![3, 6, 2, 5, 1, 4])]
    fn test_apply(
        #[case] orientation: ExifOrientation,
        #[case] width: u32,
        #[case] height: u32,
        #[case] expected: Vec<u8>,
    ) {
        let oriented = orientation.apply(&numbered_frame()).unwrap();
        assert_eq!(oriented.width(), width);
        assert_eq!(oriented.height(), height);
        assert_eq!(oriented.index(), 9);
        assert_eq!(reds(&oriented), expected);
        assert_eq!(orientation.swaps_dimensions(), width == 2);
    }

    #[rstest]
    #[case(DeviceOrientation::Portrait, 6)]
    #[case(DeviceOrientation::PortraitUpsideDown, 2)]
    #[case(DeviceOrientation::LandscapeLeft, 3)]
    #[case(DeviceOrientation::LandscapeRight, 4)]
    #[case(DeviceOrientation::Unknown, 1)]
    #[case(DeviceOrientation::FaceUp, 1)]
    #[case(DeviceOrientation::FaceDown, 1)]
    fn test_detector_orientation(#[case] device: DeviceOrientation, #[case] raw: u32) {
        assert_eq!(device.detector_orientation().raw(), raw);
    }

    #[test]
    fn test_device_orientation_parse() {
        assert_eq!(
            "landscape-left".parse::<DeviceOrientation>(),
            Ok(DeviceOrientation::LandscapeLeft)
        );
        assert!("sideways".parse::<DeviceOrientation>().is_err());
    }
}
