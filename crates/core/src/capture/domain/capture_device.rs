use serde::{Deserialize, Serialize};

use crate::shared::frame::Frame;
use crate::shared::orientation::ExifOrientation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraPosition {
    #[default]
    Front,
    Back,
    External,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Bi-planar Y'CbCr 4:2:0, full range.
    Yuv420FullRange,
    /// Bi-planar Y'CbCr 4:2:0, video range.
    Yuv420VideoRange,
    Bgra32,
    Rgb24,
}

impl PixelFormat {
    pub fn is_420(self) -> bool {
        matches!(
            self,
            PixelFormat::Yuv420FullRange | PixelFormat::Yuv420VideoRange
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CaptureFormat {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
}

impl CaptureFormat {
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// One delivered frame with the orientation it was captured in.
#[derive(Clone, Debug)]
pub struct CapturedFrame {
    pub frame: Frame,
    pub orientation: ExifOrientation,
}

/// Camera capability provided by the host platform.
///
/// Frames are delivered in capture order. Conversion from the device pixel
/// format happens inside the implementation.
pub trait CaptureDevice: Send {
    fn position(&self) -> CameraPosition;

    fn supported_formats(&self) -> Vec<CaptureFormat>;

    /// Locks the device and makes `format` active.
    fn activate(&mut self, format: CaptureFormat) -> Result<(), Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in capture order. It may block
    /// waiting for the next frame and ends when the device stops.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<CapturedFrame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the device.
    fn close(&mut self);
}

/// Picks the largest 4:2:0 format, the one the session configures.
pub fn highest_resolution_420(formats: &[CaptureFormat]) -> Option<CaptureFormat> {
    formats
        .iter()
        .filter(|f| f.pixel_format.is_420())
        .max_by_key(|f| f.pixel_count())
        .copied()
}
