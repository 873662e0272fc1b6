use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::capture::domain::capture_device::{
    CameraPosition, CaptureDevice, CaptureFormat, CapturedFrame, PixelFormat,
};
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::orientation::ExifOrientation;

/// Plays a directory of still images back as a camera feed.
///
/// Files are taken in lexicographic order and decoded one at a time with
/// the `image` crate. With a non-zero frame rate, delivery is paced to
/// that rate; otherwise frames are delivered as fast as they decode.
pub struct ImageSequenceCamera {
    paths: Vec<PathBuf>,
    fps: f64,
    position: CameraPosition,
    orientation: ExifOrientation,
    active: Option<CaptureFormat>,
}

impl ImageSequenceCamera {
    pub fn open(dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| format!("Failed to read frame directory {}: {e}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_image(p))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(format!("No image frames found in {}", dir.display()).into());
        }
        log::info!("Frame source: {} images from {}", paths.len(), dir.display());

        Ok(Self {
            paths,
            fps: 0.0,
            position: CameraPosition::Front,
            orientation: ExifOrientation::Up,
            active: None,
        })
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps.max(0.0);
        self
    }

    pub fn with_position(mut self, position: CameraPosition) -> Self {
        self.position = position;
        self
    }

    /// Orientation reported with every frame.
    pub fn with_orientation(mut self, orientation: ExifOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn frame_count(&self) -> usize {
        self.paths.len()
    }

    fn frame_interval(&self) -> Option<Duration> {
        (self.fps > 0.0).then(|| Duration::from_secs_f64(1.0 / self.fps))
    }
}

impl CaptureDevice for ImageSequenceCamera {
    fn position(&self) -> CameraPosition {
        self.position
    }

    /// The sequence is reported as one 4:2:0 format at the size of its
    /// first image.
    fn supported_formats(&self) -> Vec<CaptureFormat> {
        match image::image_dimensions(&self.paths[0]) {
            Ok((width, height)) => vec![CaptureFormat {
                width,
                height,
                pixel_format: PixelFormat::Yuv420FullRange,
            }],
            Err(e) => {
                log::warn!("Cannot read {}: {e}", self.paths[0].display());
                Vec::new()
            }
        }
    }

    fn activate(&mut self, format: CaptureFormat) -> Result<(), Box<dyn std::error::Error>> {
        if !self.supported_formats().contains(&format) {
            return Err(format!(
                "Unsupported capture format {}x{} {:?}",
                format.width, format.height, format.pixel_format
            )
            .into());
        }
        self.active = Some(format);
        Ok(())
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<CapturedFrame, Box<dyn std::error::Error>>> + '_> {
        let Some(format) = self.active else {
            return Box::new(std::iter::once(Err("Capture device is not configured".into())));
        };
        let interval = self.frame_interval();
        let orientation = self.orientation;
        let mut next_due = Instant::now();

        Box::new(self.paths.iter().enumerate().map(move |(index, path)| {
            if let Some(interval) = interval {
                let now = Instant::now();
                if next_due > now {
                    std::thread::sleep(next_due - now);
                }
                next_due += interval;
            }
            let image = image::open(path)
                .map_err(|e| format!("Failed to decode {}: {e}", path.display()))?;
            if image.width() != format.width || image.height() != format.height {
                return Err(format!(
                    "Frame {} is {}x{}, expected {}x{}",
                    path.display(),
                    image.width(),
                    image.height(),
                    format.width,
                    format.height
                )
                .into());
            }
            Ok(CapturedFrame {
                frame: Frame::from_image(image, index),
                orientation,
            })
        }))
    }

    fn close(&mut self) {
        self.active = None;
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
