use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::ImageFormat;

use crate::shared::frame::Frame;
use crate::storage::domain::image_writer::ImageWriter;

/// Writes frames as PNG files using the `image` crate.
///
/// The image is encoded to a sibling temp file and renamed into place.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(
        &self,
        path: &Path,
        frame: &Frame,
        size: Option<(u32, u32)>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = frame.to_image()?;
        let img = match size {
            Some((w, h)) => img.resize_exact(w, h, FilterType::Triangle),
            None => img,
        };

        let tmp = temp_path(path);
        if let Err(e) = img.save_with_format(&tmp, ImageFormat::Png) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, r: u8, g: u8, b: u8) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&[r, g, b]);
        }
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_write_creates_file_and_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.png");
        ImageFileWriter::new()
            .write(&path, &make_frame(100, 80, 50, 100, 200), None)
            .unwrap();
        assert!(path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        ImageFileWriter::new()
            .write(&path, &make_frame(50, 40, 50, 100, 200), None)
            .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (50, 40));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_rgba_frame_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.png");
        let frame = Frame::new(vec![10, 20, 30, 128].repeat(4), 2, 2, 4, 0);
        ImageFileWriter::new().write(&path, &frame, None).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(1, 1).0, [10, 20, 30, 128]);
    }

    #[test]
    fn test_write_with_resize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thumb.png");
        ImageFileWriter::new()
            .write(&path, &make_frame(200, 100, 128, 128, 128), Some((64, 32)))
            .unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (64, 32));
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let p = Path::new("/store/PhotoObject/abc.png");
        assert_eq!(temp_path(p), PathBuf::from("/store/PhotoObject/abc.png.tmp"));
    }
}
