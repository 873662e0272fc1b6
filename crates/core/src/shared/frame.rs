use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

/// A single camera frame: contiguous pixel bytes in row-major order.
///
/// Pixel format conversion happens at the capture boundary; the domain
/// layer only sees gray, RGB or RGBA bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// Wraps a decoded image, converting anything exotic to RGB.
    pub fn from_image(image: DynamicImage, index: usize) -> Self {
        match image {
            DynamicImage::ImageLuma8(img) => {
                let (w, h) = img.dimensions();
                Self::new(img.into_raw(), w, h, 1, index)
            }
            DynamicImage::ImageRgba8(img) => {
                let (w, h) = img.dimensions();
                Self::new(img.into_raw(), w, h, 4, index)
            }
            other => {
                let img = other.into_rgb8();
                let (w, h) = img.dimensions();
                Self::new(img.into_raw(), w, h, 3, index)
            }
        }
    }

    /// Converts the frame into an `image` buffer for pixel operations.
    pub fn to_image(&self) -> Result<DynamicImage, Box<dyn std::error::Error>> {
        let data = self.data.clone();
        let image = match self.channels {
            1 => GrayImage::from_raw(self.width, self.height, data).map(DynamicImage::ImageLuma8),
            3 => RgbImage::from_raw(self.width, self.height, data).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(self.width, self.height, data).map(DynamicImage::ImageRgba8),
            n => return Err(format!("Unsupported channel count: {n}").into()),
        };
        image.ok_or_else(|| "Frame data does not match its dimensions".into())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
