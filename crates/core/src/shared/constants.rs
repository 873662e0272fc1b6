use std::time::Duration;

/// Half extent of the window around the image center that the face center
/// must fall into. Fixed in pixels, independent of the frame resolution.
pub const CENTER_TOLERANCE: f64 = 500.0;

/// Accepted outcomes dropped before the stable stream may emit.
pub const STABLE_DETECTION_SKIP: usize = 50;

pub const STABLE_DETECTION_INTERVAL: Duration = Duration::from_millis(1000);

pub const SUGGESTION_INTERVAL: Duration = Duration::from_millis(300);

/// In-order frame queue depth between the capture and validation threads.
pub const FRAME_QUEUE_CAPACITY: usize = 1;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const PHOTO_FOLDER: &str = "PhotoObject";

pub const APP_DIR_NAME: &str = "SmileCapture";

/// Longest edge of generated thumbnails, in pixels.
pub const THUMBNAIL_MAX_EDGE: u32 = 256;
