mod settings;

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;

use smile_capture_core::capture::infrastructure::image_sequence_camera::ImageSequenceCamera;
use smile_capture_core::detection::domain::face_detector::FeatureOptions;
use smile_capture_core::detection::infrastructure::annotated_feature_detector::AnnotatedFeatureDetector;
use smile_capture_core::session::domain::detection_delegate::DetectionDelegate;
use smile_capture_core::session::domain::session_event::SessionOutcome;
use smile_capture_core::session::session_logger::StatsSessionLogger;
use smile_capture_core::session::smile_detector::SmileDetector;
use smile_capture_core::shared::orientation::DeviceOrientation;
use smile_capture_core::storage::domain::image_writer::ImageWriter;
use smile_capture_core::storage::domain::photo_record::PhotoRecord;
use smile_capture_core::storage::domain::photo_repository::PhotoRepository;
use smile_capture_core::storage::infrastructure::file_photo_repository::FilePhotoRepository;
use smile_capture_core::storage::infrastructure::image_file_writer::ImageFileWriter;
use smile_capture_core::validation::domain::smiling_validator::SmilingValidator;

use settings::Settings;

/// Captures a photo once a single, centered, smiling face holds still.
#[derive(Parser)]
#[command(name = "smile-capture")]
struct Cli {
    /// Directory of frames, played back in file name order.
    frames: Option<PathBuf>,

    /// JSON file with the face features detected in each frame.
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// Playback rate in frames per second (0 = as fast as possible).
    #[arg(long)]
    fps: Option<f64>,

    /// Device orientation: portrait, portrait-upside-down, landscape-left,
    /// landscape-right or unknown.
    #[arg(long)]
    orientation: Option<DeviceOrientation>,

    /// Give up after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Accepted frames to ignore before a detection counts as stable.
    #[arg(long)]
    stable_skip: Option<usize>,

    /// Photo store directory.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Also write a thumbnail of the captured photo here.
    #[arg(long)]
    thumbnail: Option<PathBuf>,

    /// List stored photos and exit.
    #[arg(long)]
    list: bool,

    /// Persist the effective settings as the new defaults.
    #[arg(long)]
    save_settings: bool,
}

/// Prints suggestion changes and keeps the session outcome.
#[derive(Default)]
struct ConsoleDelegate {
    outcome: Option<SessionOutcome>,
}

impl DetectionDelegate for ConsoleDelegate {
    fn suggestion_changed(&mut self, suggestion: Option<&str>) {
        if let Some(text) = suggestion {
            eprintln!("{text}");
        }
    }

    fn detection_finished(&mut self, outcome: SessionOutcome) {
        self.outcome = Some(outcome);
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = effective_settings(&cli);
    validate(&cli, &settings)?;

    if cli.save_settings {
        let path = settings.save()?;
        log::info!("Settings saved to {}", path.display());
    }

    let store = open_store(&settings)?;
    if cli.list {
        return list_photos(&store);
    }

    let (frames, annotations) = capture_inputs(&cli)?;
    let outcome = capture(frames, annotations, &settings, cli.timeout)?;

    match outcome {
        SessionOutcome::Detected(detection) => {
            let record = store.create(&detection.image)?;
            println!("{}\t{}", record.id, record.file_path.display());
            if let Some(path) = &cli.thumbnail {
                write_thumbnail(&store, &record, settings.thumbnail_edge, path)?;
            }
            Ok(())
        }
        SessionOutcome::Closed => Err("No smiling face was captured".into()),
        SessionOutcome::Failed(e) => Err(e.into()),
    }
}

/// Runs one session to completion and returns how it ended.
fn capture(
    frames: &Path,
    annotations: &Path,
    settings: &Settings,
    timeout: Option<u64>,
) -> Result<SessionOutcome, Box<dyn std::error::Error>> {
    let camera = ImageSequenceCamera::open(frames)?
        .with_fps(settings.fps)
        .with_position(settings.session.camera_position)
        .with_orientation(settings.orientation.detector_orientation());
    let detector = AnnotatedFeatureDetector::from_json_file(annotations)?;
    // Landmark positions are not used by the command line.
    let options = FeatureOptions {
        return_sub_features: false,
        ..Default::default()
    };
    let validator = SmilingValidator::new(Box::new(detector))
        .with_options(options)
        .with_center_tolerance(settings.session.center_tolerance);

    let smile_detector = SmileDetector::new(settings.session.clone());
    let session = smile_detector.start(
        Box::new(camera),
        Box::new(validator),
        Box::new(StatsSessionLogger::new()),
    )?;

    let mut delegate = ConsoleDelegate::default();
    let finished =
        session.pump_until_finished(&mut delegate, timeout.map(Duration::from_secs));
    if !finished {
        log::warn!("No stable detection within the timeout, closing the camera");
    }

    smile_detector.dismiss_active_session(None);
    session.pump(&mut delegate);

    delegate
        .outcome
        .ok_or_else(|| "Session ended without reporting an outcome".into())
}

/// The frame directory and annotation file a capture run needs.
fn capture_inputs(cli: &Cli) -> Result<(&Path, &Path), Box<dyn std::error::Error>> {
    match (&cli.frames, &cli.annotations) {
        (Some(frames), Some(annotations)) => Ok((frames.as_path(), annotations.as_path())),
        _ => Err("A frame directory and --annotations are required unless --list is used".into()),
    }
}

fn effective_settings(cli: &Cli) -> Settings {
    let mut settings = Settings::load();
    if let Some(fps) = cli.fps {
        settings.fps = fps;
    }
    if let Some(orientation) = cli.orientation {
        settings.orientation = orientation;
    }
    if let Some(skip) = cli.stable_skip {
        settings.session.stable_skip_count = skip;
    }
    if let Some(store) = &cli.store {
        settings.store = Some(store.clone());
    }
    settings
}

fn validate(cli: &Cli, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = cli.frames.as_ref().filter(|dir| !dir.is_dir()) {
        return Err(format!("Frame directory not found: {}", dir.display()).into());
    }
    if let Some(path) = cli.annotations.as_ref().filter(|path| !path.is_file()) {
        return Err(format!("Annotations file not found: {}", path.display()).into());
    }
    if !settings.fps.is_finite() || settings.fps < 0.0 {
        return Err(format!("FPS must be zero or positive, got {}", settings.fps).into());
    }
    if cli.timeout == Some(0) {
        return Err("Timeout must be at least 1 second".into());
    }
    if settings.thumbnail_edge == 0 {
        return Err("Thumbnail edge must be positive".into());
    }
    settings.session.validate()?;
    Ok(())
}

fn open_store(settings: &Settings) -> Result<FilePhotoRepository, Box<dyn std::error::Error>> {
    let root = match &settings.store {
        Some(root) => root.clone(),
        None => FilePhotoRepository::default_root()
            .ok_or("No data directory on this platform; pass --store")?,
    };
    Ok(FilePhotoRepository::new(root))
}

fn list_photos(store: &FilePhotoRepository) -> Result<(), Box<dyn std::error::Error>> {
    let records = store.list()?;
    if records.is_empty() {
        log::info!("No photos in {}", store.photo_dir().display());
    }
    for record in records {
        println!(
            "{}\t{}\t{}",
            record.id,
            record.creation_date.to_rfc3339(),
            record.file_path.display()
        );
    }
    Ok(())
}

fn write_thumbnail(
    store: &FilePhotoRepository,
    record: &PhotoRecord,
    max_edge: u32,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let thumb = store.thumbnail(record, max_edge)?;
    ImageFileWriter::new().write(path, &thumb, None)?;
    log::info!(
        "Thumbnail {}x{} written to {}",
        thumb.width(),
        thumb.height(),
        path.display()
    );
    Ok(())
}
