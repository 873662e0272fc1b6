use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::shared::constants::{APP_DIR_NAME, PHOTO_FOLDER};
use crate::shared::frame::Frame;
use crate::storage::domain::image_writer::ImageWriter;
use crate::storage::domain::photo_record::PhotoRecord;
use crate::storage::domain::photo_repository::PhotoRepository;
use crate::storage::domain::storage_error::StorageError;
use crate::storage::infrastructure::image_file_writer::ImageFileWriter;

/// Photo store on the local filesystem.
///
/// Layout: `<root>/PhotoObject/<id>.png` plus `<id>.json` holding the
/// [`PhotoRecord`]. Both files are written to a temp name and renamed.
pub struct FilePhotoRepository {
    dir: PathBuf,
    writer: Box<dyn ImageWriter>,
}

impl FilePhotoRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            dir: root.into().join(PHOTO_FOLDER),
            writer: Box::new(ImageFileWriter::new()),
        }
    }

    pub fn with_writer(mut self, writer: Box<dyn ImageWriter>) -> Self {
        self.writer = writer;
        self
    }

    /// Platform data directory for the app, e.g.
    /// `~/.local/share/SmileCapture` on Linux.
    pub fn default_root() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(APP_DIR_NAME))
    }

    pub fn photo_dir(&self) -> &Path {
        &self.dir
    }

    /// Like [`PhotoRepository::create`] with an explicit timestamp.
    pub fn create_at(&self, image: &Frame, now: DateTime<Utc>) -> Result<PhotoRecord, StorageError> {
        std::fs::create_dir_all(&self.dir)?;

        let id = Uuid::new_v4();
        let image_path = self.dir.join(format!("{id}.png"));
        self.writer
            .write(&image_path, image, None)
            .map_err(|e| StorageError::Image(e.to_string()))?;

        let record = PhotoRecord::new(id, image_path, now);
        if let Err(e) = self.write_metadata(&record) {
            let _ = std::fs::remove_file(&record.file_path);
            return Err(e);
        }

        log::info!("Stored photo {id} at {}", record.file_path.display());
        Ok(record)
    }

    fn metadata_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn write_metadata(&self, record: &PhotoRecord) -> Result<(), StorageError> {
        let path = self.metadata_path(record.id);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(record)?)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn read_metadata(path: &Path) -> Result<PhotoRecord, StorageError> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

impl PhotoRepository for FilePhotoRepository {
    fn create(&self, image: &Frame) -> Result<PhotoRecord, StorageError> {
        self.create_at(image, Utc::now())
    }

    fn list(&self) -> Result<Vec<PhotoRecord>, StorageError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_metadata(&path) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping {}: {e}", path.display()),
            }
        }

        records.sort_by(|a, b| b.creation_date.cmp(&a.creation_date));
        Ok(records)
    }

    fn get(&self, id: Uuid) -> Result<PhotoRecord, StorageError> {
        match Self::read_metadata(&self.metadata_path(id)) {
            Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(id))
            }
            other => other,
        }
    }

    fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        let record = self.get(id)?;
        match std::fs::remove_file(&record.file_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Image for photo {id} was already missing");
            }
            Err(e) => return Err(e.into()),
        }
        std::fs::remove_file(self.metadata_path(id))?;
        log::info!("Deleted photo {id}");
        Ok(())
    }

    fn thumbnail(&self, record: &PhotoRecord, max_edge: u32) -> Result<Frame, StorageError> {
        if max_edge == 0 {
            return Err(StorageError::Image("thumbnail edge must be positive".into()));
        }
        let img = image::open(&record.file_path).map_err(|e| match e {
            image::ImageError::IoError(io) => StorageError::Io(io),
            other => StorageError::Image(other.to_string()),
        })?;

        let img = if img.width().max(img.height()) > max_edge {
            img.thumbnail(max_edge, max_edge)
        } else {
            img
        };
        Ok(Frame::from_image(img, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_frame(width: u32, height: u32) -> Frame {
        Frame::new(vec![90; (width * height * 3) as usize], width, height, 3, 0)
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, hour, 0, 0).unwrap()
    }

    struct FailingWriter;

    impl ImageWriter for FailingWriter {
        fn write(
            &self,
            _path: &Path,
            _frame: &Frame,
            _size: Option<(u32, u32)>,
        ) -> Result<(), Box<dyn std::error::Error>> {
            Err("disk full".into())
        }
    }

    #[test]
    fn test_create_writes_image_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePhotoRepository::new(dir.path());

        let record = repo.create(&make_frame(40, 30)).unwrap();

        let expected = dir.path().join("PhotoObject").join(format!("{}.png", record.id));
        assert_eq!(record.file_path, expected);
        assert!(expected.exists());
        assert!(expected.with_extension("json").exists());
        assert_eq!(repo.get(record.id).unwrap(), record);
    }

    #[test]
    fn test_ids_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePhotoRepository::new(dir.path());
        let a = repo.create(&make_frame(4, 4)).unwrap();
        let b = repo.create(&make_frame(4, 4)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePhotoRepository::new(dir.path());
        let old = repo.create_at(&make_frame(4, 4), at(8)).unwrap();
        let new = repo.create_at(&make_frame(4, 4), at(10)).unwrap();
        let mid = repo.create_at(&make_frame(4, 4), at(9)).unwrap();

        let ids: Vec<Uuid> = repo.list().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![new.id, mid.id, old.id]);
    }

    #[test]
    fn test_list_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePhotoRepository::new(dir.path().join("missing"));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_skips_corrupt_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePhotoRepository::new(dir.path());
        let record = repo.create(&make_frame(4, 4)).unwrap();
        std::fs::write(repo.photo_dir().join("broken.json"), b"{not json").unwrap();

        let records = repo.list().unwrap();
        assert_eq!(records, vec![record]);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePhotoRepository::new(dir.path());
        let id = Uuid::new_v4();
        assert!(matches!(repo.get(id), Err(StorageError::NotFound(missing)) if missing == id));
    }

    #[test]
    fn test_delete_removes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePhotoRepository::new(dir.path());
        let record = repo.create(&make_frame(4, 4)).unwrap();

        repo.delete(record.id).unwrap();

        assert!(!record.file_path.exists());
        assert!(matches!(repo.get(record.id), Err(StorageError::NotFound(_))));
        assert!(matches!(repo.delete(record.id), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_failed_image_write_leaves_no_record() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePhotoRepository::new(dir.path()).with_writer(Box::new(FailingWriter));

        let err = repo.create(&make_frame(4, 4)).unwrap_err();
        assert!(matches!(err, StorageError::Image(msg) if msg == "disk full"));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_thumbnail_keeps_aspect_ratio() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePhotoRepository::new(dir.path());
        let record = repo.create(&make_frame(400, 200)).unwrap();

        let thumb = repo.thumbnail(&record, 100).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (100, 50));
    }

    #[test]
    fn test_thumbnail_never_upscales() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePhotoRepository::new(dir.path());
        let record = repo.create(&make_frame(40, 20)).unwrap();

        let thumb = repo.thumbnail(&record, 100).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (40, 20));
        assert!(repo.thumbnail(&record, 0).is_err());
    }

    #[test]
    fn test_default_root_ends_with_app_dir() {
        if let Some(root) = FilePhotoRepository::default_root() {
            assert!(root.ends_with(APP_DIR_NAME));
        }
    }
}
