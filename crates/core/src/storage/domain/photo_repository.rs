use uuid::Uuid;

use crate::shared::frame::Frame;
use crate::storage::domain::photo_record::PhotoRecord;
use crate::storage::domain::storage_error::StorageError;

/// Durable store for accepted photos.
pub trait PhotoRepository: Send {
    /// Stores `image` under a fresh id and returns its record.
    fn create(&self, image: &Frame) -> Result<PhotoRecord, StorageError>;

    /// All stored records, newest first.
    fn list(&self) -> Result<Vec<PhotoRecord>, StorageError>;

    fn get(&self, id: Uuid) -> Result<PhotoRecord, StorageError>;

    /// Removes the image and its metadata.
    fn delete(&self, id: Uuid) -> Result<(), StorageError>;

    /// Loads the stored image scaled so its longest edge is at most
    /// `max_edge`, keeping the aspect ratio. Smaller images are returned
    /// unscaled.
    fn thumbnail(&self, record: &PhotoRecord, max_edge: u32) -> Result<Frame, StorageError>;
}
