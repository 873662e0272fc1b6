use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("photo {0} not found")]
    NotFound(Uuid),

    #[error("photo store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid photo metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(String),
}
