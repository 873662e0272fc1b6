use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for one stored photo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: Uuid,
    pub creation_date: DateTime<Utc>,
    pub modification_date: DateTime<Utc>,
    /// Location of the PNG image.
    pub file_path: PathBuf,
}

impl PhotoRecord {
    pub fn new(id: Uuid, file_path: PathBuf, now: DateTime<Utc>) -> Self {
        Self {
            id,
            creation_date: now,
            modification_date: now,
            file_path,
        }
    }
}
