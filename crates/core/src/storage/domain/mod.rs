pub mod image_writer;
pub mod photo_record;
pub mod photo_repository;
pub mod storage_error;
