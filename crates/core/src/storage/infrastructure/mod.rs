pub mod file_photo_repository;
pub mod image_file_writer;
