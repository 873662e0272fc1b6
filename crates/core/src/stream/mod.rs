pub mod detection_result_stream;
pub mod domain;
