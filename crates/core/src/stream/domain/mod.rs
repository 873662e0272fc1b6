pub mod stable_detection_stream;
pub mod suggestion_stream;
pub mod throttle;
