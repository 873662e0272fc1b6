pub mod capture_session;
pub mod domain;
pub mod session_logger;
pub mod smile_detector;
