pub mod detection_delegate;
pub mod session_config;
pub mod session_error;
pub mod session_event;
pub mod session_state;
