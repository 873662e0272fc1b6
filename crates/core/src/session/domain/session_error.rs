use thiserror::Error;

/// Session-level failures. Each one is reported once and ends the session,
/// except `AlreadyActive`, which only refuses a second start.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a capture session is already active")]
    AlreadyActive,

    #[error("failed to configure the camera: {0}")]
    DeviceConfigurationFailed(String),

    #[error("camera stopped unexpectedly: {0}")]
    Device(String),
}
