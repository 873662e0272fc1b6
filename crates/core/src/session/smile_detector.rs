use std::sync::{Arc, Mutex, MutexGuard};

use crate::capture::domain::capture_device::CaptureDevice;
use crate::session::capture_session::CaptureSession;
use crate::session::domain::session_config::SessionConfig;
use crate::session::domain::session_error::SessionError;
use crate::session::session_logger::SessionLogger;
use crate::validation::domain::frame_validator::FrameValidator;

/// Entry point for embedders: starts capture sessions one at a time.
///
/// A started session stays active, even after it has finished and torn
/// down, until [`dismiss_active_session`](Self::dismiss_active_session) is
/// called. Until then any further start is refused.
pub struct SmileDetector {
    config: SessionConfig,
    active: Mutex<Option<Arc<CaptureSession>>>,
}

impl SmileDetector {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            active: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn start(
        &self,
        device: Box<dyn CaptureDevice>,
        validator: Box<dyn FrameValidator>,
        logger: Box<dyn SessionLogger>,
    ) -> Result<Arc<CaptureSession>, SessionError> {
        let mut active = self.lock_active();
        if let Some(session) = active.as_ref() {
            log::error!(
                "Refusing to start a capture session: one is already active ({})",
                session.state()
            );
            return Err(SessionError::AlreadyActive);
        }

        let session = Arc::new(CaptureSession::start(device, validator, logger, &self.config));
        *active = Some(session.clone());
        Ok(session)
    }

    pub fn active_session(&self) -> Option<Arc<CaptureSession>> {
        self.lock_active().clone()
    }

    pub fn has_active_session(&self) -> bool {
        self.lock_active().is_some()
    }

    /// Closes and releases the active session, then runs `completion`.
    /// With no active session the completion runs immediately.
    pub fn dismiss_active_session(&self, completion: Option<Box<dyn FnOnce() + Send>>) {
        // Release the lock before joining the session's threads.
        let session = self.lock_active().take();
        match session {
            Some(session) => session.close_with(completion),
            None => {
                if let Some(completion) = completion {
                    completion();
                }
            }
        }
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<Arc<CaptureSession>>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SmileDetector {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
