use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::capture::domain::capture_device::{
    highest_resolution_420, CaptureDevice, CaptureFormat, CapturedFrame,
};
use crate::session::domain::detection_delegate::DetectionDelegate;
use crate::session::domain::session_config::SessionConfig;
use crate::session::domain::session_error::SessionError;
use crate::session::domain::session_event::{SessionEvent, SessionOutcome};
use crate::session::domain::session_state::SessionState;
use crate::session::session_logger::SessionLogger;
use crate::stream::detection_result_stream::{DetectionResultStream, StreamUpdate};
use crate::validation::domain::frame_validator::FrameValidator;
use crate::validation::domain::rejection::Rejection;
use crate::validation::domain::validation_outcome::Detection;

type FrameMessage = Result<CapturedFrame, String>;

/// One camera-open-to-camera-close lifecycle.
///
/// Layout: `capture thread → in-order frame queue → processing thread → UI channel`
///
/// The capture thread owns the device. The processing thread owns the
/// validator and the result stream and handles one frame at a time, in
/// arrival order. Everything meant for the user is posted on a single
/// channel drained by the caller with [`CaptureSession::pump`]; exactly one
/// `Finished` event is posted per session, after teardown has begun.
pub struct CaptureSession {
    shared: Arc<SessionShared>,
    events: Receiver<SessionEvent>,
    stop_tx: Mutex<Option<Sender<()>>>,
    workers: Mutex<Option<Workers>>,
    finished_delivered: AtomicBool,
}

struct SessionShared {
    state: Mutex<SessionState>,
    cancelled: AtomicBool,
    finished: AtomicBool,
    frames_dropped: AtomicUsize,
    /// Taken once `Finished` is posted, which disconnects the UI channel.
    ui_tx: Mutex<Option<Sender<SessionEvent>>>,
}

struct Workers {
    capture: JoinHandle<()>,
    processor: JoinHandle<()>,
}

/// Why the processing loop stopped.
enum LoopExit {
    Detected(Detection),
    Stopped,
    SourceEnded,
    DeviceError(String),
}

impl CaptureSession {
    /// Configures the device and, on success, starts capturing.
    ///
    /// A configuration failure does not return an error: the session goes
    /// straight to `Failed`, posts its single `Finished` event and tears
    /// down, so callers handle every ending through the same channel.
    pub fn start(
        mut device: Box<dyn CaptureDevice>,
        validator: Box<dyn FrameValidator>,
        mut logger: Box<dyn SessionLogger>,
        config: &SessionConfig,
    ) -> Self {
        let (ui_tx, events) = crossbeam_channel::unbounded();
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let shared = Arc::new(SessionShared::new(ui_tx));

        shared.transition(SessionState::Configuring);
        let format = match configure(device.as_mut(), config) {
            Ok(format) => format,
            Err(e) => {
                log::error!("{e}");
                shared.transition(SessionState::Failed);
                shared.cancelled.store(true, Ordering::Relaxed);
                device.close();
                shared.transition(SessionState::TornDown);
                shared.notify_finished(SessionOutcome::Failed(e));
                return Self {
                    shared,
                    events,
                    stop_tx: Mutex::new(None),
                    workers: Mutex::new(None),
                    finished_delivered: AtomicBool::new(false),
                };
            }
        };
        logger.info(&format!(
            "Capturing {}x{} {:?} frames",
            format.width, format.height, format.pixel_format
        ));
        shared.transition(SessionState::Running);

        let (frame_tx, frame_rx) =
            crossbeam_channel::bounded::<FrameMessage>(config.frame_queue_capacity.max(1));
        let capture = spawn_capture(device, frame_tx, shared.clone(), config.discard_late_frames);
        let processor = spawn_processor(
            validator,
            logger,
            frame_rx,
            stop_rx,
            shared.clone(),
            config.clone(),
        );

        Self {
            shared,
            events,
            stop_tx: Mutex::new(Some(stop_tx)),
            workers: Mutex::new(Some(Workers { capture, processor })),
            finished_delivered: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    /// Raw access to the UI channel.
    pub fn events(&self) -> &Receiver<SessionEvent> {
        &self.events
    }

    /// Delivers every queued event to `delegate` without blocking.
    /// Returns `true` if the `Finished` event was among them.
    pub fn pump(&self, delegate: &mut dyn DetectionDelegate) -> bool {
        let mut finished = false;
        for event in self.events.try_iter() {
            finished |= self.dispatch(event, delegate);
        }
        finished
    }

    /// Delivers events as they arrive until `Finished` has been delivered
    /// (returns `true`) or `timeout` elapses (returns `false`).
    ///
    /// Returns `true` at once if an earlier pump already delivered
    /// `Finished`.
    pub fn pump_until_finished(
        &self,
        delegate: &mut dyn DetectionDelegate,
        timeout: Option<Duration>,
    ) -> bool {
        if self.finished_delivered.load(Ordering::SeqCst) {
            return true;
        }
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            let event = match deadline {
                Some(deadline) => self.events.recv_deadline(deadline).ok(),
                None => self.events.recv().ok(),
            };
            match event {
                Some(event) => {
                    if self.dispatch(event, delegate) {
                        return true;
                    }
                }
                // Disconnected: `Finished` was already taken off the channel.
                None => return self.finished_delivered.load(Ordering::SeqCst),
            }
        }
    }

    fn dispatch(&self, event: SessionEvent, delegate: &mut dyn DetectionDelegate) -> bool {
        match event {
            SessionEvent::Suggestion(text) => {
                delegate.suggestion_changed(text.as_deref());
                false
            }
            SessionEvent::Finished(outcome) => {
                self.finished_delivered.store(true, Ordering::SeqCst);
                delegate.detection_finished(outcome);
                true
            }
        }
    }

    /// Closes the session. See [`close_with`](Self::close_with).
    pub fn close(&self) {
        self.close_with(None);
    }

    /// Stops capture, waits for both worker threads and then runs
    /// `completion`.
    ///
    /// Safe to call from any thread and any number of times. A running
    /// session ends as `Closed`; a session that already ended keeps its
    /// outcome and no further event is posted.
    pub fn close_with(&self, completion: Option<Box<dyn FnOnce() + Send>>) {
        if self.shared.transition(SessionState::Closed) {
            log::info!("Capture session closed by the user");
        }
        self.shared.cancelled.store(true, Ordering::Relaxed);
        drop(lock(&self.stop_tx).take());

        let workers = lock(&self.workers).take();
        if let Some(workers) = workers {
            if !workers.join() {
                // The processing thread died before posting an outcome.
                self.shared.transition(SessionState::TornDown);
                self.shared.notify_finished(SessionOutcome::Failed(SessionError::Device(
                    "session processing thread panicked".into(),
                )));
            }
        }

        if let Some(completion) = completion {
            completion();
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl SessionShared {
    fn new(ui_tx: Sender<SessionEvent>) -> Self {
        Self {
            state: Mutex::new(SessionState::Idle),
            cancelled: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            frames_dropped: AtomicUsize::new(0),
            ui_tx: Mutex::new(Some(ui_tx)),
        }
    }

    fn state(&self) -> SessionState {
        *lock(&self.state)
    }

    /// Moves to `next` if the state machine allows it.
    fn transition(&self, next: SessionState) -> bool {
        let mut state = lock(&self.state);
        if !state.can_transition_to(next) {
            return false;
        }
        log::info!("Capture session: {} -> {next}", *state);
        *state = next;
        true
    }

    /// Posts the session outcome. Only the first call has an effect.
    fn notify_finished(&self, outcome: SessionOutcome) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(ui_tx) = lock(&self.ui_tx).take() {
            let _ = ui_tx.send(SessionEvent::Finished(outcome));
        }
    }

    fn post_suggestion(&self, text: Option<String>) {
        if let Some(ui_tx) = lock(&self.ui_tx).as_ref() {
            let _ = ui_tx.send(SessionEvent::Suggestion(text));
        }
    }
}

impl Workers {
    /// Joins both threads; returns `false` if the processing thread panicked.
    fn join(self) -> bool {
        let current = std::thread::current().id();
        let mut processor_ok = true;
        if self.processor.thread().id() != current && self.processor.join().is_err() {
            log::error!("Session processing thread panicked");
            processor_ok = false;
        }
        if self.capture.thread().id() != current && self.capture.join().is_err() {
            log::error!("Capture thread panicked");
        }
        processor_ok
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Checks the camera position and activates the largest 4:2:0 format.
fn configure(
    device: &mut dyn CaptureDevice,
    config: &SessionConfig,
) -> Result<CaptureFormat, SessionError> {
    if device.position() != config.camera_position {
        return Err(SessionError::DeviceConfigurationFailed(format!(
            "no {:?} camera available",
            config.camera_position
        )));
    }
    let format = highest_resolution_420(&device.supported_formats()).ok_or_else(|| {
        SessionError::DeviceConfigurationFailed("camera offers no 4:2:0 format".into())
    })?;
    device
        .activate(format)
        .map_err(|e| SessionError::DeviceConfigurationFailed(e.to_string()))?;
    Ok(format)
}

fn spawn_capture(
    mut device: Box<dyn CaptureDevice>,
    frame_tx: Sender<FrameMessage>,
    shared: Arc<SessionShared>,
    discard_late_frames: bool,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for item in device.frames() {
            if shared.cancelled.load(Ordering::Relaxed) {
                break;
            }
            let message = item.map_err(|e| e.to_string());
            let is_error = message.is_err();

            if discard_late_frames && !is_error {
                match frame_tx.try_send(message) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        shared.frames_dropped.fetch_add(1, Ordering::Relaxed);
                        log::debug!("Dropped a late frame");
                    }
                    Err(TrySendError::Disconnected(_)) => break,
                }
            } else if frame_tx.send(message).is_err() {
                break;
            }

            if is_error {
                break;
            }
        }
        device.close();
    })
}

fn spawn_processor(
    mut validator: Box<dyn FrameValidator>,
    mut logger: Box<dyn SessionLogger>,
    frame_rx: Receiver<FrameMessage>,
    stop_rx: Receiver<()>,
    shared: Arc<SessionShared>,
    config: SessionConfig,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut stream = DetectionResultStream::new(
            config.stable_skip_count,
            config.stable_interval(),
            config.suggestion_interval(),
        );

        let exit = run_loop(
            validator.as_mut(),
            logger.as_mut(),
            &mut stream,
            &frame_rx,
            &stop_rx,
            &shared,
        );

        let (next, outcome) = match exit {
            LoopExit::Detected(detection) => {
                (SessionState::Accepted, SessionOutcome::Detected(detection))
            }
            LoopExit::Stopped | LoopExit::SourceEnded => {
                (SessionState::Closed, SessionOutcome::Closed)
            }
            LoopExit::DeviceError(e) => {
                log::error!("Camera error: {e}");
                (
                    SessionState::Failed,
                    SessionOutcome::Failed(SessionError::Device(e)),
                )
            }
        };
        // A concurrent close wins over whatever the loop saw.
        let outcome = if shared.transition(next) {
            outcome
        } else {
            SessionOutcome::Closed
        };

        shared.cancelled.store(true, Ordering::Relaxed);
        drop(frame_rx);
        for update in stream.close() {
            if update == StreamUpdate::Completed && outcome.detection().is_none() {
                log::debug!("Result stream completed without a detection");
            }
        }

        logger.metric(
            "frames_dropped",
            shared.frames_dropped.load(Ordering::Relaxed) as f64,
        );
        logger.summary();

        shared.transition(SessionState::TornDown);
        shared.notify_finished(outcome);
    })
}

fn run_loop(
    validator: &mut dyn FrameValidator,
    logger: &mut dyn SessionLogger,
    stream: &mut DetectionResultStream,
    frame_rx: &Receiver<FrameMessage>,
    stop_rx: &Receiver<()>,
    shared: &SessionShared,
) -> LoopExit {
    loop {
        let timer = match stream.next_deadline() {
            Some(deadline) => crossbeam_channel::at(deadline),
            None => crossbeam_channel::never(),
        };

        let updates = crossbeam_channel::select! {
            recv(stop_rx) -> _ => return LoopExit::Stopped,
            recv(frame_rx) -> message => match message {
                Ok(Ok(captured)) => validate_frame(validator, logger, stream, captured),
                Ok(Err(e)) => return LoopExit::DeviceError(e),
                Err(_) => return LoopExit::SourceEnded,
            },
            recv(timer) -> _ => stream.tick(Instant::now()),
        };

        for update in updates {
            match update {
                StreamUpdate::Suggestion(text) => {
                    shared.post_suggestion(text);
                }
                StreamUpdate::Detected(detection) => return LoopExit::Detected(detection),
                StreamUpdate::Completed => return LoopExit::SourceEnded,
            }
        }
    }
}

fn validate_frame(
    validator: &mut dyn FrameValidator,
    logger: &mut dyn SessionLogger,
    stream: &mut DetectionResultStream,
    captured: CapturedFrame,
) -> Vec<StreamUpdate> {
    let started = Instant::now();
    let result = validator.validate(&captured.frame, captured.orientation);
    logger.timing("validate", started.elapsed().as_secs_f64() * 1000.0);

    let now = Instant::now();
    match result {
        Ok(outcome) => {
            logger.outcome(outcome.rejection().map_or("accepted", Rejection::key));
            stream.push_outcome(outcome, now)
        }
        Err(e) => {
            log::warn!("Frame {} could not be validated: {e}", captured.frame.index());
            logger.outcome("validation_error");
            stream.push_failure(e.to_string(), now)
        }
    }
}
