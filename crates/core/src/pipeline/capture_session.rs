use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use thiserror::Error;

use crate::capture::domain::frame_source::CaptureError;
use crate::detection::domain::detector_params::DetectorParams;
use crate::liveness::domain::threshold::SharedThreshold;
use crate::pipeline::analyze_frame_use_case::AnalyzeFrameUseCase;
use crate::pipeline::capture_backend::CaptureBackend;
use crate::pipeline::capture_logger::SummaryCaptureLogger;
use crate::pipeline::capture_loop::{CaptureLoop, FrameUpdate, LoopEnd};
use crate::shared::constants::DEFAULT_CAMERA_INDEX;

/// Frames waiting for the UI. When the slot is full, new frames are
/// dropped rather than queued.
const UPDATE_SLOTS: usize = 1;
const PROGRESS_EVERY_FRAMES: usize = 300;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Open(#[from] CaptureError),
    #[error("capture worker exited before opening the source")]
    WorkerExited,
    #[error("failed to spawn capture worker: {0}")]
    Spawn(#[source] std::io::Error),
}

/// What the next `start()` will open and how it will detect faces.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub camera_index: u32,
    pub detector: DetectorParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            camera_index: DEFAULT_CAMERA_INDEX,
            detector: DetectorParams::default(),
        }
    }
}

struct Worker {
    cancelled: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
    handle: JoinHandle<LoopEnd>,
}

/// Start/stop state machine around one background capture loop.
///
/// `Idle --start--> Running --stop | source ends--> Idle`.
///
/// The frame source is opened, read and dropped on the worker thread.
/// `start()` returns only after the open succeeded or failed, and the
/// worker reports itself inactive only after the source is dropped, so
/// the source is open exactly while [`is_running`](Self::is_running)
/// is true.
pub struct CaptureSession {
    backend: Arc<dyn CaptureBackend>,
    config: SessionConfig,
    threshold: SharedThreshold,
    worker: Option<Worker>,
}

impl CaptureSession {
    pub fn new(backend: Arc<dyn CaptureBackend>, config: SessionConfig, threshold: u32) -> Self {
        Self {
            backend,
            config,
            threshold: SharedThreshold::new(threshold),
            worker: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replaces the configuration used by the next `start()`; a running
    /// capture keeps its current source and detector.
    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
    }

    pub fn threshold(&self) -> u32 {
        self.threshold.get()
    }

    /// Clamps and stores the threshold; a running capture picks it up on
    /// its next frame. Returns the stored value.
    pub fn set_threshold(&self, value: u32) -> u32 {
        self.threshold.set(value)
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|w| w.active.load(Ordering::SeqCst))
    }

    /// Opens the source and launches the capture loop.
    ///
    /// Returns `Ok(None)` without side effects when already running.
    /// On open failure the session stays idle.
    pub fn start(&mut self) -> Result<Option<Receiver<FrameUpdate>>, SessionError> {
        if self.is_running() {
            log::debug!("Start ignored: capture already running");
            return Ok(None);
        }
        self.poll_finished();

        let (update_tx, update_rx) = crossbeam_channel::bounded(UPDATE_SLOTS);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);
        let cancelled = Arc::new(AtomicBool::new(false));
        let active = Arc::new(AtomicBool::new(false));

        let job = WorkerJob {
            backend: self.backend.clone(),
            config: self.config.clone(),
            threshold: self.threshold.clone(),
            cancelled: cancelled.clone(),
            active: active.clone(),
        };
        let handle = thread::Builder::new()
            .name("capture".to_string())
            .spawn(move || job.run(ready_tx, update_tx))
            .map_err(SessionError::Spawn)?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                log::info!("Capture started on camera {}", self.config.camera_index);
                self.worker = Some(Worker {
                    cancelled,
                    active,
                    handle,
                });
                Ok(Some(update_rx))
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                log::warn!("Capture not started: {e}");
                Err(SessionError::Open(e))
            }
            Err(_) => {
                let _ = handle.join();
                Err(SessionError::WorkerExited)
            }
        }
    }

    /// Cancels the loop and waits for the worker to release the source.
    ///
    /// Returns `false` (and does nothing) when no capture was running.
    pub fn stop(&mut self) -> bool {
        let Some(worker) = self.worker.take() else {
            return false;
        };
        let was_running = worker.active.load(Ordering::SeqCst);
        worker.cancelled.store(true, Ordering::SeqCst);
        let end = join_worker(worker);
        if was_running {
            log::info!("Capture stopped ({end:?})");
        }
        was_running
    }

    /// Reaps a worker whose loop ended on its own (source exhausted, read
    /// failure, detector unavailable) and reports why it ended.
    pub fn poll_finished(&mut self) -> Option<LoopEnd> {
        let finished = self
            .worker
            .as_ref()
            .is_some_and(|w| !w.active.load(Ordering::SeqCst));
        if !finished {
            return None;
        }
        let worker = self.worker.take()?;
        Some(join_worker(worker))
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn join_worker(worker: Worker) -> LoopEnd {
    match worker.handle.join() {
        Ok(end) => end,
        Err(_) => {
            log::error!("Capture worker panicked");
            LoopEnd::ReadFailed("capture worker panicked".to_string())
        }
    }
}

/// Marks the worker active for as long as it lives.
struct ActiveGuard(Arc<AtomicBool>);

impl ActiveGuard {
    fn engage(flag: Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

struct WorkerJob {
    backend: Arc<dyn CaptureBackend>,
    config: SessionConfig,
    threshold: SharedThreshold,
    cancelled: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
}

impl WorkerJob {
    fn run(
        self,
        ready: Sender<Result<(), CaptureError>>,
        updates: Sender<FrameUpdate>,
    ) -> LoopEnd {
        let opened = match self.backend.open_source(self.config.camera_index) {
            Ok(source) => source,
            Err(e) => {
                let reason = e.to_string();
                let _ = ready.send(Err(e));
                return LoopEnd::OpenFailed(reason);
            }
        };
        // Declared after the guard so the source is dropped first.
        let _active = ActiveGuard::engage(self.active.clone());
        let mut source = opened;
        let _ = ready.send(Ok(()));

        let detector = match self.backend.load_detector(&self.config.detector) {
            Ok(detector) => detector,
            Err(e) => {
                log::error!("Face detector unavailable: {e}");
                return LoopEnd::DetectorUnavailable(e.to_string());
            }
        };

        let mut capture = CaptureLoop::new(
            AnalyzeFrameUseCase::new(detector),
            self.threshold,
            self.cancelled,
            Box::new(SummaryCaptureLogger::new(PROGRESS_EVERY_FRAMES)),
        );
        let mut dropped = 0usize;
        let end = capture.run(&mut *source, &mut |update| {
            if let Err(TrySendError::Full(_)) = updates.try_send(update) {
                dropped += 1;
            }
        });
        log::info!(
            "Capture loop on {} ended: {end:?} ({dropped} frames skipped by the display)",
            source.describe()
        );
        end
    }
}
