use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::capture::domain::frame_source::FrameSource;
use crate::liveness::domain::threshold::SharedThreshold;
use crate::pipeline::analyze_frame_use_case::{AnalyzeFrameUseCase, FrameReport};
use crate::pipeline::capture_logger::CaptureLogger;
use crate::shared::frame::Frame;

/// An annotated frame and its verdicts, ready for display.
#[derive(Clone, Debug)]
pub struct FrameUpdate {
    pub frame: Frame,
    pub report: FrameReport,
}

impl FrameUpdate {
    pub fn result_text(&self) -> String {
        self.report.result_text()
    }
}

/// Why a capture loop stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoopEnd {
    /// Cancellation was requested.
    Cancelled,
    /// The source has no more frames.
    Exhausted,
    /// A frame could not be read; treated as a normal end of capture.
    ReadFailed(String),
    /// The source could not be opened, so the loop never ran.
    OpenFailed(String),
    /// The face detector could not be prepared, so no frame was read.
    DetectorUnavailable(String),
}

/// Read → analyze → publish, until cancelled or the source ends.
///
/// Cancellation is checked before each read and again after it, so a
/// stop request waits for at most one read plus one analysis.
pub struct CaptureLoop {
    analyzer: AnalyzeFrameUseCase,
    threshold: SharedThreshold,
    cancelled: Arc<AtomicBool>,
    logger: Box<dyn CaptureLogger>,
}

impl CaptureLoop {
    pub fn new(
        analyzer: AnalyzeFrameUseCase,
        threshold: SharedThreshold,
        cancelled: Arc<AtomicBool>,
        logger: Box<dyn CaptureLogger>,
    ) -> Self {
        Self {
            analyzer,
            threshold,
            cancelled,
            logger,
        }
    }

    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        publish: &mut dyn FnMut(FrameUpdate),
    ) -> LoopEnd {
        let end = self.run_inner(source, publish);
        self.logger.summary();
        end
    }

    fn run_inner(
        &mut self,
        source: &mut dyn FrameSource,
        publish: &mut dyn FnMut(FrameUpdate),
    ) -> LoopEnd {
        loop {
            if self.is_cancelled() {
                return LoopEnd::Cancelled;
            }

            let t0 = Instant::now();
            let mut frame = match source.read_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => return LoopEnd::Exhausted,
                Err(e) => {
                    log::warn!("Frame read from {} failed: {e}", source.describe());
                    return LoopEnd::ReadFailed(e.to_string());
                }
            };
            self.logger.timing("read", elapsed_ms(t0));

            if self.is_cancelled() {
                return LoopEnd::Cancelled;
            }

            // Sampled once so every face in the frame sees the same value.
            let threshold = self.threshold.get() as f64;
            let t0 = Instant::now();
            let report = match self.analyzer.execute(&mut frame, threshold) {
                Ok(report) => report,
                Err(e) => {
                    log::warn!("Face analysis failed on frame {}: {e}", frame.index());
                    FrameReport::default()
                }
            };
            self.logger.timing("analyze", elapsed_ms(t0));
            self.logger.metric("faces", report.faces.len() as f64);
            self.logger.frame_processed(frame.index());

            publish(FrameUpdate { frame, report });
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
