use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::detection::domain::detector_params::DetectorParams;
use crate::detection::domain::face_detector::FaceDetector;

/// Error type for work that crosses the capture-thread boundary.
pub type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Factory for the resources a capture session needs.
///
/// Both methods are called on the capture thread, so the returned source
/// and detector never need to move between threads.
pub trait CaptureBackend: Send + Sync {
    fn open_source(&self, camera_index: u32) -> Result<Box<dyn FrameSource>, CaptureError>;

    fn load_detector(&self, params: &DetectorParams) -> Result<Box<dyn FaceDetector>, SendError>;
}
