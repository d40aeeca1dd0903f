use std::path::PathBuf;

use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::capture::infrastructure::nokhwa_camera_source::NokhwaCameraSource;
use crate::detection::domain::detector_params::DetectorParams;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::infrastructure::cascade_face_detector::CascadeFaceDetector;
use crate::pipeline::capture_backend::{CaptureBackend, SendError};
use crate::shared::constants::{CASCADE_MODEL_NAME, CASCADE_MODEL_URL, SYSTEM_CASCADE_DIRS};
use crate::shared::model_resolver;

/// Live webcam capture with the stock frontal-face Haar cascade.
#[derive(Clone, Debug, Default)]
pub struct CameraBackend {
    cascade_path: Option<PathBuf>,
}

impl CameraBackend {
    /// `cascade_path` overrides the cascade lookup when set.
    pub fn new(cascade_path: Option<PathBuf>) -> Self {
        Self { cascade_path }
    }
}

impl CaptureBackend for CameraBackend {
    fn open_source(&self, camera_index: u32) -> Result<Box<dyn FrameSource>, CaptureError> {
        Ok(Box::new(NokhwaCameraSource::open(camera_index)?))
    }

    fn load_detector(&self, params: &DetectorParams) -> Result<Box<dyn FaceDetector>, SendError> {
        let path = resolve_cascade(self.cascade_path.as_ref())?;
        Ok(Box::new(CascadeFaceDetector::from_file(&path, params.clone())?))
    }
}

/// Locates the frontal-face cascade: an explicit path first, then the
/// model cache and system OpenCV installs, downloading as a last resort.
pub fn resolve_cascade(explicit: Option<&PathBuf>) -> Result<PathBuf, SendError> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(format!("cascade file {} does not exist", path.display()).into());
    }
    let search_dirs: Vec<PathBuf> = SYSTEM_CASCADE_DIRS.iter().map(PathBuf::from).collect();
    let path = model_resolver::resolve(CASCADE_MODEL_NAME, CASCADE_MODEL_URL, &search_dirs)?;
    log::info!("Using cascade {}", path.display());
    Ok(path)
}
