use std::path::Path;

use opencv::core::{Mat, Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::detector_params::DetectorParams;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::region::Region;

/// Face detector backed by an OpenCV Haar cascade.
///
/// Runs `detectMultiScale` with the configured scale factor, neighbour
/// count and minimum size; grouping of overlapping windows is OpenCV's.
pub struct CascadeFaceDetector {
    classifier: CascadeClassifier,
    params: DetectorParams,
}

impl CascadeFaceDetector {
    pub fn from_file(
        path: &Path,
        params: DetectorParams,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        params.validate()?;
        let name = path
            .to_str()
            .ok_or_else(|| format!("cascade path is not valid UTF-8: {}", path.display()))?;
        let classifier = CascadeClassifier::new(name)?;
        if classifier.empty()? {
            return Err(format!("could not load cascade {}", path.display()).into());
        }
        log::info!("Loaded cascade {}", path.display());
        Ok(Self { classifier, params })
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&mut self, gray: &Mat) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let min = i32::try_from(self.params.min_size).unwrap_or(i32::MAX);
        let mut faces = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            gray,
            &mut faces,
            self.params.scale_factor,
            self.params.min_neighbors as i32,
            0,
            Size::new(min, min),
            Size::default(),
        )?;
        log::debug!("{} faces detected", faces.len());
        Ok(faces.iter().map(Region::from).collect())
    }
}
