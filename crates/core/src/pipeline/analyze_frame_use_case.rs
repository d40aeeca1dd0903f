use opencv::core::Mat;
use opencv::prelude::*;

use crate::annotation::frame_annotator::FrameAnnotator;
use crate::detection::domain::face_detector::FaceDetector;
use crate::liveness::domain::laplacian::laplacian_variance;
use crate::liveness::domain::verdict::FaceVerdict;
use crate::shared::constants::WAITING_TEXT;
use crate::shared::cv_image::{copy_into_frame, frame_to_mat, to_gray};
use crate::shared::frame::Frame;

/// Per-frame outcome: every scored face, in detector order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub faces: Vec<FaceVerdict>,
}

impl FrameReport {
    /// The result label text. With several faces the last one wins; with
    /// none it is exactly `Waiting...`.
    pub fn result_text(&self) -> String {
        self.faces
            .last()
            .map(FaceVerdict::result_text)
            .unwrap_or_else(|| WAITING_TEXT.to_string())
    }
}

/// Single-frame liveness pass: gray → detect → score → annotate.
pub struct AnalyzeFrameUseCase {
    detector: Box<dyn FaceDetector>,
    annotator: FrameAnnotator,
}

impl AnalyzeFrameUseCase {
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self {
            detector,
            annotator: FrameAnnotator::default(),
        }
    }

    /// Scores every detected face against `threshold` and burns boxes and
    /// labels into `frame`.
    ///
    /// Scores are taken from the gray image converted before any drawing,
    /// so overlapping faces never see each other's annotations.
    pub fn execute(
        &mut self,
        frame: &mut Frame,
        threshold: f64,
    ) -> Result<FrameReport, Box<dyn std::error::Error>> {
        let mut canvas = frame_to_mat(frame)?;
        let gray = to_gray(&canvas)?;
        let regions = self.detector.detect(&gray)?;

        let mut faces = Vec::with_capacity(regions.len());
        for region in regions {
            let Some(roi) = region.clamp_to(gray.cols() as u32, gray.rows() as u32) else {
                continue;
            };
            let patch = Mat::roi(&gray, roi.to_rect())?.try_clone()?;
            let face = FaceVerdict::new(roi, laplacian_variance(&patch)?, threshold);
            self.annotator.annotate(&mut canvas, &face)?;
            faces.push(face);
        }

        if !faces.is_empty() {
            copy_into_frame(&canvas, frame)?;
        }
        Ok(FrameReport { faces })
    }
}
