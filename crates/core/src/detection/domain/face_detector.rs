use opencv::core::Mat;

use crate::shared::region::Region;

/// Domain interface for face detection on a single-channel intensity
/// image.
///
/// Returned regions are in the image's pixel coordinates, in detector
/// order. Implementations may keep scratch buffers between calls, hence
/// `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, gray: &Mat) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
