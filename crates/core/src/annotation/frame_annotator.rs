use opencv::core::{Mat, Point, Scalar};
use opencv::imgproc;

use crate::liveness::domain::verdict::FaceVerdict;

const BOX_THICKNESS: i32 = 2;
/// Gap between the label's baseline and the top of the face box.
const LABEL_GAP: i32 = 10;
const FONT_SCALE: f64 = 0.5;

/// Burns face boxes and verdict labels into an RGB matrix.
///
/// Drawing is clipped by OpenCV; a face partly outside the picture is
/// still outlined where visible.
pub struct FrameAnnotator {
    thickness: i32,
    label_gap: i32,
    font_scale: f64,
}

impl Default for FrameAnnotator {
    fn default() -> Self {
        Self {
            thickness: BOX_THICKNESS,
            label_gap: LABEL_GAP,
            font_scale: FONT_SCALE,
        }
    }
}

impl FrameAnnotator {
    pub fn annotate(&self, canvas: &mut Mat, face: &FaceVerdict) -> opencv::Result<()> {
        let [r, g, b] = face.verdict.color();
        let color = Scalar::new(r as f64, g as f64, b as f64, 0.0);
        imgproc::rectangle(
            canvas,
            face.region.to_rect(),
            color,
            self.thickness,
            imgproc::LINE_8,
            0,
        )?;
        imgproc::put_text(
            canvas,
            &face.overlay_text(),
            Point::new(face.region.x, face.region.y - self.label_gap),
            imgproc::FONT_HERSHEY_SIMPLEX,
            self.font_scale,
            color,
            self.thickness,
            imgproc::LINE_8,
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::cv_image::{copy_into_frame, frame_to_mat};
    use crate::shared::frame::Frame;
    use crate::shared::region::Region;

    const GRAY: [u8; 3] = [128, 128, 128];
    const GREEN: [u8; 3] = [0, 255, 0];

    fn face(x: i32, y: i32, w: i32, h: i32, score: f64) -> FaceVerdict {
        FaceVerdict::new(Region::new(x, y, w, h), score, 50.0)
    }

    fn annotated(width: u32, height: u32, face: &FaceVerdict) -> Frame {
        let mut frame = Frame::filled(width, height, GRAY, 0);
        let mut canvas = frame_to_mat(&frame).unwrap();
        FrameAnnotator::default().annotate(&mut canvas, face).unwrap();
        copy_into_frame(&canvas, &mut frame).unwrap();
        frame
    }

    fn count_color(
        frame: &Frame,
        color: [u8; 3],
        cols: std::ops::Range<u32>,
        rows: std::ops::Range<u32>,
    ) -> usize {
        rows.flat_map(|y| cols.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| frame.pixel(x, y) == Some(color))
            .count()
    }

    #[test]
    fn test_live_face_gets_green_outline() {
        let frame = annotated(100, 100, &face(30, 40, 40, 40, 80.0));

        assert_eq!(frame.pixel(30, 40), Some(GREEN));
        assert_eq!(frame.pixel(69, 79), Some(GREEN));
        assert_eq!(frame.pixel(50, 60), Some(GRAY));
        assert_eq!(frame.pixel(20, 60), Some(GRAY));
    }

    #[test]
    fn test_spoof_face_is_red() {
        let frame = annotated(100, 100, &face(30, 40, 40, 40, 30.0));
        assert_eq!(frame.pixel(30, 40), Some([255, 0, 0]));
    }

    #[test]
    fn test_label_sits_above_box() {
        let frame = annotated(300, 100, &face(10, 40, 40, 40, 80.0));

        // Baseline at y = 30; glyphs rise above it.
        assert!(count_color(&frame, GREEN, 0..300, 10..36) > 0);
        // Box interior stays clear.
        assert_eq!(count_color(&frame, GREEN, 14..46, 44..76), 0);
    }

    #[test]
    fn test_drawing_clips_at_frame_edges() {
        let frame = annotated(20, 20, &face(-5, 2, 40, 40, 80.0));
        assert_eq!(frame.data().len(), 20 * 20 * 3);
        assert_eq!(frame.pixel(0, 2), Some(GREEN));
        assert_eq!(frame.pixel(10, 12), Some(GRAY));
    }
}
