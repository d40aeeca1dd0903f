//! Bridges between owned [`Frame`] buffers and OpenCV matrices.

use opencv::core::{self, Mat, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

use crate::shared::frame::Frame;

/// Copies a frame into a new 8-bit matrix with the same channel layout.
pub fn frame_to_mat(frame: &Frame) -> opencv::Result<Mat> {
    let typ = match frame.channels() {
        1 => core::CV_8UC1,
        3 => core::CV_8UC3,
        4 => core::CV_8UC4,
        n => {
            return Err(opencv::Error::new(
                core::StsBadArg,
                format!("unsupported channel count {n}"),
            ))
        }
    };
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        typ,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(frame.data());
    Ok(mat)
}

/// Writes `mat` back over the frame's pixels. The matrix must have the
/// frame's dimensions and channel count.
pub fn copy_into_frame(mat: &Mat, frame: &mut Frame) -> opencv::Result<()> {
    let bytes = mat.data_bytes()?;
    if bytes.len() != frame.data().len() {
        return Err(opencv::Error::new(
            core::StsUnmatchedSizes,
            format!(
                "matrix holds {} bytes, frame holds {}",
                bytes.len(),
                frame.data().len()
            ),
        ));
    }
    frame.data_mut().copy_from_slice(bytes);
    Ok(())
}

/// Single-channel intensity image of an RGB(A) or gray matrix.
pub fn to_gray(image: &Mat) -> opencv::Result<Mat> {
    let code = match image.channels() {
        1 => return image.try_clone(),
        3 => imgproc::COLOR_RGB2GRAY,
        4 => imgproc::COLOR_RGBA2GRAY,
        n => {
            return Err(opencv::Error::new(
                core::StsBadArg,
                format!("unsupported channel count {n}"),
            ))
        }
    };
    let mut gray = Mat::default();
    imgproc::cvt_color_def(image, &mut gray, code)?;
    Ok(gray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn gray_of(rgb: [u8; 3]) -> u8 {
        let frame = Frame::new(rgb.to_vec(), 1, 1, 3, 0);
        let gray = to_gray(&frame_to_mat(&frame).unwrap()).unwrap();
        gray.data_bytes().unwrap()[0]
    }

    #[rstest]
    #[case::black([0, 0, 0], 0)]
    #[case::white([255, 255, 255], 255)]
    #[case::red([255, 0, 0], 76)]
    #[case::green([0, 255, 0], 150)]
    #[case::blue([0, 0, 255], 29)]
    fn test_gray_uses_rgb_channel_order(#[case] rgb: [u8; 3], #[case] expected: u8) {
        assert_eq!(gray_of(rgb), expected);
    }

    #[test]
    fn test_frame_to_mat_keeps_layout() {
        let frame = Frame::new(vec![1, 2, 3, 4, 5, 6], 2, 1, 3, 0);
        let mat = frame_to_mat(&frame).unwrap();
        assert_eq!((mat.cols(), mat.rows(), mat.channels()), (2, 1, 3));
        assert_eq!(mat.data_bytes().unwrap(), frame.data());
    }

    #[test]
    fn test_single_channel_frame_is_already_gray() {
        let frame = Frame::new(vec![1, 2, 3, 4], 2, 2, 1, 0);
        let gray = to_gray(&frame_to_mat(&frame).unwrap()).unwrap();
        assert_eq!(gray.data_bytes().unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_unsupported_channel_count_is_rejected() {
        let frame = Frame::new(vec![0; 4], 2, 1, 2, 0);
        assert!(frame_to_mat(&frame).is_err());
    }

    #[test]
    fn test_copy_into_frame_round_trips_pixels() {
        let source = Frame::filled(3, 2, [9, 8, 7], 0);
        let mat = frame_to_mat(&source).unwrap();
        let mut target = Frame::filled(3, 2, [0, 0, 0], 1);
        copy_into_frame(&mat, &mut target).unwrap();
        assert_eq!(target.data(), source.data());
        assert_eq!(target.index(), 1);
    }

    #[test]
    fn test_copy_into_frame_rejects_size_mismatch() {
        let mat = frame_to_mat(&Frame::filled(3, 2, [0, 0, 0], 0)).unwrap();
        let mut target = Frame::filled(2, 2, [0, 0, 0], 0);
        assert!(copy_into_frame(&mat, &mut target).is_err());
    }
}
