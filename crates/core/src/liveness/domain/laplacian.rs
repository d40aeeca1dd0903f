use opencv::core::{self, Mat, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

/// Variance of the 4-neighbour Laplacian response of a gray patch.
///
/// Aperture 1 (`[0 1 0; 1 -4 1; 0 1 0]`) with the default reflect-101
/// border, in `f64`. Sharp, textured patches score high; flat or blurred
/// patches score near zero. An empty patch scores 0.
///
/// Pass an owned patch, not a view into a larger image: border pixels
/// of a view would read its neighbours.
pub fn laplacian_variance(patch: &Mat) -> opencv::Result<f64> {
    if patch.empty() {
        return Ok(0.0);
    }
    let mut response = Mat::default();
    imgproc::laplacian(
        patch,
        &mut response,
        core::CV_64F,
        1,
        1.0,
        0.0,
        core::BORDER_DEFAULT,
    )?;

    let mut mean = Scalar::default();
    let mut stddev = Scalar::default();
    core::mean_std_dev(&response, &mut mean, &mut stddev, &Mat::default())?;
    Ok(stddev[0] * stddev[0])
}
