use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::shared::frame::Frame;

/// A capture device the platform backend reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraDescriptor {
    pub index: u32,
    pub name: String,
}

impl std::fmt::Display for CameraDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.index, self.name)
    }
}

/// Asks the OS for camera permission where it is gated (macOS). Other
/// platforms grant access when the device is opened.
pub fn request_camera_access() {
    #[cfg(target_os = "macos")]
    nokhwa::nokhwa_initialize(|granted| {
        if !granted {
            log::warn!("Camera access was denied");
        }
    });
}

/// Lists the cameras the platform backend can open.
pub fn list_cameras() -> Result<Vec<CameraDescriptor>, CaptureError> {
    let devices = nokhwa::query(ApiBackend::Auto).map_err(|e| CaptureError::Open {
        source_name: "camera list".to_string(),
        reason: e.to_string(),
    })?;
    Ok(devices
        .into_iter()
        .enumerate()
        .map(|(i, info)| CameraDescriptor {
            index: match info.index() {
                CameraIndex::Index(idx) => *idx,
                CameraIndex::String(_) => i as u32,
            },
            name: info.human_name(),
        })
        .collect())
}

/// Webcam frames via the platform's native capture API.
///
/// The stream is opened on construction and stopped on drop. `Camera`
/// is not `Send` on every platform, so the source must be created on the
/// thread that reads from it.
pub struct NokhwaCameraSource {
    camera: Camera,
    camera_index: u32,
    frame_index: usize,
}

impl NokhwaCameraSource {
    pub fn open(camera_index: u32) -> Result<Self, CaptureError> {
        let open_err = |e: nokhwa::NokhwaError| CaptureError::Open {
            source_name: format!("camera {camera_index}"),
            reason: e.to_string(),
        };

        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(camera_index), format).map_err(open_err)?;
        camera.open_stream().map_err(open_err)?;

        let resolution = camera.resolution();
        log::info!(
            "Opened camera {camera_index} ({}) at {}x{}",
            camera.info().human_name(),
            resolution.width(),
            resolution.height()
        );

        Ok(Self {
            camera,
            camera_index,
            frame_index: 0,
        })
    }
}

impl FrameSource for NokhwaCameraSource {
    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| CaptureError::Read(e.to_string()))?;
        let image = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::Decode(e.to_string()))?;

        let (width, height) = (image.width(), image.height());
        let frame = Frame::new(image.into_raw(), width, height, 3, self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn describe(&self) -> String {
        format!("camera {}", self.camera_index)
    }
}

impl Drop for NokhwaCameraSource {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            log::warn!("Failed to stop camera {} cleanly: {e}", self.camera_index);
        }
        log::info!(
            "Released camera {} after {} frames",
            self.camera_index,
            self.frame_index
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_descriptor_display() {
        let camera = CameraDescriptor {
            index: 1,
            name: "USB Camera".to_string(),
        };
        assert_eq!(camera.to_string(), "1: USB Camera");
    }
}
