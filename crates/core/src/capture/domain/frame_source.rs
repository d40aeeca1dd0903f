use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to open {source_name}: {reason}")]
    Open { source_name: String, reason: String },
    #[error("failed to read frame: {0}")]
    Read(String),
    #[error("failed to decode frame: {0}")]
    Decode(String),
}

/// A stream of frames from a camera or a recorded file.
///
/// The underlying device or file handle is held for the lifetime of the
/// value and released on drop, so dropping a source is the only way to
/// release it and can only happen once.
pub trait FrameSource {
    /// Reads the next frame. `Ok(None)` means the source is exhausted.
    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError>;

    /// Human-readable name for logs.
    fn describe(&self) -> String;
}
