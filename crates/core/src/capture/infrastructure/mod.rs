pub mod ffmpeg_file_source;
pub mod nokhwa_camera_source;
