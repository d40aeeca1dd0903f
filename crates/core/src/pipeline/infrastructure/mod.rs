pub mod camera_backend;
