pub mod analyze_frame_use_case;
pub mod capture_backend;
pub mod capture_logger;
pub mod capture_loop;
pub mod capture_session;
pub mod infrastructure;
