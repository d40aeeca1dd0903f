pub mod constants;
pub mod cv_image;
pub mod frame;
pub mod model_resolver;
pub mod region;
