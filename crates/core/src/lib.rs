pub mod annotation;
pub mod capture;
pub mod detection;
pub mod liveness;
pub mod pipeline;
pub mod shared;
