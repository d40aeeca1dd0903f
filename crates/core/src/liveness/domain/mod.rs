pub mod laplacian;
pub mod threshold;
pub mod verdict;
