use thiserror::Error;

use crate::shared::constants::{DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR};

#[derive(Error, Debug, PartialEq)]
pub enum DetectorParamsError {
    #[error("scale factor must be greater than 1.0, got {0}")]
    ScaleFactor(f64),
}

/// Tuning for the multi-scale cascade search.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorParams {
    /// Pyramid step between scales.
    pub scale_factor: f64,
    /// Minimum overlapping candidates a face needs to be reported.
    /// Zero disables grouping.
    pub min_neighbors: u32,
    /// Smallest face side in pixels; 0 means the cascade window size.
    pub min_size: u32,
}

impl DetectorParams {
    pub fn validate(&self) -> Result<(), DetectorParamsError> {
        if self.scale_factor.is_nan() || self.scale_factor <= 1.0 {
            return Err(DetectorParamsError::ScaleFactor(self.scale_factor));
        }
        Ok(())
    }
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_size: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let params = DetectorParams::default();
        assert_eq!(params.scale_factor, 1.3);
        assert_eq!(params.min_neighbors, 5);
        assert_eq!(params.min_size, 0);
        assert!(params.validate().is_ok());
    }

    #[rstest]
    #[case::one(1.0)]
    #[case::below_one(0.8)]
    #[case::nan(f64::NAN)]
    fn test_validate_rejects_non_growing_scale(#[case] scale_factor: f64) {
        let params = DetectorParams {
            scale_factor,
            ..DetectorParams::default()
        };
        assert!(params.validate().is_err());
    }
}
