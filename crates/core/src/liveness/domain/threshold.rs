use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub const MIN_THRESHOLD: u32 = 10;
pub const MAX_THRESHOLD: u32 = 150;
pub const DEFAULT_THRESHOLD: u32 = 50;
pub const THRESHOLD_RANGE: RangeInclusive<u32> = MIN_THRESHOLD..=MAX_THRESHOLD;

pub fn clamp_threshold(value: u32) -> u32 {
    value.clamp(MIN_THRESHOLD, MAX_THRESHOLD)
}

/// Variance threshold shared between the UI and the capture worker.
///
/// Written by the UI, read once per processed frame, so a change applies
/// from the next frame on.
#[derive(Clone, Debug)]
pub struct SharedThreshold(Arc<AtomicU32>);

impl SharedThreshold {
    pub fn new(value: u32) -> Self {
        Self(Arc::new(AtomicU32::new(clamp_threshold(value))))
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }

    /// Stores the clamped value and returns what was stored.
    pub fn set(&self, value: u32) -> u32 {
        let clamped = clamp_threshold(value);
        self.0.store(clamped, Ordering::Relaxed);
        clamped
    }
}

impl Default for SharedThreshold {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::below(5, 10)]
    #[case::min(10, 10)]
    #[case::default(50, 50)]
    #[case::max(150, 150)]
    #[case::above(500, 150)]
    fn test_set_clamps(#[case] input: u32, #[case] expected: u32) {
        let threshold = SharedThreshold::default();
        assert_eq!(threshold.set(input), expected);
        assert_eq!(threshold.get(), expected);
    }

    #[test]
    fn test_default_is_fifty() {
        assert_eq!(SharedThreshold::default().get(), 50);
    }

    #[test]
    fn test_clones_share_value() {
        let ui = SharedThreshold::default();
        let worker = ui.clone();
        ui.set(120);
        assert_eq!(worker.get(), 120);
    }
}
