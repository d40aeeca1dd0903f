use std::fmt;

use crate::shared::region::Region;

/// Liveness classification of a single face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Live,
    Spoof,
}

impl Verdict {
    /// `Live` only when the score is strictly above the threshold.
    pub fn classify(score: f64, threshold: f64) -> Self {
        if score > threshold {
            Verdict::Live
        } else {
            Verdict::Spoof
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Live => "Live",
            Verdict::Spoof => "Spoof",
        }
    }

    /// Annotation color in RGB: green for live, red for spoof.
    pub fn color(self) -> [u8; 3] {
        match self {
            Verdict::Live => [0, 255, 0],
            Verdict::Spoof => [255, 0, 0],
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scored face in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceVerdict {
    pub region: Region,
    pub score: f64,
    pub verdict: Verdict,
}

impl FaceVerdict {
    pub fn new(region: Region, score: f64, threshold: f64) -> Self {
        Self {
            region,
            score,
            verdict: Verdict::classify(score, threshold),
        }
    }

    /// Text drawn above the face box, e.g. `Live (Variance: 80.00)`.
    pub fn overlay_text(&self) -> String {
        format!("{} (Variance: {:.2})", self.verdict, self.score)
    }

    /// Text for the result label, e.g. `Detection Result: Live (Variance: 80.00)`.
    pub fn result_text(&self) -> String {
        format!("Detection Result: {}", self.overlay_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::above(80.0, 50.0, Verdict::Live)]
    #[case::below(30.0, 50.0, Verdict::Spoof)]
    #[case::equal_is_spoof(50.0, 50.0, Verdict::Spoof)]
    #[case::just_above(50.0001, 50.0, Verdict::Live)]
    #[case::min_threshold(10.5, 10.0, Verdict::Live)]
    #[case::max_threshold(150.0, 150.0, Verdict::Spoof)]
    #[case::zero_score(0.0, 10.0, Verdict::Spoof)]
    fn test_classify(#[case] score: f64, #[case] threshold: f64, #[case] expected: Verdict) {
        assert_eq!(Verdict::classify(score, threshold), expected);
    }

    #[test]
    fn test_classify_is_strict_across_threshold_range() {
        for t in 10..=150u32 {
            let t = t as f64;
            assert_eq!(Verdict::classify(t, t), Verdict::Spoof);
            assert_eq!(Verdict::classify(t + 0.01, t), Verdict::Live);
        }
    }

    #[test]
    fn test_colors() {
        assert_eq!(Verdict::Live.color(), [0, 255, 0]);
        assert_eq!(Verdict::Spoof.color(), [255, 0, 0]);
    }

    #[test]
    fn test_texts_use_two_decimals() {
        let v = FaceVerdict::new(Region::new(0, 0, 10, 10), 80.0, 50.0);
        assert_eq!(v.overlay_text(), "Live (Variance: 80.00)");
        assert_eq!(v.result_text(), "Detection Result: Live (Variance: 80.00)");

        let v = FaceVerdict::new(Region::new(0, 0, 10, 10), 29.996, 50.0);
        assert_eq!(v.result_text(), "Detection Result: Spoof (Variance: 30.00)");
    }
}
