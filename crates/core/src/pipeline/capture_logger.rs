use std::collections::HashMap;
use std::time::Instant;

/// Observer for capture-loop events.
///
/// Keeps the loop free of any particular output mechanism. Tests discard
/// these events; capture sessions turn them into a run summary.
pub trait CaptureLogger: Send {
    /// Called once per processed frame.
    fn frame_processed(&mut self, index: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. faces per frame).
    fn metric(&mut self, name: &str, value: f64);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullCaptureLogger;

impl CaptureLogger for NullCaptureLogger {
    fn frame_processed(&mut self, _index: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
}

/// Running count, sum and maximum of one named series.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SeriesStats {
    count: usize,
    total: f64,
    max: f64,
}

impl SeriesStats {
    fn new() -> Self {
        Self {
            count: 0,
            total: 0.0,
            max: f64::NEG_INFINITY,
        }
    }

    fn record(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
        self.max = self.max.max(value);
    }

    fn mean(&self) -> f64 {
        self.total / self.count.max(1) as f64
    }
}

/// Aggregates per-stage timings and metrics and reports them through the
/// `log` crate.
///
/// Only running aggregates are kept, so memory stays flat however long
/// the capture runs. Progress lines are throttled to every
/// `throttle_frames` frames.
pub struct SummaryCaptureLogger {
    throttle_frames: usize,
    timings: HashMap<String, SeriesStats>,
    metrics: HashMap<String, SeriesStats>,
    start_time: Instant,
    frames: usize,
}

impl SummaryCaptureLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Capture summary ({} frames, {:.1}s total):",
            self.frames,
            elapsed_ms / 1000.0
        )];

        for (stage, stats) in sorted(&self.timings) {
            lines.push(format!(
                "  {stage:10}: avg {:6.1}ms  total {:7.0}ms",
                stats.mean(),
                stats.total
            ));
        }

        for (name, stats) in sorted(&self.metrics) {
            lines.push(format!(
                "  {name}: avg {:.1}, max {:.0}",
                stats.mean(),
                stats.max
            ));
        }

        if self.frames > 0 && elapsed_ms > 0.0 {
            let fps = self.frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }
}

fn sorted(series: &HashMap<String, SeriesStats>) -> Vec<(&str, &SeriesStats)> {
    let mut entries: Vec<_> = series.iter().map(|(k, v)| (k.as_str(), v)).collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

/// Records into the series for `key`, allocating the key only on first use.
fn record(series: &mut HashMap<String, SeriesStats>, key: &str, value: f64) {
    match series.get_mut(key) {
        Some(stats) => stats.record(value),
        None => {
            let mut stats = SeriesStats::new();
            stats.record(value);
            series.insert(key.to_string(), stats);
        }
    }
}

impl Default for SummaryCaptureLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl CaptureLogger for SummaryCaptureLogger {
    fn frame_processed(&mut self, index: usize) {
        self.frames += 1;
        if self.frames % self.throttle_frames == 0 {
            log::info!("Processed {} frames (last index {index})", self.frames);
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        record(&mut self.timings, stage, duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        record(&mut self.metrics, name, value);
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_accepts_everything() {
        let mut logger = NullCaptureLogger;
        logger.frame_processed(0);
        logger.timing("detect", 5.0);
        logger.metric("faces", 1.0);
        logger.summary();
    }

    #[test]
    fn test_timing_keeps_running_aggregates() {
        let mut logger = SummaryCaptureLogger::new(10);
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("read", 5.0);

        let detect = logger.timings["detect"];
        assert_eq!(detect.count, 2);
        assert_relative_eq!(detect.total, 50.0);
        assert_relative_eq!(detect.max, 30.0);
        assert_eq!(logger.timings["read"].count, 1);
        assert!(!logger.timings.contains_key("missing"));
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = SummaryCaptureLogger::new(10);
        logger.frame_processed(0);
        logger.frame_processed(1);
        logger.timing("detect", 20.0);
        logger.metric("faces", 1.0);
        logger.metric("faces", 3.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Capture summary (2 frames"));
        assert!(summary.contains("detect"));
        assert!(summary.contains("faces: avg 2.0, max 3"));
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_metric_average() {
        let mut logger = SummaryCaptureLogger::new(10);
        logger.metric("faces", 2.0);
        logger.metric("faces", 5.0);
        assert_relative_eq!(logger.metrics["faces"].mean(), 3.5);
    }

    #[test]
    fn test_long_run_keeps_one_entry_per_series() {
        // An hour of 30 fps capture.
        let mut logger = SummaryCaptureLogger::new(300);
        for i in 0..108_000 {
            logger.timing("read", 1.0);
            logger.timing("analyze", 2.0);
            logger.metric("faces", (i % 3) as f64);
            logger.frame_processed(i);
        }

        assert_eq!(logger.timings.len(), 2);
        assert_eq!(logger.metrics.len(), 1);
        let faces = logger.metrics["faces"];
        assert_eq!(faces.count, 108_000);
        assert_relative_eq!(faces.mean(), 1.0);
        assert_relative_eq!(faces.max, 2.0);
        assert_relative_eq!(logger.timings["analyze"].total, 216_000.0);
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(SummaryCaptureLogger::default().summary_string().is_none());
    }

    #[test]
    fn test_throttle_never_zero() {
        let mut logger = SummaryCaptureLogger::new(0);
        logger.frame_processed(0);
        assert_eq!(logger.frames, 1);
    }
}
