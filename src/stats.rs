//! Frame statistics shown by debug builds.

/// Length of one sampling window in milliseconds.
pub const SAMPLE_WINDOW_MS: f64 = 1000.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StatsSample {
    pub fps: f64,
    /// Mean frame time over the window.
    pub frame_ms: f64,
}

/// Counts frames and reports a [`StatsSample`] once per window.
#[derive(Debug, Default)]
pub struct FrameStats {
    window_start: Option<f64>,
    frames: u32,
    last: Option<StatsSample>,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a frame at `time_ms`. Returns a fresh sample when the
    /// current window has closed.
    pub fn record(&mut self, time_ms: f64) -> Option<StatsSample> {
        // The first frame only opens the window; frames are counted as the
        // intervals that end inside it.
        let Some(start) = self.window_start else {
            self.window_start = Some(time_ms);
            return None;
        };
        self.frames += 1;
        let elapsed = time_ms - start;
        if elapsed < SAMPLE_WINDOW_MS {
            return None;
        }
        let sample = StatsSample {
            fps: f64::from(self.frames) * 1000.0 / elapsed,
            frame_ms: elapsed / f64::from(self.frames),
        };
        self.window_start = Some(time_ms);
        self.frames = 0;
        self.last = Some(sample);
        Some(sample)
    }

    pub fn last(&self) -> Option<StatsSample> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_window() {
        let mut stats = FrameStats::new();
        let samples: Vec<_> = (0..=120).filter_map(|frame| stats.record(frame as f64 * 12.5)).collect();
        // frames at 0, 12.5, ... 1500ms: one window closes at 1000ms
        assert_eq!(samples.len(), 1);
        assert!((samples[0].fps - 80.0).abs() < 1e-9);
        assert!((samples[0].frame_ms - 12.5).abs() < 1e-9);
        assert_eq!(stats.last(), Some(samples[0]));
    }

    #[test]
    fn every_window_counts_the_same_cadence() {
        let mut stats = FrameStats::new();
        let samples: Vec<_> = (0..=400).filter_map(|frame| stats.record(frame as f64 * 10.0)).collect();
        assert_eq!(samples.len(), 4);
        for sample in samples {
            assert!((sample.fps - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn no_sample_before_first_window() {
        let mut stats = FrameStats::new();
        assert_eq!(stats.record(5000.0), None);
        assert_eq!(stats.record(5999.0), None);
        assert!(stats.record(6000.0).is_some());
    }
}
