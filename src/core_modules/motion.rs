// THEORY:
// The `MotionDetector` is the heart of the temporal analysis layer. It compares
// each incoming frame against exactly one previous frame and summarizes where
// and how much the scene changed. That summary, the `MotionSample`, is the only
// thing the gesture layer ever sees; raw frames never travel further than here.
//
// Key architectural principles:
// 1.  **Single-Frame Memory**: The detector owns one previous buffer and nothing
//     else. Differencing against a single frame keeps latency at one tick and
//     makes the output a pure function of two adjacent frames.
// 2.  **Weighted Centroid**: Active pixels vote for the centroid of motion. With
//     too few votes the centroid is statistically meaningless, so the detector
//     reports the grid center instead of amplifying noise.
// 3.  **Mirrored Coordinates**: The camera faces the user, so active column `x`
//     contributes as `W - 1 - x`. The reported centroid then moves the way the
//     user's reflection would.
// 4.  **Never Errors**: Every call produces a sample. A cold start with no
//     previous frame yields the still sample rather than an error.

use crate::core_modules::frame::frame::{FRAME_HEIGHT, FRAME_SAMPLES, FRAME_WIDTH, FrameBuffer};
use crate::pipeline::PipelineConfig;

/// The per-tick summary of scene motion.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionSample {
    /// The fraction of grid samples that changed, in [0, 1].
    pub motion_ratio: f64,
    /// The mirrored, normalized center of changed samples, in [0, 1] per axis.
    pub centroid: (f64, f64),
    /// The raw count of changed samples behind the ratio.
    pub active_pixels: usize,
}

impl MotionSample {
    /// The sample reported for a motionless tick.
    pub fn still() -> Self {
        Self {
            motion_ratio: 0.0,
            centroid: (0.5, 0.5),
            active_pixels: 0,
        }
    }
}

/// A stateful frame-differencing analyzer with one frame of memory.
pub struct MotionDetector {
    previous: Option<FrameBuffer>,
}

impl MotionDetector {
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Compares the current frame against the remembered one and replaces the
    /// memory with the current frame.
    pub fn analyze(&mut self, current: &FrameBuffer, config: &PipelineConfig) -> MotionSample {
        let sample = match &self.previous {
            None => MotionSample::still(),
            Some(previous) => Self::compare(previous, current, config),
        };
        self.previous = Some(current.clone());
        sample
    }

    fn compare(previous: &FrameBuffer, current: &FrameBuffer, config: &PipelineConfig) -> MotionSample {
        let mut active_pixels = 0usize;
        let mut sum_x = 0.0f64;
        let mut sum_y = 0.0f64;

        for y in 0..FRAME_HEIGHT {
            for x in 0..FRAME_WIDTH {
                let diff = current.sample(x, y).abs_diff(previous.sample(x, y));
                if diff > config.pixel_diff_threshold {
                    active_pixels += 1;
                    sum_x += (FRAME_WIDTH - 1 - x) as f64;
                    sum_y += y as f64;
                }
            }
        }

        let motion_ratio = active_pixels as f64 / FRAME_SAMPLES as f64;
        let centroid = if active_pixels > config.min_active_pixels {
            (
                sum_x / active_pixels as f64 / FRAME_WIDTH as f64,
                sum_y / active_pixels as f64 / FRAME_HEIGHT as f64,
            )
        } else {
            (0.5, 0.5)
        };

        MotionSample {
            motion_ratio,
            centroid,
            active_pixels,
        }
    }
}

impl Default for MotionDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(samples: &[(u32, u32, u8)]) -> FrameBuffer {
        let mut frame = FrameBuffer::new();
        for &(x, y, value) in samples {
            frame.set_sample(x, y, value);
        }
        frame
    }

    #[test]
    fn first_tick_is_still() {
        let mut detector = MotionDetector::new();
        let sample = detector.analyze(&FrameBuffer::new(), &PipelineConfig::default());
        assert_eq!(sample, MotionSample::still());
    }

    #[test]
    fn motion_ratio_is_deterministic() {
        let config = PipelineConfig::default();
        let base = FrameBuffer::new();
        let moved = frame_with(&[(0, 0, 255), (1, 0, 255), (2, 0, 255)]);

        let mut first = MotionDetector::new();
        first.analyze(&base, &config);
        let a = first.analyze(&moved, &config);

        let mut second = MotionDetector::new();
        second.analyze(&base, &config);
        let b = second.analyze(&moved, &config);

        assert_eq!(a, b);
        assert_eq!(a.active_pixels, 3);
        assert_eq!(a.motion_ratio, 3.0 / FRAME_SAMPLES as f64);
    }

    #[test]
    fn sparse_motion_falls_back_to_center() {
        let config = PipelineConfig::default();
        let mut detector = MotionDetector::new();
        detector.analyze(&FrameBuffer::new(), &config);

        // Exactly at the minimum, still too few votes for a centroid.
        let moved = frame_with(&[(0, 0, 255), (1, 1, 255), (2, 2, 255), (3, 3, 255), (4, 4, 255)]);
        let sample = detector.analyze(&moved, &config);
        assert_eq!(sample.active_pixels, 5);
        assert_eq!(sample.centroid, (0.5, 0.5));
    }

    #[test]
    fn centroid_is_mirrored_horizontally() {
        let config = PipelineConfig::default();
        let mut detector = MotionDetector::new();
        detector.analyze(&FrameBuffer::new(), &config);

        // Six active samples in column 10, rows 0..6.
        let column: Vec<(u32, u32, u8)> = (0..6).map(|y| (10u32, y as u32, 255u8)).collect();
        let sample = detector.analyze(&frame_with(&column), &config);

        assert_eq!(sample.active_pixels, 6);
        let expected_x = (FRAME_WIDTH - 1 - 10) as f64 / FRAME_WIDTH as f64;
        assert!((sample.centroid.0 - expected_x).abs() < 1e-12);
    }

    #[test]
    fn threshold_is_strictly_greater_than() {
        let config = PipelineConfig::default();
        let mut detector = MotionDetector::new();
        detector.analyze(&FrameBuffer::new(), &config);

        let at_threshold = frame_with(&[(7, 7, config.pixel_diff_threshold)]);
        let sample = detector.analyze(&at_threshold, &config);
        assert_eq!(sample.active_pixels, 0);
        assert_eq!(sample.motion_ratio, 0.0);
    }
}
