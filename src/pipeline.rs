// THEORY:
// The `pipeline` module is the synchronous core of the gesture engine. It
// composes the sampler, the motion detector and the gesture state machine into
// a single per-tick operation: give it a video source, get back one hand
// reading. It owns no clock and no channels; the controller supplies those.
//
// Key architectural principles:
// 1.  **One Tick, One Reading**: `process_tick` either produces exactly one
//     `HandData` or, when the source has nothing to offer, nothing at all.
//     There is no partial progress to reason about.
// 2.  **Tunables In One Place**: Every threshold the stages consult lives in
//     `PipelineConfig`, whose defaults are the values the engine ships with.
// 3.  **Inspectable**: The most recent motion sample is kept and exposed so a
//     host can render debug overlays without re-running any analysis.

use crate::core_modules::gesture::GestureStateMachine;
use crate::core_modules::motion::{MotionDetector, MotionSample};
use crate::core_modules::sampler::FrameSampler;

// Re-export key data structures for the public API.
pub use crate::core_modules::gesture::{HandData, HandState};
pub use crate::core_modules::sampler::VideoSource;
pub use crate::core_modules::scene::{SceneMode, SceneSignal};

/// Configuration for the GesturePipeline, allowing for tunable behavior.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The motion ratio above which a tick counts as hand activity.
    pub activation_ratio: f64,
    /// How many still ticks an open hand survives before reading as closed.
    pub cooldown_ticks: u32,
    /// The per-sample intensity difference that marks a sample as changed.
    pub pixel_diff_threshold: u8,
    /// The number of changed samples a centroid needs before it is trusted.
    pub min_active_pixels: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            activation_ratio: 0.05,
            cooldown_ticks: 15,
            pixel_diff_threshold: 40,
            min_active_pixels: 5,
        }
    }
}

/// The synchronous per-tick analysis stack.
pub struct GesturePipeline {
    sampler: FrameSampler,
    detector: MotionDetector,
    state_machine: GestureStateMachine,
    config: PipelineConfig,
    last_motion: MotionSample,
}

impl GesturePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            sampler: FrameSampler::new(),
            detector: MotionDetector::new(),
            state_machine: GestureStateMachine::new(),
            config,
            last_motion: MotionSample::still(),
        }
    }

    /// Runs one tick against the source. Returns `None` when the source is not
    /// ready; analysis state is left exactly as it was.
    pub fn process_tick<S: VideoSource>(&mut self, source: &mut S) -> Option<HandData> {
        // Stage 1: Downsample to the analysis grid.
        let frame = self.sampler.sample(source)?;

        // Stage 2: Temporal differencing.
        self.last_motion = self.detector.analyze(frame, &self.config);

        // Stage 3: Discrete gesture classification.
        Some(self.state_machine.classify(&self.last_motion, &self.config))
    }

    /// The motion summary behind the most recent reading.
    pub fn last_motion(&self) -> &MotionSample {
        &self.last_motion
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
