// THEORY:
// The `GestureStateMachine` turns the continuous motion summary into a discrete
// hand reading. Raw motion flickers tick to tick; an open hand waved in front of
// the camera produces bursts of activity separated by brief lulls. The state
// machine absorbs those lulls with a cooldown so the reported state changes at
// human speed, not sensor speed.
//
// Key architectural principles:
// 1.  **Hysteresis Over Thresholding**: A single over-threshold tick opens the
//     hand and arms the cooldown. The hand only closes after the cooldown has
//     fully drained, so momentary stillness between waves never reads as a
//     close.
// 2.  **Coordinates Always Flow**: Every branch reports the tick's centroid as
//     the hand position. The coordinate stream never snaps or freezes when the
//     discrete state changes.
// 3.  **Small Vocabulary**: The motion path only ever emits `Open` or `Closed`.
//     `Pointing` and `None` exist for alternate producers and cold start.

use crate::core_modules::motion::MotionSample;
use crate::pipeline::PipelineConfig;

/// The discrete hand reading shared by every producer in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandState {
    Open,
    Closed,
    Pointing,
    None,
}

/// One hand observation: a discrete state plus a normalized position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandData {
    pub state: HandState,
    /// Horizontal position in [0, 1], already mirrored.
    pub x: f64,
    /// Vertical position in [0, 1].
    pub y: f64,
}

impl HandData {
    /// The degraded reading every failure path collapses to.
    pub fn neutral() -> Self {
        Self {
            state: HandState::None,
            x: 0.5,
            y: 0.5,
        }
    }
}

/// Classifies motion samples into hand readings with cooldown hysteresis.
pub struct GestureStateMachine {
    cooldown: u32,
}

impl GestureStateMachine {
    pub fn new() -> Self {
        Self { cooldown: 0 }
    }

    /// Classifies one tick. Activity re-arms the cooldown; stillness drains it
    /// one tick at a time.
    pub fn classify(&mut self, sample: &MotionSample, config: &PipelineConfig) -> HandData {
        let state = if sample.motion_ratio > config.activation_ratio {
            self.cooldown = config.cooldown_ticks;
            HandState::Open
        } else {
            if self.cooldown > 0 {
                self.cooldown -= 1;
            }
            if self.cooldown > 0 {
                HandState::Open
            } else {
                HandState::Closed
            }
        };

        HandData {
            state,
            x: sample.centroid.0,
            y: sample.centroid.1,
        }
    }

    /// Ticks of stillness left before the hand reads as closed.
    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown
    }
}

impl Default for GestureStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
