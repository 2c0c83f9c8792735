// THEORY:
// The `scene` module is the render-facing edge of the engine. It defines the
// `SceneSignal` cell the pipeline publishes and the small set of pure helpers a
// renderer needs to turn that cell into animation parameters every frame.
//
// Key architectural principles:
// 1.  **Two Clock Domains**: The pipeline writes the signal at sample rate
//     (10Hz); a renderer reads it at frame rate (60Hz or more). Everything here
//     that advances over time takes the renderer's own `dt`, so the two clocks
//     never need to agree.
// 2.  **No Gesture Awareness**: These helpers know nothing about hands or motion.
//     They map a mode and a pointer to scalars, and that is all.
// 3.  **Exponential Ease**: The mix value chases its target with a rate-limited
//     lerp. Mode flips read as a sweep across a second or two of frames, never
//     as a cut.

/// The discrete look the scene is driving toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneMode {
    /// Coalesced, assembled, at rest.
    Formed,
    /// Scattered, energetic, in motion.
    Chaos,
}

/// The single cell the engine publishes for the render side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSignal {
    pub mode: SceneMode,
    /// Smoothed pointer, horizontal, in [0, 1].
    pub x: f64,
    /// Smoothed pointer, vertical, in [0, 1].
    pub y: f64,
}

impl Default for SceneSignal {
    fn default() -> Self {
        Self {
            mode: SceneMode::Formed,
            x: 0.5,
            y: 0.5,
        }
    }
}

/// How fast the mix value chases its target, per second.
const MIX_RATE: f64 = 0.8;
/// Baseline scene rotation with no pointer input, radians per second.
pub const DRIFT_RATE: f64 = 0.08;
const TORQUE_GAIN: f64 = 1.5;
const PARALLAX_X_GAIN: f64 = 4.0;
const PARALLAX_Y_GAIN: f64 = 2.0;
const PARALLAX_Y_BASE: f64 = 1.5;

/// The continuous formed/chaos blend a renderer feeds to its materials.
pub struct MixValue {
    value: f64,
}

impl MixValue {
    /// Starts fully formed, matching the default `SceneSignal`.
    pub fn new() -> Self {
        Self { value: 1.0 }
    }

    /// Advances the blend toward the mode's target by one render frame.
    /// Returns the new value. Large `dt` steps land exactly on the target.
    pub fn advance(&mut self, mode: SceneMode, dt: f64) -> f64 {
        let target = match mode {
            SceneMode::Formed => 1.0,
            SceneMode::Chaos => 0.0,
        };
        let step = (dt * MIX_RATE).min(1.0);
        self.value += (target - self.value) * step;
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Default for MixValue {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the camera should drift to for the current pointer.
pub fn parallax_target(signal: &SceneSignal) -> (f64, f64) {
    (
        (signal.x - 0.5) * PARALLAX_X_GAIN,
        (signal.y - 0.5) * PARALLAX_Y_GAIN + PARALLAX_Y_BASE,
    )
}

/// Pointer-driven rotation speed, radians per second, added on top of
/// `DRIFT_RATE`.
pub fn rotation_torque(signal: &SceneSignal) -> f64 {
    (signal.x - 0.5) * TORQUE_GAIN
}
