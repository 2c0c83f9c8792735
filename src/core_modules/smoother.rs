// THEORY:
// The `SignalSmoother` sits between the gesture layer and the published scene
// signal. Hand readings arrive ten times a second and jitter by a few percent
// even when the user holds still; fed straight to a renderer that jitter reads
// as tremor. The smoother converts the reading stream into a pointer that glides
// and a mode that flips cleanly.
//
// Key architectural principles:
// 1.  **Dead Zone First**: Deltas below the noise floor on both axes are
//     discarded before they reach the filter. A resting hand produces a frozen
//     pointer, not a slow drift.
// 2.  **Heavy Low-Pass**: Updates that clear the dead zone move the pointer only
//     five percent of the way to the new reading. The pointer trades latency for
//     steadiness, which is the right trade for cinematic camera work.
// 3.  **Trusted Direct Path**: Pointer-device input is authoritative. The setter
//     methods bypass both the dead zone and the filter so direct manipulation
//     feels instant.
// 4.  **Mode Is Separate**: Open and closed hands map to chaos and formed.
//     Readings without a usable hand state leave the mode alone.

use crate::core_modules::gesture::{HandData, HandState};
use crate::core_modules::scene::{SceneMode, SceneSignal};

/// Per-axis delta below which a reading is treated as jitter.
const DEAD_ZONE: f64 = 0.005;
/// How much of the previous pointer survives each accepted update.
const RETENTION: f64 = 0.95;

/// Smooths hand readings into the published pointer and scene mode.
pub struct SignalSmoother {
    x: f64,
    y: f64,
    mode: SceneMode,
}

impl SignalSmoother {
    pub fn new() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            mode: SceneMode::Formed,
        }
    }

    /// Folds one hand reading into the smoothed state.
    pub fn apply(&mut self, reading: &HandData) {
        match reading.state {
            HandState::Open => self.mode = SceneMode::Chaos,
            HandState::Closed => self.mode = SceneMode::Formed,
            HandState::Pointing | HandState::None => {}
        }

        let dx = (reading.x - self.x).abs();
        let dy = (reading.y - self.y).abs();
        if dx < DEAD_ZONE && dy < DEAD_ZONE {
            return;
        }

        self.x = self.x * RETENTION + reading.x * (1.0 - RETENTION);
        self.y = self.y * RETENTION + reading.y * (1.0 - RETENTION);
    }

    /// Direct pointer write, unfiltered.
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Direct mode write.
    pub fn set_mode(&mut self, mode: SceneMode) {
        self.mode = mode;
    }

    /// The current smoothed state as one publishable cell.
    pub fn signal(&self) -> SceneSignal {
        SceneSignal {
            mode: self.mode,
            x: self.x,
            y: self.y,
        }
    }
}

impl Default for SignalSmoother {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(state: HandState, x: f64, y: f64) -> HandData {
        HandData { state, x, y }
    }

    #[test]
    fn starts_formed_at_center() {
        let smoother = SignalSmoother::new();
        assert_eq!(smoother.signal(), SceneSignal::default());
    }

    #[test]
    fn sub_dead_zone_deltas_are_ignored() {
        let mut smoother = SignalSmoother::new();
        smoother.apply(&reading(HandState::Open, 0.504, 0.496));
        let signal = smoother.signal();
        assert_eq!((signal.x, signal.y), (0.5, 0.5));
    }

    #[test]
    fn one_large_axis_unlocks_both() {
        let mut smoother = SignalSmoother::new();
        smoother.apply(&reading(HandState::Open, 0.6, 0.504));
        let signal = smoother.signal();
        assert!((signal.x - (0.5 * 0.95 + 0.6 * 0.05)).abs() < 1e-12);
        assert!((signal.y - (0.5 * 0.95 + 0.504 * 0.05)).abs() < 1e-12);
    }

    #[test]
    fn accepted_updates_move_five_percent() {
        let mut smoother = SignalSmoother::new();
        smoother.apply(&reading(HandState::Open, 0.6, 0.5));
        let signal = smoother.signal();
        assert!((signal.x - 0.505).abs() < 1e-12);
    }

    #[test]
    fn open_and_closed_map_to_modes() {
        let mut smoother = SignalSmoother::new();
        smoother.apply(&reading(HandState::Open, 0.5, 0.5));
        assert_eq!(smoother.signal().mode, SceneMode::Chaos);
        smoother.apply(&reading(HandState::Closed, 0.5, 0.5));
        assert_eq!(smoother.signal().mode, SceneMode::Formed);
    }

    #[test]
    fn pointing_and_none_leave_the_mode_alone() {
        let mut smoother = SignalSmoother::new();
        smoother.apply(&reading(HandState::Open, 0.5, 0.5));
        smoother.apply(&reading(HandState::Pointing, 0.5, 0.5));
        assert_eq!(smoother.signal().mode, SceneMode::Chaos);
        smoother.apply(&reading(HandState::None, 0.5, 0.5));
        assert_eq!(smoother.signal().mode, SceneMode::Chaos);
    }

    #[test]
    fn direct_writes_bypass_the_filter() {
        let mut smoother = SignalSmoother::new();
        smoother.set_pointer(0.9, 0.1);
        smoother.set_mode(SceneMode::Chaos);
        let signal = smoother.signal();
        assert_eq!((signal.x, signal.y), (0.9, 0.1));
        assert_eq!(signal.mode, SceneMode::Chaos);
    }
}
