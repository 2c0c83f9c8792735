// THEORY:
// The `SceneController` is the asynchronous shell around the synchronous
// pipeline. It owns the clock, the channels and the video source, so a host
// application never touches any of them directly. Spawn it, hand out signal
// receivers, and the scene updates itself.
//
// Key architectural principles:
// 1.  **One Task Owns Everything**: The source, the pipeline and the smoother
//     move into a single spawned task. No locks, no shared mutable state; the
//     task is the only writer the scene signal ever has.
// 2.  **Fixed Cadence, Dropped Ticks**: A 100ms interval with skipped missed
//     ticks. If a tick runs long the schedule slips forward instead of
//     bursting to catch up, and a not-ready source simply produces nothing
//     that tick.
// 3.  **Latest Value Wins**: The scene signal travels over a watch channel.
//     Slow readers never queue stale frames; they always observe the newest
//     published state.
// 4.  **Trusted Overrides**: Pointer-device messages arrive on a control
//     channel and take effect immediately, between ticks, publishing a fresh
//     signal without waiting for the sampler.
// 5.  **Clean Teardown**: `shutdown` stops the task and releases the source.
//     Dropping the controller sends a best-effort shutdown message so the task
//     never outlives its handle.

use crate::core_modules::smoother::SignalSmoother;
use crate::pipeline::{GesturePipeline, HandData, PipelineConfig, SceneMode, SceneSignal, VideoSource};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// The fixed sampling cadence, ten readings per second.
pub const SAMPLING_INTERVAL: Duration = Duration::from_millis(100);

const CONTROL_CHANNEL_CAPACITY: usize = 16;
const READING_CHANNEL_CAPACITY: usize = 32;

/// Message type for the controller task.
enum ControlMessage {
    PointerPressed,
    PointerReleased,
    PointerMoved { x: f64, y: f64 },
    Shutdown,
}

/// Handle to the running sampling task.
pub struct SceneController {
    control_tx: mpsc::Sender<ControlMessage>,
    signal_rx: watch::Receiver<SceneSignal>,
    readings_rx: Option<mpsc::Receiver<HandData>>,
    task: Option<JoinHandle<()>>,
}

impl SceneController {
    /// Moves the source into a sampling task and starts the 10Hz loop.
    pub fn spawn<S>(source: S, config: PipelineConfig) -> Self
    where
        S: VideoSource + Send + 'static,
    {
        let (control_tx, mut control_rx) = mpsc::channel(CONTROL_CHANNEL_CAPACITY);
        let (signal_tx, signal_rx) = watch::channel(SceneSignal::default());
        let (readings_tx, readings_rx) = mpsc::channel(READING_CHANNEL_CAPACITY);

        let task = tokio::spawn(async move {
            let mut source = source;
            let mut pipeline = GesturePipeline::new(config);
            let mut smoother = SignalSmoother::new();

            let mut ticker = time::interval(SAMPLING_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Some(reading) = pipeline.process_tick(&mut source) {
                            smoother.apply(&reading);
                            // A full reading queue only costs the listener, never the loop.
                            let _ = readings_tx.try_send(reading);
                            let _ = signal_tx.send(smoother.signal());
                        }
                    }
                    message = control_rx.recv() => {
                        match message {
                            Some(ControlMessage::PointerPressed) => {
                                smoother.set_mode(SceneMode::Chaos);
                                let _ = signal_tx.send(smoother.signal());
                            }
                            Some(ControlMessage::PointerReleased) => {
                                smoother.set_mode(SceneMode::Formed);
                                let _ = signal_tx.send(smoother.signal());
                            }
                            Some(ControlMessage::PointerMoved { x, y }) => {
                                smoother.set_pointer(x, y);
                                let _ = signal_tx.send(smoother.signal());
                            }
                            Some(ControlMessage::Shutdown) | None => break,
                        }
                    }
                }
            }
        });

        Self {
            control_tx,
            signal_rx,
            readings_rx: Some(readings_rx),
            task: Some(task),
        }
    }

    /// A fresh receiver for the published scene signal. Any number of readers
    /// may exist; each always sees the latest value.
    pub fn signal_receiver(&self) -> watch::Receiver<SceneSignal> {
        self.signal_rx.clone()
    }

    /// The per-tick reading stream. There is exactly one; the first caller
    /// takes it.
    pub fn take_readings(&mut self) -> Option<mpsc::Receiver<HandData>> {
        self.readings_rx.take()
    }

    /// Direct-manipulation press, scattering the scene immediately.
    pub async fn pointer_pressed(&self) {
        let _ = self.control_tx.send(ControlMessage::PointerPressed).await;
    }

    /// Direct-manipulation release, reassembling the scene immediately.
    pub async fn pointer_released(&self) {
        let _ = self.control_tx.send(ControlMessage::PointerReleased).await;
    }

    /// Direct-manipulation move. The coordinate is trusted and unfiltered.
    pub async fn pointer_moved(&self, x: f64, y: f64) {
        let _ = self
            .control_tx
            .send(ControlMessage::PointerMoved { x, y })
            .await;
    }

    /// Stops the sampling task and waits for it to release the source.
    pub async fn shutdown(&mut self) {
        let _ = self.control_tx.send(ControlMessage::Shutdown).await;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SceneController {
    fn drop(&mut self) {
        // Best effort shutdown on drop
        let _ = self.control_tx.try_send(ControlMessage::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::frame::frame::{FRAME_HEIGHT, FRAME_WIDTH};
    use image::{Rgba, RgbaImage};

    /// Alternates between a dark and a bright frame every capture, which keeps
    /// the motion ratio far above the activation threshold.
    struct BlinkingSource {
        bright: bool,
    }

    impl VideoSource for BlinkingSource {
        fn is_ready(&self) -> bool {
            true
        }

        fn capture(&mut self) -> Option<RgbaImage> {
            self.bright = !self.bright;
            let green = if self.bright { 255 } else { 0 };
            Some(RgbaImage::from_pixel(
                FRAME_WIDTH,
                FRAME_HEIGHT,
                Rgba([0, green, 0, 255]),
            ))
        }
    }

    struct OfflineSource;

    impl VideoSource for OfflineSource {
        fn is_ready(&self) -> bool {
            false
        }

        fn capture(&mut self) -> Option<RgbaImage> {
            None
        }
    }

    #[tokio::test(start_paused = true)]
    async fn blinking_source_drives_the_scene_to_chaos() {
        let mut controller =
            SceneController::spawn(BlinkingSource { bright: false }, PipelineConfig::default());
        let signal_rx = controller.signal_receiver();

        time::sleep(Duration::from_millis(350)).await;

        assert_eq!(signal_rx.borrow().mode, SceneMode::Chaos);
        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn readings_arrive_once_per_tick() {
        let mut controller =
            SceneController::spawn(BlinkingSource { bright: false }, PipelineConfig::default());
        let mut readings = controller.take_readings().expect("first take");
        assert!(controller.take_readings().is_none());

        time::sleep(Duration::from_millis(450)).await;
        controller.shutdown().await;

        let mut count = 0;
        while readings.try_recv().is_ok() {
            count += 1;
        }
        // Ticks at 0, 100, 200, 300 and 400 virtual milliseconds.
        assert_eq!(count, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn offline_source_publishes_nothing() {
        let mut controller = SceneController::spawn(OfflineSource, PipelineConfig::default());
        let signal_rx = controller.signal_receiver();

        time::sleep(Duration::from_millis(500)).await;

        assert!(!signal_rx.has_changed().unwrap());
        assert_eq!(*signal_rx.borrow(), SceneSignal::default());
        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn pointer_overrides_take_effect_immediately() {
        let mut controller = SceneController::spawn(OfflineSource, PipelineConfig::default());
        let mut signal_rx = controller.signal_receiver();

        controller.pointer_moved(0.9, 0.1).await;
        signal_rx.changed().await.unwrap();
        let signal = *signal_rx.borrow_and_update();
        assert_eq!((signal.x, signal.y), (0.9, 0.1));

        controller.pointer_pressed().await;
        signal_rx.changed().await.unwrap();
        assert_eq!(signal_rx.borrow_and_update().mode, SceneMode::Chaos);

        controller.pointer_released().await;
        signal_rx.changed().await.unwrap();
        assert_eq!(signal_rx.borrow_and_update().mode, SceneMode::Formed);

        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_publishing() {
        let mut controller =
            SceneController::spawn(BlinkingSource { bright: false }, PipelineConfig::default());
        let signal_rx = controller.signal_receiver();

        controller.shutdown().await;

        // The task is gone, so the sender side of the watch is dropped.
        assert!(signal_rx.has_changed().is_err());
    }
}
