// This file is an example of how to use the `mirror_vision` library.
// The main library entry point is `src/lib.rs`.
//
// It drives the full stack from a synthetic video source: a bright block
// sweeping back and forth, which the engine reads as a waving open hand.

use image::{Rgba, RgbaImage};
use mirror_vision::controller::SceneController;
use mirror_vision::core_modules::scene::{self, MixValue};
use mirror_vision::pipeline::{PipelineConfig, VideoSource};
use std::time::Duration;
use tokio::time::Instant;

const SOURCE_WIDTH: u32 = 320;
const SOURCE_HEIGHT: u32 = 240;
const BLOCK_SIZE: u32 = 48;

/// A stand-in camera: a bright block sweeping left to right and back.
struct SweepingSource {
    tick: u32,
}

impl VideoSource for SweepingSource {
    fn is_ready(&self) -> bool {
        true
    }

    fn capture(&mut self) -> Option<RgbaImage> {
        let mut frame = RgbaImage::from_pixel(SOURCE_WIDTH, SOURCE_HEIGHT, Rgba([0, 0, 0, 255]));

        let travel = SOURCE_WIDTH - BLOCK_SIZE;
        let phase = self.tick * 24 % (2 * travel);
        let left = if phase < travel { phase } else { 2 * travel - phase };
        self.tick += 1;

        for y in 96..96 + BLOCK_SIZE {
            for x in left..left + BLOCK_SIZE {
                frame.put_pixel(x, y, Rgba([0, 255, 0, 255]));
            }
        }
        Some(frame)
    }
}

#[tokio::main]
async fn main() {
    println!("Mirror Vision Engine - Example Runner");

    let mut controller = SceneController::spawn(SweepingSource { tick: 0 }, PipelineConfig::default());
    let signal_rx = controller.signal_receiver();
    let mut readings = match controller.take_readings() {
        Some(readings) => readings,
        None => return,
    };

    let mut mix = MixValue::new();
    let mut last_frame = Instant::now();

    for _ in 0..30 {
        tokio::time::sleep(Duration::from_millis(100)).await;

        while let Ok(reading) = readings.try_recv() {
            println!(
                "hand: {:?} at ({:.2}, {:.2})",
                reading.state, reading.x, reading.y
            );
        }

        let signal = *signal_rx.borrow();
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;

        let blend = mix.advance(signal.mode, dt);
        let (camera_x, camera_y) = scene::parallax_target(&signal);
        let spin = scene::DRIFT_RATE + scene::rotation_torque(&signal);
        println!(
            "scene: {:?} mix {:.2} camera ({:.2}, {:.2}) spin {:.3} rad/s",
            signal.mode, blend, camera_x, camera_y, spin
        );
    }

    controller.shutdown().await;
    println!("Scene controller stopped.");
}
