// THEORY:
// The `FrameSampler` is the bridge between a live video source and the analysis
// grid. It performs the crucial first transformation of the pipeline: collapsing
// a full-resolution RGBA capture into the fixed 64x48 green-channel `FrameBuffer`
// that every downstream stage consumes.
//
// Key architectural principles:
// 1.  **Source Abstraction**: Capture hardware hides behind the `VideoSource`
//     trait. The sampler only asks two questions, "are you ready?" and "give me
//     your current image". Tests inject synthetic sources through the same seam.
// 2.  **Dropped Ticks**: A source that is not ready, or that has no frame to
//     give, produces no partial state. The tick is simply dropped and the
//     previous analysis state is left untouched.
// 3.  **Downsample Then Extract**: The capture is resized with a triangle filter
//     before the green channel is pulled out, so each grid sample already
//     averages a neighborhood of source pixels. Single-pixel sensor noise never
//     reaches the motion detector at full strength.

use crate::core_modules::frame::frame::{FRAME_HEIGHT, FRAME_WIDTH, FrameBuffer};
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// The capture seam between the engine and a live video feed.
pub trait VideoSource {
    /// Whether the source currently has image data to offer.
    fn is_ready(&self) -> bool;
    /// The source's current image, if one is available right now.
    fn capture(&mut self) -> Option<RgbaImage>;
}

/// Downsamples captures into the shared analysis grid.
pub struct FrameSampler {
    buffer: FrameBuffer,
}

impl FrameSampler {
    pub fn new() -> Self {
        Self {
            buffer: FrameBuffer::new(),
        }
    }

    /// Samples one tick. Returns `None` when the source is not ready or has no
    /// frame; otherwise returns the freshly filled grid.
    pub fn sample<S: VideoSource>(&mut self, source: &mut S) -> Option<&FrameBuffer> {
        if !source.is_ready() {
            return None;
        }
        let capture = source.capture()?;

        let resized = imageops::resize(&capture, FRAME_WIDTH, FRAME_HEIGHT, FilterType::Triangle);
        for (x, y, pixel) in resized.enumerate_pixels() {
            self.buffer.set_sample(x, y, pixel[1]);
        }
        Some(&self.buffer)
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new()
    }
}
