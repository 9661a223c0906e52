mod sequence;
mod webcam;

pub use sequence::ImageSequence;
pub use webcam::WebcamCapture;

use anyhow::Result;
use image::RgbImage;

/// Source of color frames.
///
/// An `Err` from [`CaptureSource::capture_frame`] means no further frame can
/// be obtained, either because the stream ended or the device failed.
pub trait CaptureSource {
    /// Capture a single frame
    fn capture_frame(&mut self) -> Result<RgbImage>;

    /// Get the resolution of captured frames
    fn resolution(&self) -> (u32, u32);
}
