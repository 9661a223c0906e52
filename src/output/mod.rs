mod overlay;
mod window;

pub use overlay::{draw_marker, MARKER_COLOR};
pub use window::WindowOutput;

use crate::pipeline::StopReason;
use anyhow::Result;
use image::RgbImage;
use std::time::Duration;

/// Trait for output destinations
pub trait OutputSink {
    /// Present an annotated frame
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()>;

    /// Wait at most `timeout` for a stop request
    fn poll_stop(&mut self, timeout: Duration) -> Option<StopReason>;
}
