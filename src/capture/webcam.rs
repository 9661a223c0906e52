use super::CaptureSource;
use anyhow::{Context, Result};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;

/// Live camera frames via nokhwa
pub struct WebcamCapture {
    camera: Camera,
    width: u32,
    height: u32,
}

impl WebcamCapture {
    /// Open camera `device_index`, asking for the format closest to `width`x`height`
    pub fn new(device_index: u32, width: u32, height: u32) -> Result<Self> {
        tracing::info!(
            "Initializing webcam {} at {}x{}",
            device_index,
            width,
            height
        );

        let index = CameraIndex::Index(device_index);
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::HighestResolution(
            Resolution::new(width, height),
        ));

        let mut camera = Camera::new(index, requested).context("Failed to open camera")?;

        camera
            .open_stream()
            .context("Failed to open camera stream")?;

        // The driver may not honour the request; frames come at whatever it picked.
        let actual = camera.resolution();
        if (actual.width(), actual.height()) != (width, height) {
            tracing::warn!(
                "Camera delivers {}x{} instead of requested {}x{}",
                actual.width(),
                actual.height(),
                width,
                height
            );
        }

        tracing::info!("Webcam initialized successfully");

        Ok(Self {
            camera,
            width: actual.width(),
            height: actual.height(),
        })
    }
}

impl CaptureSource for WebcamCapture {
    fn capture_frame(&mut self) -> Result<RgbImage> {
        let frame = self.camera.frame().context("Failed to capture frame")?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .context("Failed to decode frame")?;

        Ok(decoded)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for WebcamCapture {
    fn drop(&mut self) {
        if let Err(err) = self.camera.stop_stream() {
            tracing::warn!("Failed to stop camera stream: {}", err);
        }
    }
}
