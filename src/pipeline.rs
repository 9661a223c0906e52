//! Frame orchestration: per-frame marker detection and the capture/display loop.

use crate::analysis::{
    binarize_into, otsu_threshold, scan_blobs, BlobClassifier, BoundingBox, Histogram, Mask,
    ScanBuffers,
};
use crate::capture::CaptureSource;
use crate::config::{DetectorConfig, RunConfig};
use crate::error::FrameError;
use crate::output::{draw_marker, OutputSink, MARKER_COLOR};
use anyhow::{Context, Result};
use image::RgbImage;
use std::time::{Duration, Instant};

/// Why the frame loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    QuitKey,
    WindowClosed,
    SourceExhausted,
    FrameLimit,
}

/// Result of analysing one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub threshold: u8,
    /// Accepted marker boxes in scan order
    pub markers: Vec<BoundingBox>,
    /// Blobs found, accepted or not
    pub blobs_scanned: usize,
}

impl Detection {
    pub fn blobs_rejected(&self) -> usize {
        self.blobs_scanned - self.markers.len()
    }
}

/// Per-session analysis state. Buffers are sized once from the first frame
/// and cleared on every use.
pub struct MarkerDetector {
    width: u32,
    height: u32,
    classifier: BlobClassifier,
    mask: Mask,
    buffers: ScanBuffers,
}

impl MarkerDetector {
    pub fn new(width: u32, height: u32, config: &DetectorConfig) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::Empty);
        }
        tracing::debug!("Allocating detector buffers for {}x{}", width, height);

        Ok(Self {
            width,
            height,
            classifier: BlobClassifier::new(config),
            mask: Mask::new(width, height),
            buffers: ScanBuffers::new(width, height),
        })
    }

    /// Find marker candidates in a color frame
    pub fn detect(&mut self, frame: &RgbImage) -> Result<Detection, FrameError> {
        let gray = image::imageops::grayscale(frame);
        self.detect_gray(&gray)
    }

    /// Find marker candidates in an already converted grayscale frame
    pub fn detect_gray(&mut self, gray: &image::GrayImage) -> Result<Detection, FrameError> {
        let (width, height) = gray.dimensions();
        if (width, height) != (self.width, self.height) {
            return Err(FrameError::DimensionMismatch {
                width: self.width,
                height: self.height,
                actual_width: width,
                actual_height: height,
            });
        }

        let _span = tracing::debug_span!("detect").entered();

        let histogram = Histogram::from_gray(gray);
        let threshold = otsu_threshold(&histogram);
        binarize_into(gray, threshold, &mut self.mask);

        let blobs = scan_blobs(&self.mask, &mut self.buffers, &self.classifier)?;
        let markers: Vec<BoundingBox> = blobs
            .iter()
            .filter(|b| b.verdict.is_accepted())
            .map(|b| b.blob.bbox)
            .collect();

        let detection = Detection {
            threshold,
            markers,
            blobs_scanned: blobs.len(),
        };
        tracing::debug!(
            "threshold={} markers={} rejected={}",
            detection.threshold,
            detection.markers.len(),
            detection.blobs_rejected()
        );

        Ok(detection)
    }
}

/// Totals for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub markers: u64,
    pub stop_reason: StopReason,
}

/// Capture, annotate and display frames until stopped.
///
/// The first frame sizes the detector. Running out of frames ends the run
/// normally; a display failure is returned as an error.
pub fn run_pipeline<C, O>(
    capture: &mut C,
    output: &mut O,
    detector_config: &DetectorConfig,
    run_config: &RunConfig,
) -> Result<RunSummary>
where
    C: CaptureSource + ?Sized,
    O: OutputSink + ?Sized,
{
    let mut frame_count = 0u64;
    let mut marker_count = 0u64;
    let mut total_capture_time = Duration::ZERO;
    let mut total_detect_time = Duration::ZERO;
    let mut total_output_time = Duration::ZERO;

    // The first frame decides the session's dimensions.
    let first = match capture.capture_frame() {
        Ok(frame) => frame,
        Err(err) => {
            tracing::warn!("No first frame available: {:#}", err);
            return Ok(RunSummary {
                frames: 0,
                markers: 0,
                stop_reason: StopReason::SourceExhausted,
            });
        }
    };
    let (width, height) = first.dimensions();
    tracing::info!("First frame {}x{}", width, height);
    let mut detector = MarkerDetector::new(width, height, detector_config)
        .context("Failed to size detector from first frame")?;
    let mut pending = Some(first);

    tracing::info!("Starting main pipeline loop");

    let stop_reason = loop {
        if run_config.max_frames.is_some_and(|max| frame_count >= max) {
            break StopReason::FrameLimit;
        }

        // Capture frame
        let capture_start = Instant::now();
        let captured = match pending.take() {
            Some(frame) => Ok(frame),
            None => capture.capture_frame(),
        };
        let mut frame = match captured {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!("No frame available, stopping: {:#}", err);
                break StopReason::SourceExhausted;
            }
        };
        total_capture_time += capture_start.elapsed();

        // Detect
        let detect_start = Instant::now();
        let detection = match detector.detect(&frame) {
            Ok(detection) => detection,
            Err(err) => {
                tracing::warn!("Frame source broke its resolution, stopping: {}", err);
                break StopReason::SourceExhausted;
            }
        };
        total_detect_time += detect_start.elapsed();

        for bbox in &detection.markers {
            draw_marker(&mut frame, bbox, MARKER_COLOR);
        }
        marker_count += detection.markers.len() as u64;

        // Output frame
        let output_start = Instant::now();
        output
            .write_frame(&frame)
            .context("Failed to write frame")?;
        total_output_time += output_start.elapsed();

        frame_count += 1;

        if run_config.report_every > 0 && frame_count % run_config.report_every == 0 {
            let avg_capture_ms = total_capture_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let avg_detect_ms = total_detect_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let avg_output_ms = total_output_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let total_ms = avg_capture_ms + avg_detect_ms + avg_output_ms;

            tracing::info!(
                "Frame {}: capture={:.1}ms, detect={:.1}ms, output={:.1}ms, total={:.1}ms, threshold={}, markers={}",
                frame_count,
                avg_capture_ms,
                avg_detect_ms,
                avg_output_ms,
                total_ms,
                detection.threshold,
                detection.markers.len()
            );
        }

        if let Some(reason) = output.poll_stop(run_config.stop_poll) {
            break reason;
        }
    };

    tracing::info!(
        "Stopped after {} frames ({:?}), {} markers drawn",
        frame_count,
        stop_reason,
        marker_count
    );

    Ok(RunSummary {
        frames: frame_count,
        markers: marker_count,
        stop_reason,
    })
}
