// tests/test_pipeline.rs — End-to-end runs of the frame loop with scripted
// capture sources and recording sinks.

use anyhow::{anyhow, Result};
use blobmark::analysis::Point;
use blobmark::capture::CaptureSource;
use blobmark::output::{OutputSink, MARKER_COLOR};
use blobmark::{run_pipeline, DetectorConfig, MarkerDetector, RunConfig, StopReason};
use image::{Rgb, RgbImage};
use std::collections::VecDeque;
use std::time::Duration;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

struct ScriptedCapture {
    frames: VecDeque<RgbImage>,
    resolution: (u32, u32),
}

impl ScriptedCapture {
    fn new(frames: Vec<RgbImage>) -> Self {
        let resolution = frames.first().map_or((0, 0), |f| f.dimensions());
        Self {
            frames: frames.into(),
            resolution,
        }
    }
}

impl CaptureSource for ScriptedCapture {
    fn capture_frame(&mut self) -> Result<RgbImage> {
        self.frames
            .pop_front()
            .ok_or_else(|| anyhow!("end of script"))
    }

    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }
}

#[derive(Default)]
struct RecordingSink {
    frames: Vec<RgbImage>,
    stop_after: Option<usize>,
    fail_on_write: bool,
    polls: usize,
}

impl OutputSink for RecordingSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()> {
        if self.fail_on_write {
            return Err(anyhow!("display gone"));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn poll_stop(&mut self, _timeout: Duration) -> Option<StopReason> {
        self.polls += 1;
        match self.stop_after {
            Some(n) if self.frames.len() >= n => Some(StopReason::QuitKey),
            _ => None,
        }
    }
}

fn white_frame() -> RgbImage {
    RgbImage::from_pixel(100, 100, WHITE)
}

/// 100x100 white frame with a black square of `side` at (`x0`, `y0`)
fn square_frame(x0: u32, y0: u32, side: u32) -> RgbImage {
    RgbImage::from_fn(100, 100, |x, y| {
        if (x0..x0 + side).contains(&x) && (y0..y0 + side).contains(&y) {
            BLACK
        } else {
            WHITE
        }
    })
}

fn quick_run() -> RunConfig {
    RunConfig {
        stop_poll: Duration::ZERO,
        ..RunConfig::default()
    }
}

#[test]
fn square_is_found_and_outlined() {
    let mut detector = MarkerDetector::new(100, 100, &DetectorConfig::default()).unwrap();
    let detection = detector.detect(&square_frame(35, 35, 25)).unwrap();

    assert_eq!(detection.threshold, 0);
    assert_eq!(detection.markers.len(), 1);
    assert_eq!(detection.markers[0].min, Point::new(35, 35));
    assert_eq!(detection.markers[0].max, Point::new(59, 59));

    let mut capture = ScriptedCapture::new(vec![square_frame(35, 35, 25)]);
    let mut sink = RecordingSink::default();
    let summary = run_pipeline(&mut capture, &mut sink, &DetectorConfig::default(), &quick_run())
        .unwrap();

    assert_eq!(summary.frames, 1);
    assert_eq!(summary.markers, 1);
    assert_eq!(summary.stop_reason, StopReason::SourceExhausted);

    let shown = &sink.frames[0];
    assert_eq!(*shown.get_pixel(35, 35), MARKER_COLOR);
    assert_eq!(*shown.get_pixel(59, 59), MARKER_COLOR);
    assert_eq!(*shown.get_pixel(47, 35), MARKER_COLOR);
    assert_eq!(*shown.get_pixel(47, 47), BLACK);
    assert_eq!(*shown.get_pixel(10, 10), WHITE);
}

#[test]
fn thirty_pixel_square_matches_its_box() {
    let mut detector = MarkerDetector::new(100, 100, &DetectorConfig::default()).unwrap();
    let detection = detector.detect(&square_frame(35, 35, 30)).unwrap();

    assert_eq!(detection.markers.len(), 1);
    assert_eq!(detection.markers[0].min, Point::new(35, 35));
    assert_eq!(detection.markers[0].max, Point::new(64, 64));
}

#[test]
fn blank_frame_has_no_markers() {
    let mut detector = MarkerDetector::new(100, 100, &DetectorConfig::default()).unwrap();
    let detection = detector.detect(&white_frame()).unwrap();

    // Single intensity: every pixel is at or below the default cut.
    assert_eq!(detection.threshold, 0);
    assert!(detection.markers.is_empty());

    let mut capture = ScriptedCapture::new(vec![white_frame(), white_frame()]);
    let mut sink = RecordingSink::default();
    let summary = run_pipeline(&mut capture, &mut sink, &DetectorConfig::default(), &quick_run())
        .unwrap();
    assert_eq!(summary.frames, 2);
    assert_eq!(summary.markers, 0);
    assert_eq!(sink.frames[1], white_frame());
}

#[test]
fn small_speck_is_not_a_marker() {
    let mut detector = MarkerDetector::new(100, 100, &DetectorConfig::default()).unwrap();
    let detection = detector.detect(&square_frame(10, 10, 5)).unwrap();
    assert_eq!(detection.blobs_scanned, 1);
    assert_eq!(detection.blobs_rejected(), 1);
    assert!(detection.markers.is_empty());
}

#[test]
fn frames_are_independent() {
    let mut detector = MarkerDetector::new(100, 100, &DetectorConfig::default()).unwrap();

    let first = detector.detect(&square_frame(5, 5, 25)).unwrap();
    let second = detector.detect(&square_frame(60, 60, 25)).unwrap();
    let third = detector.detect(&white_frame()).unwrap();

    assert_eq!(first.markers[0].min, Point::new(5, 5));
    assert_eq!(second.markers.len(), 1);
    assert_eq!(second.markers[0].min, Point::new(60, 60));
    assert!(third.markers.is_empty());
}

#[test]
fn quit_key_stops_between_frames() {
    let frames = (0..10).map(|_| square_frame(20, 20, 25)).collect();
    let mut capture = ScriptedCapture::new(frames);
    let mut sink = RecordingSink {
        stop_after: Some(3),
        ..RecordingSink::default()
    };

    let summary = run_pipeline(&mut capture, &mut sink, &DetectorConfig::default(), &quick_run())
        .unwrap();
    assert_eq!(summary.stop_reason, StopReason::QuitKey);
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.markers, 3);
    assert_eq!(capture.frames.len(), 7);
}

#[test]
fn frame_limit_is_honoured() {
    let frames = (0..5).map(|_| white_frame()).collect();
    let mut capture = ScriptedCapture::new(frames);
    let mut sink = RecordingSink::default();
    let run = RunConfig {
        max_frames: Some(2),
        ..quick_run()
    };

    let summary = run_pipeline(&mut capture, &mut sink, &DetectorConfig::default(), &run).unwrap();
    assert_eq!(summary.stop_reason, StopReason::FrameLimit);
    assert_eq!(summary.frames, 2);
    assert_eq!(sink.polls, 2);
}

#[test]
fn empty_source_ends_cleanly() {
    let mut capture = ScriptedCapture::new(Vec::new());
    let mut sink = RecordingSink::default();
    let summary = run_pipeline(&mut capture, &mut sink, &DetectorConfig::default(), &quick_run())
        .unwrap();
    assert_eq!(summary.frames, 0);
    assert_eq!(summary.stop_reason, StopReason::SourceExhausted);
    assert!(sink.frames.is_empty());
}

#[test]
fn resolution_change_ends_run() {
    let mut capture = ScriptedCapture::new(vec![white_frame(), RgbImage::from_pixel(50, 50, WHITE)]);
    let mut sink = RecordingSink::default();
    let summary = run_pipeline(&mut capture, &mut sink, &DetectorConfig::default(), &quick_run())
        .unwrap();
    assert_eq!(summary.frames, 1);
    assert_eq!(summary.stop_reason, StopReason::SourceExhausted);
}

#[test]
fn display_failure_is_an_error() {
    let mut capture = ScriptedCapture::new(vec![white_frame()]);
    let mut sink = RecordingSink {
        fail_on_write: true,
        ..RecordingSink::default()
    };
    assert!(
        run_pipeline(&mut capture, &mut sink, &DetectorConfig::default(), &quick_run()).is_err()
    );
}
