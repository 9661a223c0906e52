//! Fiducial marker candidate detection on live camera frames.
//!
//! Each frame is thresholded with Otsu's method, scanned for dark blobs, and
//! every blob of marker-like size and shape is outlined before display.

pub mod analysis;
pub mod capture;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;

pub use config::{DetectorConfig, RunConfig};
pub use pipeline::{run_pipeline, Detection, MarkerDetector, RunSummary, StopReason};
