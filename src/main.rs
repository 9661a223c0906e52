use anyhow::{Context, Result};
use blobmark::capture::{CaptureSource, ImageSequence, WebcamCapture};
use blobmark::output::WindowOutput;
use blobmark::{run_pipeline, DetectorConfig, RunConfig};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input webcam device index
    #[arg(short, long, default_value_t = 0)]
    input_device: u32,

    /// Replay image files from this directory instead of a camera
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Requested capture width
    #[arg(long, default_value_t = 640)]
    capture_width: u32,

    /// Requested capture height
    #[arg(long, default_value_t = 480)]
    capture_height: u32,

    /// Blobs must have more pixels than this
    #[arg(long, default_value_t = 400)]
    min_blob_size: u32,

    /// Blobs must have fewer pixels than this
    #[arg(long, default_value_t = 150_000)]
    max_blob_size: u32,

    /// Key that stops the run
    #[arg(long, default_value_t = 'q')]
    quit_key: char,

    /// Longest wait for the quit key between frames, in milliseconds
    #[arg(long, default_value_t = 1)]
    poll_ms: u64,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("blobmark starting");

    let detector_config = DetectorConfig {
        min_blob_size: args.min_blob_size,
        max_blob_size: args.max_blob_size,
        ..DetectorConfig::default()
    };
    detector_config
        .validate()
        .context("Invalid detector configuration")?;
    tracing::info!(
        "Blob size {}..{}, aspect {}..{}",
        detector_config.min_blob_size,
        detector_config.max_blob_size,
        detector_config.min_aspect,
        detector_config.max_aspect
    );

    let run_config = RunConfig {
        stop_poll: Duration::from_millis(args.poll_ms),
        max_frames: args.max_frames,
        ..RunConfig::default()
    };

    let mut capture: Box<dyn CaptureSource> = match &args.frames {
        Some(dir) => Box::new(ImageSequence::open(dir).context("Failed to open frame directory")?),
        None => Box::new(
            WebcamCapture::new(args.input_device, args.capture_width, args.capture_height)
                .context("Failed to initialize webcam capture")?,
        ),
    };
    let (width, height) = capture.resolution();

    tracing::info!("Press '{}' in the window to stop", args.quit_key);
    let mut output = WindowOutput::new("blobmark", width, height, args.quit_key)
        .context("Failed to initialize preview window")?;

    let summary = run_pipeline(
        capture.as_mut(),
        &mut output,
        &detector_config,
        &run_config,
    )?;
    tracing::info!(
        "Processed {} frames, {} markers, stopped by {:?}",
        summary.frames,
        summary.markers,
        summary.stop_reason
    );

    Ok(())
}
