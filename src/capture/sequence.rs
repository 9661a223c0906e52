use super::CaptureSource;
use anyhow::{bail, Context, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};

const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Replays the image files of a directory in file name order
pub struct ImageSequence {
    files: Vec<PathBuf>,
    next: usize,
    width: u32,
    height: u32,
}

impl ImageSequence {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        tracing::info!("Reading frames from {}", dir.display());

        let mut files = Vec::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read frame directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
            if path.is_file() && is_image {
                files.push(path);
            }
        }
        files.sort();

        let Some(first) = files.first() else {
            bail!("No image files in {}", dir.display());
        };
        let (width, height) = image::image_dimensions(first)
            .with_context(|| format!("Failed to read {}", first.display()))?;

        tracing::info!("Found {} frames at {}x{}", files.len(), width, height);

        Ok(Self {
            files,
            next: 0,
            width,
            height,
        })
    }
}

impl CaptureSource for ImageSequence {
    fn capture_frame(&mut self) -> Result<RgbImage> {
        let Some(path) = self.files.get(self.next) else {
            bail!("Image sequence exhausted after {} frames", self.files.len());
        };
        self.next += 1;

        let frame = image::open(path)
            .with_context(|| format!("Failed to decode {}", path.display()))?
            .to_rgb8();
        Ok(frame)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
