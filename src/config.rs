use std::time::Duration;

use crate::error::ConfigError;

/// Blob size and shape limits for marker candidates. All bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// A marker has more than this many pixels
    pub min_blob_size: u32,
    /// A marker has fewer than this many pixels
    pub max_blob_size: u32,
    /// Lower bound on bounding box width / height
    pub min_aspect: f64,
    /// Upper bound on bounding box width / height
    pub max_aspect: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_blob_size: 400,
            max_blob_size: 150_000,
            min_aspect: 0.33,
            max_aspect: 3.0,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_blob_size >= self.max_blob_size {
            return Err(ConfigError::BlobSizeRange {
                min: self.min_blob_size,
                max: self.max_blob_size,
            });
        }
        if !(self.min_aspect > 0.0 && self.min_aspect < self.max_aspect) {
            return Err(ConfigError::AspectRange {
                min: self.min_aspect,
                max: self.max_aspect,
            });
        }
        Ok(())
    }
}

/// Frame loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Longest wait for the stop key between frames
    pub stop_poll: Duration,
    /// Log averaged timings every this many frames (0 disables)
    pub report_every: u64,
    /// Stop after this many frames
    pub max_frames: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            stop_poll: Duration::from_millis(1),
            report_every: 30,
            max_frames: None,
        }
    }
}
