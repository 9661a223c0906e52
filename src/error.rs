use thiserror::Error;

/// Invalid detector or run configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("minimum blob size {min} must be below maximum blob size {max}")]
    BlobSizeRange { min: u32, max: u32 },

    #[error("aspect bounds must satisfy 0 < min < max, got {min}..{max}")]
    AspectRange { min: f64, max: f64 },

    #[error("quit key must be an ASCII letter or digit, got {0:?}")]
    QuitKey(char),
}

/// A frame that cannot be analysed by the current session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame is {actual_width}x{actual_height}, session was sized for {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("frame has zero area")]
    Empty,
}
