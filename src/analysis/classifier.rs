use crate::config::DetectorConfig;

use super::types::Blob;

/// Why a blob was not accepted as a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooSmall,
    TooLarge,
    /// Bounding box one row tall, aspect ratio undefined
    Flat,
    AspectOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Size and aspect filter that separates marker candidates from noise.
///
/// Every bound is exclusive.
#[derive(Debug, Clone, Copy)]
pub struct BlobClassifier {
    min_size: u32,
    max_size: u32,
    min_aspect: f64,
    max_aspect: f64,
}

impl BlobClassifier {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            min_size: config.min_blob_size,
            max_size: config.max_blob_size,
            min_aspect: config.min_aspect,
            max_aspect: config.max_aspect,
        }
    }

    pub fn classify(&self, blob: &Blob) -> Verdict {
        let n = blob.pixel_count;
        if n <= self.min_size {
            return Verdict::Rejected(Rejection::TooSmall);
        }
        if n >= self.max_size {
            return Verdict::Rejected(Rejection::TooLarge);
        }

        match blob.bbox.aspect_ratio() {
            None => Verdict::Rejected(Rejection::Flat),
            Some(aspect) if aspect > self.min_aspect && aspect < self.max_aspect => {
                Verdict::Accepted
            }
            Some(_) => Verdict::Rejected(Rejection::AspectOutOfRange),
        }
    }
}

impl Default for BlobClassifier {
    fn default() -> Self {
        Self::new(&DetectorConfig::default())
    }
}
