//! Per-frame marker analysis: histogram, Otsu threshold, binarization,
//! blob scanning and classification.

pub mod binarize;
pub mod classifier;
pub mod histogram;
pub mod otsu;
pub mod scanner;
pub mod types;

pub use binarize::{binarize, binarize_into};
pub use classifier::{BlobClassifier, Rejection, Verdict};
pub use histogram::Histogram;
pub use otsu::otsu_threshold;
pub use scanner::{scan_blobs, ScanBuffers, ScannedBlob};
pub use types::{Blob, BoundingBox, Mask, Point};
