use image::GrayImage;

/// Number of intensity levels in an 8-bit frame
pub const LEVELS: usize = 256;

/// Per-intensity pixel counts of one grayscale frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u32; LEVELS],
}

impl Histogram {
    /// Tabulate a frame. Always starts from zero; nothing carries over between frames.
    pub fn from_gray(gray: &GrayImage) -> Self {
        let _span = tracing::debug_span!("histogram").entered();

        let mut counts = [0u32; LEVELS];
        for pixel in gray.as_raw() {
            counts[*pixel as usize] += 1;
        }
        Self { counts }
    }

    pub fn from_counts(counts: [u32; LEVELS]) -> Self {
        Self { counts }
    }

    pub fn counts(&self) -> &[u32; LEVELS] {
        &self.counts
    }

    /// Number of pixels tabulated
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}
