//! Single-pass blob extraction over a binary mask.
//!
//! The frame is scanned in raster order. The first unvisited foreground pixel
//! opens a blob, which is then grown by walking downward one row at a time:
//!
//! 1. from the anchor column, walk left over unvisited foreground to find the
//!    row's left edge;
//! 2. sweep right to the end of the row, attaching every unvisited foreground
//!    pixel that touches the blob in this row (left, right, or two to the
//!    left) or in the previous row (same column or either diagonal);
//! 3. the first blob pixel of the row that has foreground directly below it
//!    becomes the anchor column of the next row. No such pixel ends the walk.
//!
//! Only one anchor column is followed per row, so a blob that forks upward
//! (a "U") is reported as several blobs. This is the expected behavior of
//! the detector, not exact connected-component labeling.
//!
//! Each blob is classified as soon as it is complete. A rejected blob hands
//! its id back, so the next blob opened in the frame reuses it.

use super::classifier::{BlobClassifier, Verdict};
use super::types::{Blob, BoundingBox, Mask, Point};
use crate::error::FrameError;

/// A finished blob together with the classifier's decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedBlob {
    pub blob: Blob,
    pub verdict: Verdict,
}

/// Working memory for [`scan_blobs`], sized once per capture session.
pub struct ScanBuffers {
    width: u32,
    height: u32,
    /// 0 for unvisited pixels, otherwise 1 + index of the claiming blob in scan order
    owners: Vec<u32>,
    /// Blob id per column of the row being swept
    row: Vec<u32>,
    /// Blob id per column of the row swept just before
    prev: Vec<u32>,
}

impl ScanBuffers {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            owners: vec![0; (width as usize) * (height as usize)],
            row: vec![0; width as usize],
            prev: vec![0; width as usize],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Clear every buffer in full
    pub fn reset(&mut self) {
        self.owners.fill(0);
        self.row.fill(0);
        self.prev.fill(0);
    }

    pub fn is_visited(&self, x: u32, y: u32) -> bool {
        self.owners[self.index(x, y)] != 0
    }

    /// Scan-order index of the blob that claimed `(x, y)` in the last scan
    pub fn owner(&self, x: u32, y: u32) -> Option<usize> {
        match self.owners[self.index(x, y)] {
            0 => None,
            ordinal => Some(ordinal as usize - 1),
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }
}

/// Find, measure and classify every blob of `mask`.
///
/// Returns all blobs in the order they were opened, rejected ones included.
/// `buffers` is cleared before scanning and must have the mask's dimensions.
pub fn scan_blobs(
    mask: &Mask,
    buffers: &mut ScanBuffers,
    classifier: &BlobClassifier,
) -> Result<Vec<ScannedBlob>, FrameError> {
    let _span = tracing::debug_span!("scan_blobs").entered();

    let (width, height) = mask.dimensions();
    if buffers.dimensions() != (width, height) {
        return Err(FrameError::DimensionMismatch {
            width: buffers.width,
            height: buffers.height,
            actual_width: width,
            actual_height: height,
        });
    }
    buffers.reset();

    let mut blob_count = 0u32;
    let mut found = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if !mask.is_foreground(x, y) || buffers.is_visited(x, y) {
                continue;
            }

            blob_count += 1;
            let ordinal = found.len() as u32 + 1;
            let blob = BlobWalk::open(mask, buffers, blob_count, ordinal, x, y).grow();

            let verdict = classifier.classify(&blob);
            if !verdict.is_accepted() {
                blob_count -= 1;
            }
            found.push(ScannedBlob { blob, verdict });
        }
    }

    tracing::debug!(
        "Scanned {} blobs, {} accepted",
        found.len(),
        found.iter().filter(|b| b.verdict.is_accepted()).count()
    );

    Ok(found)
}

/// State of the blob currently being grown
struct BlobWalk<'a> {
    mask: &'a Mask,
    buffers: &'a mut ScanBuffers,
    id: u32,
    ordinal: u32,
    seed: Point,
    pixel_count: u32,
    bbox: BoundingBox,
}

impl<'a> BlobWalk<'a> {
    fn open(
        mask: &'a Mask,
        buffers: &'a mut ScanBuffers,
        id: u32,
        ordinal: u32,
        x: u32,
        y: u32,
    ) -> Self {
        // Labels left over from an earlier blob may carry this id if it was reclaimed.
        buffers.prev.fill(0);
        buffers.row.fill(0);

        let seed = Point::new(x, y);
        let mut walk = Self {
            mask,
            buffers,
            id,
            ordinal,
            seed,
            pixel_count: 0,
            bbox: BoundingBox::at(seed),
        };
        walk.claim(x, y);
        walk
    }

    fn grow(mut self) -> Blob {
        let width = self.mask.width();
        let height = self.mask.height();
        let mut anchor = self.seed.x;
        let mut ly = self.seed.y;

        loop {
            if ly != self.seed.y {
                self.buffers.row.fill(0);
            }

            // Left edge of this row
            let mut left = anchor;
            while left > 0
                && self.mask.is_foreground(left - 1, ly)
                && !self.buffers.is_visited(left - 1, ly)
            {
                self.claim(left - 1, ly);
                left -= 1;
            }

            let has_below = ly + 1 < height;
            let mut next_anchor = None;

            for lx in left..width {
                let col = lx as usize;
                let attached = if self.buffers.row[col] == self.id {
                    true
                } else if self.mask.is_foreground(lx, ly)
                    && !self.buffers.is_visited(lx, ly)
                    && self.touches(col)
                {
                    self.claim(lx, ly);
                    true
                } else {
                    self.buffers.row[col] = 0;
                    false
                };

                if attached
                    && next_anchor.is_none()
                    && has_below
                    && self.mask.is_foreground(lx, ly + 1)
                {
                    next_anchor = Some(lx);
                }
            }

            let ScanBuffers { row, prev, .. } = &mut *self.buffers;
            prev.copy_from_slice(row.as_slice());

            match next_anchor {
                Some(col) => {
                    anchor = col;
                    ly += 1;
                }
                None => break,
            }
        }

        Blob {
            id: self.id,
            pixel_count: self.pixel_count,
            bbox: self.bbox,
        }
    }

    /// Whether column `col` of the current row is adjacent to this blob
    fn touches(&self, col: usize) -> bool {
        let is_ours = |buf: &[u32], c: Option<usize>| {
            c.and_then(|c| buf.get(c)).is_some_and(|&id| id == self.id)
        };
        let row = &self.buffers.row;
        let prev = &self.buffers.prev;

        is_ours(row, col.checked_sub(1))
            || is_ours(row, Some(col + 1))
            || is_ours(row, col.checked_sub(2))
            || is_ours(prev, col.checked_sub(1))
            || is_ours(prev, Some(col))
            || is_ours(prev, Some(col + 1))
    }

    fn claim(&mut self, x: u32, y: u32) {
        let idx = self.buffers.index(x, y);
        self.buffers.owners[idx] = self.ordinal;
        self.buffers.row[x as usize] = self.id;
        self.pixel_count += 1;
        self.bbox.include(x, y);
    }
}
