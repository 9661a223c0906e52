/// Pixel coordinate inside a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box given by its two inclusive corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Degenerate box covering a single pixel
    pub fn at(point: Point) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grow the box so that it covers `(x, y)`
    pub fn include(&mut self, x: u32, y: u32) {
        self.min.x = self.min.x.min(x);
        self.min.y = self.min.y.min(y);
        self.max.x = self.max.x.max(x);
        self.max.y = self.max.y.max(y);
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.min.x..=self.max.x).contains(&x) && (self.min.y..=self.max.y).contains(&y)
    }

    /// Corner-to-corner distance along x. A single column spans 0.
    pub fn span_x(&self) -> u32 {
        self.max.x.abs_diff(self.min.x)
    }

    /// Corner-to-corner distance along y. A single row spans 0.
    pub fn span_y(&self) -> u32 {
        self.max.y.abs_diff(self.min.y)
    }

    /// `span_x / span_y`, or `None` when the box is a single row tall
    pub fn aspect_ratio(&self) -> Option<f64> {
        match self.span_y() {
            0 => None,
            h => Some(self.span_x() as f64 / h as f64),
        }
    }
}

/// A connected run of foreground pixels found by the scanner.
///
/// `id` is only meaningful while the frame is being scanned: ids of rejected
/// blobs are handed out again to the next blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blob {
    pub id: u32,
    pub pixel_count: u32,
    pub bbox: BoundingBox,
}

/// Foreground/background map for one frame, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Mask {
    /// All-background mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; (width as usize) * (height as usize)],
        }
    }

    /// Build a mask from a predicate over pixel coordinates
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.set(x, y, f(x, y));
            }
        }
        mask
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, foreground: bool) {
        let idx = self.index(x, y);
        self.data[idx] = foreground;
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [bool] {
        &mut self.data
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize) * (self.width as usize) + x as usize
    }
}
