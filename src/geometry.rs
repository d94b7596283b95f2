/// Axis-aligned rectangle with inclusive corners, in stored-row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// Box covering a single pixel.
    pub const fn point(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Grow to cover `(x, y)`.
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub const fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub const fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Grow by `margin` on every side, clamped to a `width` x `height` image.
    pub fn expand(self, margin: u32, width: u32, height: u32) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(margin),
            min_y: self.min_y.saturating_sub(margin),
            max_x: self.max_x.saturating_add(margin).min(width.saturating_sub(1)),
            max_y: self.max_y.saturating_add(margin).min(height.saturating_sub(1)),
        }
    }
}

/// Running box over a set of pixels. Stays empty until the first pixel.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BoxAccumulator {
    bbox: Option<BoundingBox>,
    pixels: usize,
}

impl BoxAccumulator {
    pub(crate) fn add(&mut self, x: u32, y: u32) {
        match &mut self.bbox {
            Some(b) => b.include(x, y),
            None => self.bbox = Some(BoundingBox::point(x, y)),
        }
        self.pixels += 1;
    }

    /// The box, or `None` if no pixel was ever added.
    pub(crate) fn finish(self) -> Option<(BoundingBox, usize)> {
        self.bbox.map(|b| (b, self.pixels))
    }
}
