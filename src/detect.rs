//! Connected-component detection over dark pixels.
//!
//! A pixel is dark when its reference channel (red, or the palette index) is
//! below [`DARK_THRESHOLD`]. Components are 8-connected and found with a
//! breadth-first fill, so stack depth does not grow with object size.
//!
//! Rows are addressed as stored: for a bottom-up file, `y = 0` is the bottom
//! row of the picture.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use enough::Stop;

use crate::bmp::{BitDepth, Bitmap, PaletteEntry};
use crate::error::RasterError;
use crate::geometry::BoxAccumulator;
use crate::pixel::{Color, Pixel};
use crate::raster::{Raster, try_alloc};
use crate::transform::draw_outline;

pub use crate::geometry::BoundingBox;

/// Reference channel values below this are dark.
pub const DARK_THRESHOLD: u8 = 128;

/// Palette slot used to outline objects on 8-bit images. It is overwritten
/// with pure red.
pub const OBJECT_INDEX_INK: u8 = 254;

const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

// ── Visited mask ────────────────────────────────────────────────────

/// One flag per pixel. Coordinates outside the grid read as visited, which
/// keeps the fill from stepping off the image.
#[derive(Clone, Debug)]
pub struct VisitedMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl VisitedMask {
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let len = width as usize * height as usize;
        let mut bits = try_alloc(len)?;
        bits.resize(len, false);
        Ok(Self {
            width,
            height,
            bits,
        })
    }

    fn slot(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// `true` for visited pixels and for anything out of bounds.
    pub fn is_visited(&self, x: i64, y: i64) -> bool {
        self.slot(x, y).is_none_or(|i| self.bits[i])
    }

    /// Mark a pixel. Out-of-bounds coordinates are ignored.
    pub fn mark(&mut self, x: i64, y: i64) {
        if let Some(i) = self.slot(x, y) {
            self.bits[i] = true;
        }
    }
}

// ── Options and results ─────────────────────────────────────────────

/// Filtering and annotation settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectOptions {
    /// Smallest component, in pixels, that counts as an object.
    pub min_pixels: usize,
    /// Objects beyond this many are counted but not recorded.
    pub max_objects: usize,
    /// Extra pixels around each box when outlining.
    pub margin: u32,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            min_pixels: 50,
            max_objects: 50,
            margin: 2,
        }
    }
}

impl DetectOptions {
    pub fn with_min_pixels(mut self, n: usize) -> Self {
        self.min_pixels = n;
        self
    }

    pub fn with_max_objects(mut self, n: usize) -> Self {
        self.max_objects = n;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectedObject {
    /// Tight box around the component, before any margin.
    pub bbox: BoundingBox,
    pub pixel_count: usize,
}

/// What a detection run found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Detection {
    /// Retained objects in scan order.
    pub objects: Vec<DetectedObject>,
    /// Components smaller than `min_pixels`.
    pub rejected_small: usize,
    /// Components large enough but past `max_objects`.
    pub dropped_over_cap: usize,
}

impl Detection {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

// ── Detector ────────────────────────────────────────────────────────

/// Progress of a [`ComponentDetector`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DetectState {
    #[default]
    Idle,
    Scanning,
    Labeling,
    Annotating,
    Done,
}

/// Scan, label and optionally annotate in a fixed order.
#[derive(Clone, Debug, Default)]
pub struct ComponentDetector {
    options: DetectOptions,
    state: DetectState,
}

impl ComponentDetector {
    pub fn new(options: DetectOptions) -> Self {
        Self {
            options,
            state: DetectState::Idle,
        }
    }

    pub fn options(&self) -> &DetectOptions {
        &self.options
    }

    pub fn state(&self) -> DetectState {
        self.state
    }

    fn enter(&mut self, next: DetectState) {
        log::trace!("detector {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Find objects without touching the image.
    pub fn detect(&mut self, bitmap: &Bitmap, stop: &dyn Stop) -> Result<Detection, RasterError> {
        require_detectable(bitmap.bit_depth())?;
        self.state = DetectState::Idle;
        let found = self.scan(bitmap.raster(), stop)?;
        self.enter(DetectState::Done);
        Ok(found)
    }

    /// Find objects and outline each one.
    pub fn mark(
        &mut self,
        bitmap: &mut Bitmap,
        stop: &dyn Stop,
    ) -> Result<Detection, RasterError> {
        require_detectable(bitmap.bit_depth())?;
        self.state = DetectState::Idle;
        let found = self.scan(bitmap.raster(), stop)?;
        self.enter(DetectState::Annotating);
        self.annotate(bitmap, &found);
        self.enter(DetectState::Done);
        Ok(found)
    }

    fn scan(&mut self, raster: &Raster, stop: &dyn Stop) -> Result<Detection, RasterError> {
        self.enter(DetectState::Scanning);
        let (width, height) = (raster.width(), raster.height());
        let mut visited = VisitedMask::new(width, height)?;
        let mut queue: VecDeque<(u32, u32)> = VecDeque::new();
        queue
            .try_reserve_exact(raster.pixel_count())
            .map_err(|_| RasterError::AllocationFailure {
                bytes: raster
                    .pixel_count()
                    .saturating_mul(core::mem::size_of::<(u32, u32)>()),
            })?;

        let mut found = Detection::default();
        for y in 0..height {
            if y % 16 == 0 {
                stop.check()?;
            }
            for x in 0..width {
                let (sx, sy) = (i64::from(x), i64::from(y));
                if visited.is_visited(sx, sy) {
                    continue;
                }
                if !is_dark(raster, x, y) {
                    visited.mark(sx, sy);
                    continue;
                }
                self.enter(DetectState::Labeling);
                let component = fill(raster, &mut visited, &mut queue, x, y);
                self.record(&mut found, component);
                self.enter(DetectState::Scanning);
            }
        }

        if found.dropped_over_cap > 0 {
            log::warn!(
                "{} objects past the cap of {} were not recorded",
                found.dropped_over_cap,
                self.options.max_objects
            );
        }
        log::debug!(
            "found {} objects ({} below {} px)",
            found.objects.len(),
            found.rejected_small,
            self.options.min_pixels
        );
        Ok(found)
    }

    fn record(&self, found: &mut Detection, component: BoxAccumulator) {
        let Some((bbox, pixel_count)) = component.finish() else {
            return;
        };
        if pixel_count < self.options.min_pixels {
            found.rejected_small += 1;
        } else if found.objects.len() >= self.options.max_objects {
            found.dropped_over_cap += 1;
        } else {
            log::debug!(
                "object {}: ({}, {})-({}, {}), {} px",
                found.objects.len() + 1,
                bbox.min_x,
                bbox.min_y,
                bbox.max_x,
                bbox.max_y,
                pixel_count
            );
            found.objects.push(DetectedObject { bbox, pixel_count });
        }
    }

    fn annotate(&self, bitmap: &mut Bitmap, found: &Detection) {
        let (palette, mut raster) = bitmap.parts_mut();
        let ink = match palette {
            Some(entries) => {
                // 8-bit palettes always hold 256 entries
                if let Some(slot) = entries.get_mut(usize::from(OBJECT_INDEX_INK)) {
                    *slot = PaletteEntry::from_color(Color::RED);
                }
                Pixel::Indexed(OBJECT_INDEX_INK)
            }
            None => Pixel::Direct(Color::RED),
        };
        for object in &found.objects {
            let bbox = object
                .bbox
                .expand(self.options.margin, raster.width(), raster.height());
            draw_outline(&mut raster, bbox, ink);
        }
    }
}

fn require_detectable(depth: BitDepth) -> Result<(), RasterError> {
    match depth {
        BitDepth::Eight | BitDepth::TwentyFour | BitDepth::ThirtyTwo => Ok(()),
        other => Err(RasterError::UnsupportedFormat(alloc::format!(
            "object detection needs an 8, 24 or 32-bit image, got {}-bit",
            other.bits()
        ))),
    }
}

fn is_dark(raster: &Raster, x: u32, y: u32) -> bool {
    raster.reference_channel(x, y) < DARK_THRESHOLD
}

/// Breadth-first fill from a dark seed. Pixels are marked when queued.
fn fill(
    raster: &Raster,
    visited: &mut VisitedMask,
    queue: &mut VecDeque<(u32, u32)>,
    x: u32,
    y: u32,
) -> BoxAccumulator {
    let mut acc = BoxAccumulator::default();
    queue.clear();
    visited.mark(i64::from(x), i64::from(y));
    queue.push_back((x, y));

    while let Some((cx, cy)) = queue.pop_front() {
        acc.add(cx, cy);
        for (dx, dy) in NEIGHBORS {
            let nx = i64::from(cx) + dx;
            let ny = i64::from(cy) + dy;
            if visited.is_visited(nx, ny) {
                continue;
            }
            // in bounds: is_visited is true outside the grid
            let (ux, uy) = (nx as u32, ny as u32);
            if is_dark(raster, ux, uy) {
                visited.mark(nx, ny);
                queue.push_back((ux, uy));
            }
        }
    }
    acc
}

/// Find dark objects without modifying the image.
pub fn detect_objects(
    bitmap: &Bitmap,
    options: &DetectOptions,
    stop: impl Stop,
) -> Result<Detection, RasterError> {
    ComponentDetector::new(*options).detect(bitmap, &stop)
}

/// Find dark objects and outline each in red, widened by `options.margin`.
pub fn mark_objects(
    bitmap: &mut Bitmap,
    options: &DetectOptions,
    stop: impl Stop,
) -> Result<Detection, RasterError> {
    ComponentDetector::new(*options).mark(bitmap, &stop)
}
