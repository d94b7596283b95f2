//! Pixel-by-pixel comparison of two images with identical geometry.

use enough::Stop;

use crate::bmp::{BitDepth, Bitmap};
use crate::error::{Geometry, RasterError};
use crate::pixel::Color;
use crate::transform::require_direct;

/// Outcome of [`diff`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffResult {
    /// Pixels whose red channels differ.
    pub diff_count: usize,
    pub total_pixels: usize,
    /// `100 * diff_count / total_pixels`.
    pub diff_percentage: f64,
    /// `diff_percentage > threshold`.
    pub exceeds_threshold: bool,
}

impl DiffResult {
    /// Same as [`DiffResult::exceeds_threshold`].
    pub fn has_change(&self) -> bool {
        self.exceeds_threshold
    }
}

fn geometry(bitmap: &Bitmap) -> Geometry {
    Geometry {
        width: bitmap.width(),
        height: bitmap.height(),
        bit_depth: bitmap.bit_depth(),
    }
}

/// Compare `a` against `b` and build a change map.
///
/// The map is a copy of `a` (header, padding and all) where matching pixels
/// hold `a`'s red value as gray and differing pixels are red. At 32-bit the
/// alpha of every pixel is set to 255. `threshold` is a percentage.
pub fn diff(
    a: &Bitmap,
    b: &Bitmap,
    threshold: f64,
    stop: impl Stop,
) -> Result<(Bitmap, DiffResult), RasterError> {
    let (first, second) = (geometry(a), geometry(b));
    if first != second {
        return Err(RasterError::GeometryMismatch { first, second });
    }
    require_direct(first.bit_depth, "image comparison")?;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(RasterError::InvalidParameter(alloc::format!(
            "difference threshold must be a non-negative percentage, got {threshold}"
        )));
    }

    let mut out = a.clone();
    let (ra, rb) = (a.raster(), b.raster());
    let opaque = first.bit_depth == BitDepth::ThirtyTwo;
    let mut diff_count = 0usize;
    {
        let mut ro = out.raster_mut();
        for y in 0..ra.height() {
            if y % 16 == 0 {
                stop.check()?;
            }
            for x in 0..ra.width() {
                let va = ra.color(x, y).red;
                let vb = rb.color(x, y).red;
                if va == vb {
                    ro.set_color(x, y, Color::gray(va));
                } else {
                    ro.set_color(x, y, Color::RED);
                    diff_count += 1;
                }
                if opaque {
                    ro.set_alpha(x, y, 255);
                }
            }
        }
    }

    let total_pixels = ra.pixel_count();
    let diff_percentage = if total_pixels == 0 {
        0.0
    } else {
        100.0 * diff_count as f64 / total_pixels as f64
    };
    let result = DiffResult {
        diff_count,
        total_pixels,
        diff_percentage,
        exceeds_threshold: diff_percentage > threshold,
    };
    log::debug!(
        "{} of {} pixels differ ({:.2}%, threshold {:.2}%)",
        diff_count,
        total_pixels,
        diff_percentage,
        threshold
    );
    Ok((out, result))
}
