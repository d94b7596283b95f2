//! Per-pixel transforms: grayscale, threshold binarization, annotation.

mod annotate;
mod binarize;
mod grayscale;

pub use annotate::{
    CROSS_ARM, DARK_LIMIT, RECT_INDEX_INK, RECT_MARGIN, dark_region, draw_cross,
    draw_dark_region_rectangle, draw_outline,
};
pub use binarize::{BinarizeMode, binarize};
pub use grayscale::grayscale;

use crate::bmp::BitDepth;
use crate::error::RasterError;

/// Fail with `UnsupportedFormat` unless the image holds direct 24/32-bit color.
pub(crate) fn require_direct(depth: BitDepth, operation: &str) -> Result<(), RasterError> {
    if depth.is_direct() {
        Ok(())
    } else {
        Err(RasterError::UnsupportedFormat(alloc::format!(
            "{operation} needs a 24 or 32-bit image, got {}-bit",
            depth.bits()
        )))
    }
}
