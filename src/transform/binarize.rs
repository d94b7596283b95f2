use enough::Stop;

use super::require_direct;
use crate::bmp::Bitmap;
use crate::error::RasterError;
use crate::pixel::Color;

/// How a pixel is classified as black or white.
///
/// The two modes give different results on the same image and are kept
/// separate on purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinarizeMode {
    /// Red channel strictly below `threshold` (0–255) → black, else white.
    Direct { threshold: u8 },
    /// Luma at or below `255 * percent / 100` → black, else white.
    /// `percent` must be 0–100; 0 keeps only pure black, 100 makes everything black.
    Percentage { percent: u8 },
}

impl Default for BinarizeMode {
    fn default() -> Self {
        Self::Percentage { percent: 50 }
    }
}

impl BinarizeMode {
    fn classify(self, color: Color) -> Color {
        let black = match self {
            Self::Direct { threshold } => color.red < threshold,
            Self::Percentage { percent } => {
                u32::from(color.luma()) <= 255 * u32::from(percent) / 100
            }
        };
        if black { Color::BLACK } else { Color::WHITE }
    }

    fn validate(self) -> Result<(), RasterError> {
        match self {
            Self::Percentage { percent } if percent > 100 => Err(RasterError::InvalidParameter(
                alloc::format!("threshold percentage {percent} is above 100"),
            )),
            _ => Ok(()),
        }
    }
}

/// Threshold every pixel to pure black or pure white, in place.
///
/// Only 24/32-bit images are supported; 32-bit alpha is untouched.
pub fn binarize(
    bitmap: &mut Bitmap,
    mode: BinarizeMode,
    stop: impl Stop,
) -> Result<(), RasterError> {
    require_direct(bitmap.bit_depth(), "binarize")?;
    mode.validate()?;

    let mut raster = bitmap.raster_mut();
    for y in 0..raster.height() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for x in 0..raster.width() {
            let out = mode.classify(raster.color(x, y));
            raster.set_color(x, y, out);
        }
    }
    Ok(())
}
