use enough::Stop;

use crate::bmp::{Bitmap, PaletteEntry};
use crate::error::RasterError;
use crate::pixel::Color;

/// Replace every color with its luma, in place.
///
/// Direct-color images are rewritten pixel by pixel (32-bit alpha untouched).
/// Palette images keep their index bytes; each palette entry is converted
/// instead and its reserved byte cleared.
pub fn grayscale(bitmap: &mut Bitmap, stop: impl Stop) -> Result<(), RasterError> {
    let (palette, mut raster) = bitmap.parts_mut();
    if let Some(palette) = palette {
        for entry in palette {
            *entry = PaletteEntry::from_color(Color::gray(entry.color().luma()));
        }
        return Ok(());
    }

    for y in 0..raster.height() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for x in 0..raster.width() {
            let gray = raster.color(x, y).luma();
            raster.set_color(x, y, Color::gray(gray));
        }
    }
    Ok(())
}
