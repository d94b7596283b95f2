//! Cross and rectangle drawing.

use super::require_direct;
use crate::bmp::{BitDepth, Bitmap};
use crate::error::RasterError;
use crate::geometry::{BoundingBox, BoxAccumulator};
use crate::pixel::{Color, Pixel};
use crate::raster::{Raster, RasterMut};

/// Arm length of the center cross, in pixels from the center.
pub const CROSS_ARM: u32 = 10;

/// Channels below this count as near-black for [`draw_dark_region_rectangle`].
pub const DARK_LIMIT: u8 = 50;

/// Margin added around the near-black region before outlining it.
pub const RECT_MARGIN: u32 = 5;

/// Palette index used for the rectangle outline on 8-bit images.
pub const RECT_INDEX_INK: u8 = 200;

/// Draw a one-pixel outline of `bbox` with `ink`. The box is not filled.
///
/// Panics if `bbox` reaches outside the raster.
pub fn draw_outline(raster: &mut RasterMut<'_>, bbox: BoundingBox, ink: Pixel) {
    for x in bbox.min_x..=bbox.max_x {
        raster.set_pixel(x, bbox.min_y, ink);
        raster.set_pixel(x, bbox.max_y, ink);
    }
    for y in bbox.min_y..=bbox.max_y {
        raster.set_pixel(bbox.min_x, y, ink);
        raster.set_pixel(bbox.max_x, y, ink);
    }
}

/// Draw a red cross centered at `(width / 2, height / 2)`, arms clipped to the image.
pub fn draw_cross(bitmap: &mut Bitmap) -> Result<(), RasterError> {
    require_direct(bitmap.bit_depth(), "cross annotation")?;
    let mut raster = bitmap.raster_mut();
    let cx = i64::from(raster.width() / 2);
    let cy = i64::from(raster.height() / 2);
    let arm = i64::from(CROSS_ARM);
    for d in -arm..=arm {
        for (x, y) in [(cx + d, cy), (cx, cy + d)] {
            if raster.contains(x, y) {
                raster.set_color(x as u32, y as u32, Color::RED);
            }
        }
    }
    Ok(())
}

/// Bounding box of all near-black pixels, or `None` if there are none.
///
/// Direct color needs all three channels below [`DARK_LIMIT`]; 8-bit images
/// compare the index byte itself. 1 and 4-bit images have no near-black
/// pixels by this rule and always give `None`.
pub fn dark_region(raster: &Raster) -> Result<Option<BoundingBox>, RasterError> {
    let is_dark: fn(Pixel) -> bool = match raster.depth() {
        BitDepth::TwentyFour | BitDepth::ThirtyTwo => |p| match p {
            Pixel::Direct(c) => c.all_below(DARK_LIMIT),
            Pixel::Indexed(_) => false,
        },
        BitDepth::Eight => |p| p.reference_channel() < DARK_LIMIT,
        BitDepth::One | BitDepth::Four => {
            log::debug!(
                "{}-bit image has no near-black pixels to outline",
                raster.depth().bits()
            );
            return Ok(None);
        }
    };

    let mut acc = BoxAccumulator::default();
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            if is_dark(raster.pixel(x, y)) {
                acc.add(x, y);
            }
        }
    }
    Ok(acc.finish().map(|(bbox, _)| bbox))
}

/// Outline the near-black region, widened by [`RECT_MARGIN`].
///
/// Red on 24/32-bit images, index [`RECT_INDEX_INK`] on 8-bit ones. Returns
/// the drawn box; with no near-black pixel nothing is drawn and `None` is
/// returned. That is always the case for 1 and 4-bit images.
pub fn draw_dark_region_rectangle(
    bitmap: &mut Bitmap,
) -> Result<Option<BoundingBox>, RasterError> {
    let mut raster = bitmap.raster_mut();
    let Some(region) = dark_region(&raster)? else {
        return Ok(None);
    };
    let bbox = region.expand(RECT_MARGIN, raster.width(), raster.height());
    let ink = if raster.depth().is_indexed() {
        Pixel::Indexed(RECT_INDEX_INK)
    } else {
        Pixel::Direct(Color::RED)
    };
    draw_outline(&mut raster, bbox, ink);
    Ok(Some(bbox))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmp::RowOrder;

    fn white(width: u32, height: u32, depth: BitDepth) -> Bitmap {
        let mut bmp = Bitmap::new(width, height, depth, RowOrder::BottomUp).unwrap();
        let mut r = bmp.raster_mut();
        for y in 0..height {
            for x in 0..width {
                match depth {
                    BitDepth::Eight => r.set_index(x, y, 255),
                    _ => r.set_color(x, y, Color::WHITE),
                }
            }
        }
        bmp
    }

    #[test]
    fn cross_pixels() {
        let mut bmp = white(30, 30, BitDepth::TwentyFour);
        draw_cross(&mut bmp).unwrap();
        let r = bmp.raster();
        let mut red = 0;
        for y in 0..30 {
            for x in 0..30 {
                if r.color(x, y) == Color::RED {
                    red += 1;
                    assert!(x == 15 || y == 15);
                }
            }
        }
        // two arms of 21 pixels sharing the center
        assert_eq!(red, 41);
        assert_eq!(r.color(5, 15), Color::RED);
        assert_eq!(r.color(4, 15), Color::WHITE);
        assert_eq!(r.color(15, 25), Color::RED);
    }

    #[test]
    fn cross_clipped_on_small_image() {
        let mut bmp = white(3, 2, BitDepth::ThirtyTwo);
        draw_cross(&mut bmp).unwrap();
        // center (1, 1): whole row 1 and column 1
        let r = bmp.raster();
        assert_eq!(r.color(0, 1), Color::RED);
        assert_eq!(r.color(2, 1), Color::RED);
        assert_eq!(r.color(1, 0), Color::RED);
        assert_eq!(r.color(0, 0), Color::WHITE);
    }

    #[test]
    fn cross_rejects_palette_images() {
        let mut bmp = white(4, 4, BitDepth::Eight);
        assert!(matches!(
            draw_cross(&mut bmp),
            Err(RasterError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn rectangle_around_dark_block() {
        let mut bmp = white(40, 30, BitDepth::TwentyFour);
        for y in 10..15 {
            for x in 20..26 {
                bmp.raster_mut().set_color(x, y, Color::gray(10));
            }
        }
        let bbox = draw_dark_region_rectangle(&mut bmp).unwrap().unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                min_x: 15,
                min_y: 5,
                max_x: 30,
                max_y: 19
            }
        );
        let r = bmp.raster();
        assert_eq!(r.color(15, 5), Color::RED);
        assert_eq!(r.color(30, 19), Color::RED);
        assert_eq!(r.color(22, 5), Color::RED);
        // interior untouched
        assert_eq!(r.color(16, 6), Color::WHITE);
        assert_eq!(r.color(22, 12), Color::gray(10));
    }

    #[test]
    fn rectangle_margin_clamped() {
        let mut bmp = white(10, 10, BitDepth::Eight);
        bmp.raster_mut().set_index(1, 8, 0);
        let bbox = draw_dark_region_rectangle(&mut bmp).unwrap().unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                min_x: 0,
                min_y: 3,
                max_x: 6,
                max_y: 9
            }
        );
        assert_eq!(bmp.raster().index(0, 3), RECT_INDEX_INK);
    }

    #[test]
    fn rectangle_needs_all_channels_dark() {
        let mut bmp = white(10, 10, BitDepth::TwentyFour);
        bmp.raster_mut().set_color(4, 4, Color::new(0, 0, 60));
        assert_eq!(draw_dark_region_rectangle(&mut bmp).unwrap(), None);
        assert!((0..10).all(|y| (0..10).all(|x| bmp.raster().color(x, y) != Color::RED)));
    }

    #[test]
    fn rectangle_skips_sub_byte_depths() {
        for depth in [BitDepth::One, BitDepth::Four] {
            // index 0 of the gray ramp is black
            let mut bmp = Bitmap::new(8, 8, depth, RowOrder::BottomUp).unwrap();
            bmp.raster_mut().set_index(7, 7, 1);
            let before = bmp.clone();
            assert_eq!(draw_dark_region_rectangle(&mut bmp).unwrap(), None);
            assert_eq!(bmp, before);
        }
    }

    #[test]
    fn outline_on_standalone_raster() {
        let mut r = Raster::new(5, 4, BitDepth::Eight).unwrap();
        let bbox = BoundingBox {
            min_x: 1,
            min_y: 1,
            max_x: 3,
            max_y: 2,
        };
        draw_outline(&mut RasterMut::from(&mut r), bbox, Pixel::Indexed(7));
        assert_eq!(r.index(1, 1), 7);
        assert_eq!(r.index(3, 2), 7);
        assert_eq!(r.index(0, 0), 0);
        assert_eq!(r.index(4, 3), 0);
    }
}
