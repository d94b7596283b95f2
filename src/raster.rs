//! Owned row buffer with a bounds-asserting pixel accessor.
//!
//! Rows are kept exactly as stored in the file, padding included, so the
//! buffer can be written back without any re-layout. Row 0 is the first row
//! in the file, which is the bottom of the picture for bottom-up images.

use alloc::vec::Vec;
use core::ops::Deref;

use crate::bmp::{BitDepth, row_stride};
use crate::error::RasterError;
use crate::pixel::{Color, Pixel};

/// Raw pixel rows of a bitmap plus the metadata needed to address them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
    depth: BitDepth,
}

impl Raster {
    /// Zero-filled raster.
    pub fn new(width: u32, height: u32, depth: BitDepth) -> Result<Self, RasterError> {
        let (stride, len) = layout(width, height, depth)?;
        let mut data = try_alloc(len)?;
        data.resize(len, 0);
        Ok(Self {
            data,
            width,
            height,
            stride,
            depth,
        })
    }

    /// Wrap existing row bytes. `data.len()` must equal `row_stride * height`.
    pub fn from_bytes(
        data: Vec<u8>,
        width: u32,
        height: u32,
        depth: BitDepth,
    ) -> Result<Self, RasterError> {
        let (stride, len) = layout(width, height, depth)?;
        if data.len() != len {
            return Err(RasterError::TruncatedData {
                needed: len,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            depth,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row, including alignment padding.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Whether signed coordinates fall inside the image.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// One stored row, padding included.
    pub fn row(&self, y: u32) -> &[u8] {
        self.assert_row(y);
        let start = y as usize * self.stride;
        &self.data[start..start + self.stride]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        self.assert_row(y);
        let start = y as usize * self.stride;
        &mut self.data[start..start + self.stride]
    }

    /// Read a pixel.
    ///
    /// Panics if `(x, y)` is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        if self.depth.is_indexed() {
            Pixel::Indexed(self.index(x, y))
        } else {
            Pixel::Direct(self.color(x, y))
        }
    }

    /// Write a pixel. The variant must match the raster's depth.
    ///
    /// Panics if `(x, y)` is outside the image or the variant doesn't match.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        match pixel {
            Pixel::Direct(c) => self.set_color(x, y, c),
            Pixel::Indexed(i) => self.set_index(x, y, i),
        }
    }

    /// Red, green, blue of a 24/32-bit pixel.
    pub fn color(&self, x: u32, y: u32) -> Color {
        let off = self.direct_offset(x, y);
        let px = &self.data[off..off + 3];
        Color::new(px[2], px[1], px[0])
    }

    /// Overwrite red, green, blue. Alpha of a 32-bit pixel is left as is.
    pub fn set_color(&mut self, x: u32, y: u32, color: Color) {
        let off = self.direct_offset(x, y);
        let px = &mut self.data[off..off + 3];
        px[0] = color.blue;
        px[1] = color.green;
        px[2] = color.red;
    }

    /// Fourth byte of a 32-bit pixel; `None` for other depths.
    pub fn alpha(&self, x: u32, y: u32) -> Option<u8> {
        if self.depth != BitDepth::ThirtyTwo {
            return None;
        }
        Some(self.data[self.direct_offset(x, y) + 3])
    }

    /// Set the fourth byte of a 32-bit pixel. No-op for 24-bit.
    pub fn set_alpha(&mut self, x: u32, y: u32, alpha: u8) {
        if self.depth == BitDepth::ThirtyTwo {
            let off = self.direct_offset(x, y);
            self.data[off + 3] = alpha;
        }
    }

    /// Palette index of a 1/4/8-bit pixel.
    pub fn index(&self, x: u32, y: u32) -> u8 {
        let (off, shift, mask) = self.indexed_slot(x, y);
        (self.data[off] >> shift) & mask
    }

    /// Set a palette index. Bits beyond the depth are discarded.
    pub fn set_index(&mut self, x: u32, y: u32, index: u8) {
        let (off, shift, mask) = self.indexed_slot(x, y);
        let byte = &mut self.data[off];
        *byte = (*byte & !(mask << shift)) | ((index & mask) << shift);
    }

    /// Red channel for direct colors, the index for palette images.
    pub fn reference_channel(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y).reference_channel()
    }

    /// Typed view of one 24-bit row, padding excluded.
    #[cfg(feature = "rgb")]
    pub fn bgr_row(&self, y: u32) -> &[rgb::alt::BGR<u8>] {
        use rgb::AsPixels as _;
        assert_eq!(self.depth, BitDepth::TwentyFour, "bgr_row needs a 24-bit raster");
        let w = self.width as usize;
        self.row(y)[..w * 3].as_pixels()
    }

    /// Typed view of one 32-bit row.
    #[cfg(feature = "rgb")]
    pub fn bgra_row(&self, y: u32) -> &[rgb::alt::BGRA<u8>] {
        use rgb::AsPixels as _;
        assert_eq!(self.depth, BitDepth::ThirtyTwo, "bgra_row needs a 32-bit raster");
        let w = self.width as usize;
        self.row(y)[..w * 4].as_pixels()
    }

    // ── Addressing ──────────────────────────────────────────────────

    fn assert_row(&self, y: u32) {
        assert!(
            y < self.height,
            "row {y} out of bounds for {}x{} raster",
            self.width,
            self.height
        );
    }

    fn assert_in_bounds(&self, x: u32, y: u32) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} raster",
            self.width,
            self.height
        );
    }

    /// `y * stride + x * bytes_per_pixel` for 24/32-bit.
    fn direct_offset(&self, x: u32, y: u32) -> usize {
        self.assert_in_bounds(x, y);
        let bpp = match self.depth {
            BitDepth::TwentyFour => 3,
            BitDepth::ThirtyTwo => 4,
            other => panic!("direct color access on {}-bit raster", other.bits()),
        };
        y as usize * self.stride + x as usize * bpp
    }

    /// Byte offset, right shift and mask of a packed index.
    /// Sub-byte pixels are packed most significant bits first.
    fn indexed_slot(&self, x: u32, y: u32) -> (usize, u32, u8) {
        self.assert_in_bounds(x, y);
        let bits = match self.depth {
            BitDepth::One => 1u32,
            BitDepth::Four => 4,
            BitDepth::Eight => 8,
            other => panic!("palette index access on {}-bit raster", other.bits()),
        };
        let bit_pos = x as usize * bits as usize;
        let off = y as usize * self.stride + bit_pos / 8;
        let shift = 8 - bits - (bit_pos % 8) as u32;
        let mask = if bits == 8 { 0xFF } else { (1u8 << bits) - 1 };
        (off, shift, mask)
    }
}

/// Mutable view of a bitmap's raster.
///
/// Pixels and row bytes can be rewritten, but the raster itself cannot be
/// replaced, so its width, height and depth always agree with the header it
/// belongs to. Reads go through `Deref`.
#[derive(Debug)]
pub struct RasterMut<'a>(&'a mut Raster);

impl<'a> RasterMut<'a> {
    pub(crate) fn new(raster: &'a mut Raster) -> Self {
        Self(raster)
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.0.as_bytes_mut()
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        self.0.row_mut(y)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        self.0.set_pixel(x, y, pixel);
    }

    pub fn set_color(&mut self, x: u32, y: u32, color: Color) {
        self.0.set_color(x, y, color);
    }

    pub fn set_alpha(&mut self, x: u32, y: u32, alpha: u8) {
        self.0.set_alpha(x, y, alpha);
    }

    pub fn set_index(&mut self, x: u32, y: u32, index: u8) {
        self.0.set_index(x, y, index);
    }
}

impl<'a> From<&'a mut Raster> for RasterMut<'a> {
    fn from(raster: &'a mut Raster) -> Self {
        Self(raster)
    }
}

impl Deref for RasterMut<'_> {
    type Target = Raster;

    fn deref(&self) -> &Raster {
        self.0
    }
}

fn layout(width: u32, height: u32, depth: BitDepth) -> Result<(usize, usize), RasterError> {
    let too_large = || RasterError::DimensionsTooLarge { width, height };
    let stride = row_stride(width, depth).ok_or_else(too_large)?;
    let len = stride
        .checked_mul(height as usize)
        .ok_or_else(too_large)?;
    Ok((stride, len))
}

/// Empty vector with room for `len` bytes, or `AllocationFailure`.
pub(crate) fn try_alloc<T>(len: usize) -> Result<Vec<T>, RasterError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| RasterError::AllocationFailure {
            bytes: len.saturating_mul(core::mem::size_of::<T>()),
        })?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_24_storage_is_bgr() {
        let mut r = Raster::new(2, 2, BitDepth::TwentyFour).unwrap();
        r.set_color(1, 1, Color::new(10, 20, 30));
        // stride 8: row 1 starts at 8, pixel 1 at +3
        assert_eq!(&r.as_bytes()[11..14], &[30, 20, 10]);
        assert_eq!(r.color(1, 1), Color::new(10, 20, 30));
        assert_eq!(r.alpha(1, 1), None);
    }

    #[test]
    fn direct_32_keeps_alpha() {
        let mut r = Raster::new(1, 1, BitDepth::ThirtyTwo).unwrap();
        r.set_alpha(0, 0, 77);
        r.set_color(0, 0, Color::RED);
        assert_eq!(r.as_bytes(), &[0, 0, 255, 77]);
        assert_eq!(r.alpha(0, 0), Some(77));
    }

    #[test]
    fn one_bit_is_msb_first() {
        let mut r = Raster::new(10, 1, BitDepth::One).unwrap();
        r.set_index(0, 0, 1);
        r.set_index(9, 0, 1);
        assert_eq!(r.as_bytes()[0], 0b1000_0000);
        assert_eq!(r.as_bytes()[1], 0b0100_0000);
        assert_eq!(r.index(0, 0), 1);
        assert_eq!(r.index(1, 0), 0);
        assert_eq!(r.index(9, 0), 1);
        r.set_index(0, 0, 0);
        assert_eq!(r.as_bytes()[0], 0);
    }

    #[test]
    fn four_bit_nibbles() {
        let mut r = Raster::new(3, 1, BitDepth::Four).unwrap();
        r.set_index(0, 0, 0xA);
        r.set_index(1, 0, 0x5);
        r.set_index(2, 0, 0xF);
        assert_eq!(&r.as_bytes()[..2], &[0xA5, 0xF0]);
        assert_eq!(r.pixel(2, 0), Pixel::Indexed(0xF));
    }

    #[test]
    fn eight_bit_index() {
        let mut r = Raster::new(3, 2, BitDepth::Eight).unwrap();
        r.set_pixel(2, 1, Pixel::Indexed(254));
        assert_eq!(r.as_bytes()[4 + 2], 254);
        assert_eq!(r.reference_channel(2, 1), 254);
    }

    #[test]
    fn from_bytes_checks_length() {
        let err = Raster::from_bytes(alloc::vec![0; 7], 2, 1, BitDepth::TwentyFour);
        assert!(matches!(
            err,
            Err(RasterError::TruncatedData {
                needed: 8,
                actual: 7
            })
        ));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn out_of_bounds_panics() {
        let r = Raster::new(4, 4, BitDepth::TwentyFour).unwrap();
        let _ = r.color(4, 0);
    }

    #[test]
    #[should_panic(expected = "direct color access")]
    fn color_on_indexed_panics() {
        let r = Raster::new(4, 4, BitDepth::Eight).unwrap();
        let _ = r.color(0, 0);
    }

    #[test]
    fn contains_handles_negatives() {
        let r = Raster::new(4, 3, BitDepth::Eight).unwrap();
        assert!(r.contains(0, 0));
        assert!(r.contains(3, 2));
        assert!(!r.contains(-1, 0));
        assert!(!r.contains(4, 0));
        assert!(!r.contains(0, 3));
    }

    #[test]
    fn view_writes_through_and_reads_by_deref() {
        let mut r = Raster::new(3, 2, BitDepth::TwentyFour).unwrap();
        let mut view = RasterMut::from(&mut r);
        view.set_color(2, 1, Color::RED);
        view.row_mut(0)[0] = 9;
        assert_eq!(view.color(2, 1), Color::RED);
        assert_eq!((view.width(), view.height()), (3, 2));
        assert_eq!(r.as_bytes()[0], 9);
        assert_eq!(r.color(2, 1), Color::RED);
    }
}
