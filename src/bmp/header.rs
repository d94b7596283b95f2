//! BITMAPFILEHEADER + BITMAPINFOHEADER model.

use alloc::vec::Vec;

use crate::error::RasterError;

/// File signature, `BM` little-endian.
pub const MAGIC: [u8; 2] = *b"BM";

/// Size of the BITMAPFILEHEADER.
pub const FILE_HEADER_SIZE: usize = 14;

/// Size of the BITMAPINFOHEADER, the smallest info header accepted.
pub const INFO_HEADER_SIZE: usize = 40;

/// Supported bits per pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitDepth {
    One,
    Four,
    Eight,
    TwentyFour,
    ThirtyTwo,
}

impl BitDepth {
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            1 => Some(Self::One),
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            24 => Some(Self::TwentyFour),
            32 => Some(Self::ThirtyTwo),
            _ => None,
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            Self::One => 1,
            Self::Four => 4,
            Self::Eight => 8,
            Self::TwentyFour => 24,
            Self::ThirtyTwo => 32,
        }
    }

    /// Palette-indexed depths (1, 4, 8).
    pub fn is_indexed(self) -> bool {
        matches!(self, Self::One | Self::Four | Self::Eight)
    }

    /// Direct-color depths (24, 32).
    pub fn is_direct(self) -> bool {
        !self.is_indexed()
    }

    /// Palette entries required by this depth: `2^bits` for indexed, 0 otherwise.
    pub fn palette_len(self) -> usize {
        if self.is_indexed() {
            1 << self.bits()
        } else {
            0
        }
    }
}

/// Bytes per raster row, padded to a 32-bit boundary.
///
/// `ceil(width * bits / 32) * 4`. Returns `None` on overflow.
pub fn row_stride(width: u32, depth: BitDepth) -> Option<usize> {
    (width as usize)
        .checked_mul(usize::from(depth.bits()))
        .map(|bits| bits.div_ceil(32))
        .and_then(|words| words.checked_mul(4))
}

/// Row order encoded by the sign of the header height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// Positive height: first stored row is the bottom of the picture.
    #[default]
    BottomUp,
    /// Negative height: first stored row is the top of the picture.
    TopDown,
}

/// Parsed file header and info header.
///
/// Every field is kept as read so that writing the header back reproduces
/// the input bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageHeader {
    pub file_size: u32,
    pub reserved: [u16; 2],
    /// Byte offset of the pixel data from the start of the file.
    pub data_offset: u32,
    pub info_size: u32,
    pub width: i32,
    /// Signed; negative means top-down rows.
    pub height: i32,
    pub planes: u16,
    pub bit_depth: BitDepth,
    /// Always 0 (BI_RGB) for a header accepted by the decoder.
    pub compression: u32,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
    /// Bytes of a V4/V5 info header past the first 40, kept verbatim.
    pub info_extra: Vec<u8>,
}

impl ImageHeader {
    /// Header for a fresh uncompressed image with a standard 40-byte info header.
    pub fn new(
        width: u32,
        height: u32,
        depth: BitDepth,
        order: RowOrder,
    ) -> Result<Self, RasterError> {
        let too_large = || RasterError::DimensionsTooLarge { width, height };
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidHeader(alloc::format!(
                "image dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let signed_w = i32::try_from(width).map_err(|_| too_large())?;
        let signed_h = i32::try_from(height).map_err(|_| too_large())?;
        let raster_len = row_stride(width, depth)
            .and_then(|s| s.checked_mul(height as usize))
            .ok_or_else(too_large)?;
        let data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE + depth.palette_len() * 4;
        let file_size = u32::try_from(data_offset + raster_len).map_err(|_| too_large())?;

        Ok(Self {
            file_size,
            reserved: [0, 0],
            data_offset: data_offset as u32,
            info_size: INFO_HEADER_SIZE as u32,
            width: signed_w,
            height: match order {
                RowOrder::BottomUp => signed_h,
                RowOrder::TopDown => -signed_h,
            },
            planes: 1,
            bit_depth: depth,
            compression: 0,
            image_size: raster_len as u32,
            // 72 DPI
            x_pixels_per_meter: 2835,
            y_pixels_per_meter: 2835,
            colors_used: 0,
            colors_important: 0,
            info_extra: Vec::new(),
        })
    }

    /// Width in pixels. Positive for any header accepted by the decoder.
    pub fn width(&self) -> u32 {
        self.width.unsigned_abs()
    }

    /// Height in pixels, with the row-order sign removed.
    pub fn height(&self) -> u32 {
        self.height.unsigned_abs()
    }

    pub fn row_order(&self) -> RowOrder {
        if self.height < 0 {
            RowOrder::TopDown
        } else {
            RowOrder::BottomUp
        }
    }

    /// Bytes per stored row.
    pub fn row_stride(&self) -> Result<usize, RasterError> {
        row_stride(self.width(), self.bit_depth).ok_or_else(|| self.too_large())
    }

    /// Total raster bytes: `row_stride * height`.
    pub fn raster_len(&self) -> Result<usize, RasterError> {
        self.row_stride()?
            .checked_mul(self.height() as usize)
            .ok_or_else(|| self.too_large())
    }

    /// Offset of the palette block, right after the info header.
    pub fn palette_offset(&self) -> usize {
        FILE_HEADER_SIZE + self.info_size as usize
    }

    fn too_large(&self) -> RasterError {
        RasterError::DimensionsTooLarge {
            width: self.width(),
            height: self.height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_matches_formula() {
        for depth in [
            BitDepth::One,
            BitDepth::Four,
            BitDepth::Eight,
            BitDepth::TwentyFour,
            BitDepth::ThirtyTwo,
        ] {
            for width in 1..=70u32 {
                let bits = width as usize * usize::from(depth.bits());
                let expected = bits.div_ceil(32) * 4;
                assert_eq!(row_stride(width, depth), Some(expected), "{depth:?} w={width}");
                assert_eq!(expected % 4, 0);
            }
        }
    }

    #[test]
    fn stride_known_values() {
        assert_eq!(row_stride(1, BitDepth::One), Some(4));
        assert_eq!(row_stride(33, BitDepth::One), Some(8));
        assert_eq!(row_stride(3, BitDepth::TwentyFour), Some(12));
        assert_eq!(row_stride(5, BitDepth::TwentyFour), Some(16));
        assert_eq!(row_stride(5, BitDepth::Eight), Some(8));
        assert_eq!(row_stride(3, BitDepth::ThirtyTwo), Some(12));
    }

    #[test]
    fn new_header_layout() {
        let h = ImageHeader::new(3, 2, BitDepth::Eight, RowOrder::TopDown).unwrap();
        assert_eq!(h.data_offset, 14 + 40 + 256 * 4);
        assert_eq!(h.image_size, 8);
        assert_eq!(h.file_size, h.data_offset + 8);
        assert_eq!(h.height, -2);
        assert_eq!(h.height(), 2);
        assert_eq!(h.row_order(), RowOrder::TopDown);
    }

    #[test]
    fn palette_len_per_depth() {
        assert_eq!(BitDepth::One.palette_len(), 2);
        assert_eq!(BitDepth::Four.palette_len(), 16);
        assert_eq!(BitDepth::Eight.palette_len(), 256);
        assert_eq!(BitDepth::TwentyFour.palette_len(), 0);
        assert_eq!(BitDepth::ThirtyTwo.palette_len(), 0);
    }
}
