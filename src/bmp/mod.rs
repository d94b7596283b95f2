//! Uncompressed BMP container: headers, palette and rows.

mod decode;
mod encode;
mod header;
mod palette;

pub use decode::{read_header, read_palette, read_raster};
pub use encode::{write_header, write_palette, write_raster};
pub use header::{
    BitDepth, FILE_HEADER_SIZE, INFO_HEADER_SIZE, ImageHeader, MAGIC, RowOrder, row_stride,
};
pub use palette::{Palette, PaletteEntry};

use crate::error::RasterError;
use crate::limits::Limits;
use crate::raster::{Raster, RasterMut, try_alloc};
use alloc::vec::Vec;
use enough::Stop;

/// A loaded bitmap: header, optional palette, and rows.
///
/// Any bytes between the palette and the pixel data are carried along so
/// that [`Bitmap::encode`] reproduces the source file exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    header: ImageHeader,
    palette: Option<Palette>,
    gap: Vec<u8>,
    raster: Raster,
}

impl Bitmap {
    /// Blank image: black pixels for direct color, index 0 of a gray ramp otherwise.
    pub fn new(
        width: u32,
        height: u32,
        depth: BitDepth,
        order: RowOrder,
    ) -> Result<Self, RasterError> {
        let header = ImageHeader::new(width, height, depth, order)?;
        let palette = if depth.is_indexed() {
            Some(Palette::gray_ramp(depth)?)
        } else {
            None
        };
        let raster = Raster::new(width, height, depth)?;
        Ok(Self {
            header,
            palette,
            gap: Vec::new(),
            raster,
        })
    }

    /// Replace the palette of an indexed image.
    pub fn with_palette(mut self, palette: Palette) -> Result<Self, RasterError> {
        if palette.len() != self.header.bit_depth.palette_len() {
            return Err(RasterError::InvalidParameter(alloc::format!(
                "{}-entry palette for {}-bit image",
                palette.len(),
                self.header.bit_depth.bits()
            )));
        }
        self.palette = Some(palette);
        Ok(self)
    }

    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Palette entries, editable in place. The entry count is fixed by the depth.
    pub fn palette_mut(&mut self) -> Option<&mut [PaletteEntry]> {
        self.palette.as_mut().map(Palette::entries_mut)
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Pixel access that keeps the raster's geometry tied to the header.
    pub fn raster_mut(&mut self) -> RasterMut<'_> {
        RasterMut::new(&mut self.raster)
    }

    /// Palette entries and raster borrowed mutably at once.
    pub fn parts_mut(&mut self) -> (Option<&mut [PaletteEntry]>, RasterMut<'_>) {
        (
            self.palette.as_mut().map(Palette::entries_mut),
            RasterMut::new(&mut self.raster),
        )
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.header.bit_depth
    }

    /// Decode a complete file from memory.
    pub fn decode(data: &[u8]) -> Result<Self, RasterError> {
        decode(data, None, &enough::Unstoppable)
    }

    /// Serialize header, palette, gap and rows.
    pub fn encode(&self) -> Result<Vec<u8>, RasterError> {
        encode(self, &enough::Unstoppable)
    }

    /// Byte length of the encoded file.
    pub fn encoded_len(&self) -> usize {
        FILE_HEADER_SIZE
            + self.header.info_size as usize
            + self.palette.as_ref().map_or(0, Palette::byte_len)
            + self.gap.len()
            + self.raster.as_bytes().len()
    }
}

pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Bitmap, RasterError> {
    let header = read_header(data)?;
    let palette = read_palette(data, &header)?;
    let gap = decode::read_gap(data, &header)?;
    stop.check()?;
    let raster = read_raster(data, &header, limits, stop)?;
    log::debug!(
        "decoded {}x{} {}-bit BMP ({:?}, stride {})",
        raster.width(),
        raster.height(),
        header.bit_depth.bits(),
        header.row_order(),
        raster.stride()
    );
    Ok(Bitmap {
        header,
        palette,
        gap,
        raster,
    })
}

pub(crate) fn encode(bitmap: &Bitmap, stop: &dyn Stop) -> Result<Vec<u8>, RasterError> {
    let mut out = try_alloc(bitmap.encoded_len())?;
    write_header(&mut out, &bitmap.header);
    if let Some(palette) = &bitmap.palette {
        write_palette(&mut out, palette);
    }
    out.extend_from_slice(&bitmap.gap);
    stop.check()?;
    write_raster(&mut out, &bitmap.raster, stop)?;
    Ok(out)
}
