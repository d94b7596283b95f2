//! BMP writer: the inverse of the reader, field for field.

use alloc::vec::Vec;
use enough::Stop;

use super::header::ImageHeader;
use super::palette::Palette;
use crate::error::RasterError;
use crate::raster::Raster;

/// Append the 14-byte file header and the info header (including any V4/V5 tail).
pub fn write_header(out: &mut Vec<u8>, header: &ImageHeader) {
    // File header (14 bytes)
    out.extend_from_slice(&super::header::MAGIC);
    out.extend_from_slice(&header.file_size.to_le_bytes());
    out.extend_from_slice(&header.reserved[0].to_le_bytes());
    out.extend_from_slice(&header.reserved[1].to_le_bytes());
    out.extend_from_slice(&header.data_offset.to_le_bytes());

    // DIB header (BITMAPINFOHEADER, 40 bytes)
    out.extend_from_slice(&header.info_size.to_le_bytes());
    out.extend_from_slice(&header.width.to_le_bytes());
    out.extend_from_slice(&header.height.to_le_bytes());
    out.extend_from_slice(&header.planes.to_le_bytes());
    out.extend_from_slice(&header.bit_depth.bits().to_le_bytes());
    out.extend_from_slice(&header.compression.to_le_bytes());
    out.extend_from_slice(&header.image_size.to_le_bytes());
    out.extend_from_slice(&header.x_pixels_per_meter.to_le_bytes());
    out.extend_from_slice(&header.y_pixels_per_meter.to_le_bytes());
    out.extend_from_slice(&header.colors_used.to_le_bytes());
    out.extend_from_slice(&header.colors_important.to_le_bytes());
    out.extend_from_slice(&header.info_extra);
}

/// Append every palette entry as B, G, R, reserved.
pub fn write_palette(out: &mut Vec<u8>, palette: &Palette) {
    for entry in palette.entries() {
        out.extend_from_slice(&entry.to_bytes());
    }
}

/// Append all stored rows, padding included.
pub fn write_raster(
    out: &mut Vec<u8>,
    raster: &Raster,
    stop: &dyn Stop,
) -> Result<(), RasterError> {
    for row in 0..raster.height() {
        if row % 16 == 0 {
            stop.check()?;
        }
        out.extend_from_slice(raster.row(row));
    }
    Ok(())
}
