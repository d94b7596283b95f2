//! BMP reader: header, palette, gap and raster.
//!
//! Only uncompressed (BI_RGB) files at 1, 4, 8, 24 and 32 bits are accepted.
//! Rows are copied as stored, padding and row order untouched.

use alloc::vec::Vec;

use enough::Stop;

use super::header::{BitDepth, INFO_HEADER_SIZE, ImageHeader, MAGIC};
use super::palette::{Palette, PaletteEntry};
use crate::error::RasterError;
use crate::limits::Limits;
use crate::raster::{Raster, try_alloc};

// ── Cursor for reading from &[u8] ───────────────────────────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn at(data: &'a [u8], pos: usize) -> Result<Self, RasterError> {
        let mut c = Self::new(data);
        c.set_position(pos)?;
        Ok(c)
    }

    fn set_position(&mut self, pos: usize) -> Result<(), RasterError> {
        if pos > self.data.len() {
            return Err(self.eof(pos));
        }
        self.pos = pos;
        Ok(())
    }

    fn eof(&self, needed: usize) -> RasterError {
        RasterError::TruncatedData {
            needed,
            actual: self.data.len(),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], RasterError> {
        let data: &'a [u8] = self.data;
        let end = self.pos.checked_add(n).ok_or_else(|| self.eof(usize::MAX))?;
        let bytes = data.get(self.pos..end).ok_or_else(|| self.eof(end))?;
        self.pos = end;
        Ok(bytes)
    }

    fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], RasterError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn get_u16_le(&mut self) -> Result<u16, RasterError> {
        Ok(u16::from_le_bytes(self.read_fixed_bytes()?))
    }

    fn get_u32_le(&mut self) -> Result<u32, RasterError> {
        Ok(u32::from_le_bytes(self.read_fixed_bytes()?))
    }

    fn get_i32_le(&mut self) -> Result<i32, RasterError> {
        Ok(i32::from_le_bytes(self.read_fixed_bytes()?))
    }
}

// ── Header ──────────────────────────────────────────────────────────

/// Parse and validate the file header and info header.
///
/// Fails with `NotABitmap` when the `BM` signature is missing,
/// `TruncatedData` when the headers are cut short, and `UnsupportedFormat`
/// for bit depths outside {1, 4, 8, 24, 32} or any compression.
pub fn read_header(data: &[u8]) -> Result<ImageHeader, RasterError> {
    if data.len() < 2 || data[..2] != MAGIC {
        return Err(RasterError::NotABitmap);
    }

    let mut bytes = Cursor::at(data, 2)?;
    let file_size = bytes.get_u32_le()?;
    let reserved = [bytes.get_u16_le()?, bytes.get_u16_le()?];
    let data_offset = bytes.get_u32_le()?;

    let info_size = bytes.get_u32_le()?;
    if (info_size as usize) < INFO_HEADER_SIZE {
        return Err(RasterError::UnsupportedFormat(alloc::format!(
            "BMP info header of {info_size} bytes (need BITMAPINFOHEADER or later)"
        )));
    }

    let width = bytes.get_i32_le()?;
    let height = bytes.get_i32_le()?;
    let planes = bytes.get_u16_le()?;
    let bits = bytes.get_u16_le()?;
    let compression = bytes.get_u32_le()?;
    let image_size = bytes.get_u32_le()?;
    let x_pixels_per_meter = bytes.get_i32_le()?;
    let y_pixels_per_meter = bytes.get_i32_le()?;
    let colors_used = bytes.get_u32_le()?;
    let colors_important = bytes.get_u32_le()?;
    let info_extra = bytes.take(info_size as usize - INFO_HEADER_SIZE)?.to_vec();

    let bit_depth = BitDepth::from_bits(bits).ok_or_else(|| {
        RasterError::UnsupportedFormat(alloc::format!("BMP bit depth {bits} unsupported"))
    })?;

    if compression != 0 {
        return Err(RasterError::UnsupportedFormat(alloc::format!(
            "BMP compression {compression} unsupported (only uncompressed)"
        )));
    }

    if width <= 0 {
        return Err(RasterError::InvalidHeader(alloc::format!(
            "BMP width must be positive, got {width}"
        )));
    }
    if height == 0 {
        return Err(RasterError::InvalidHeader("BMP height is zero".into()));
    }

    Ok(ImageHeader {
        file_size,
        reserved,
        data_offset,
        info_size,
        width,
        height,
        planes,
        bit_depth,
        compression,
        image_size,
        x_pixels_per_meter,
        y_pixels_per_meter,
        colors_used,
        colors_important,
        info_extra,
    })
}

// ── Palette ─────────────────────────────────────────────────────────

/// Read the `2^depth` palette entries following the info header.
///
/// Returns `None` for 24/32-bit images.
pub fn read_palette(data: &[u8], header: &ImageHeader) -> Result<Option<Palette>, RasterError> {
    let count = header.bit_depth.palette_len();
    if count == 0 {
        return Ok(None);
    }

    let start = header.palette_offset();
    let end = start + count * 4;
    if end > header.data_offset as usize {
        return Err(RasterError::InvalidHeader(alloc::format!(
            "{count}-entry palette ends at {end}, past pixel data offset {}",
            header.data_offset
        )));
    }

    let mut bytes = Cursor::at(data, start)?;
    let mut entries = try_alloc(count)?;
    for _ in 0..count {
        entries.push(PaletteEntry::from_bytes(bytes.read_fixed_bytes::<4>()?));
    }
    Palette::from_entries(header.bit_depth, entries).map(Some)
}

/// Bytes between the end of the headers/palette and the pixel data.
pub(crate) fn read_gap(data: &[u8], header: &ImageHeader) -> Result<Vec<u8>, RasterError> {
    let start = header.palette_offset() + header.bit_depth.palette_len() * 4;
    let end = header.data_offset as usize;
    if end < start {
        return Err(RasterError::InvalidHeader(alloc::format!(
            "pixel data offset {end} overlaps headers ending at {start}"
        )));
    }
    let mut bytes = Cursor::at(data, start)?;
    Ok(bytes.take(end - start)?.to_vec())
}

// ── Raster ──────────────────────────────────────────────────────────

/// Read exactly `row_stride * height` bytes starting at the pixel-data offset.
pub fn read_raster(
    data: &[u8],
    header: &ImageHeader,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Raster, RasterError> {
    let width = header.width();
    let height = header.height();
    if let Some(limits) = limits {
        limits.check(width, height)?;
    }
    let stride = header.row_stride()?;
    let len = header.raster_len()?;
    if let Some(limits) = limits {
        limits.check_memory(len)?;
    }

    let offset = header.data_offset as usize;
    let end = offset
        .checked_add(len)
        .ok_or(RasterError::DimensionsTooLarge { width, height })?;
    if end > data.len() {
        return Err(RasterError::TruncatedData {
            needed: end,
            actual: data.len(),
        });
    }

    let mut buf = try_alloc(len)?;
    for (row_idx, row) in data[offset..end].chunks_exact(stride).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        buf.extend_from_slice(row);
    }

    Raster::from_bytes(buf, width, height, header.bit_depth)
}
