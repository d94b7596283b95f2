//! Hand-built BMP files, written without going through the encoder.

#![allow(dead_code)]

use zenraster::{BitDepth, Bitmap, Color, RowOrder};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Xorshift bytes, deterministic per seed.
pub fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

pub fn stride(width: u32, bits: u16) -> usize {
    (width as usize * bits as usize).div_ceil(32) * 4
}

/// Layout knobs for [`bmp_bytes`].
#[derive(Clone, Copy)]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    pub bits: u16,
    pub info_size: u32,
    pub gap: usize,
}

impl Layout {
    pub fn new(width: i32, height: i32, bits: u16) -> Self {
        Self {
            width,
            height,
            bits,
            info_size: 40,
            gap: 0,
        }
    }
}

/// A complete file: headers, noise palette, gap bytes, noise pixels.
pub fn bmp_bytes(layout: Layout, seed: u32) -> Vec<u8> {
    let palette_len = if layout.bits <= 8 { 1usize << layout.bits } else { 0 };
    let rows = layout.height.unsigned_abs() as usize;
    let raster_len = stride(layout.width as u32, layout.bits) * rows;
    let data_offset = 14 + layout.info_size as usize + palette_len * 4 + layout.gap;
    let file_size = data_offset + raster_len;

    let mut out = Vec::with_capacity(file_size);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&0x1234u16.to_le_bytes());
    out.extend_from_slice(&0x5678u16.to_le_bytes());
    out.extend_from_slice(&(data_offset as u32).to_le_bytes());

    out.extend_from_slice(&layout.info_size.to_le_bytes());
    out.extend_from_slice(&layout.width.to_le_bytes());
    out.extend_from_slice(&layout.height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&layout.bits.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(raster_len as u32).to_le_bytes());
    out.extend_from_slice(&3780i32.to_le_bytes());
    out.extend_from_slice(&3780i32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend(noise(layout.info_size as usize - 40, seed ^ 0xA5A5));

    out.extend(noise(palette_len * 4, seed ^ 0x5A5A));
    out.extend(std::iter::repeat_n(0xEEu8, layout.gap));
    out.extend(noise(raster_len, seed));
    assert_eq!(out.len(), file_size);
    out
}

/// Direct-color image filled with `color`.
pub fn solid(width: u32, height: u32, depth: BitDepth, color: Color) -> Bitmap {
    let mut bmp = Bitmap::new(width, height, depth, RowOrder::BottomUp).unwrap();
    for y in 0..height {
        for x in 0..width {
            bmp.raster_mut().set_color(x, y, color);
        }
    }
    bmp
}

pub fn fill_rect(bmp: &mut Bitmap, x0: u32, y0: u32, w: u32, h: u32, color: Color) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            bmp.raster_mut().set_color(x, y, color);
        }
    }
}
