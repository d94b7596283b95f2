//! # zenraster
//!
//! Uncompressed BMP codec with a small processing toolbox on top.
//!
//! ## Supported Formats
//!
//! - BMP with a 40-byte BITMAPINFOHEADER or a larger V4/V5 header
//! - Bit depths 1, 4, 8 (palette) and 24, 32 (direct color)
//! - Bottom-up and top-down row order; rows stay in file order
//!
//! Decoding keeps every header field, the palette, and any gap before the
//! pixel data, so an unmodified [`Bitmap`] re-encodes to the same bytes.
//!
//! ## Operations
//!
//! - [`transform::grayscale`]: BT.601 luma, applied to the palette for indexed images
//! - [`transform::binarize`]: black/white threshold on red or on luma percentage
//! - [`transform::draw_dark_region_rectangle`] and [`transform::draw_cross`]
//! - [`detect::mark_objects`]: 8-connected dark blobs, size filter, red outlines
//! - [`diff::diff`]: per-pixel change map with a percentage verdict
//!
//! With the `std` feature, [`ops`] wraps each of these as a file-to-file call.
//!
//! ## Non-Goals
//!
//! - RLE, bitfields, embedded JPEG/PNG
//! - Color management
//!
//! ## Usage
//!
//! ```no_run
//! use zenraster::{DetectOptions, Unstoppable};
//!
//! let data: &[u8] = &[]; // your BMP bytes
//! let mut bitmap = zenraster::decode(data, Unstoppable)?;
//! let options = DetectOptions::default();
//! let found = zenraster::detect::mark_objects(&mut bitmap, &options, Unstoppable)?;
//! for object in &found.objects {
//!     println!("{:?} ({} px)", object.bbox, object.pixel_count);
//! }
//! let out = zenraster::encode(&bitmap, Unstoppable)?;
//! # Ok::<(), zenraster::RasterError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod decode;
mod error;
mod geometry;
mod limits;
mod pixel;
mod raster;

pub mod bmp;
pub mod detect;
pub mod diff;
pub mod transform;

#[cfg(feature = "std")]
pub mod ops;

// Re-exports
pub use bmp::{BitDepth, Bitmap, ImageHeader, Palette, PaletteEntry, RowOrder};
pub use decode::DecodeRequest;
pub use detect::{DetectOptions, Detection, DetectedObject};
pub use diff::DiffResult;
pub use enough::{Stop, Unstoppable};
pub use error::{Geometry, RasterError, Result};
pub use geometry::BoundingBox;
pub use limits::Limits;
pub use pixel::{Color, Pixel};
pub use raster::{Raster, RasterMut};
pub use transform::BinarizeMode;

/// Decode a BMP file from memory.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<Bitmap> {
    bmp::decode(data, None, &stop)
}

/// Encode a bitmap, header and palette included.
pub fn encode(bitmap: &Bitmap, stop: impl Stop) -> Result<alloc::vec::Vec<u8>> {
    bmp::encode(bitmap, &stop)
}

/// Parse the headers without reading pixel data.
pub fn probe(data: &[u8]) -> Result<ImageHeader> {
    bmp::read_header(data)
}
