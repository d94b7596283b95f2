//! Color table for 1/4/8-bit images.

use alloc::vec::Vec;

use super::header::BitDepth;
use crate::error::RasterError;
use crate::pixel::Color;

/// One RGBQUAD entry, in storage order.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub reserved: u8,
}

impl PaletteEntry {
    pub const fn from_color(c: Color) -> Self {
        Self {
            blue: c.blue,
            green: c.green,
            red: c.red,
            reserved: 0,
        }
    }

    pub const fn color(self) -> Color {
        Color::new(self.red, self.green, self.blue)
    }

    pub(crate) fn from_bytes([blue, green, red, reserved]: [u8; 4]) -> Self {
        Self {
            blue,
            green,
            red,
            reserved,
        }
    }

    pub(crate) fn to_bytes(self) -> [u8; 4] {
        [self.blue, self.green, self.red, self.reserved]
    }
}

/// Palette with exactly `2^depth` entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Build a palette, checking that the entry count matches `depth`.
    pub fn from_entries(depth: BitDepth, entries: Vec<PaletteEntry>) -> Result<Self, RasterError> {
        let expected = depth.palette_len();
        if expected == 0 {
            return Err(RasterError::UnsupportedFormat(alloc::format!(
                "{}-bit images have no palette",
                depth.bits()
            )));
        }
        if entries.len() != expected {
            return Err(RasterError::InvalidParameter(alloc::format!(
                "{}-bit palette needs {expected} entries, got {}",
                depth.bits(),
                entries.len()
            )));
        }
        Ok(Self { entries })
    }

    /// Evenly spaced gray ramp from black to white.
    pub fn gray_ramp(depth: BitDepth) -> Result<Self, RasterError> {
        let n = depth.palette_len();
        let last = n.saturating_sub(1).max(1);
        let entries = (0..n)
            .map(|i| PaletteEntry::from_color(Color::gray((i * 255 / last) as u8)))
            .collect();
        Self::from_entries(depth, entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [PaletteEntry] {
        &mut self.entries
    }

    pub fn get(&self, index: u8) -> Option<PaletteEntry> {
        self.entries.get(usize::from(index)).copied()
    }

    /// Overwrite one entry.
    ///
    /// Panics if `index` is past the end of the palette.
    pub fn set(&mut self, index: u8, entry: PaletteEntry) {
        let len = self.entries.len();
        match self.entries.get_mut(usize::from(index)) {
            Some(slot) => *slot = entry,
            None => panic!("palette index {index} out of range for {len} entries"),
        }
    }

    /// Size of the palette block on disk.
    pub fn byte_len(&self) -> usize {
        self.entries.len() * 4
    }
}
