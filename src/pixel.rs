/// A direct color triple, in RGB order regardless of BMP storage order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::gray(0);
    pub const WHITE: Color = Color::gray(255);
    pub const RED: Color = Color::new(255, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// A neutral color with all three channels set to `value`.
    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Luma with BT.601 weights, truncated toward zero.
    ///
    /// Exact integer arithmetic, so `Color::gray(v).luma() == v` for every `v`
    /// and grayscale conversion is idempotent.
    pub const fn luma(self) -> u8 {
        let r = self.red as u32;
        let g = self.green as u32;
        let b = self.blue as u32;
        ((r * 299 + g * 587 + b * 114) / 1000) as u8
    }

    /// Whether all three channels are strictly below `limit`.
    pub const fn all_below(self, limit: u8) -> bool {
        self.red < limit && self.green < limit && self.blue < limit
    }
}

/// One pixel as seen through a [`crate::Raster`].
///
/// 24/32-bit rasters hold direct colors; 1/4/8-bit rasters hold palette indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pixel {
    Direct(Color),
    Indexed(u8),
}

impl Pixel {
    /// The channel used for dark/bright decisions: red for direct colors,
    /// the index itself for palette images.
    pub const fn reference_channel(self) -> u8 {
        match self {
            Self::Direct(c) => c.red,
            Self::Indexed(i) => i,
        }
    }
}

impl From<Color> for Pixel {
    fn from(c: Color) -> Self {
        Self::Direct(c)
    }
}
