use crate::error::RasterError;

/// Resource caps checked by the decoder before the raster is allocated.
///
/// Every cap defaults to `None`, meaning unbounded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Cap on `width * height`.
    pub max_pixels: Option<u64>,
    /// Cap on the raster buffer, padding included.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    pub fn with_max_width(mut self, max: u64) -> Self {
        self.max_width = Some(max);
        self
    }

    pub fn with_max_height(mut self, max: u64) -> Self {
        self.max_height = Some(max);
        self
    }

    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    pub fn with_max_memory_bytes(mut self, max: u64) -> Self {
        self.max_memory_bytes = Some(max);
        self
    }

    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), RasterError> {
        cap("width", u64::from(width), self.max_width)?;
        cap("height", u64::from(height), self.max_height)?;
        cap(
            "pixel count",
            u64::from(width) * u64::from(height),
            self.max_pixels,
        )
    }

    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), RasterError> {
        cap("raster size", bytes as u64, self.max_memory_bytes)
    }
}

fn cap(what: &str, value: u64, max: Option<u64>) -> Result<(), RasterError> {
    match max {
        Some(max) if value > max => Err(RasterError::LimitExceeded(alloc::format!(
            "{what} {value} is over the limit of {max}"
        ))),
        _ => Ok(()),
    }
}
