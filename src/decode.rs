use enough::Stop;

use crate::bmp::{self, Bitmap, ImageHeader};
use crate::error::RasterError;
use crate::limits::Limits;

/// Decode request with optional resource limits.
///
/// ```no_run
/// use zenraster::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // your BMP bytes
/// let limits = Limits::default().with_max_pixels(16_000_000);
/// let bitmap = DecodeRequest::new(data)
///     .with_limits(&limits)
///     .decode(Unstoppable)?;
/// # Ok::<(), zenraster::RasterError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Parse the headers only.
    pub fn probe(&self) -> Result<ImageHeader, RasterError> {
        bmp::read_header(self.data)
    }

    /// Decode headers, palette and rows.
    pub fn decode(self, stop: impl Stop) -> Result<Bitmap, RasterError> {
        bmp::decode(self.data, self.limits, &stop)
    }
}
