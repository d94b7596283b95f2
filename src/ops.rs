//! File-path entry points.
//!
//! Each operation reads and validates its inputs and computes every output
//! in memory before it creates a file, so a failed call leaves no output
//! behind. The in-memory functions in [`crate::transform`], [`crate::detect`]
//! and [`crate::diff`] do the actual work.

use std::fs;
use std::path::Path;

use enough::Unstoppable;

use crate::bmp::{BitDepth, Bitmap};
use crate::detect::{BoundingBox, DetectOptions, Detection};
use crate::diff::{DiffResult, diff};
use crate::error::RasterError;
use crate::limits::Limits;
use crate::transform::{BinarizeMode, binarize, draw_cross, draw_dark_region_rectangle, grayscale};

/// Settings shared by every operation of a [`Processor`].
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Applied to every decoded input.
    pub limits: Limits,
    pub detect: DetectOptions,
    pub binarize: BinarizeMode,
}

impl Config {
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_detect(mut self, detect: DetectOptions) -> Self {
        self.detect = detect;
        self
    }

    pub fn with_binarize(mut self, mode: BinarizeMode) -> Self {
        self.binarize = mode;
        self
    }
}

/// What [`convert_to_grayscale`] wrote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrayscaleReport {
    pub width: u32,
    pub height: u32,
    pub bit_depth: BitDepth,
    /// `false` for palette images, whose second output is a plain gray copy.
    pub cross_drawn: bool,
}

/// Read and decode a BMP file without limits.
pub fn read_file(path: impl AsRef<Path>) -> Result<Bitmap, RasterError> {
    Processor::default().load(path)
}

/// Encode and write a bitmap.
pub fn write_file(path: impl AsRef<Path>, bitmap: &Bitmap) -> Result<(), RasterError> {
    let bytes = crate::bmp::encode(bitmap, &Unstoppable)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Runs the file operations with one [`Config`].
///
/// ```no_run
/// use zenraster::ops::{Config, Processor};
/// use zenraster::{DetectOptions, Limits};
///
/// let config = Config::default()
///     .with_limits(Limits::default().with_max_pixels(50_000_000))
///     .with_detect(DetectOptions::default().with_min_pixels(20));
/// let found = Processor::new(config).mark_objects("scan.bmp", "marked.bmp")?;
/// println!("{} objects", found.len());
/// # Ok::<(), zenraster::RasterError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Processor {
    config: Config,
}

impl Processor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read and decode a file under the configured limits.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Bitmap, RasterError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        log::debug!("read {} ({} bytes)", path.display(), data.len());
        crate::bmp::decode(&data, Some(&self.config.limits), &Unstoppable)
    }

    /// Write a gray copy to `out_gray`, then the same image with a red center
    /// cross to `out_cross`. Palette images get a plain gray copy instead.
    pub fn convert_to_grayscale(
        &self,
        input: impl AsRef<Path>,
        out_gray: impl AsRef<Path>,
        out_cross: impl AsRef<Path>,
    ) -> Result<GrayscaleReport, RasterError> {
        let mut bitmap = self.load(input)?;
        grayscale(&mut bitmap, Unstoppable)?;
        let gray_bytes = crate::bmp::encode(&bitmap, &Unstoppable)?;

        let cross_drawn = bitmap.bit_depth().is_direct();
        let cross_bytes = if cross_drawn {
            draw_cross(&mut bitmap)?;
            crate::bmp::encode(&bitmap, &Unstoppable)?
        } else {
            gray_bytes.clone()
        };

        fs::write(out_gray, gray_bytes)?;
        fs::write(out_cross, cross_bytes)?;
        Ok(GrayscaleReport {
            width: bitmap.width(),
            height: bitmap.height(),
            bit_depth: bitmap.bit_depth(),
            cross_drawn,
        })
    }

    /// Threshold to black and white with the configured [`BinarizeMode`].
    pub fn convert_to_binary(
        &self,
        input: impl AsRef<Path>,
        out: impl AsRef<Path>,
    ) -> Result<(), RasterError> {
        let mut bitmap = self.load(input)?;
        binarize(&mut bitmap, self.config.binarize, Unstoppable)?;
        write_file(out, &bitmap)
    }

    /// Outline the near-black region. Writes the file even when nothing was found.
    pub fn detect_and_draw_rectangle(
        &self,
        input: impl AsRef<Path>,
        out: impl AsRef<Path>,
    ) -> Result<Option<BoundingBox>, RasterError> {
        let mut bitmap = self.load(input)?;
        let drawn = draw_dark_region_rectangle(&mut bitmap)?;
        if drawn.is_none() {
            log::debug!("no near-black pixels; writing image unchanged");
        }
        write_file(out, &bitmap)?;
        Ok(drawn)
    }

    /// Outline every dark object found with the configured [`DetectOptions`].
    pub fn mark_objects(
        &self,
        input: impl AsRef<Path>,
        out: impl AsRef<Path>,
    ) -> Result<Detection, RasterError> {
        let mut bitmap = self.load(input)?;
        let found = crate::detect::mark_objects(&mut bitmap, &self.config.detect, Unstoppable)?;
        write_file(out, &bitmap)?;
        Ok(found)
    }

    /// Diff two images and write the change map.
    pub fn compare(
        &self,
        first: impl AsRef<Path>,
        second: impl AsRef<Path>,
        out: impl AsRef<Path>,
        diff_threshold_percent: f64,
    ) -> Result<DiffResult, RasterError> {
        let a = self.load(first)?;
        let b = self.load(second)?;
        let (map, result) = diff(&a, &b, diff_threshold_percent, Unstoppable)?;
        write_file(out, &map)?;
        Ok(result)
    }
}

/// [`Processor::convert_to_grayscale`] with default settings.
pub fn convert_to_grayscale(
    input: impl AsRef<Path>,
    out_gray: impl AsRef<Path>,
    out_cross: impl AsRef<Path>,
) -> Result<GrayscaleReport, RasterError> {
    Processor::default().convert_to_grayscale(input, out_gray, out_cross)
}

/// [`Processor::convert_to_binary`] with the given mode.
pub fn convert_to_binary(
    input: impl AsRef<Path>,
    out: impl AsRef<Path>,
    mode: BinarizeMode,
) -> Result<(), RasterError> {
    Processor::new(Config::default().with_binarize(mode)).convert_to_binary(input, out)
}

/// [`Processor::detect_and_draw_rectangle`] with default settings.
pub fn detect_and_draw_rectangle(
    input: impl AsRef<Path>,
    out: impl AsRef<Path>,
) -> Result<Option<BoundingBox>, RasterError> {
    Processor::default().detect_and_draw_rectangle(input, out)
}

/// [`Processor::mark_objects`] with the given options.
pub fn mark_objects_in_binary_image(
    input: impl AsRef<Path>,
    out: impl AsRef<Path>,
    options: &DetectOptions,
) -> Result<Detection, RasterError> {
    Processor::new(Config::default().with_detect(*options)).mark_objects(input, out)
}

/// [`Processor::compare`] with default settings.
pub fn compare_binary_images(
    first: impl AsRef<Path>,
    second: impl AsRef<Path>,
    out: impl AsRef<Path>,
    diff_threshold_percent: f64,
) -> Result<DiffResult, RasterError> {
    Processor::default().compare(first, second, out, diff_threshold_percent)
}
